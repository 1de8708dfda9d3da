/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 認証ゲート / http: transport 共通 (request id, limit, timeout, trace)
 */
pub mod auth;
pub mod http;
