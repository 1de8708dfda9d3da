pub mod gate;
pub mod verifier;

pub use gate::{AuthGate, GateConfig};
pub use verifier::Hs256Verifier;
