//! Stream control-plane seam
//!
//! The only external boundary this crate touches. Implementations bind the
//! trait to a concrete stream service; everything above it (retry, backoff,
//! derivation, stabilization) is service-agnostic.

pub mod error;
pub mod traits;

pub use error::ClientError;
pub use traits::StreamControlPlane;
