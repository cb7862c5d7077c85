//! Control-plane client error types

/// Failure signals a control-plane call can raise.
///
/// Only `Busy` and `Throttled` are transient: the retry executor absorbs them
/// with a fixed delay and exponential backoff respectively. Every other kind
/// is fatal for the call and propagates unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The target resource is mid-mutation from a concurrent or prior call
    #[error("resource busy: {resource}")]
    Busy { resource: String },

    /// The control plane rejected the call under rate limiting
    #[error("throttled by the control plane")]
    Throttled,

    /// The named stream or partition does not exist remotely
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// The call was malformed (split target outside range, merge targets not
    /// adjacent, ...); the remote service is the authority here
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Any other remote failure
    #[error("control plane error: {message}")]
    Remote { message: String },
}

impl ClientError {
    /// Whether the retry executor may try this call again.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Busy { .. } | ClientError::Throttled)
    }
}
