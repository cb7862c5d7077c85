//! Crate-level error taxonomy
//!
//! Only the two transient control-plane signals (busy, throttled) are handled
//! inside the retry executor; every kind below is fatal for the call that
//! raised it and propagates unchanged to the caller.

use crate::streamscale::client::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScalingError {
    /// Attempts exhausted without the operation completing. The remote
    /// mutation may or may not have taken effect, so callers must re-derive
    /// current state before issuing anything else.
    #[error("unable to complete operation on stream '{stream_id}' after {attempts} attempts")]
    OperationExhausted { stream_id: String, attempts: u32 },

    /// The requested partition is absent, either from the locally derived
    /// open set or as reported by the control plane itself.
    #[error("partition '{partition_id}' not found in stream '{stream_id}'")]
    NotFound {
        partition_id: String,
        stream_id: String,
    },

    /// The mutation is structurally invalid (split target outside the
    /// partition's range, merge targets not adjacent, ...).
    #[error("invalid mutation: {reason}")]
    InvalidMutation { reason: String },

    /// A blocking wait observed the cancellation token.
    #[error("operation '{operation}' cancelled")]
    Cancelled { operation: String },

    /// Non-transient control-plane failure, surfaced untouched.
    #[error("control plane failure")]
    Remote {
        #[source]
        source: ClientError,
    },
}

impl ScalingError {
    /// Convert a non-transient client failure into its fatal form. Transient
    /// signals never reach this path; the executor retries them.
    pub(crate) fn from_fatal(err: ClientError, stream_id: &str) -> Self {
        debug_assert!(!err.is_transient());
        match err {
            ClientError::NotFound { entity } => ScalingError::NotFound {
                partition_id: entity,
                stream_id: stream_id.to_string(),
            },
            ClientError::InvalidArgument { reason } => ScalingError::InvalidMutation { reason },
            other => ScalingError::Remote { source: other },
        }
    }
}
