use jsonrpsee_core::client::Error as ClientError;
use thiserror::Error;

/// Errors raised by [`crate::RpcClient`].
///
/// `Transient` and `ResponseTooLarge` are deliberately not merged into one
/// variant even though the scheduler in `rivergate-core` treats them
/// identically (spec.md §7): the RPC layer still gets to try to tell them
/// apart, since some providers report an oversized `eth_getLogs` range with
/// a distinct JSON-RPC error code/message rather than a bare transport
/// failure.
#[derive(Debug, Error)]
pub enum RpcError {
    /// A transport-level failure: connection refused, timeout, malformed
    /// response, or any JSON-RPC error not recognized as a size-limit
    /// complaint.
    #[error("rpc transport error: {0}")]
    Transient(#[source] ClientError),
    /// The endpoint refused an `eth_getLogs` range as too large to serve in
    /// one request.
    #[error("rpc endpoint rejected request as too large")]
    ResponseTooLarge,
    /// A response field expected to be present (or hex-encoded) was not.
    #[error("malformed rpc response: {0}")]
    MalformedResponse(String),
}

/// Known substrings providers use when refusing an oversized `eth_getLogs`
/// range. Matched case-insensitively against the JSON-RPC error message.
const TOO_LARGE_MARKERS: &[&str] = &[
    "query returned more than",
    "block range is too large",
    "range too large",
    "response size exceeded",
    "limit exceeded",
    "too many results",
    "exceeds the range",
];

impl RpcError {
    /// Wrap a [`ClientError`], reclassifying it as
    /// [`RpcError::ResponseTooLarge`] when its message matches one of the
    /// known "range too large" provider complaints.
    pub(crate) fn from_client_error(err: ClientError) -> Self {
        if let ClientError::Call(ref call_err) = err {
            let message = call_err.message().to_ascii_lowercase();
            if TOO_LARGE_MARKERS.iter().any(|marker| message.contains(marker)) {
                return Self::ResponseTooLarge;
            }
        }
        Self::Transient(err)
    }
}
