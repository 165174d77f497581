use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransmissionError {
    #[error(transparent)]
    Transport(#[from] transport::TransportError),

    /// HTTP status other than success (including an unresolved 409)
    #[error("request error: {status}")]
    Request { status: u16 },

    /// HTTP succeeded but the RPC `result` was not `"success"`
    #[error("transmission error: {message}")]
    Protocol { message: String },
}
