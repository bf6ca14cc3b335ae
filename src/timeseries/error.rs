use thiserror::Error;

#[derive(Debug, Error)]
pub enum CellError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Protobuf bytes that do not parse as a `TsCell`.
    #[error("malformed wire cell: {0}")]
    Wire(#[from] prost::DecodeError),
}

impl CellError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CellError::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CellError>;
