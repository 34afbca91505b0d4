use snipeflow_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("アセットが見つかりません: {0}")]
    AssetNotFound(String),

    #[error("予期しないレスポンス形式: {operation}")]
    UnexpectedDocument { operation: String },
}

pub type Result<T> = std::result::Result<T, FleetError>;
