use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error(
        "API キーが見つかりません: {}\n\
        ヒント: SNIPE_API_KEY_PATH 環境変数または設定ファイルの api_key_path で場所を指定できます",
        .0.display()
    )]
    MissingApiKey(PathBuf),

    #[error("API キーが空です: {}", .0.display())]
    EmptyApiKey(PathBuf),

    #[error("無効な設定値: {0}")]
    InvalidValue(String),

    #[error("設定ファイルのパースエラー: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
