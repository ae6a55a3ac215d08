use thiserror::Error;

#[derive(Error, Debug)]
pub enum PawMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("サーバーがエラーを返しました: {status} {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("入力エラー: {0}")]
    Input(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pawmatch_common::Error),
}

impl From<pawmatch_common::ValidationError> for PawMatchError {
    fn from(e: pawmatch_common::ValidationError) -> Self {
        PawMatchError::Common(e.into())
    }
}

pub type Result<T> = std::result::Result<T, PawMatchError>;
