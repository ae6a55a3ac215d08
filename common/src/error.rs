//! エラー型定義

use thiserror::Error;

use crate::form::ValidationError;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid photo: {0}")]
    InvalidPhoto(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
