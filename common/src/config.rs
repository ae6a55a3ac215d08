//! バックエンド接続設定
//!
//! 環境で変わるのは接続先オリジンだけ。ビルドモードで切り替える。

use crate::error::{Error, Result};
use crate::webhook::{endpoint_url, PhotoTransport, DEFAULT_SENDER};

pub const PRODUCTION_ORIGIN: &str = "https://foundpaw.onrender.com";
pub const DEVELOPMENT_ORIGIN: &str = "http://localhost:5000";

/// マッチ画像の配信元
pub const DEFAULT_ASSET_BASE: &str = "http://localhost:5000/uploads/";

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub origin: String,
    pub asset_base: String,
    pub sender: String,
    pub photo_transport: PhotoTransport,
}

impl BackendConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            asset_base: DEFAULT_ASSET_BASE.to_string(),
            sender: DEFAULT_SENDER.to_string(),
            photo_transport: PhotoTransport::Inline,
        }
    }

    /// リリースビルドは本番、デバッグビルドはローカル
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::new(DEVELOPMENT_ORIGIN)
        } else {
            Self::new(PRODUCTION_ORIGIN)
        }
    }

    pub fn endpoint(&self) -> String {
        endpoint_url(&self.origin)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("origin", &self.origin), ("asset base", &self.asset_base)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!("{} must be an http(s) URL: {}", name, url)));
            }
        }
        if let PhotoTransport::MediaUrl(url) = &self.photo_transport {
            if url.trim().is_empty() {
                return Err(Error::Config("media URL is empty".into()));
            }
        }
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::for_build()
    }
}
