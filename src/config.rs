use crate::error::{PawMatchError, Result};
use pawmatch_common::config::DEFAULT_ASSET_BASE;
use pawmatch_common::webhook::DEFAULT_SENDER;
use pawmatch_common::{BackendConfig, PhotoTransport};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 接続先を上書きする環境変数
pub const BACKEND_ENV: &str = "PAWMATCH_BACKEND_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 未設定ならビルド種別の既定値
    pub backend_origin: Option<String>,
    pub asset_base: String,
    pub sender: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_origin: None,
            asset_base: DEFAULT_ASSET_BASE.into(),
            sender: DEFAULT_SENDER.into(),
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "設定を読み込みました");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PawMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pawmatch").join("config.json"))
    }

    /// 送信先設定を組み立てる
    ///
    /// 優先順: 環境変数 → 設定ファイル → ビルド種別の既定値
    pub fn backend(&self, media_url: Option<String>) -> Result<BackendConfig> {
        let env_origin = std::env::var(BACKEND_ENV).ok().filter(|v| !v.trim().is_empty());
        self.backend_with_origin(env_origin, media_url)
    }

    pub fn backend_with_origin(
        &self,
        origin_override: Option<String>,
        media_url: Option<String>,
    ) -> Result<BackendConfig> {
        let mut backend = match origin_override.or_else(|| self.backend_origin.clone()) {
            Some(origin) => BackendConfig::new(origin),
            None => BackendConfig::for_build(),
        };

        backend.asset_base = self.asset_base.clone();
        backend.sender = self.sender.clone();
        if let Some(url) = media_url {
            backend.photo_transport = PhotoTransport::MediaUrl(url);
        }

        backend.validate()?;
        Ok(backend)
    }

    /// 保存前・読込時の検証
    ///
    /// 接続先と画像配信元はhttp(s) URL、タイムアウトは1秒以上。
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(PawMatchError::Config(
                "timeout_seconds は1以上を指定してください".into(),
            ));
        }
        let origin = self
            .backend_origin
            .clone()
            .unwrap_or_else(|| BackendConfig::for_build().origin);
        let backend = BackendConfig {
            asset_base: self.asset_base.clone(),
            ..BackendConfig::new(origin)
        };
        backend.validate()?;
        Ok(())
    }

    pub fn set_backend(&mut self, origin: String) -> Result<()> {
        let updated = Config {
            backend_origin: Some(origin),
            ..self.clone()
        };
        updated.validate()?;
        *self = updated;
        self.save()
    }

    pub fn set_asset_base(&mut self, base: String) -> Result<()> {
        let updated = Config {
            asset_base: base,
            ..self.clone()
        };
        updated.validate()?;
        *self = updated;
        self.save()
    }
}
