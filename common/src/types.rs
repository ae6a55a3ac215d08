//! 通報・マッチ結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Report: 送信直前の完成した通報
//! - MatchRecord: サーバー応答から抽出したマッチ候補
//! - SubmissionResult: 1回の送信に対する結果

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 犬のステータス（迷子 / 保護）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DogStatus {
    #[default]
    Lost,
    Found,
}

impl DogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DogStatus::Lost => "lost",
            DogStatus::Found => "found",
        }
    }

    /// 送信ボタン等に使う表示ラベル
    pub fn label(&self) -> &'static str {
        match self {
            DogStatus::Lost => "Lost",
            DogStatus::Found => "Found",
        }
    }
}

impl fmt::Display for DogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lost" => Ok(DogStatus::Lost),
            "found" => Ok(DogStatus::Found),
            _ => Err(format!("Unknown status: {}. Use lost or found", s)),
        }
    }
}

/// 緯度経度
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// 「未設定」を表す番兵値 (0,0)
    pub const SENTINEL: Coordinates = Coordinates { lat: 0.0, lon: 0.0 };

    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_sentinel(&self) -> bool {
        self.lat == 0.0 && self.lon == 0.0
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Leafletに渡す [lat, lon] 形式
    pub fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// 添付写真
///
/// 本体バイト列はJSON出力に含めない
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip, default)]
    pub bytes: Vec<u8>,
}

impl Photo {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// 画像のContent-Typeかどうか
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("image/")
}

/// 送信可能な状態に揃った通報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub status: DogStatus,
    pub description: String,
    pub location: Coordinates,
    pub phone: String,
    #[serde(default)]
    pub photo: Option<Photo>,
}

/// サーバー応答から抽出したマッチ候補
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub description_text: String,
    pub phone: String,
    pub lat: f64,
    pub lon: f64,
    pub image_file_name: String,
    /// 0.0〜1.0（サーバーは実スコアを返さないため常に1.0）
    pub score: f64,
}

impl MatchRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// 1回の送信結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<MatchRecord>>,
}

impl SubmissionResult {
    pub fn has_matches(&self) -> bool {
        self.matches.as_ref().is_some_and(|m| !m.is_empty())
    }
}
