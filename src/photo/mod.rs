//! 添付写真の読み込み
//!
//! 中身から画像形式を判定し、EXIFに撮影位置があれば取り出す。

mod exif;

pub use self::exif::dms_to_degrees;

use crate::error::{PawMatchError, Result};
use pawmatch_common::{is_image_content_type, Coordinates, Photo};
use std::path::Path;

/// 写真ファイルを読み込む
///
/// 画像でなければ `ImageLoad` エラー。
pub fn load_photo(path: &Path) -> Result<Photo> {
    if !path.is_file() {
        return Err(PawMatchError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let content_type = detect_content_type(path, &bytes)
        .ok_or_else(|| PawMatchError::ImageLoad(format!("画像ファイルではありません: {}", path.display())))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo".to_string());

    tracing::debug!(file = %file_name, content_type, size = bytes.len(), "写真を読み込みました");

    Ok(Photo::new(file_name, content_type, bytes))
}

/// 中身 → 拡張子の順でMIMEタイプを判定
pub fn detect_content_type(path: &Path, bytes: &[u8]) -> Option<&'static str> {
    let from_bytes = image::guess_format(bytes).ok().map(|f| f.to_mime_type());
    let from_path = || image::ImageFormat::from_path(path).ok().map(|f| f.to_mime_type());

    from_bytes
        .or_else(from_path)
        .filter(|mime| is_image_content_type(mime))
}

/// 撮影位置（EXIF GPS）
///
/// 取れなければNone。位置未指定時の補完に使う。
pub fn gps_fix(path: &Path) -> Option<Coordinates> {
    match exif::extract_gps(path) {
        Ok(at) => {
            tracing::debug!(lat = at.lat, lon = at.lon, "EXIFから撮影位置を取得");
            Some(at)
        }
        Err(e) => {
            tracing::debug!(error = %e, "EXIFに撮影位置がありません");
            None
        }
    }
}
