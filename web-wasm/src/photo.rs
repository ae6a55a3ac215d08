//! 添付写真の読み込み

use base64::{engine::general_purpose::STANDARD, Engine};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;
use pawmatch_common::Photo;

/// 選択されたファイルを読み込む
pub async fn read_photo(file: &File) -> Result<Photo, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(Photo::new(file.name(), file.type_(), bytes))
}

/// プレビュー表示用のData URL
///
/// # Returns
/// "data:image/jpeg;base64,/9j/4AAQ..." 形式
pub fn preview_data_url(photo: &Photo) -> String {
    let mime_type = if photo.content_type.is_empty() {
        "image/jpeg"
    } else {
        photo.content_type.as_str()
    };
    format!("data:{};base64,{}", mime_type, STANDARD.encode(&photo.bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_data_url() {
        let photo = Photo::new("rex.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
        let url = preview_data_url(&photo);
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_preview_data_url_without_type() {
        let photo = Photo::new("rex", "", vec![0xff, 0xd8]);
        assert!(preview_data_url(&photo).starts_with("data:image/jpeg;base64,"));
    }
}
