//! WhatsAppウェブフック送信
//!
//! 通報を multipart/form-data でバックエンドへPOSTし、
//! 返ってきたTwiMLからマッチ候補を取り出す。

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};
use pawmatch_common::{parse_response, BackendConfig, FormField, Report, SubmissionResult, WebhookForm};

/// 通報を送信
///
/// # Arguments
/// * `report` - 検証済みの通報
/// * `config` - 送信先
///
/// # Returns
/// マッチ候補付きの送信結果
pub async fn submit_report(report: &Report, config: &BackendConfig) -> Result<SubmissionResult, JsValue> {
    let form = WebhookForm::from_report(report, &config.sender, &config.photo_transport);
    let body = to_form_data(&form)?;

    // Content-Typeはブラウザがboundary付きで設定する
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&body);

    let url = config.endpoint();
    let request = Request::new_with_str_and_init(&url, &opts)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window not available"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("API error: {}", resp.status())));
    }

    let text = JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .unwrap_or_default();

    gloo::console::log!(format!("Server response: {}", text));

    parse_response(&text).map_err(|e| JsValue::from_str(&format!("Response parse error: {}", e)))
}

/// フォームフィールドをFormDataへ
fn to_form_data(form: &WebhookForm) -> Result<FormData, JsValue> {
    let data = FormData::new()?;

    for field in &form.fields {
        match field {
            FormField::Text { name, value } => {
                data.append_with_str(name, value)?;
            }
            FormField::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let blob = bytes_to_blob(bytes, content_type)?;
                data.append_with_blob_and_filename(name, &blob, file_name)?;
            }
        }
    }

    Ok(data)
}

fn bytes_to_blob(bytes: &[u8], content_type: &str) -> Result<Blob, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);

    let bag = BlobPropertyBag::new();
    bag.set_type(content_type);

    Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
}
