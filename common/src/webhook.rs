//! Webhook互換フォームの組み立て
//!
//! バックエンドはWhatsApp(Twilio)のWebhookを受ける作りなので、
//! 通報をその形のmultipartフォームに詰め替える。
//! HTTPクライアントへの変換はCLI(reqwest)とWeb(FormData)それぞれで行う。

use crate::types::{Photo, Report};

/// 送信先パス
pub const WEBHOOK_PATH: &str = "/whatsapp";

/// 送信者フィールド（サーバー側では使われない）
pub const DEFAULT_SENDER: &str = "whatsapp:+7626818255";

/// アップロード基盤ができるまでの仮画像URL
pub const PLACEHOLDER_MEDIA_URL: &str =
    "https://images.dog.ceo/breeds/retriever-golden/n02099601_1722.jpg";

pub const FIELD_FROM: &str = "From";
pub const FIELD_BODY: &str = "Body";
pub const FIELD_IMAGE: &str = "image";
pub const FIELD_MEDIA_URL: &str = "MediaUrl0";
pub const FIELD_MEDIA_CONTENT_TYPE: &str = "MediaContentType0";

const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// 写真の送り方
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhotoTransport {
    /// ファイル本体を `image` フィールドに添付
    #[default]
    Inline,
    /// 取得済みの公開URLを `MediaUrl0` で渡す
    MediaUrl(String),
}

/// フォームの1フィールド
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl FormField {
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }

    fn text(name: &'static str, value: impl Into<String>) -> Self {
        FormField::Text {
            name,
            value: value.into(),
        }
    }
}

/// Webhook互換フォーム
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookForm {
    pub fields: Vec<FormField>,
}

impl WebhookForm {
    /// 通報からフォームを組み立てる
    pub fn from_report(report: &Report, sender: &str, transport: &PhotoTransport) -> Self {
        let mut fields = vec![
            FormField::text(FIELD_FROM, sender),
            FormField::text(FIELD_BODY, format_body(report)),
        ];

        if let Some(photo) = &report.photo {
            fields.extend(photo_fields(photo, transport));
        }

        Self { fields }
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match f {
            FormField::Text { name: n, value } if *n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }
}

/// `Body` の定型文
///
/// `"<status> dog <description> Location:<lat>,<lon> Phone:<phone>"`
pub fn format_body(report: &Report) -> String {
    format!(
        "{} dog {} Location:{},{} Phone:{}",
        report.status.as_str(),
        report.description.trim(),
        report.location.lat,
        report.location.lon,
        report.phone.trim(),
    )
}

/// 送信先URL
pub fn endpoint_url(origin: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), WEBHOOK_PATH)
}

fn photo_fields(photo: &Photo, transport: &PhotoTransport) -> Vec<FormField> {
    let content_type = if photo.content_type.is_empty() {
        FALLBACK_CONTENT_TYPE.to_string()
    } else {
        photo.content_type.clone()
    };

    match transport {
        PhotoTransport::Inline => vec![
            FormField::File {
                name: FIELD_IMAGE,
                file_name: photo.file_name.clone(),
                content_type: content_type.clone(),
                bytes: photo.bytes.clone(),
            },
            FormField::text(FIELD_MEDIA_CONTENT_TYPE, content_type),
        ],
        PhotoTransport::MediaUrl(url) => vec![
            FormField::text(FIELD_MEDIA_URL, url.clone()),
            FormField::text(FIELD_MEDIA_CONTENT_TYPE, content_type),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, DogStatus};

    fn sample_report() -> Report {
        Report {
            status: DogStatus::Lost,
            description: "Brown lab with red collar".to_string(),
            location: Coordinates::new(40.1, -73.9),
            phone: "555-1234".to_string(),
            photo: Some(Photo::new("rex.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])),
        }
    }

    #[test]
    fn test_format_body() {
        let body = format_body(&sample_report());
        assert_eq!(
            body,
            "lost dog Brown lab with red collar Location:40.1,-73.9 Phone:555-1234"
        );
    }

    #[test]
    fn test_format_body_found() {
        let report = Report {
            status: DogStatus::Found,
            ..sample_report()
        };
        assert!(format_body(&report).starts_with("found dog "));
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(endpoint_url("http://localhost:5000"), "http://localhost:5000/whatsapp");
        assert_eq!(
            endpoint_url("https://foundpaw.onrender.com/"),
            "https://foundpaw.onrender.com/whatsapp"
        );
    }

    #[test]
    fn test_form_inline_photo() {
        let form = WebhookForm::from_report(&sample_report(), DEFAULT_SENDER, &PhotoTransport::Inline);

        assert_eq!(form.get_text(FIELD_FROM), Some(DEFAULT_SENDER));
        assert!(form.get_text(FIELD_BODY).unwrap().contains("Phone:555-1234"));
        assert_eq!(form.get_text(FIELD_MEDIA_CONTENT_TYPE), Some("image/png"));
        assert!(!form.has_field(FIELD_MEDIA_URL));

        let file = form.fields.iter().find(|f| f.name() == FIELD_IMAGE).unwrap();
        match file {
            FormField::File { file_name, bytes, .. } => {
                assert_eq!(file_name, "rex.png");
                assert_eq!(bytes.len(), 4);
            }
            _ => panic!("Expected file field"),
        }
    }

    #[test]
    fn test_form_media_url_photo() {
        let transport = PhotoTransport::MediaUrl(PLACEHOLDER_MEDIA_URL.to_string());
        let form = WebhookForm::from_report(&sample_report(), DEFAULT_SENDER, &transport);

        assert_eq!(form.get_text(FIELD_MEDIA_URL), Some(PLACEHOLDER_MEDIA_URL));
        assert_eq!(form.get_text(FIELD_MEDIA_CONTENT_TYPE), Some("image/png"));
        assert!(!form.has_field(FIELD_IMAGE));
    }

    #[test]
    fn test_form_without_photo() {
        let report = Report {
            photo: None,
            ..sample_report()
        };
        let form = WebhookForm::from_report(&report, DEFAULT_SENDER, &PhotoTransport::Inline);
        assert_eq!(form.fields.len(), 2);
    }

    #[test]
    fn test_form_missing_content_type_falls_back_to_jpeg() {
        let report = Report {
            photo: Some(Photo::new("rex", "", vec![1])),
            ..sample_report()
        };
        let form = WebhookForm::from_report(&report, DEFAULT_SENDER, &PhotoTransport::Inline);
        assert_eq!(form.get_text(FIELD_MEDIA_CONTENT_TYPE), Some("image/jpeg"));
    }
}
