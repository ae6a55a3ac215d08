//! ウェブフック送信クライアント
//!
//! 通報を multipart/form-data でPOSTし、TwiML応答を解析する。

use crate::error::{PawMatchError, Result};
use pawmatch_common::{parse_response, BackendConfig, FormField, Report, SubmissionResult, WebhookForm};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

pub struct WebhookClient {
    http: reqwest::Client,
    backend: BackendConfig,
}

impl WebhookClient {
    pub fn new(backend: BackendConfig, timeout_seconds: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { http, backend })
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    /// 通報を送信して結果を返す
    pub async fn submit(&self, report: &Report) -> Result<SubmissionResult> {
        let form = WebhookForm::from_report(report, &self.backend.sender, &self.backend.photo_transport);
        let url = self.backend.endpoint();

        tracing::info!(%url, status = %report.status, "通報を送信します");

        let response = self
            .http
            .post(&url)
            .multipart(to_multipart(&form)?)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), body = %body, "サーバー応答");

        if !status.is_success() {
            return Err(PawMatchError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let result = parse_response(&body)?;
        tracing::info!(
            matches = result.matches.as_ref().map(Vec::len).unwrap_or(0),
            "応答を解析しました"
        );
        Ok(result)
    }
}

/// フォームフィールドをreqwestのmultipartへ
fn to_multipart(form: &WebhookForm) -> Result<Form> {
    let mut multipart = Form::new();

    for field in &form.fields {
        multipart = match field {
            FormField::Text { name, value } => multipart.text(*name, value.clone()),
            FormField::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)?;
                multipart.part(*name, part)
            }
        };
    }

    Ok(multipart)
}
