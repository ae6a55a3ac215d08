//! ユーザー向け通知
//!
//! Webのトーストと CLI の出力で同じ文言を使う。

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

impl NoticeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeVariant::Default => "default",
            NoticeVariant::Destructive => "destructive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }

    // 送信結果

    pub fn report_submitted() -> Self {
        Self::info(
            "Dog report submitted",
            "Your report has been saved. We'll notify you if we find a match.",
        )
    }

    pub fn submission_failed() -> Self {
        Self::error("Error", "Failed to submit dog report. Please try again.")
    }

    // 写真選択

    pub fn invalid_file_type() -> Self {
        Self::error("Invalid file type", "Please select an image file")
    }

    // 位置情報の許可

    pub fn location_granted() -> Self {
        Self::info("Location access granted", "Using your current location")
    }

    pub fn location_denied() -> Self {
        Self::error(
            "Location access denied",
            "Please enable location access in your browser settings",
        )
    }

    pub fn location_timeout() -> Self {
        Self::error(
            "Location request timed out",
            "Could not get your location. Please try again",
        )
    }

    pub fn location_unavailable(detail: &str) -> Self {
        Self::error("Location unavailable", detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_variants() {
        assert!(!Notice::report_submitted().is_error());
        assert!(Notice::submission_failed().is_error());
        assert!(Notice::invalid_file_type().is_error());
    }

    #[test]
    fn test_permission_notices_are_distinct() {
        let granted = Notice::location_granted();
        let denied = Notice::location_denied();
        let timeout = Notice::location_timeout();
        assert_ne!(granted.title, denied.title);
        assert_ne!(denied.title, timeout.title);
        assert_ne!(granted.title, timeout.title);
    }

    #[test]
    fn test_notice_serialize() {
        let json = serde_json::to_string(&Notice::submission_failed()).expect("シリアライズ失敗");
        assert!(json.contains("\"variant\":\"destructive\""));
    }
}
