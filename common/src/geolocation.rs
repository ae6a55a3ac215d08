//! 位置情報プロバイダの状態
//!
//! ブラウザの Geolocation API から届く結果を反映する純粋な状態機械。
//! 許可制（ボタン押下で初めて測位する）と自動測位の両方に対応する。

use serde::Serialize;

use crate::notice::Notice;
use crate::types::Coordinates;

/// 測位オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// ミリ秒
    pub timeout: u32,
    /// キャッシュ済み測位の再利用を許す時間（ミリ秒）
    pub maximum_age: u32,
}

pub const POSITION_OPTIONS: PositionOptions = PositionOptions {
    enable_high_accuracy: true,
    timeout: 10_000,
    maximum_age: 0,
};

pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by your browser";

/// 測位エラー種別（GeolocationPositionError.code に対応）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unsupported,
}

impl GeoErrorKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeoErrorKind::PermissionDenied,
            3 => GeoErrorKind::Timeout,
            _ => GeoErrorKind::PositionUnavailable,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            GeoErrorKind::PermissionDenied => "User denied Geolocation",
            GeoErrorKind::PositionUnavailable => "Position unavailable",
            GeoErrorKind::Timeout => "Timeout expired",
            GeoErrorKind::Unsupported => UNSUPPORTED_MESSAGE,
        }
    }
}

/// 位置情報の許可状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionState {
    #[default]
    Unknown,
    Requesting,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeolocationState {
    position: Option<Coordinates>,
    error: Option<String>,
    loading: bool,
    permission: PermissionState,
    gated: bool,
}

impl GeolocationState {
    /// 自動測位（起動時にすぐ測位を始める）
    pub fn automatic() -> Self {
        Self {
            position: None,
            error: None,
            loading: true,
            permission: PermissionState::Unknown,
            gated: false,
        }
    }

    /// 許可制（`begin_request` まで座標を受け付けない）
    pub fn gated() -> Self {
        Self {
            loading: false,
            gated: true,
            ..Self::automatic()
        }
    }

    pub fn position(&self) -> Option<Coordinates> {
        self.position
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn permission_granted(&self) -> bool {
        self.permission == PermissionState::Granted
    }

    /// 座標を受け付けてよいか
    ///
    /// 許可制では許可が下りるまでfalse。
    pub fn accepts_fixes(&self) -> bool {
        !self.gated || self.permission == PermissionState::Granted
    }

    /// 許可リクエスト開始
    ///
    /// # Returns
    /// 既にリクエスト中ならfalse
    pub fn begin_request(&mut self) -> bool {
        if self.permission == PermissionState::Requesting {
            return false;
        }
        self.permission = PermissionState::Requesting;
        self.loading = true;
        true
    }

    /// 測位成功
    ///
    /// 許可リクエストがこの測位で解決した場合は通知を返す。
    pub fn on_position(&mut self, fix: Coordinates) -> Option<Notice> {
        if self.gated && self.permission == PermissionState::Unknown {
            return None;
        }

        let resolved = self.permission == PermissionState::Requesting;
        self.position = Some(fix);
        self.error = None;
        self.loading = false;
        self.permission = PermissionState::Granted;

        resolved.then(Notice::location_granted)
    }

    /// 測位失敗
    ///
    /// 致命的にはしない。許可リクエスト中の失敗だけ通知を返す。
    pub fn on_error(&mut self, kind: GeoErrorKind, message: &str) -> Option<Notice> {
        let resolving = self.permission == PermissionState::Requesting;
        let text = if message.trim().is_empty() {
            kind.default_message().to_string()
        } else {
            message.to_string()
        };

        self.error = Some(text.clone());
        self.loading = false;

        match kind {
            GeoErrorKind::PermissionDenied | GeoErrorKind::Unsupported => {
                self.permission = PermissionState::Denied;
            }
            _ if resolving => {
                // タイムアウト等は再試行できるよう未解決に戻す
                self.permission = PermissionState::Unknown;
            }
            _ => {}
        }

        if !resolving {
            return None;
        }

        Some(match kind {
            GeoErrorKind::PermissionDenied => Notice::location_denied(),
            GeoErrorKind::Timeout => Notice::location_timeout(),
            GeoErrorKind::PositionUnavailable | GeoErrorKind::Unsupported => {
                Notice::location_unavailable(&text)
            }
        })
    }

    /// Geolocation API 非対応
    pub fn unsupported(&mut self) -> Option<Notice> {
        self.on_error(GeoErrorKind::Unsupported, UNSUPPORTED_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_options() {
        assert!(POSITION_OPTIONS.enable_high_accuracy);
        assert_eq!(POSITION_OPTIONS.timeout, 10_000);
        assert_eq!(POSITION_OPTIONS.maximum_age, 0);

        let json = serde_json::to_string(&POSITION_OPTIONS).expect("シリアライズ失敗");
        assert!(json.contains("\"enableHighAccuracy\":true"));
        assert!(json.contains("\"maximumAge\":0"));
    }

    #[test]
    fn test_error_kind_from_code() {
        assert_eq!(GeoErrorKind::from_code(1), GeoErrorKind::PermissionDenied);
        assert_eq!(GeoErrorKind::from_code(2), GeoErrorKind::PositionUnavailable);
        assert_eq!(GeoErrorKind::from_code(3), GeoErrorKind::Timeout);
    }

    // =============================================
    // 自動測位
    // =============================================

    #[test]
    fn test_automatic_loading_until_first_fix() {
        let mut state = GeolocationState::automatic();
        assert!(state.loading());
        assert!(state.position().is_none());

        let notice = state.on_position(Coordinates::new(40.1, -73.9));
        assert!(notice.is_none());
        assert!(!state.loading());
        assert_eq!(state.position(), Some(Coordinates::new(40.1, -73.9)));
    }

    #[test]
    fn test_automatic_error_not_fatal() {
        let mut state = GeolocationState::automatic();
        let notice = state.on_error(GeoErrorKind::Timeout, "");
        assert!(notice.is_none());
        assert_eq!(state.error(), Some("Timeout expired"));
        assert!(!state.loading());

        // 後続の測位で回復する
        state.on_position(Coordinates::new(1.0, 2.0));
        assert!(state.error().is_none());
    }

    // =============================================
    // 許可制
    // =============================================

    #[test]
    fn test_gated_ignores_positions_before_request() {
        let mut state = GeolocationState::gated();
        assert!(!state.loading());
        state.on_position(Coordinates::new(1.0, 2.0));
        assert!(state.position().is_none());
    }

    #[test]
    fn test_gated_grant() {
        let mut state = GeolocationState::gated();
        assert!(state.begin_request());
        assert!(!state.begin_request());

        let notice = state.on_position(Coordinates::new(1.0, 2.0)).unwrap();
        assert_eq!(notice, Notice::location_granted());
        assert!(state.permission_granted());

        // ウォッチからの後続測位では通知しない
        assert!(state.on_position(Coordinates::new(1.5, 2.5)).is_none());
        assert_eq!(state.position(), Some(Coordinates::new(1.5, 2.5)));
    }

    #[test]
    fn test_gated_deny() {
        let mut state = GeolocationState::gated();
        state.begin_request();
        let notice = state.on_error(GeoErrorKind::PermissionDenied, "User denied Geolocation").unwrap();
        assert_eq!(notice, Notice::location_denied());
        assert_eq!(state.permission(), PermissionState::Denied);
        assert!(state.position().is_none());
    }

    #[test]
    fn test_gated_timeout_allows_retry() {
        let mut state = GeolocationState::gated();
        state.begin_request();
        let notice = state.on_error(GeoErrorKind::Timeout, "Timeout expired").unwrap();
        assert_eq!(notice, Notice::location_timeout());
        assert_eq!(state.permission(), PermissionState::Unknown);
        assert!(state.begin_request());
    }

    #[test]
    fn test_accepts_fixes() {
        assert!(GeolocationState::automatic().accepts_fixes());

        let mut state = GeolocationState::gated();
        assert!(!state.accepts_fixes());
        state.begin_request();
        assert!(!state.accepts_fixes());
        state.on_position(Coordinates::new(1.0, 2.0));
        assert!(state.accepts_fixes());
    }

    #[test]
    fn test_single_request_in_flight_until_resolved() {
        let mut state = GeolocationState::gated();
        assert!(state.begin_request());
        assert!(!state.begin_request());

        // 失敗で解決した後にだけ次のリクエストを出せる
        state.on_error(GeoErrorKind::PositionUnavailable, "");
        assert!(state.begin_request());
        assert!(!state.begin_request());
    }

    #[test]
    fn test_unsupported() {
        let mut state = GeolocationState::automatic();
        state.unsupported();
        assert_eq!(state.error(), Some(UNSUPPORTED_MESSAGE));
        assert_eq!(state.permission(), PermissionState::Denied);
        assert!(!state.loading());
    }
}
