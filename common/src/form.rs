//! 通報フォームの状態と送信前バリデーション
//!
//! フォームの各フィールドを保持し、送信時に
//! 説明 → 電話番号 → 写真 → 位置 の順で検証する（最初の失敗で中断）。

use thiserror::Error;

use crate::error::{Error, Result};
use crate::map::MapEvent;
use crate::notice::Notice;
use crate::types::{is_image_content_type, Coordinates, DogStatus, Photo, Report};

/// 送信前バリデーションエラー
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing description")]
    MissingDescription,

    #[error("missing phone number")]
    MissingPhone,

    #[error("missing image")]
    MissingPhoto,

    #[error("missing location")]
    MissingLocation,
}

impl ValidationError {
    /// 欠けているフィールドを名指しする通知
    pub fn notice(&self) -> Notice {
        match self {
            ValidationError::MissingDescription => Notice::error(
                "Missing description",
                "Please provide a description of the dog",
            ),
            ValidationError::MissingPhone => Notice::error(
                "Missing phone number",
                "Please provide a contact phone number",
            ),
            ValidationError::MissingPhoto => {
                Notice::error("Missing image", "Please upload an image of the dog")
            }
            ValidationError::MissingLocation => {
                Notice::error("Missing location", "Please enable location services")
            }
        }
    }
}

/// 入力途中の通報
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDraft {
    pub status: DogStatus,
    pub description: String,
    pub phone: String,
    location: Coordinates,
    photo: Option<Photo>,
    preview_url: Option<String>,
    /// 地図で手動指定した後は自動測位で上書きしない
    location_changed: bool,
}

impl ReportDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Coordinates {
        self.location
    }

    pub fn location_changed(&self) -> bool {
        self.location_changed
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    /// 測位結果を反映（手動指定済みなら無視）
    ///
    /// # Returns
    /// 反映した場合true
    pub fn apply_geolocation_fix(&mut self, fix: Coordinates) -> bool {
        if self.location_changed {
            return false;
        }
        self.location = fix;
        true
    }

    /// 地図のドラッグ/クリックによる位置指定
    pub fn set_location_manually(&mut self, location: Coordinates) {
        self.location = location;
        self.location_changed = true;
    }

    /// 地図から通知されたイベントを反映
    ///
    /// 地図側の自動測位は測位結果と同じ扱いで、`fixes_allowed` がfalseなら捨てる
    /// （許可制で許可が下りる前）。ドラッグとクリックだけが手動指定。
    pub fn apply_map_event(&mut self, event: MapEvent, fixes_allowed: bool) {
        match event {
            MapEvent::LocationFound(at) => {
                if fixes_allowed {
                    self.apply_geolocation_fix(at);
                }
            }
            MapEvent::MarkerDragEnd(at) | MapEvent::MapClick(at) => {
                self.set_location_manually(at);
            }
        }
    }

    /// 写真を添付（アップロードはしない）
    ///
    /// 画像以外は拒否し、既存の添付は保持する。
    pub fn stage_photo(&mut self, photo: Photo, preview_url: Option<String>) -> Result<()> {
        if !is_image_content_type(&photo.content_type) {
            return Err(Error::InvalidPhoto(format!(
                "{} ({})",
                photo.file_name, photo.content_type
            )));
        }
        self.photo = Some(photo);
        self.preview_url = preview_url;
        Ok(())
    }

    /// 送信前の検証
    ///
    /// 位置が番兵値 (0,0) の場合は `live_fix` で補う。
    pub fn validate(
        &self,
        live_fix: Option<Coordinates>,
    ) -> std::result::Result<Report, ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingPhone);
        }
        let Some(photo) = &self.photo else {
            return Err(ValidationError::MissingPhoto);
        };

        let location = if self.location.is_sentinel() {
            live_fix
                .filter(|fix| !fix.is_sentinel())
                .ok_or(ValidationError::MissingLocation)?
        } else {
            self.location
        };

        Ok(Report {
            status: self.status,
            description: self.description.trim().to_string(),
            location,
            phone: self.phone.trim().to_string(),
            photo: Some(photo.clone()),
        })
    }

    /// 検証して送信コールバックを1回だけ呼ぶ
    ///
    /// 検証に失敗した場合コールバックは呼ばれず、フォームの内容は保持される。
    pub fn submit<F>(
        &mut self,
        live_fix: Option<Coordinates>,
        on_submit: F,
    ) -> std::result::Result<(), ValidationError>
    where
        F: FnOnce(Report),
    {
        let report = self.validate(live_fix)?;
        self.location = report.location;
        on_submit(report);
        Ok(())
    }
}

/// 送信ボタンの文言
pub fn submit_label(status: DogStatus, is_submitting: bool) -> String {
    if is_submitting {
        "Submitting...".to_string()
    } else {
        format!("Submit {} Dog Report", status.label())
    }
}

/// 現在地表示
pub fn format_current_location(location: Coordinates) -> String {
    format!(
        "Using your current location: {:.4}, {:.4}",
        location.lat, location.lon
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::{GeoErrorKind, GeolocationState};

    fn photo() -> Photo {
        Photo::new("rex.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff])
    }

    fn complete_draft() -> ReportDraft {
        let mut draft = ReportDraft::new();
        draft.description = "Brown lab".to_string();
        draft.phone = "555-1234".to_string();
        draft.stage_photo(photo(), None).unwrap();
        draft.set_location_manually(Coordinates::new(40.1, -73.9));
        draft
    }

    // =============================================
    // バリデーション順序
    // =============================================

    #[test]
    fn test_validate_order_description_first() {
        let draft = ReportDraft::new();
        assert_eq!(draft.validate(None), Err(ValidationError::MissingDescription));
    }

    #[test]
    fn test_validate_missing_phone() {
        let mut draft = complete_draft();
        draft.phone = "   ".to_string();
        assert_eq!(draft.validate(None), Err(ValidationError::MissingPhone));
    }

    #[test]
    fn test_validate_missing_photo() {
        let mut draft = ReportDraft::new();
        draft.description = "Brown lab".to_string();
        draft.phone = "555-1234".to_string();
        assert_eq!(draft.validate(None), Err(ValidationError::MissingPhoto));
    }

    #[test]
    fn test_validate_missing_location_without_fix() {
        let mut draft = ReportDraft::new();
        draft.description = "Brown lab".to_string();
        draft.phone = "555-1234".to_string();
        draft.stage_photo(photo(), None).unwrap();
        assert_eq!(draft.validate(None), Err(ValidationError::MissingLocation));
        assert_eq!(
            draft.validate(Some(Coordinates::SENTINEL)),
            Err(ValidationError::MissingLocation)
        );
    }

    #[test]
    fn test_validate_complete() {
        let report = complete_draft().validate(None).unwrap();
        assert_eq!(report.description, "Brown lab");
        assert_eq!(report.location, Coordinates::new(40.1, -73.9));
        assert!(report.photo.is_some());
    }

    // =============================================
    // submit
    // =============================================

    #[test]
    fn test_submit_blocked_for_missing_fields() {
        let cases: Vec<(fn(&mut ReportDraft), ValidationError)> = vec![
            (|d| d.description.clear(), ValidationError::MissingDescription),
            (|d| d.phone.clear(), ValidationError::MissingPhone),
            (|d| d.photo = None, ValidationError::MissingPhoto),
        ];

        for (mutate, expected) in cases {
            let mut draft = complete_draft();
            mutate(&mut draft);

            let mut calls = 0;
            let result = draft.submit(Some(Coordinates::new(1.0, 1.0)), |_| calls += 1);

            assert_eq!(result, Err(expected));
            assert_eq!(calls, 0, "送信コールバックが呼ばれた: {:?}", expected);
        }
    }

    #[test]
    fn test_submit_substitutes_live_fix_for_sentinel() {
        let mut draft = ReportDraft::new();
        draft.description = "Brown lab".to_string();
        draft.phone = "555-1234".to_string();
        draft.stage_photo(photo(), None).unwrap();

        let live = Coordinates::new(51.5, -0.12);
        let mut submitted = None;
        draft.submit(Some(live), |report| submitted = Some(report)).unwrap();

        assert_eq!(submitted.unwrap().location, live);
        assert_eq!(draft.location(), live);
    }

    #[test]
    fn test_submit_calls_once() {
        let mut draft = complete_draft();
        let mut calls = 0;
        draft.submit(None, |_| calls += 1).unwrap();
        assert_eq!(calls, 1);
    }

    // =============================================
    // 位置情報の上書き制御
    // =============================================

    #[test]
    fn test_geolocation_fix_applied_until_manual_change() {
        let mut draft = ReportDraft::new();
        assert!(draft.apply_geolocation_fix(Coordinates::new(1.0, 2.0)));
        assert_eq!(draft.location(), Coordinates::new(1.0, 2.0));

        draft.set_location_manually(Coordinates::new(3.0, 4.0));
        assert!(draft.location_changed());

        assert!(!draft.apply_geolocation_fix(Coordinates::new(5.0, 6.0)));
        assert_eq!(draft.location(), Coordinates::new(3.0, 4.0));
    }

    #[test]
    fn test_map_location_found_is_not_manual() {
        let mut draft = ReportDraft::new();
        draft.apply_map_event(MapEvent::LocationFound(Coordinates::new(1.0, 2.0)), true);
        assert!(!draft.location_changed());
        assert_eq!(draft.location(), Coordinates::new(1.0, 2.0));

        draft.apply_map_event(MapEvent::MarkerDragEnd(Coordinates::new(3.0, 4.0)), true);
        assert!(draft.location_changed());

        draft.apply_map_event(MapEvent::LocationFound(Coordinates::new(9.0, 9.0)), true);
        assert_eq!(draft.location(), Coordinates::new(3.0, 4.0));
    }

    #[test]
    fn test_map_location_found_ignored_before_permission() {
        let mut geo = GeolocationState::gated();
        geo.begin_request();
        geo.on_error(GeoErrorKind::Timeout, "Timeout expired");
        assert!(!geo.accepts_fixes());

        let mut draft = ReportDraft::new();
        draft.apply_map_event(
            MapEvent::LocationFound(Coordinates::new(35.0, 139.0)),
            geo.accepts_fixes(),
        );
        assert!(draft.location().is_sentinel());
        assert!(!draft.location_changed());

        // 手動指定は許可に関係なく反映
        draft.apply_map_event(MapEvent::MapClick(Coordinates::new(1.0, 2.0)), geo.accepts_fixes());
        assert_eq!(draft.location(), Coordinates::new(1.0, 2.0));
    }

    // =============================================
    // 写真
    // =============================================

    #[test]
    fn test_stage_photo_rejects_non_image() {
        let mut draft = ReportDraft::new();
        draft.stage_photo(photo(), Some("data:image/jpeg;base64,AAAA".into())).unwrap();

        let pdf = Photo::new("flyer.pdf", "application/pdf", vec![1]);
        let result = draft.stage_photo(pdf, None);

        assert!(matches!(result, Err(Error::InvalidPhoto(_))));
        assert_eq!(draft.photo().unwrap().file_name, "rex.jpg");
        assert!(draft.preview_url().is_some());
    }

    #[test]
    fn test_validation_notices_name_field() {
        assert!(ValidationError::MissingDescription.notice().title.contains("description"));
        assert!(ValidationError::MissingPhone.notice().title.contains("phone"));
        assert!(ValidationError::MissingPhoto.notice().title.contains("image"));
        assert!(ValidationError::MissingLocation.notice().title.contains("location"));
        assert!(ValidationError::MissingPhone.notice().is_error());
    }

    #[test]
    fn test_submit_label() {
        assert_eq!(submit_label(DogStatus::Lost, false), "Submit Lost Dog Report");
        assert_eq!(submit_label(DogStatus::Found, false), "Submit Found Dog Report");
        assert_eq!(submit_label(DogStatus::Found, true), "Submitting...");
    }

    #[test]
    fn test_format_current_location() {
        let text = format_current_location(Coordinates::new(40.123456, -73.98761));
        assert_eq!(text, "Using your current location: 40.1235, -73.9876");
    }
}
