//! ページ全体のセッション状態
//!
//! ランディング → フォーム表示 → 送信 → マッチ一覧 or 通知 → 閉じてランディングへ

use std::fmt::Debug;

use crate::notice::Notice;
use crate::types::{MatchRecord, SubmissionResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Landing,
    Reporting,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    stage: Stage,
    is_submitting: bool,
    matches: Vec<MatchRecord>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn show_form(&self) -> bool {
        self.stage == Stage::Reporting
    }

    pub fn show_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// 「Get Started」
    pub fn get_started(&mut self) {
        self.stage = Stage::Reporting;
    }

    /// 送信開始（同時に1件まで）
    ///
    /// # Returns
    /// 既に送信中ならfalse
    pub fn begin_submit(&mut self) -> bool {
        if self.is_submitting {
            return false;
        }
        self.is_submitting = true;
        true
    }

    /// 送信完了
    ///
    /// マッチがあれば一覧に入れて `None`、なければ表示すべき通知を返す。
    /// どの場合も送信中フラグは下ろす。
    pub fn finish_submit<E: Debug>(&mut self, outcome: Result<SubmissionResult, E>) -> Option<Notice> {
        self.is_submitting = false;

        match outcome {
            Ok(result) => match result.matches {
                Some(matches) if !matches.is_empty() => {
                    self.matches = matches;
                    None
                }
                _ => Some(Notice::report_submitted()),
            },
            Err(e) => {
                tracing::warn!(error = ?e, "dog report submission failed");
                Some(Notice::submission_failed())
            }
        }
    }

    /// マッチ一覧を閉じる
    pub fn dismiss_matches(&mut self) {
        self.matches.clear();
        self.stage = Stage::Landing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MatchRecord {
        MatchRecord {
            id: "a".to_string(),
            description_text: "Brown lab".to_string(),
            phone: "555".to_string(),
            lat: 1.0,
            lon: 2.0,
            image_file_name: "a.jpg".to_string(),
            score: 1.0,
        }
    }

    #[test]
    fn test_initial_landing() {
        let page = PageState::new();
        assert_eq!(page.stage(), Stage::Landing);
        assert!(!page.show_form());
        assert!(!page.show_matches());
    }

    #[test]
    fn test_single_submission_in_flight() {
        let mut page = PageState::new();
        page.get_started();
        assert!(page.begin_submit());
        assert!(!page.begin_submit());
        assert!(page.is_submitting());
    }

    #[test]
    fn test_finish_with_matches() {
        let mut page = PageState::new();
        page.get_started();
        page.begin_submit();

        let notice = page.finish_submit::<String>(Ok(SubmissionResult {
            message: "Matches found!".into(),
            matches: Some(vec![record()]),
        }));

        assert!(notice.is_none());
        assert!(page.show_matches());
        assert!(!page.is_submitting());
    }

    #[test]
    fn test_finish_without_matches_shows_info() {
        let mut page = PageState::new();
        page.begin_submit();
        let notice = page
            .finish_submit::<String>(Ok(SubmissionResult {
                message: "saved".into(),
                matches: None,
            }))
            .unwrap();
        assert_eq!(notice, Notice::report_submitted());
        assert!(!page.show_matches());
    }

    #[test]
    fn test_finish_with_error_allows_retry() {
        let mut page = PageState::new();
        page.begin_submit();
        let notice = page.finish_submit(Err("network down")).unwrap();
        assert!(notice.is_error());
        assert!(page.begin_submit());
    }

    #[test]
    fn test_dismiss_returns_to_landing() {
        let mut page = PageState::new();
        page.get_started();
        page.begin_submit();
        page.finish_submit::<String>(Ok(SubmissionResult {
            message: "Matches found!".into(),
            matches: Some(vec![record()]),
        }));

        page.dismiss_matches();
        assert!(page.matches().is_empty());
        assert_eq!(page.stage(), Stage::Landing);
    }
}
