//! 端末向けの表示

use pawmatch_common::presentation::results_summary;
use pawmatch_common::{MatchCard, MatchRecord, Notice, SubmissionResult};

pub fn render_notice(notice: &Notice) -> String {
    let icon = if notice.is_error() { "✖" } else { "✔" };
    format!("{} {}\n  {}", icon, notice.title, notice.description)
}

pub fn render_card(card: &MatchCard) -> String {
    [
        format!("🐶 {}  [{}]", card.title, card.percentage_label()),
        format!("   {}", card.description),
        format!("   📍 {}", card.coordinates_label),
        format!("   🖼️ {}", card.image_url),
        format!("   🗺️ {}", card.map_url),
        format!("   📞 {}", card.tel_uri),
    ]
    .join("\n")
}

pub fn render_matches(records: &[MatchRecord], asset_base: &str) -> String {
    let mut lines = vec![results_summary(records.len()), String::new()];
    for record in records {
        lines.push(render_card(&MatchCard::from_record(record, asset_base)));
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}

/// 送信結果
///
/// マッチがあれば一覧、なければ保存完了の通知。
pub fn render_result(result: &SubmissionResult, asset_base: &str) -> String {
    match &result.matches {
        Some(records) if !records.is_empty() => {
            format!("{}\n\n{}", result.message, render_matches(records, asset_base))
        }
        _ => render_notice(&Notice::report_submitted()),
    }
}
