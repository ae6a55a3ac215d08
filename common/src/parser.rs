//! Webhook応答パーサー
//!
//! サーバーはチャットボット用のTwiML風XMLを返す。
//! 最初の `<Message>` 要素の本文を取り出し、
//! マッチ通知の定型文からMatchRecordを抽出する。
//!
//! 定型文の例:
//! ```text
//! ✅ Possible match found near you!
//!
//! 📍 *Description*: Brown lab
//! 📞 *Phone*: 555-1234
//! 🌍 *Location*: 40.1,-73.9
//! 🖼️ Image: http://x/uploads/dog1.jpg
//! ```
//!
//! ラベル文言はバックエンドのテンプレートに依存する。
//! 文言が変わるとマッチは黙って0件になる。

use std::sync::atomic::{AtomicU64, Ordering};

use lazy_static::lazy_static;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::{MatchRecord, SubmissionResult};

/// マッチ通知であることを示す定型句
pub const MATCH_MARKER: &str = "Possible match found";

/// マッチがあった場合の結果メッセージ
pub const MATCHES_FOUND_MESSAGE: &str = "Matches found!";

/// サーバーは実スコアを返さない
const CONSTANT_SCORE: f64 = 1.0;

const MESSAGE_TAG: &[u8] = b"Message";

lazy_static! {
    static ref DESCRIPTION_RE: Regex = Regex::new(r"📍 \*Description\*: (.*)").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"📞 \*Phone\*: (.*)").unwrap();
    static ref LOCATION_RE: Regex = Regex::new(r"🌍 \*Location\*: (.*),(.*)").unwrap();
    static ref IMAGE_RE: Regex = Regex::new(r"🖼\x{FE0F}? Image: .*/uploads/(.*)").unwrap();
}

static MATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// レスポンス全体をパース
///
/// # Returns
/// * `Ok(SubmissionResult)` - マッチ一覧、またはプレーンなメッセージ
/// * `Err(Error::InvalidResponse)` - `Message` 要素が存在しない
pub fn parse_response(response: &str) -> Result<SubmissionResult> {
    let message = extract_message(response)?;
    Ok(parse_message(&message))
}

/// 最初の `<Message>` 要素のテキスト内容を抽出
///
/// 子要素を含む場合はDOMの textContent と同様に全テキストを連結する。
pub fn extract_message(response: &str) -> Result<String> {
    let mut reader = Reader::from_str(response);

    let mut depth = 0usize;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth > 0 {
                    depth += 1;
                } else if e.local_name().as_ref() == MESSAGE_TAG {
                    depth = 1;
                }
            }
            Event::Empty(e) => {
                if depth == 0 && e.local_name().as_ref() == MESSAGE_TAG {
                    return Ok(String::new());
                }
            }
            Event::End(_) => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(text);
                    }
                }
            }
            Event::Text(e) => {
                if depth > 0 {
                    let unescaped = e
                        .unescape()
                        .map_err(|err| Error::InvalidResponse(err.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(e) => {
                if depth > 0 {
                    text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(Error::InvalidResponse("Message element not found".into()))
}

/// `Message` 本文を結果に変換
///
/// 定型句がなければ本文をそのままメッセージとして返す。
pub fn parse_message(message: &str) -> SubmissionResult {
    if message.contains(MATCH_MARKER) {
        SubmissionResult {
            message: MATCHES_FOUND_MESSAGE.to_string(),
            matches: Some(parse_match_blocks(message)),
        }
    } else {
        SubmissionResult {
            message: message.to_string(),
            matches: None,
        }
    }
}

/// 空行区切りのブロックからマッチを抽出（先頭のヘッダーは除外）
///
/// 4項目が揃わないブロックはエラーにせず捨てる。
pub fn parse_match_blocks(message: &str) -> Vec<MatchRecord> {
    message
        .split("\n\n")
        .skip(1)
        .filter(|block| !block.trim().is_empty())
        .filter_map(|block| {
            let record = parse_match_block(block);
            if record.is_none() {
                tracing::debug!(block, "match block dropped: missing or invalid field");
            }
            record
        })
        .collect()
}

/// 1ブロックをパース
pub fn parse_match_block(block: &str) -> Option<MatchRecord> {
    let description = capture(&DESCRIPTION_RE, block, 1)?;
    let phone = capture(&PHONE_RE, block, 1)?;
    let (lat, lon) = {
        let caps = LOCATION_RE.captures(block)?;
        let lat = parse_coordinate(caps.get(1)?.as_str())?;
        let lon = parse_coordinate(caps.get(2)?.as_str())?;
        (lat, lon)
    };
    let image_file_name = capture(&IMAGE_RE, block, 1)?;

    Some(MatchRecord {
        id: next_match_id(block),
        description_text: description,
        phone,
        lat,
        lon,
        image_file_name,
        score: CONSTANT_SCORE,
    })
}

fn capture(re: &Regex, block: &str, group: usize) -> Option<String> {
    let value = re.captures(block)?.get(group)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 9文字の不透明なID（呼び出しごとに新しい値）
fn next_match_id(block: &str) -> String {
    let seq = MATCH_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut hasher = Sha256::new();
    hasher.update(seq.to_le_bytes());
    hasher.update(block.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..9].to_string()
}
