//! マッチ候補の表示用モデル

use serde::Serialize;

use crate::types::{Coordinates, MatchRecord};

pub const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// サーバー画像の読込に失敗した時の代替画像
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1535268647677-300dbf3d78d1";

/// マッチカード1枚分
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub percentage: u32,
    pub coordinates_label: String,
    pub image_url: String,
    pub map_url: String,
    pub tel_uri: String,
}

impl MatchCard {
    pub fn from_record(record: &MatchRecord, asset_base: &str) -> Self {
        let coordinates = record.coordinates();
        Self {
            id: record.id.clone(),
            title: card_title(&record.description_text),
            description: record.description_text.clone(),
            percentage: match_percentage(record.score),
            coordinates_label: coordinates_label(coordinates),
            image_url: image_url(asset_base, &record.image_file_name),
            map_url: map_search_url(coordinates),
            tel_uri: tel_uri(&record.phone),
        }
    }

    pub fn percentage_label(&self) -> String {
        format!("{}% Match", self.percentage)
    }
}

/// 説明文の先頭2語
pub fn card_title(description: &str) -> String {
    description
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// round(score * 100)
pub fn match_percentage(score: f64) -> u32 {
    if !score.is_finite() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, 100.0) as u32
}

pub fn coordinates_label(at: Coordinates) -> String {
    format!("{:.3}, {:.3}", at.lat, at.lon)
}

pub fn image_url(asset_base: &str, file_name: &str) -> String {
    format!("{}/{}", asset_base.trim_end_matches('/'), file_name)
}

pub fn map_search_url(at: Coordinates) -> String {
    format!("{}{},{}", MAP_SEARCH_URL, at.lat, at.lon)
}

pub fn tel_uri(phone: &str) -> String {
    format!("tel:{}", phone.trim())
}

/// 結果一覧の見出し下の文言
pub fn results_summary(count: usize) -> String {
    let plural = if count > 1 { "es" } else { "" };
    format!("We found {} potential match{} for your dog.", count, plural)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MatchRecord {
        MatchRecord {
            id: "k3j9x0a1b".to_string(),
            description_text: "Brown lab with red collar".to_string(),
            phone: "555-1234".to_string(),
            lat: 40.12345,
            lon: -73.98765,
            image_file_name: "dog1.jpg".to_string(),
            score: 1.0,
        }
    }

    #[test]
    fn test_card_title_two_words() {
        assert_eq!(card_title("Brown lab with red collar"), "Brown lab");
        assert_eq!(card_title("Husky"), "Husky");
        assert_eq!(card_title("  Black   pug  mix "), "Black pug");
        assert_eq!(card_title(""), "");
    }

    #[test]
    fn test_match_percentage() {
        assert_eq!(match_percentage(0.873), 87);
        assert_eq!(match_percentage(1.0), 100);
        assert_eq!(match_percentage(0.0), 0);
        assert_eq!(match_percentage(0.996), 100);
        assert_eq!(match_percentage(f64::NAN), 0);
    }

    #[test]
    fn test_card_from_record() {
        let card = MatchCard::from_record(&record(), "http://localhost:5000/uploads/");

        assert_eq!(card.title, "Brown lab");
        assert_eq!(card.description, "Brown lab with red collar");
        assert_eq!(card.percentage_label(), "100% Match");
        assert_eq!(card.image_url, "http://localhost:5000/uploads/dog1.jpg");
        assert_eq!(
            card.map_url,
            "https://www.google.com/maps/search/?api=1&query=40.12345,-73.98765"
        );
        assert_eq!(card.tel_uri, "tel:555-1234");
    }

    #[test]
    fn test_coordinates_label_three_decimals() {
        let label = coordinates_label(Coordinates::new(40.1, -73.9));
        assert_eq!(label, "40.100, -73.900");
    }

    #[test]
    fn test_image_url_without_trailing_slash() {
        assert_eq!(image_url("http://h/uploads", "a.png"), "http://h/uploads/a.png");
    }

    #[test]
    fn test_results_summary_plural() {
        assert_eq!(results_summary(1), "We found 1 potential match for your dog.");
        assert_eq!(results_summary(3), "We found 3 potential matches for your dog.");
    }
}
