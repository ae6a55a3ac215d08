use pawmatch_common::Coordinates;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIFのGPSタグから撮影位置を取り出す
pub fn extract_gps(path: &Path) -> Result<Coordinates, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif_reader = exif::Reader::new();
    let exif = exif_reader.read_from_container(&mut bufreader)?;

    let lat = read_degrees(&exif, exif::Tag::GPSLatitude, exif::Tag::GPSLatitudeRef, b'S')
        .ok_or("No GPSLatitude in EXIF")?;
    let lon = read_degrees(&exif, exif::Tag::GPSLongitude, exif::Tag::GPSLongitudeRef, b'W')
        .ok_or("No GPSLongitude in EXIF")?;

    let at = Coordinates::new(lat, lon);
    if !at.is_valid() {
        return Err(format!("GPS position out of range: {}, {}", lat, lon).into());
    }
    Ok(at)
}

/// 度分秒 + N/S(E/W) を符号付きの度に
fn read_degrees(exif: &exif::Exif, value_tag: exif::Tag, ref_tag: exif::Tag, negative: u8) -> Option<f64> {
    let field = exif.get_field(value_tag, exif::In::PRIMARY)?;
    let exif::Value::Rational(ref parts) = field.value else {
        return None;
    };

    let degrees = dms_to_degrees(
        parts.first()?.to_f64(),
        parts.get(1).map(|r| r.to_f64()).unwrap_or(0.0),
        parts.get(2).map(|r| r.to_f64()).unwrap_or(0.0),
    );

    let is_negative = exif
        .get_field(ref_tag, exif::In::PRIMARY)
        .and_then(|f| match &f.value {
            exif::Value::Ascii(values) => values.first().and_then(|v| v.first().copied()),
            _ => None,
        })
        .map(|c| c.eq_ignore_ascii_case(&negative))
        .unwrap_or(false);

    Some(if is_negative { -degrees } else { degrees })
}

pub fn dms_to_degrees(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}
