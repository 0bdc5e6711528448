use crate::core::gps::{self, Hemisphere};
use crate::domain::model::{PhotoMetadata, NOT_AVAILABLE};
use crate::domain::tags::{TagDictionary, TagKey, TagValue};
use crate::utils::error::Result;
use std::collections::HashMap;

/// 相機描述的鍵優先順序
const CAMERA_KEYS: [TagKey; 4] = [
    TagKey::Model,
    TagKey::CameraModelName,
    TagKey::Make,
    TagKey::ImageModel,
];

const DATE_LENGTH: usize = 19;

/// Trim, strip one pair of enclosing quotes, drop NUL characters, trim again.
pub fn clean_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|quote| {
            trimmed
                .strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
        })
        .unwrap_or(trimmed);

    unquoted.replace('\0', "").trim().to_string()
}

/// Object reprs, byte literals and control characters are not worth keeping.
fn looks_unprintable(value: &str) -> bool {
    (value.starts_with('<') && value.ends_with('>'))
        || (value.starts_with("b'") && value.ends_with('\''))
        || value
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
}

fn cleaned(value: &TagValue) -> Option<String> {
    Some(clean_value(&value.printable)).filter(|v| !v.is_empty())
}

fn first_cleaned(tags: &TagDictionary, keys: &[TagKey]) -> Option<String> {
    keys.iter()
        .filter_map(|key| tags.get(*key))
        .find_map(cleaned)
}

fn hemisphere(tags: &TagDictionary, key: TagKey, default: &str) -> Option<Hemisphere> {
    let reference = tags
        .get(key)
        .map(|value| clean_value(&value.printable))
        .unwrap_or_else(|| default.to_string());
    Hemisphere::parse(&reference)
}

fn resolve_coordinates(tags: &TagDictionary) -> Option<(f64, f64)> {
    let latitude = tags.get(TagKey::GpsLatitude)?;
    let longitude = tags.get(TagKey::GpsLongitude)?;

    let lat_ref = hemisphere(tags, TagKey::GpsLatitudeRef, "N").filter(Hemisphere::is_latitude);
    let lon_ref = hemisphere(tags, TagKey::GpsLongitudeRef, "E").filter(Hemisphere::is_longitude);
    let (Some(lat_ref), Some(lon_ref)) = (lat_ref, lon_ref) else {
        tracing::debug!("Skipping GPS conversion: invalid hemisphere reference");
        return None;
    };

    let lat = gps::to_decimal_degrees(latitude, lat_ref)?;
    let lon = gps::to_decimal_degrees(longitude, lon_ref)?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        tracing::debug!("Discarding out-of-range coordinates ({}, {})", lat, lon);
        return None;
    }
    Some((lat, lon))
}

fn date_taken(tags: &TagDictionary) -> String {
    match tags.get(TagKey::DateTimeOriginal).and_then(cleaned) {
        Some(raw) => raw.replace(':', "-").chars().take(DATE_LENGTH).collect(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn other_tags(tags: &TagDictionary) -> HashMap<String, String> {
    tags.iter()
        .filter(|(key, _)| !TagKey::is_explicitly_handled(key))
        .filter_map(|(key, value)| {
            let value = clean_value(&value.printable);
            (!value.is_empty() && !looks_unprintable(&value)).then(|| (key.clone(), value))
        })
        .collect()
}

/// 將標籤字典正規化為照片中繼資料；永不失敗
pub fn normalize(tags: &TagDictionary) -> PhotoMetadata {
    if tags.is_empty() {
        return PhotoMetadata::without_exif();
    }

    let coordinates = resolve_coordinates(tags);
    let altitude = tags
        .get(TagKey::GpsAltitude)
        .and_then(|value| gps::altitude(value, tags.get(TagKey::GpsAltitudeRef)));

    PhotoMetadata {
        date_taken: date_taken(tags),
        camera_model: first_cleaned(tags, &CAMERA_KEYS).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        focal_length: first_cleaned(tags, &[TagKey::FocalLength])
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        latitude: coordinates.map(|(lat, _)| lat),
        longitude: coordinates.map(|(_, lon)| lon),
        altitude,
        other_tags: other_tags(tags),
    }
}

/// Decoder failures become the "error reading file" record instead of an error.
pub fn normalize_decoded(decoded: Result<TagDictionary>) -> PhotoMetadata {
    match decoded {
        Ok(tags) => normalize(&tags),
        Err(e) => {
            tracing::warn!("⚠️ Metadata decode failed: {}", e);
            PhotoMetadata::unreadable()
        }
    }
}
