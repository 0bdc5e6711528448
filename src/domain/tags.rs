//! Tag dictionary handed over by the metadata decoders.
//!
//! Keys are plain strings because decoders disagree on naming: `kamadak-exif`
//! emits standard EXIF names (`GPSLatitude`) while exifread-style sidecars use
//! IFD-prefixed names (`GPS GPSLatitude`). Fields the normalizer cares about are
//! looked up through [`TagKey`], which knows every alias in priority order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// EXIF 有理數 (分子/分母)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// `None` when the denominator is zero.
    pub fn to_f64(&self) -> Option<f64> {
        if self.denominator == 0 {
            None
        } else {
            Some(self.numerator as f64 / self.denominator as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagValue {
    pub printable: String,
    pub rationals: Option<Vec<Rational>>,
}

impl TagValue {
    pub fn text(printable: impl Into<String>) -> Self {
        Self {
            printable: printable.into(),
            rationals: None,
        }
    }

    pub fn with_rationals(printable: impl Into<String>, rationals: Vec<Rational>) -> Self {
        Self {
            printable: printable.into(),
            rationals: Some(rationals),
        }
    }

    /// 由整數三元組建立 (度/分/秒)，分母皆為 1
    pub fn from_integers(values: &[i64]) -> Self {
        let printable = format!(
            "[{}]",
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self::with_rationals(
            printable,
            values.iter().map(|v| Rational::new(*v, 1)).collect(),
        )
    }

    /// Components of the printable form, e.g. `"[34, 36, 27/5]"` -> `["34", "36", "27/5"]`.
    pub fn printable_components(&self) -> Vec<&str> {
        self.printable
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Logical fields with explicit handling in the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey {
    Model,
    CameraModelName,
    Make,
    ImageModel,
    DateTimeOriginal,
    FocalLength,
    GpsLatitude,
    GpsLatitudeRef,
    GpsLongitude,
    GpsLongitudeRef,
    GpsAltitude,
    GpsAltitudeRef,
    ImageDescription,
    ExifVersion,
    FlashPixVersion,
    GpsVersionId,
}

impl TagKey {
    pub const ALL: [TagKey; 16] = [
        TagKey::Model,
        TagKey::CameraModelName,
        TagKey::Make,
        TagKey::ImageModel,
        TagKey::DateTimeOriginal,
        TagKey::FocalLength,
        TagKey::GpsLatitude,
        TagKey::GpsLatitudeRef,
        TagKey::GpsLongitude,
        TagKey::GpsLongitudeRef,
        TagKey::GpsAltitude,
        TagKey::GpsAltitudeRef,
        TagKey::ImageDescription,
        TagKey::ExifVersion,
        TagKey::FlashPixVersion,
        TagKey::GpsVersionId,
    ];

    /// Dictionary keys for this field, standard name first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            TagKey::Model => &["Model"],
            TagKey::CameraModelName => &["CameraModelName"],
            TagKey::Make => &["Make"],
            TagKey::ImageModel => &["Image Model"],
            TagKey::DateTimeOriginal => &["DateTimeOriginal", "EXIF DateTimeOriginal"],
            TagKey::FocalLength => &["FocalLength", "EXIF FocalLength"],
            TagKey::GpsLatitude => &["GPSLatitude", "GPS GPSLatitude"],
            TagKey::GpsLatitudeRef => &["GPSLatitudeRef", "GPS GPSLatitudeRef"],
            TagKey::GpsLongitude => &["GPSLongitude", "GPS GPSLongitude"],
            TagKey::GpsLongitudeRef => &["GPSLongitudeRef", "GPS GPSLongitudeRef"],
            TagKey::GpsAltitude => &["GPSAltitude", "GPS GPSAltitude"],
            TagKey::GpsAltitudeRef => &["GPSAltitudeRef", "GPS GPSAltitudeRef"],
            TagKey::ImageDescription => &["ImageDescription", "Image ImageDescription"],
            TagKey::ExifVersion => &["ExifVersion", "EXIF ExifVersion"],
            TagKey::FlashPixVersion => &["FlashpixVersion", "EXIF FlashPixVersion"],
            TagKey::GpsVersionId => &["GPSVersionID", "GPS GPSVersionID"],
        }
    }

    /// 是否為正規化器明確處理的鍵 (不放入 other_tags)
    pub fn is_explicitly_handled(key: &str) -> bool {
        TagKey::ALL
            .iter()
            .any(|tag| tag.aliases().contains(&key))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDictionary {
    tags: HashMap<String, TagValue>,
}

impl TagDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: TagValue) {
        self.tags.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: TagValue) -> Self {
        self.insert(key, value);
        self
    }

    /// First alias of `key` present in the dictionary.
    pub fn get(&self, key: TagKey) -> Option<&TagValue> {
        key.aliases().iter().find_map(|alias| self.tags.get(*alias))
    }

    #[cfg(test)]
    pub fn get_raw(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TagValue)> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<(String, TagValue)> for TagDictionary {
    fn from_iter<I: IntoIterator<Item = (String, TagValue)>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}
