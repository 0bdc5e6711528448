use crate::core::normalizer::normalize;
use crate::domain::model::AssetRecord;
use crate::domain::ports::AssetSource;
use crate::domain::tags::{Rational, TagDictionary, TagValue};

pub const MOCK_BUCKET_PATH: &str = "gs://survey-assets-demo/field-inspections/";

/// Stand-in for an object-store listing.
///
/// Produces a fixed set of assets whose tag dictionaries go through the real
/// normalizer, so they look exactly like locally decoded photos.
#[derive(Debug, Clone)]
pub struct MockBucketSource {
    location: String,
}

impl MockBucketSource {
    pub fn new() -> Self {
        Self {
            location: MOCK_BUCKET_PATH.to_string(),
        }
    }

    fn synthetic_objects() -> Vec<(&'static str, TagDictionary)> {
        vec![
            (
                "pole_0142.jpg",
                TagDictionary::new()
                    .with("Make", TagValue::text("Canon"))
                    .with("Model", TagValue::text("\"Canon EOS R5\""))
                    .with("DateTimeOriginal", TagValue::text("2024:03:18 10:14:52"))
                    .with(
                        "FocalLength",
                        TagValue::with_rationals("24", vec![Rational::new(24, 1)]),
                    )
                    .with("GPSLatitude", TagValue::from_integers(&[34, 36, 54]))
                    .with("GPSLatitudeRef", TagValue::text("S"))
                    .with("GPSLongitude", TagValue::from_integers(&[58, 22, 12]))
                    .with("GPSLongitudeRef", TagValue::text("W"))
                    .with("ISOSpeedRatings", TagValue::text("100")),
            ),
            (
                "meter_0007.jpg",
                TagDictionary::new()
                    .with("Image Model", TagValue::text("FC3170"))
                    .with("EXIF DateTimeOriginal", TagValue::text("2024:03:19 16:02:11"))
                    .with("GPS GPSLatitude", TagValue::from_integers(&[33, 26, 52]))
                    .with("GPS GPSLatitudeRef", TagValue::text("S"))
                    .with("GPS GPSLongitude", TagValue::from_integers(&[70, 39, 1]))
                    .with("GPS GPSLongitudeRef", TagValue::text("W"))
                    .with(
                        "GPS GPSAltitude",
                        TagValue::with_rationals("5703/10", vec![Rational::new(5703, 10)]),
                    )
                    .with("GPS GPSAltitudeRef", TagValue::text("0")),
            ),
            (
                "substation_0311.jpg",
                TagDictionary::new()
                    .with("Make", TagValue::text("SONY"))
                    .with("DateTimeOriginal", TagValue::text("2024:03:20 08:45:00"))
                    .with("Software", TagValue::text("ILCE-7M4 v2.00")),
            ),
            ("scan_0001.png", TagDictionary::new()),
        ]
    }
}

impl Default for MockBucketSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetSource for MockBucketSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn scan(&self) -> Vec<AssetRecord> {
        let assets: Vec<AssetRecord> = Self::synthetic_objects()
            .into_iter()
            .map(|(name, tags)| AssetRecord {
                name: name.to_string(),
                location: format!("{}{}", self.location, name),
                metadata: normalize(&tags),
            })
            .collect();

        tracing::debug!("Mock bucket {} listed {} assets", self.location, assets.len());
        assets
    }
}
