//! `*.exif.json` sidecars: tag dictionaries dumped by exifread-style tools.
//!
//! ```json
//! {
//!   "Image Model": "FC3170",
//!   "GPS GPSLatitude": { "printable": "[33, 26, 52]", "values": [[33, 1], [26, 1], [52, 1]] }
//! }
//! ```

use crate::domain::ports::TagDecoder;
use crate::domain::tags::{Rational, TagDictionary, TagValue};
use crate::utils::error::{EtlError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SidecarEntry {
    Text(String),
    Structured {
        printable: String,
        #[serde(default)]
        values: Option<Vec<(i64, i64)>>,
    },
    Other(Value),
}

impl From<SidecarEntry> for TagValue {
    fn from(entry: SidecarEntry) -> Self {
        match entry {
            SidecarEntry::Text(printable) => TagValue::text(printable),
            SidecarEntry::Structured { printable, values } => TagValue {
                printable,
                rationals: values.map(|pairs| {
                    pairs
                        .into_iter()
                        .map(|(num, den)| Rational::new(num, den))
                        .collect()
                }),
            },
            SidecarEntry::Other(value) => TagValue::text(value.to_string()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SidecarTagDecoder;

impl TagDecoder for SidecarTagDecoder {
    fn decode(&self, source_name: &str, bytes: &[u8]) -> Result<TagDictionary> {
        let decode_error = |message: String| EtlError::DecodeError {
            source_name: source_name.to_string(),
            message,
        };

        let entries: Map<String, Value> =
            serde_json::from_slice(bytes).map_err(|e| decode_error(e.to_string()))?;

        let mut tags = TagDictionary::new();
        for (key, raw) in entries {
            match serde_json::from_value::<SidecarEntry>(raw) {
                Ok(entry) => tags.insert(key, entry.into()),
                Err(e) => tracing::debug!("Skipping sidecar tag {} in {}: {}", key, source_name, e),
            }
        }
        Ok(tags)
    }
}
