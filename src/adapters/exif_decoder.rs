use crate::domain::ports::TagDecoder;
use crate::domain::tags::{Rational, TagDictionary, TagValue};
use crate::utils::error::{EtlError, Result};
use std::io::Cursor;

/// Reads EXIF from JPEG, PNG, WebP, TIFF and HEIF containers.
///
/// Only primary-image fields are kept; thumbnail IFD entries would shadow them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifTagDecoder;

impl ExifTagDecoder {
    fn rationals(value: &exif::Value) -> Option<Vec<Rational>> {
        match value {
            exif::Value::Rational(values) => Some(
                values
                    .iter()
                    .map(|r| Rational::new(i64::from(r.num), i64::from(r.denom)))
                    .collect(),
            ),
            exif::Value::SRational(values) => Some(
                values
                    .iter()
                    .map(|r| Rational::new(i64::from(r.num), i64::from(r.denom)))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Single-component integer value, e.g. `GPSAltitudeRef`.
    fn single_integer(value: &exif::Value) -> Option<u32> {
        match value {
            exif::Value::Byte(values) if values.len() == 1 => Some(u32::from(values[0])),
            exif::Value::Short(values) if values.len() == 1 => Some(u32::from(values[0])),
            exif::Value::Long(values) if values.len() == 1 => Some(values[0]),
            _ => None,
        }
    }

    /// GPS 整數欄位保留原始數值；`display_value` 會轉成 "below sea level" 之類的描述
    fn printable(field: &exif::Field) -> String {
        match Self::single_integer(&field.value) {
            Some(number) if field.tag.context() == exif::Context::Gps => number.to_string(),
            _ => field.display_value().to_string(),
        }
    }

    fn to_dictionary(exif: &exif::Exif) -> TagDictionary {
        exif.fields()
            .filter(|field| field.ifd_num == exif::In::PRIMARY)
            .map(|field| {
                let value = TagValue {
                    printable: Self::printable(field),
                    rationals: Self::rationals(&field.value),
                };
                (field.tag.to_string(), value)
            })
            .collect()
    }
}

impl TagDecoder for ExifTagDecoder {
    fn decode(&self, source_name: &str, bytes: &[u8]) -> Result<TagDictionary> {
        let mut cursor = Cursor::new(bytes);
        match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => {
                let tags = Self::to_dictionary(&exif);
                tracing::debug!("Decoded {} EXIF fields from {}", tags.len(), source_name);
                Ok(tags)
            }
            // 沒有 EXIF 區段的圖片是正常情況
            Err(exif::Error::NotFound(_)) => {
                tracing::debug!("No EXIF data in {}", source_name);
                Ok(TagDictionary::new())
            }
            Err(e) => Err(EtlError::DecodeError {
                source_name: source_name.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
