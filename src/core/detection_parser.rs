//! Detection result files (JSON / XML) to [`Detection`] records.
//!
//! Each grammar is a [`DetectionDecoder`] strategy. The strategies report hard
//! syntax errors; [`parse`] swallows those and returns an empty list, so one bad
//! file never aborts a batch. Individual malformed records are skipped inside
//! the strategies.

use crate::domain::model::{Detection, DetectionFormat};
use crate::domain::ports::DetectionDecoder;
use crate::utils::error::{EtlError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;

const CLASS_FIELD: &str = "class_name";
const SCORE_FIELD: &str = "score";

/// Percent-scale scores (`1 < s <= 100`) become fractions; others pass through.
pub fn normalize_score(raw: f64) -> f64 {
    if raw > 1.0 && raw <= 100.0 {
        raw / 100.0
    } else {
        raw
    }
}

fn detection(class_name: &str, raw_score: f64) -> Option<Detection> {
    let class_name = class_name.trim();
    if class_name.is_empty() || raw_score.is_nan() {
        return None;
    }
    Some(Detection::new(class_name, normalize_score(raw_score)))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDetectionDecoder;

impl DetectionDecoder for JsonDetectionDecoder {
    fn format(&self) -> DetectionFormat {
        DetectionFormat::Json
    }

    fn decode(&self, content: &str) -> Result<Vec<Detection>> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Array(items) = value else {
            return Err(EtlError::ProcessingError {
                message: "Top-level JSON value is not an array".to_string(),
            });
        };

        let detections: Vec<Detection> = items
            .iter()
            .filter_map(|item| {
                let object = item.as_object()?;
                let class_name = object.get(CLASS_FIELD)?.as_str()?;
                let score = object.get(SCORE_FIELD)?.as_f64()?;
                detection(class_name, score)
            })
            .collect();

        if detections.len() < items.len() {
            tracing::debug!(
                "Skipped {} malformed JSON detection records",
                items.len() - detections.len()
            );
        }
        Ok(detections)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum XmlField {
    ClassName,
    Score,
}

/// 目前 `<detection>` 元素內收集到的欄位
#[derive(Debug, Default)]
struct PendingDetection {
    class_name: Option<String>,
    score: Option<String>,
}

impl PendingDetection {
    fn finish(self) -> Option<Detection> {
        let class_name = self.class_name?;
        let score = self.score?.trim().parse::<f64>().ok()?;
        detection(&class_name, score)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct XmlDetectionDecoder;

impl XmlDetectionDecoder {
    fn field(name: &[u8]) -> Option<XmlField> {
        match name {
            b"class_name" => Some(XmlField::ClassName),
            b"score" => Some(XmlField::Score),
            _ => None,
        }
    }
}

impl DetectionDecoder for XmlDetectionDecoder {
    fn format(&self) -> DetectionFormat {
        DetectionFormat::Xml
    }

    fn decode(&self, content: &str) -> Result<Vec<Detection>> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut detections = Vec::new();
        let mut skipped = 0usize;
        let mut pending: Option<PendingDetection> = None;
        let mut current_field: Option<XmlField> = None;
        let mut text = String::new();

        loop {
            let event = reader.read_event().map_err(|e| EtlError::XmlError {
                message: e.to_string(),
            })?;

            match event {
                Event::Start(ref e) => {
                    let name = e.local_name();
                    if name.as_ref() == b"detection" {
                        pending = Some(PendingDetection::default());
                    } else if pending.is_some() {
                        current_field = Self::field(name.as_ref());
                        text.clear();
                    }
                }
                Event::Empty(ref e) => {
                    // <score/> 之類的空元素視為空字串
                    if let (Some(item), Some(field)) =
                        (pending.as_mut(), Self::field(e.local_name().as_ref()))
                    {
                        match field {
                            XmlField::ClassName => item.class_name = Some(String::new()),
                            XmlField::Score => item.score = Some(String::new()),
                        }
                    }
                }
                Event::Text(ref e) if current_field.is_some() => {
                    let raw = String::from_utf8_lossy(e);
                    match quick_xml::escape::unescape(&raw) {
                        Ok(unescaped) => text.push_str(&unescaped),
                        Err(_) => text.push_str(&raw),
                    }
                }
                Event::CData(ref e) if current_field.is_some() => {
                    text.push_str(&String::from_utf8_lossy(e));
                }
                Event::End(ref e) => {
                    let name = e.local_name();
                    if name.as_ref() == b"detection" {
                        match pending.take().and_then(PendingDetection::finish) {
                            Some(detection) => detections.push(detection),
                            None => skipped += 1,
                        }
                        current_field = None;
                    } else if let (Some(item), Some(field)) = (pending.as_mut(), current_field) {
                        if Self::field(name.as_ref()) == Some(field) {
                            let value = std::mem::take(&mut text);
                            match field {
                                XmlField::ClassName => item.class_name = Some(value),
                                XmlField::Score => item.score = Some(value),
                            }
                            current_field = None;
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} malformed XML detection records", skipped);
        }
        Ok(detections)
    }
}

fn decoder_for(format: DetectionFormat) -> Box<dyn DetectionDecoder> {
    match format {
        DetectionFormat::Json => Box::new(JsonDetectionDecoder),
        DetectionFormat::Xml => Box::new(XmlDetectionDecoder),
    }
}

/// 解析偵測檔；任何錯誤都回傳空列表
pub fn parse(content: &str, format: DetectionFormat) -> Vec<Detection> {
    let decoder = decoder_for(format);
    match decoder.decode(content) {
        Ok(detections) => detections,
        Err(e) => {
            tracing::warn!(
                "⚠️ Ignoring unparseable {} detection file: {}",
                decoder.format().as_str(),
                e
            );
            Vec::new()
        }
    }
}

/// Grammar chosen by file extension; unknown extensions yield nothing.
pub fn parse_with_extension(content: &str, extension: &str) -> Vec<Detection> {
    match DetectionFormat::from_extension(extension) {
        Some(format) => parse(content, format),
        None => {
            tracing::debug!("Unsupported detection file extension: {}", extension);
            Vec::new()
        }
    }
}
