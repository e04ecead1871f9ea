//! Wire contract of the gateway.
//!
//! Responses are validated strictly at the boundary: a missing or mistyped field anywhere
//! fails the whole response instead of letting partial data reach the session.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    error::GatewayError,
    types::{Segment, SegmentId},
};

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSegment {
    id: String,
    start_time: f64,
    end_time: f64,
    tamil_text: String,
    tanglish_text: String,
    score: f64,
    speaker_id: String,
}

/// One entry of a translation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: SegmentId,
    pub english_text: String,
}

/// One entry of a translation request.
#[derive(Debug, Serialize)]
pub struct TranslationRequest<'a> {
    pub id: &'a str,
    pub text: &'a str,
}

impl<'a> From<&'a Segment> for TranslationRequest<'a> {
    fn from(segment: &'a Segment) -> Self {
        Self {
            id: &segment.id,
            text: &segment.tamil_text,
        }
    }
}

fn parse_failure(reason: impl Into<String>) -> GatewayError {
    GatewayError::ParseFailure {
        reason: reason.into(),
    }
}

/// Accept either a bare array or `{"<key>": [...]}`. Structured-output modes of some
/// providers only allow an object at the root.
fn unwrap_array(content: &str, key: &str) -> Result<Value, GatewayError> {
    let value: Value = serde_json::from_str(content.trim())?;
    match value {
        Value::Array(items) => Ok(Value::Array(items)),
        Value::Object(mut map) => match map.remove(key) {
            Some(inner @ Value::Array(_)) => Ok(inner),
            _ => Err(parse_failure(format!(
                "expected a JSON array or an object with a \"{key}\" array"
            ))),
        },
        _ => Err(parse_failure("expected a JSON array")),
    }
}

/// Parse a transcript response into deselected segments with no word exclusions.
pub fn parse_transcript(content: &str) -> Result<Vec<Segment>, GatewayError> {
    let wire: Vec<WireSegment> = serde_json::from_value(unwrap_array(content, "segments")?)?;
    if wire.is_empty() {
        return Err(parse_failure("transcript contains no segments"));
    }

    let mut seen = HashSet::new();
    wire.into_iter()
        .enumerate()
        .map(|(i, w)| {
            if w.id.trim().is_empty() {
                return Err(parse_failure(format!("segment {i} has an empty id")));
            }
            if !seen.insert(w.id.clone()) {
                return Err(parse_failure(format!("duplicate segment id {}", w.id)));
            }
            if !w.start_time.is_finite() || !w.end_time.is_finite() || w.start_time < 0.0 {
                return Err(parse_failure(format!(
                    "segment {} has invalid times {}..{}",
                    w.id, w.start_time, w.end_time
                )));
            }
            if w.end_time <= w.start_time {
                return Err(parse_failure(format!(
                    "segment {} ends at {} before it starts at {}",
                    w.id, w.end_time, w.start_time
                )));
            }
            if !(MIN_SCORE..=MAX_SCORE).contains(&w.score) {
                return Err(parse_failure(format!(
                    "segment {} has score {} outside 1-100",
                    w.id, w.score
                )));
            }

            Ok(Segment {
                id: w.id,
                start_time: w.start_time,
                end_time: w.end_time,
                tamil_text: w.tamil_text,
                tanglish_text: w.tanglish_text,
                english_text: None,
                score: w.score,
                speaker_id: w.speaker_id,
                is_selected: false,
                excluded_words_indices: BTreeSet::new(),
            })
        })
        .collect()
}

pub fn parse_translations(content: &str) -> Result<Vec<Translation>, GatewayError> {
    Ok(serde_json::from_value(unwrap_array(
        content,
        "translations",
    )?)?)
}

/// Fill in `english_text` by id. Order and length follow `segments`; segments without a
/// translation are returned unchanged; the first translation for an id wins.
pub fn apply_translations(segments: &[Segment], translations: &[Translation]) -> Vec<Segment> {
    segments
        .iter()
        .map(|s| match translations.iter().find(|t| t.id == s.id) {
            Some(t) => Segment {
                english_text: Some(t.english_text.clone()),
                ..s.clone()
            },
            None => s.clone(),
        })
        .collect()
}

pub fn transcript_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "segments": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "startTime": { "type": "number" },
                        "endTime": { "type": "number" },
                        "tamilText": { "type": "string" },
                        "tanglishText": { "type": "string" },
                        "score": { "type": "number" },
                        "speakerId": { "type": "string" }
                    },
                    "required": ["id", "startTime", "endTime", "tamilText", "tanglishText", "score", "speakerId"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["segments"],
        "additionalProperties": false
    })
}

pub fn translation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "translations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "englishText": { "type": "string" }
                    },
                    "required": ["id", "englishText"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["translations"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::segment;

    const SIX: &str = r#"[
        {"id":"1","startTime":0,"endTime":5,"tamilText":"வணக்கம் நண்பர்களே","tanglishText":"vanakkam nanbargale","score":90,"speakerId":"Speaker 1"},
        {"id":"2","startTime":5,"endTime":10,"tamilText":"இன்று ஒரு கதை","tanglishText":"indru oru kadhai","score":75,"speakerId":"Speaker 2"},
        {"id":"3","startTime":10,"endTime":15,"tamilText":"மிகவும் சுவாரஸ்யம்","tanglishText":"migavum suvarasyam","score":81,"speakerId":"Speaker 1"},
        {"id":"4","startTime":15,"endTime":20,"tamilText":"கேளுங்கள்","tanglishText":"kelungal","score":80,"speakerId":"Speaker 2"},
        {"id":"5","startTime":20,"endTime":25,"tamilText":"அருமை","tanglishText":"arumai","score":100,"speakerId":"Speaker 1"},
        {"id":"6","startTime":25,"endTime":30,"tamilText":"நன்றி","tanglishText":"nandri","score":10,"speakerId":"Speaker 2"}
    ]"#;

    fn reason(err: GatewayError) -> String {
        match err {
            GatewayError::ParseFailure { reason } => reason,
            other => panic!("expected ParseFailure, got {other:?}"),
        }
    }

    #[test]
    fn parses_and_normalizes_segments() {
        let segments = parse_transcript(SIX).unwrap();
        assert_eq!(segments.len(), 6);
        assert!(segments.iter().all(|s| !s.is_selected));
        assert!(segments.iter().all(|s| s.excluded_words_indices.is_empty()));
        assert_eq!(segments[2].tanglish_text, "migavum suvarasyam");
        assert_eq!(segments[4].score, 100.0);
    }

    #[test]
    fn accepts_object_envelope() {
        let wrapped = format!(r#"{{"segments": {SIX}}}"#);
        assert_eq!(parse_transcript(&wrapped).unwrap().len(), 6);
    }

    #[test]
    fn rejects_missing_field() {
        let content = r#"[{"id":"1","startTime":0,"endTime":5,"tamilText":"a","score":50,"speakerId":"S1"}]"#;
        assert!(reason(parse_transcript(content).unwrap_err()).contains("tanglishText"));
    }

    #[test]
    fn rejects_mistyped_field() {
        let content = r#"[{"id":1,"startTime":0,"endTime":5,"tamilText":"a","tanglishText":"a","score":50,"speakerId":"S1"}]"#;
        parse_transcript(content).unwrap_err();
    }

    #[test]
    fn rejects_score_out_of_range() {
        let content = r#"[{"id":"1","startTime":0,"endTime":5,"tamilText":"a","tanglishText":"a","score":101,"speakerId":"S1"}]"#;
        assert!(reason(parse_transcript(content).unwrap_err()).contains("score"));
        let content = content.replace("101", "0");
        parse_transcript(&content).unwrap_err();
    }

    #[test]
    fn rejects_inverted_times() {
        let content = r#"[{"id":"1","startTime":5,"endTime":5,"tamilText":"a","tanglishText":"a","score":50,"speakerId":"S1"}]"#;
        parse_transcript(content).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_ids() {
        let content = SIX.replace(r#""id":"2""#, r#""id":"1""#);
        assert!(reason(parse_transcript(&content).unwrap_err()).contains("duplicate"));
    }

    #[test]
    fn rejects_empty_and_non_json() {
        parse_transcript("[]").unwrap_err();
        parse_transcript("").unwrap_err();
        parse_transcript("Sure! Here is your transcript").unwrap_err();
        parse_transcript(r#"{"items": []}"#).unwrap_err();
    }

    #[test]
    fn translations_apply_by_id_and_keep_order() {
        let segments = vec![segment("a", 1.0), segment("b", 1.0), segment("c", 1.0)];
        let translations =
            parse_translations(r#"[{"id":"c","englishText":"three"},{"id":"a","englishText":"one"}]"#)
                .unwrap();
        let out = apply_translations(&segments, &translations);

        let ids: Vec<_> = out.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(out[0].english_text.as_deref(), Some("one"));
        assert_eq!(out[1], segments[1]);
        assert_eq!(out[2].english_text.as_deref(), Some("three"));
    }

    #[test]
    fn unknown_translation_ids_are_ignored() {
        let segments = vec![segment("a", 1.0)];
        let translations = vec![Translation {
            id: "zzz".to_string(),
            english_text: "ghost".to_string(),
        }];
        assert_eq!(apply_translations(&segments, &translations), segments);
    }

    #[test]
    fn translation_entries_need_english_text() {
        parse_translations(r#"{"translations":[{"id":"a","text":"one"}]}"#).unwrap_err();
    }

    #[test]
    fn translation_request_carries_tamil_text() {
        let s = segment("a", 1.0);
        let value = serde_json::to_value(TranslationRequest::from(&s)).unwrap();
        assert_eq!(value["id"], "a");
        assert_eq!(value["text"], s.tamil_text.as_str());
    }
}
