use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub type SegmentId = String;

/// Score above which a segment gets the "viral peak" badge.
pub const VIRAL_PEAK_SCORE: f64 = 85.0;

/// Which rendering of the spoken Tamil content is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tamil,
    Tanglish,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::Tamil => "tamil",
            Language::Tanglish => "tanglish",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewState {
    #[default]
    Upload,
    VideoPreview,
    Transcription,
    FinalCut,
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Upload => "upload",
            ViewState::VideoPreview => "video-preview",
            ViewState::Transcription => "transcription",
            ViewState::FinalCut => "final-cut",
        }
    }
}

/// A timed transcript unit.
///
/// `excluded_words_indices` refers to whitespace tokens of whichever rendering was on
/// screen when the word was clicked. Tamil and Tanglish token counts may differ, so the
/// same index can point at different words depending on the language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: SegmentId,
    pub start_time: f64,
    pub end_time: f64,
    pub tamil_text: String,
    pub tanglish_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_text: Option<String>,
    pub score: f64,
    pub speaker_id: String,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub excluded_words_indices: BTreeSet<usize>,
}

impl Segment {
    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::Tamil => &self.tamil_text,
            Language::Tanglish => &self.tanglish_text,
        }
    }

    /// Whitespace-separated tokens of the displayed rendering. Leading, trailing and repeated
    /// whitespace yield no empty tokens, so index 0 is always the first real word.
    pub fn words(&self, language: Language) -> Vec<&str> {
        self.text(language).split_whitespace().collect()
    }

    pub fn is_word_excluded(&self, word_index: usize) -> bool {
        self.excluded_words_indices.contains(&word_index)
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn is_viral_peak(&self) -> bool {
        self.score > VIRAL_PEAK_SCORE
    }
}

/// The working session's media and its transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProject {
    pub id: String,
    pub name: String,
    pub url: String,
    pub duration: f64,
    pub segments: Vec<Segment>,
    pub is_transcribed: bool,
}

impl VideoProject {
    /// The final cut: selected segments in their original order.
    pub fn selected_segments(&self) -> Vec<&Segment> {
        self.segments.iter().filter(|s| s.is_selected).collect()
    }

    pub fn selected_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_selected).count()
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn segment(id: &str, score: f64) -> Segment {
        Segment {
            id: id.to_string(),
            start_time: 0.0,
            end_time: 5.0,
            tamil_text: "வணக்கம் எல்லோருக்கும் இன்று நாம்".to_string(),
            tanglish_text: "vanakkam ellorukkum indru naam".to_string(),
            english_text: None,
            score,
            speaker_id: "Speaker 1".to_string(),
            is_selected: false,
            excluded_words_indices: BTreeSet::new(),
        }
    }

    pub fn project(segments: Vec<Segment>) -> VideoProject {
        VideoProject {
            id: "p1".to_string(),
            name: "clip.mp4".to_string(),
            url: "/videos/clip.mp4".to_string(),
            duration: 0.0,
            segments,
            is_transcribed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::segment;
    use super::*;

    #[test]
    fn words_split_on_any_whitespace() {
        let mut s = segment("a", 50.0);
        s.tanglish_text = "  naan  romba\tsanthosham \n".to_string();
        assert_eq!(s.words(Language::Tanglish), vec!["naan", "romba", "santhosham"]);
    }

    #[test]
    fn missing_exclusions_deserialize_as_empty() {
        let json = r#"{
            "id": "s1", "startTime": 0, "endTime": 2.5,
            "tamilText": "வணக்கம்", "tanglishText": "vanakkam",
            "score": 42, "speakerId": "Speaker 2"
        }"#;
        let s: Segment = serde_json::from_str(json).unwrap();
        assert!(s.excluded_words_indices.is_empty());
        assert!(!s.is_selected);
        assert_eq!(s.english_text, None);
    }

    #[test]
    fn serializes_camel_case_and_omits_missing_translation() {
        let value = serde_json::to_value(segment("s1", 10.0)).unwrap();
        assert!(value.get("startTime").is_some());
        assert!(value.get("excludedWordsIndices").is_some());
        assert!(value.get("englishText").is_none());
    }

    #[test]
    fn view_state_names_match_wire_form() {
        for view in [
            ViewState::Upload,
            ViewState::VideoPreview,
            ViewState::Transcription,
            ViewState::FinalCut,
        ] {
            let json = serde_json::to_string(&view).unwrap();
            assert_eq!(json, format!("\"{}\"", view.name()));
        }
    }

    #[test]
    fn viral_peak_is_strictly_above_85() {
        assert!(!segment("a", 85.0).is_viral_peak());
        assert!(segment("a", 86.0).is_viral_peak());
    }

    #[test]
    fn selected_segments_keep_order() {
        let mut a = segment("a", 1.0);
        let b = segment("b", 1.0);
        let mut c = segment("c", 1.0);
        a.is_selected = true;
        c.is_selected = true;
        let project = fixtures::project(vec![a, b, c]);
        let ids: Vec<_> = project.selected_segments().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(project.selected_count(), 2);
    }
}
