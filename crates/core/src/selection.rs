//! Segment- and word-level inclusion toggles.
//!
//! Every function here derives a new segment list from the old one. Exactly one element
//! differs from the input; order and all other fields are preserved.

use crate::types::{Language, Segment};

/// Flip `is_selected` on the segment with `id`. Returns `None` if no segment matches.
pub fn toggle_segment(segments: &[Segment], id: &str) -> Option<Vec<Segment>> {
    update_one(segments, id, |s| s.is_selected = !s.is_selected)
}

/// Add `word_index` to the segment's exclusions, or remove it if already present.
///
/// The index is not checked against the word count. An out-of-range index is stored and
/// simply never matches a rendered word.
pub fn toggle_word(segments: &[Segment], id: &str, word_index: usize) -> Option<Vec<Segment>> {
    update_one(segments, id, |s| {
        if !s.excluded_words_indices.remove(&word_index) {
            s.excluded_words_indices.insert(word_index);
        }
    })
}

/// Words of the displayed rendering that survive the segment's exclusions.
pub fn included_words(segment: &Segment, language: Language) -> Vec<&str> {
    segment
        .words(language)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !segment.is_word_excluded(*i))
        .map(|(_, w)| w)
        .collect()
}

fn update_one(
    segments: &[Segment],
    id: &str,
    apply: impl FnOnce(&mut Segment),
) -> Option<Vec<Segment>> {
    let pos = segments.iter().position(|s| s.id == id)?;
    let mut next = segments.to_vec();
    apply(&mut next[pos]);
    Some(next)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::types::fixtures::segment;

    fn three() -> Vec<Segment> {
        vec![segment("a", 10.0), segment("b", 20.0), segment("c", 30.0)]
    }

    #[test]
    fn toggle_segment_flips_only_the_target() {
        let before = three();
        let after = toggle_segment(&before, "b").unwrap();
        assert!(after[1].is_selected);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
    }

    #[test]
    fn toggle_segment_twice_is_identity() {
        let before = three();
        let once = toggle_segment(&before, "c").unwrap();
        let twice = toggle_segment(&once, "c").unwrap();
        assert_eq!(twice, before);
    }

    #[test]
    fn toggle_segment_unknown_id() {
        assert!(toggle_segment(&three(), "zzz").is_none());
    }

    #[test]
    fn toggle_word_removes_present_index() {
        let mut segments = three();
        segments[0].excluded_words_indices = BTreeSet::from([1, 2, 3]);
        let after = toggle_word(&segments, "a", 2).unwrap();
        assert_eq!(after[0].excluded_words_indices, BTreeSet::from([1, 3]));
    }

    #[test]
    fn toggle_word_adds_missing_index() {
        let after = toggle_word(&three(), "a", 2).unwrap();
        assert_eq!(after[0].excluded_words_indices, BTreeSet::from([2]));
        assert!(after[1].excluded_words_indices.is_empty());
    }

    #[test]
    fn toggle_word_twice_restores_set() {
        let mut segments = three();
        segments[2].excluded_words_indices = BTreeSet::from([0, 4]);
        let once = toggle_word(&segments, "c", 7).unwrap();
        let twice = toggle_word(&once, "c", 7).unwrap();
        assert_eq!(twice[2].excluded_words_indices, segments[2].excluded_words_indices);
    }

    #[test]
    fn toggle_word_accepts_out_of_range_index() {
        let after = toggle_word(&three(), "b", 99).unwrap();
        assert!(after[1].is_word_excluded(99));
        assert_eq!(included_words(&after[1], Language::Tanglish).len(), 4);
    }

    #[test]
    fn included_words_skip_exclusions_per_rendering() {
        let mut s = segment("a", 10.0);
        s.excluded_words_indices = BTreeSet::from([0, 2]);
        assert_eq!(included_words(&s, Language::Tanglish), vec!["ellorukkum", "naam"]);
        assert_eq!(included_words(&s, Language::Tamil), vec!["எல்லோருக்கும்", "நாம்"]);
    }
}
