use crate::types::Segment;

/// Segments scoring strictly above this are kept by [`auto_edit`].
pub const AUTO_EDIT_THRESHOLD: f64 = 80.0;

/// Select every segment scoring above [`AUTO_EDIT_THRESHOLD`] and deselect the rest.
/// Word exclusions and all other fields are left as they are.
pub fn auto_edit(segments: &[Segment]) -> Vec<Segment> {
    segments
        .iter()
        .map(|s| Segment {
            is_selected: s.score > AUTO_EDIT_THRESHOLD,
            ..s.clone()
        })
        .collect()
}
