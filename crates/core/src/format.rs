use crate::{
    selection::included_words,
    types::{Language, Segment, VideoProject},
};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

pub fn format_time_range(start: f64, end: f64) -> String {
    format!("{:.2}s - {:.2}s", start, end)
}

/// Words of the displayed rendering prefixed with their index; excluded words are
/// wrapped in `~`.
pub fn format_words(segment: &Segment, language: Language) -> String {
    segment
        .words(language)
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if segment.is_word_excluded(i) {
                format!("[{}]~{}~", i, word)
            } else {
                format!("[{}]{}", i, word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numbered review listing of every segment, as shown on the transcription screen.
pub fn format_transcript(segments: &[Segment], language: Language) -> String {
    let mut output = String::new();
    for (i, segment) in segments.iter().enumerate() {
        let marker = if segment.is_selected { "x" } else { " " };
        output.push_str(&format!(
            "[{}] {:02} {} | {} | score {:.0} | {}",
            marker,
            i + 1,
            segment.id,
            format_time_range(segment.start_time, segment.end_time),
            segment.score,
            segment.speaker_id
        ));
        if segment.is_viral_peak() {
            output.push_str(" | VIRAL PEAK");
        }
        output.push('\n');
        output.push_str(&format!("      {}\n", format_words(segment, language)));
    }
    output
}

pub fn format_final_cut(project: &VideoProject, language: Language) -> String {
    let selected = project.selected_segments();
    let total: f64 = selected.iter().map(|s| s.duration()).sum();

    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", project.name));
    output.push_str(&format!(
        "**Clips:** {} | **Duration:** {} | **Master language:** {}\n\n",
        selected.len(),
        format_timestamp(total),
        language.name()
    ));

    for segment in selected {
        output.push_str(&format!(
            "### [{}–{}] {}\n\n",
            format_timestamp(segment.start_time),
            format_timestamp(segment.end_time),
            segment.speaker_id
        ));
        output.push_str(&format!("{}\n", included_words(segment, language).join(" ")));
        if let Some(english) = &segment.english_text {
            output.push_str(&format!("> {}\n", english));
        }
        output.push('\n');
    }

    output
}
