use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{
    error::{ClipcutError, Result},
    types::VideoProject,
};

const VIDEO_EXTENSIONS: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
];

/// A local media file accepted for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub path: PathBuf,
    pub name: String,
    pub mime_type: &'static str,
}

impl MediaSource {
    /// Accept `path` if its extension names a video type. The file contents are not
    /// inspected.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rejected = |reason: &str| ClipcutError::MediaRejected {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| rejected("path has no file name"))?;

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .ok_or_else(|| rejected("file has no extension"))?;

        let mime_type = VIDEO_EXTENSIONS
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, mime)| *mime)
            .ok_or_else(|| rejected("not a video file"))?;

        Ok(Self {
            path: path.to_path_buf(),
            name,
            mime_type,
        })
    }

    /// A fresh, untranscribed project for this media.
    pub fn into_project(self) -> VideoProject {
        VideoProject {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            url: self.path.to_string_lossy().to_string(),
            duration: 0.0,
            segments: Vec::new(),
            is_transcribed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_video_extensions_case_insensitively() {
        let media = MediaSource::from_path("/tmp/Interview.MOV").unwrap();
        assert_eq!(media.name, "Interview.MOV");
        assert_eq!(media.mime_type, "video/quicktime");
    }

    #[test]
    fn rejects_non_video_files() {
        for path in ["/tmp/notes.txt", "/tmp/track.mp3", "/tmp/noext", "/"] {
            assert!(
                matches!(
                    MediaSource::from_path(path),
                    Err(ClipcutError::MediaRejected { .. })
                ),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn new_project_is_empty_and_untranscribed() {
        let project = MediaSource::from_path("clips/speech.mp4").unwrap().into_project();
        assert_eq!(project.name, "speech.mp4");
        assert_eq!(project.url, "clips/speech.mp4");
        assert!(project.segments.is_empty());
        assert!(!project.is_transcribed);
        assert!(Uuid::parse_str(&project.id).is_ok());
    }

    #[test]
    fn project_ids_are_unique() {
        let media = MediaSource::from_path("a.webm").unwrap();
        assert_ne!(media.clone().into_project().id, media.into_project().id);
    }
}
