//! The four-screen editing workflow as a reducer.
//!
//! ```text
//! upload ──import──► video-preview ──transcribe──► transcription ──auto/finalize──► final-cut
//!                          ▲                            │  ▲                          │
//!                          └───────────back─────────────┘  └──────────back────────────┘
//! ```
//!
//! [`Session::reduce`] is pure: it consumes the old session and returns the new one plus
//! an [`Effect`] for the caller to carry out. Gateway calls are split into a request
//! action, which hands out a [`Ticket`], and a completion action carrying that ticket.
//!
//! At most one call of each kind is in flight. A second request of the same kind is
//! rejected with [`InvalidOperation::AlreadyInFlight`]. Completions whose ticket is no
//! longer in flight (after a [`Action::Reset`]) are dropped and reported as
//! [`InvalidOperation::Superseded`].

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::{
    auto_edit::auto_edit,
    error::{GatewayError, InvalidOperation},
    gateway::{Translation, apply_translations},
    media::MediaSource,
    selection::{toggle_segment, toggle_word},
    types::{Language, Segment, SegmentId, VideoProject, ViewState},
};

/// Identifies one gateway call so its completion can be matched to the request.
pub type Ticket = u64;

#[derive(Debug)]
pub enum Action {
    ImportMedia(MediaSource),
    RequestTranscription,
    TranscriptionFinished {
        ticket: Ticket,
        outcome: Result<Vec<Segment>, GatewayError>,
    },
    ToggleSegment(SegmentId),
    ToggleWord {
        segment_id: SegmentId,
        word_index: usize,
    },
    AutoEdit(Language),
    ManualFinalize(Language),
    RequestTranslation,
    TranslationFinished {
        ticket: Ticket,
        outcome: Result<Vec<Segment>, GatewayError>,
    },
    Back,
    /// Drop the project and return to the upload screen.
    Reset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ImportMedia(_) => "media import",
            Action::RequestTranscription => "transcription",
            Action::TranscriptionFinished { .. } => "transcription result",
            Action::ToggleSegment(_) => "segment toggle",
            Action::ToggleWord { .. } => "word toggle",
            Action::AutoEdit(_) => "auto edit",
            Action::ManualFinalize(_) => "manual finalize",
            Action::RequestTranslation => "translation",
            Action::TranslationFinished { .. } => "translation result",
            Action::Back => "back",
            Action::Reset => "reset",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    GenerateTranscripts {
        ticket: Ticket,
        media_name: String,
    },
    TranslateSegments {
        ticket: Ticket,
        segments: Vec<Segment>,
    },
    /// A precondition failed; the session is unchanged.
    Rejected(InvalidOperation),
    /// A gateway call failed; only its in-flight flag was cleared.
    Failed(GatewayError),
}

#[derive(Debug)]
pub struct Step {
    pub session: Session,
    pub effect: Effect,
}

impl Step {
    fn done(session: Session) -> Self {
        Self {
            session,
            effect: Effect::None,
        }
    }

    fn failed(session: Session, err: GatewayError) -> Self {
        Self {
            session,
            effect: Effect::Failed(err),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    view: ViewState,
    project: Option<VideoProject>,
    master_language: Language,
    transcription: Option<Ticket>,
    translation: Option<Ticket>,
    next_ticket: Ticket,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn project(&self) -> Option<&VideoProject> {
        self.project.as_ref()
    }

    pub fn master_language(&self) -> Language {
        self.master_language
    }

    /// A transcript generation call is in flight.
    pub fn is_processing(&self) -> bool {
        self.transcription.is_some()
    }

    pub fn is_translating(&self) -> bool {
        self.translation.is_some()
    }

    pub fn selected_segments(&self) -> Vec<&Segment> {
        self.project
            .as_ref()
            .map(VideoProject::selected_segments)
            .unwrap_or_default()
    }

    pub fn reduce(mut self, action: Action) -> Step {
        let name = action.name();
        match action {
            Action::ImportMedia(media) => {
                if self.view != ViewState::Upload {
                    return self.wrong_view(name);
                }
                let project = media.into_project();
                info!(project = %project.id, media = %project.name, "media imported");
                self.project = Some(project);
                self.view = ViewState::VideoPreview;
                Step::done(self)
            }

            Action::RequestTranscription => {
                if self.view != ViewState::VideoPreview {
                    return self.wrong_view(name);
                }
                let Some(media_name) = self.project.as_ref().map(|p| p.name.clone()) else {
                    return self.reject(InvalidOperation::NoProject);
                };
                if self.transcription.is_some() {
                    return self.reject(InvalidOperation::AlreadyInFlight(name));
                }
                let ticket = self.issue_ticket();
                self.transcription = Some(ticket);
                Step {
                    session: self,
                    effect: Effect::GenerateTranscripts { ticket, media_name },
                }
            }

            Action::TranscriptionFinished { ticket, outcome } => {
                if self.transcription != Some(ticket) {
                    debug!(ticket, "discarding stale transcription result");
                    return self.reject(InvalidOperation::Superseded(name));
                }
                self.transcription = None;
                let segments = match outcome {
                    Ok(segments) => segments,
                    Err(err) => {
                        warn!(%err, "transcription failed");
                        return Step::failed(self, err);
                    }
                };
                if let Some(project) = self.project.as_mut() {
                    project.segments = segments
                        .into_iter()
                        .map(|s| Segment {
                            is_selected: false,
                            excluded_words_indices: BTreeSet::new(),
                            ..s
                        })
                        .collect();
                    project.is_transcribed = true;
                    info!(segments = project.segments.len(), "transcription ready");
                    self.view = ViewState::Transcription;
                }
                Step::done(self)
            }

            Action::ToggleSegment(id) => {
                let Some(project) = self.project.as_mut() else {
                    return self.reject(InvalidOperation::NoProject);
                };
                match toggle_segment(&project.segments, &id) {
                    Some(segments) => {
                        project.segments = segments;
                        Step::done(self)
                    }
                    None => self.reject(InvalidOperation::UnknownSegment(id)),
                }
            }

            Action::ToggleWord {
                segment_id,
                word_index,
            } => {
                let Some(project) = self.project.as_mut() else {
                    return self.reject(InvalidOperation::NoProject);
                };
                match toggle_word(&project.segments, &segment_id, word_index) {
                    Some(segments) => {
                        project.segments = segments;
                        Step::done(self)
                    }
                    None => self.reject(InvalidOperation::UnknownSegment(segment_id)),
                }
            }

            Action::AutoEdit(language) => {
                if self.view != ViewState::Transcription {
                    return self.wrong_view(name);
                }
                let Some(project) = self.project.as_mut() else {
                    return self.reject(InvalidOperation::NoProject);
                };
                project.segments = auto_edit(&project.segments);
                info!(
                    selected = project.selected_count(),
                    language = language.name(),
                    "auto edit applied"
                );
                self.master_language = language;
                self.view = ViewState::FinalCut;
                Step::done(self)
            }

            Action::ManualFinalize(language) => {
                if self.view != ViewState::Transcription {
                    return self.wrong_view(name);
                }
                let Some(selected) = self.project.as_ref().map(VideoProject::selected_count)
                else {
                    return self.reject(InvalidOperation::NoProject);
                };
                if selected == 0 {
                    return self.reject(InvalidOperation::NothingSelected);
                }
                self.master_language = language;
                self.view = ViewState::FinalCut;
                Step::done(self)
            }

            Action::RequestTranslation => {
                if self.view != ViewState::FinalCut {
                    return self.wrong_view(name);
                }
                let Some(segments) = self.project.as_ref().map(|p| p.segments.clone()) else {
                    return self.reject(InvalidOperation::NoProject);
                };
                if self.translation.is_some() {
                    return self.reject(InvalidOperation::AlreadyInFlight(name));
                }
                let ticket = self.issue_ticket();
                self.translation = Some(ticket);
                Step {
                    session: self,
                    effect: Effect::TranslateSegments { ticket, segments },
                }
            }

            Action::TranslationFinished { ticket, outcome } => {
                if self.translation != Some(ticket) {
                    debug!(ticket, "discarding stale translation result");
                    return self.reject(InvalidOperation::Superseded(name));
                }
                self.translation = None;
                let translated = match outcome {
                    Ok(translated) => translated,
                    Err(err) => {
                        warn!(%err, "translation failed");
                        return Step::failed(self, err);
                    }
                };
                if let Some(project) = self.project.as_mut() {
                    // Merge onto the current list so edits made while the call was in
                    // flight survive.
                    let translations: Vec<Translation> = translated
                        .into_iter()
                        .filter_map(|s| {
                            s.english_text.map(|english_text| Translation {
                                id: s.id,
                                english_text,
                            })
                        })
                        .collect();
                    project.segments = apply_translations(&project.segments, &translations);
                    info!(translated = translations.len(), "translation applied");
                }
                Step::done(self)
            }

            Action::Back => {
                self.view = match self.view {
                    ViewState::Transcription => ViewState::VideoPreview,
                    ViewState::FinalCut => ViewState::Transcription,
                    ViewState::Upload | ViewState::VideoPreview => return self.wrong_view(name),
                };
                Step::done(self)
            }

            Action::Reset => {
                if self.transcription.is_some() || self.translation.is_some() {
                    debug!("reset while a gateway call is in flight");
                }
                self.view = ViewState::Upload;
                self.project = None;
                self.transcription = None;
                self.translation = None;
                Step::done(self)
            }
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn wrong_view(self, action: &'static str) -> Step {
        let view = self.view.name();
        self.reject(InvalidOperation::WrongView { action, view })
    }

    fn reject(self, reason: InvalidOperation) -> Step {
        debug!(%reason, "action rejected");
        Step {
            session: self,
            effect: Effect::Rejected(reason),
        }
    }
}
