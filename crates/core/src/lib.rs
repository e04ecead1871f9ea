//! Clipcut Core Library
//!
//! Review an AI-generated Tamil transcript of a video, pick the segments and words that
//! make the final cut, and optionally translate it to English.

pub mod auto_edit;
pub mod editor;
pub mod error;
pub mod format;
pub mod gateway;
pub mod media;
pub mod provider;
pub mod selection;
pub mod store;
pub mod types;
pub mod workflow;

// Re-export commonly used items at crate root
pub use auto_edit::{AUTO_EDIT_THRESHOLD, auto_edit};
pub use editor::Editor;
pub use error::{ClipcutError, GatewayError, InvalidOperation, Result};
pub use format::{format_final_cut, format_timestamp, format_transcript};
pub use gateway::{Gateway, ProviderGateway};
pub use media::MediaSource;
pub use provider::{GatewayConfig, Provider, ProviderConfig};
pub use selection::{included_words, toggle_segment, toggle_word};
pub use store::SessionStore;
pub use types::{Language, Segment, SegmentId, VideoProject, ViewState};
pub use workflow::{Action, Effect, Session, Step, Ticket};
