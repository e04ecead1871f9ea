//! The transcript/translation service boundary.
//!
//! The editor only ever sees [`Gateway`]. [`ProviderGateway`] implements it on top of an
//! OpenAI-compatible chat completion endpoint, and [`schema`] turns the untyped JSON it
//! returns into domain segments or a [`GatewayError::ParseFailure`].

mod provider_gateway;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;

pub use provider_gateway::ProviderGateway;
pub use schema::{Translation, apply_translations, parse_transcript, parse_translations};

use crate::{error::GatewayError, types::Segment};

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Produce the complete segment set for the named media. Segments come back
    /// deselected with no word exclusions.
    async fn generate_transcripts(&self, media_name: &str) -> Result<Vec<Segment>, GatewayError>;

    /// Return `segments` in the same order with `english_text` filled in for every id the
    /// service translated. Segments it skipped are returned unchanged.
    async fn translate_segments(&self, segments: &[Segment])
    -> Result<Vec<Segment>, GatewayError>;
}

#[async_trait]
impl<T: Gateway + ?Sized> Gateway for Arc<T> {
    async fn generate_transcripts(&self, media_name: &str) -> Result<Vec<Segment>, GatewayError> {
        (**self).generate_transcripts(media_name).await
    }

    async fn translate_segments(
        &self,
        segments: &[Segment],
    ) -> Result<Vec<Segment>, GatewayError> {
        (**self).translate_segments(segments).await
    }
}
