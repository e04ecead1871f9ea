use std::sync::Arc;

use tracing::debug;

use crate::{
    error::Result,
    gateway::Gateway,
    store::SessionStore,
    workflow::{Action, Effect, Session},
};

/// Drives a [`Session`] through user actions, running gateway calls as they are asked
/// for.
///
/// The store lock is only held while reducing; gateway calls are awaited without it, so
/// other actions (toggles, navigation) keep working while a call is in flight.
pub struct Editor<G> {
    store: SessionStore,
    gateway: G,
}

impl<G: Gateway> Editor<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            store: SessionStore::default(),
            gateway,
        }
    }

    pub fn session(&self) -> Arc<Session> {
        self.store.snapshot()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Apply `action` and, if it starts a gateway call, wait for the call and apply its
    /// result. Returns the session after the last step.
    ///
    /// A call whose result lands after a [`Action::Reset`] fails with
    /// [`InvalidOperation::Superseded`](crate::error::InvalidOperation::Superseded); the
    /// result is not applied.
    pub async fn dispatch(&self, action: Action) -> Result<Arc<Session>> {
        let mut action = action;
        loop {
            debug!(action = action.name(), "dispatching");
            let (session, effect) = self.store.update(|current| {
                let step = current.clone().reduce(action);
                (step.session, step.effect)
            });

            action = match effect {
                Effect::None => return Ok(session),
                Effect::Rejected(reason) => return Err(reason.into()),
                Effect::Failed(err) => return Err(err.into()),
                Effect::GenerateTranscripts { ticket, media_name } => {
                    let outcome = self.gateway.generate_transcripts(&media_name).await;
                    Action::TranscriptionFinished { ticket, outcome }
                }
                Effect::TranslateSegments { ticket, segments } => {
                    let outcome = self.gateway.translate_segments(&segments).await;
                    Action::TranslationFinished { ticket, outcome }
                }
            };
        }
    }
}
