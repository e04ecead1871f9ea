use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::workflow::Session;

/// Holds the one live [`Session`].
///
/// The session is kept as an immutable snapshot and swapped whole, so readers only ever
/// see a value that was fully derived from its predecessor.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Mutex<Arc<Session>>,
}

impl SessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            current: Mutex::new(Arc::new(session)),
        }
    }

    pub fn snapshot(&self) -> Arc<Session> {
        Arc::clone(&self.lock())
    }

    pub fn replace(&self, session: Session) -> Arc<Session> {
        let next = Arc::new(session);
        *self.lock() = Arc::clone(&next);
        next
    }

    /// Derive the next session from the current one under the lock. `derive` also returns
    /// a value that is handed back alongside the new snapshot.
    pub fn update<R>(&self, derive: impl FnOnce(&Session) -> (Session, R)) -> (Arc<Session>, R) {
        let mut current = self.lock();
        let (session, out) = derive(&current);
        let next = Arc::new(session);
        *current = Arc::clone(&next);
        (next, out)
    }

    fn lock(&self) -> MutexGuard<'_, Arc<Session>> {
        // The swap is the last write under the lock, so a poisoned value is still whole.
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{media::MediaSource, workflow::Action};

    #[test]
    fn snapshots_are_immutable() {
        let store = SessionStore::default();
        let before = store.snapshot();

        let media = MediaSource::from_path("talk.mp4").unwrap();
        let (after, _) = store.update(|s| (s.clone().reduce(Action::ImportMedia(media)).session, ()));

        assert!(before.project().is_none());
        assert!(after.project().is_some());
        assert!(Arc::ptr_eq(&after, &store.snapshot()));
    }

    #[test]
    fn replace_swaps_whole_session() {
        let store = SessionStore::default();
        let media = MediaSource::from_path("talk.mp4").unwrap();
        let next = Session::new().reduce(Action::ImportMedia(media)).session;
        store.replace(next.clone());
        assert_eq!(*store.snapshot(), next);
    }
}
