//! Deferred work bound to a session.
//!
//! A follow-up is a one-shot action scheduled some time after a committed
//! transaction. It runs in its own transaction and only if the session it
//! was scheduled for is still at the same selection generation.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::Result;
use crate::session::{SessionRegistry, SessionToken};
use crate::transaction::Store;

/// What a follow-up action gets to work with.
pub struct FollowupContext {
    pub store: Store,
    pub sessions: Arc<SessionRegistry>,
    pub token: SessionToken,
}

#[derive(Clone)]
pub struct FollowupScheduler {
    store: Store,
    sessions: Arc<SessionRegistry>,
}

impl FollowupScheduler {
    pub fn new(store: Store, sessions: Arc<SessionRegistry>) -> Self {
        Self { store, sessions }
    }

    /// Runs `action` after `delay` unless the session changed in between.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule_after<F>(&self, delay: Duration, token: SessionToken, action: F) -> JoinHandle<()>
    where
        F: FnOnce(&FollowupContext) -> Result<()> + Send + 'static,
    {
        let ctx = FollowupContext {
            store: self.store.clone(),
            sessions: Arc::clone(&self.sessions),
            token,
        };

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if !ctx.sessions.is_current(&ctx.token) {
                warn!(
                    target: "runtime::scheduler",
                    session = %ctx.token.session,
                    generation = ctx.token.generation,
                    "session changed before follow-up ran, skipping"
                );
                return;
            }

            match action(&ctx) {
                Ok(()) => debug!(target: "runtime::scheduler", session = %ctx.token.session, "follow-up done"),
                Err(err) => warn!(
                    target: "runtime::scheduler",
                    session = %ctx.token.session,
                    error = %err,
                    "follow-up failed"
                ),
            }
        })
    }
}

/// Logs the character out of the game and clears the session's selection.
pub fn deselect_character(ctx: &FollowupContext) -> Result<()> {
    let session = ctx.sessions.require(ctx.token.session)?;
    let Some(character_id) = session.character else {
        return Ok(());
    };

    let mut tx = ctx.store.begin();
    let mut character = tx.load_character(character_id)?;
    character.in_game = false;
    tx.update_character(&character);

    let sessions = Arc::clone(&ctx.sessions);
    tx.on_committed(move || sessions.deselect_character(session.id).map(|_| ()));
    tx.commit()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::repository::InMemoryRepository;
    use game_core::{AccountId, EntityId};

    fn scheduler() -> (FollowupScheduler, Arc<SessionRegistry>) {
        let sessions = Arc::new(SessionRegistry::new());
        let store = Store::new(Arc::new(InMemoryRepository::default()));
        (FollowupScheduler::new(store, Arc::clone(&sessions)), sessions)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_after_delay_for_current_session() {
        let (scheduler, sessions) = scheduler();
        let id = sessions.open(AccountId(1));
        let token = sessions.select_character(id, EntityId(5)).unwrap();
        let ran = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&ran);
        let handle = scheduler.schedule_after(Duration::from_secs(5), token, move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!ran.load(Ordering::SeqCst));

        handle.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_session_skips_action() {
        let (scheduler, sessions) = scheduler();
        let id = sessions.open(AccountId(1));
        let token = sessions.select_character(id, EntityId(5)).unwrap();
        let ran = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&ran);
        let handle = scheduler.schedule_after(Duration::from_secs(5), token, move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });
        sessions.select_character(id, EntityId(6)).unwrap();

        handle.await.unwrap();
        assert!(!ran.load(Ordering::SeqCst));
    }
}
