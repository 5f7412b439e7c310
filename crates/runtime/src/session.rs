//! Connected sessions and their character selection.
//!
//! Every selection change bumps the session's generation. Deferred work
//! captures a [`SessionToken`] and checks it with
//! [`SessionRegistry::is_current`] before touching the session again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use game_core::{AccountId, EntityId, SessionId};

use crate::api::{Missing, Result, RuntimeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub account: AccountId,
    pub character: Option<EntityId>,
    pub generation: u64,
}

impl Session {
    pub fn token(&self) -> SessionToken {
        SessionToken {
            session: self.id,
            generation: self.generation,
        }
    }
}

/// Identifies one session at one selection generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken {
    pub session: SessionId,
    pub generation: u64,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
    next_session: AtomicU64,
    next_generation: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn open(&self, account: AccountId) -> SessionId {
        let id = SessionId(self.next_session.fetch_add(1, Ordering::Relaxed) + 1);
        let session = Session {
            id,
            account,
            character: None,
            generation: self.bump_generation(),
        };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, session);
        debug!(target: "runtime::session", session = %id, account = %account, "opened");
        id
    }

    pub fn close(&self, id: SessionId) -> Option<Session> {
        let closed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if closed.is_some() {
            debug!(target: "runtime::session", session = %id, "closed");
        }
        closed
    }

    pub fn get(&self, id: SessionId) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn require(&self, id: SessionId) -> Result<Session> {
        self.get(id)
            .ok_or(RuntimeError::NotFound(Missing::Session(id)))
    }

    fn update(&self, id: SessionId, f: impl FnOnce(&mut Session)) -> Result<SessionToken> {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .get_mut(&id)
            .ok_or(RuntimeError::NotFound(Missing::Session(id)))?;
        f(session);
        session.generation = self.bump_generation();
        Ok(session.token())
    }

    pub fn select_character(&self, id: SessionId, character: EntityId) -> Result<SessionToken> {
        let token = self.update(id, |session| session.character = Some(character))?;
        debug!(target: "runtime::session", session = %id, character = %character, "character selected");
        Ok(token)
    }

    pub fn deselect_character(&self, id: SessionId) -> Result<SessionToken> {
        let token = self.update(id, |session| session.character = None)?;
        debug!(target: "runtime::session", session = %id, "character deselected");
        Ok(token)
    }

    /// Session currently playing `character`, if any.
    pub fn find_by_character(&self, character: EntityId) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|session| session.character == Some(character))
            .cloned()
    }

    /// The session still exists and has not changed selection since `token`.
    pub fn is_current(&self, token: &SessionToken) -> bool {
        self.get(token.session)
            .is_some_and(|session| session.generation == token.generation)
    }
}
