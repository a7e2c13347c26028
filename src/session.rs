//! Short-lived per-player interaction sessions.
//!
//! A session exists per (player, category). Its presence within the
//! timeout window is what turns a repeated contact into a continuation
//! instead of a fresh menu; its expiry is what makes the cooldown gate
//! correct without per-session timers.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;

use crate::types::{ActorId, Category};

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSession {
    pub player: String,
    pub actor: ActorId,
    pub category: Category,
    pub started_at: DateTime<Utc>,
    pub last_interaction_at: DateTime<Utc>,
}

/// The session table. All times are passed in by the caller; the table
/// never reads the wall clock, so expiry is fully testable.
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<(String, Category), InteractionSession>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or refresh the session for (player, category). A contact
    /// with a different actor of the same category replaces the session.
    pub fn touch(
        &mut self,
        player: &str,
        actor: ActorId,
        category: Category,
        now: DateTime<Utc>,
    ) {
        let key = (player.to_string(), category);
        match self.sessions.get_mut(&key) {
            Some(session) if session.actor == actor => {
                session.last_interaction_at = now;
            }
            _ => {
                self.sessions.insert(
                    key,
                    InteractionSession {
                        player: player.to_string(),
                        actor,
                        category,
                        started_at: now,
                        last_interaction_at: now,
                    },
                );
            }
        }
    }

    pub fn get(&self, player: &str, category: Category) -> Option<&InteractionSession> {
        self.sessions.get(&(player.to_string(), category))
    }

    /// Whether a live (unexpired) session exists for this player, category
    /// and actor.
    pub fn is_live(
        &self,
        player: &str,
        category: Category,
        actor: ActorId,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> bool {
        self.get(player, category).is_some_and(|session| {
            session.actor == actor && now - session.last_interaction_at <= timeout
        })
    }

    /// Sweep sessions older than the timeout. Returns the number removed.
    pub fn expire(&mut self, now: DateTime<Utc>, timeout: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now - session.last_interaction_at <= timeout);
        let removed = before - self.sessions.len();
        if removed > 0 {
            debug!("sessions: swept {} expired", removed);
        }
        removed
    }

    /// Drop every session the player holds. Called on disconnect.
    pub fn remove_on_disconnect(&mut self, player: &str) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|(p, _), _| p != player);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
