//! In-process home for live draft sessions.
//!
//! Each session sits behind its own mutex, so `apply_action` runs its read-validate-write as a
//! single critical section and readers only ever clone a fully applied state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use super::session::{ActionKind, AdvanceInfo, DraftId, DraftSession, Position};
use crate::error::AppError;
use crate::stats::HeroId;

type SharedSession = Arc<Mutex<DraftSession>>;

pub struct DraftRegistry {
    sessions: RwLock<HashMap<DraftId, SharedSession>>,
    next_id: AtomicU64,
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Registry whose next created draft gets `first_id`.
    pub fn starting_at(first_id: DraftId) -> Self {
        DraftRegistry {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(first_id),
        }
    }

    /// Create a session with the standard turn order and both teams empty.
    pub fn create(&self, name: impl Into<String>) -> Result<DraftSession, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let session = DraftSession::new(id, name);
        self.insert(session.clone())?;
        tracing::info!(draft = id, name = session.name(), "draft created");
        Ok(session)
    }

    /// Register a session loaded from storage, replacing any live copy with the same id.
    pub fn insert(&self, session: DraftSession) -> Result<(), AppError> {
        let id = session.id();
        let mut sessions = self.sessions.write().map_err(|_| AppError::LockPoisoned)?;
        sessions.insert(id, Arc::new(Mutex::new(session)));
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
        Ok(())
    }

    pub fn contains(&self, id: DraftId) -> bool {
        self.sessions
            .read()
            .map(|sessions| sessions.contains_key(&id))
            .unwrap_or(false)
    }

    fn handle(&self, id: DraftId) -> Result<SharedSession, AppError> {
        let sessions = self.sessions.read().map_err(|_| AppError::LockPoisoned)?;
        sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("draft {}", id)))
    }

    /// Consistent copy of the session.
    pub fn snapshot(&self, id: DraftId) -> Result<DraftSession, AppError> {
        let handle = self.handle(id)?;
        let session = handle.lock().map_err(|_| AppError::LockPoisoned)?;
        Ok(session.clone())
    }

    /// Apply one action atomically and return the resulting state for persistence.
    pub fn apply_action(
        &self,
        id: DraftId,
        kind: ActionKind,
        hero_id: HeroId,
        hero_name: impl Into<String>,
        position: Option<Position>,
    ) -> Result<(AdvanceInfo, DraftSession), AppError> {
        let handle = self.handle(id)?;
        let mut session = handle.lock().map_err(|_| AppError::LockPoisoned)?;
        let info = session.apply_action(kind, hero_id, hero_name, position)?;
        Ok((info, session.clone()))
    }

    pub fn add_note(&self, id: DraftId, content: impl Into<String>) -> Result<DraftSession, AppError> {
        let handle = self.handle(id)?;
        let mut session = handle.lock().map_err(|_| AppError::LockPoisoned)?;
        session.add_note(content);
        Ok(session.clone())
    }
}

impl Default for DraftRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionError;
    use std::thread;

    #[test]
    fn create_assigns_increasing_ids() {
        let registry = DraftRegistry::starting_at(7);
        let a = registry.create("a").unwrap();
        let b = registry.create("b").unwrap();
        assert_eq!((a.id(), b.id()), (7, 8));
        assert!(registry.contains(7));
    }

    #[test]
    fn insert_moves_the_id_counter_past_loaded_sessions() {
        let registry = DraftRegistry::new();
        registry.insert(DraftSession::new(41, "loaded")).unwrap();
        assert_eq!(registry.create("next").unwrap().id(), 42);
    }

    #[test]
    fn unknown_draft_is_not_found() {
        let registry = DraftRegistry::new();
        assert!(matches!(registry.snapshot(9), Err(AppError::NotFound(_))));
        let err = registry.apply_action(9, ActionKind::Ban, 1, "Miya", None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn protocol_errors_pass_through() {
        let registry = DraftRegistry::new();
        let id = registry.create("scrim").unwrap().id();
        let err = registry.apply_action(id, ActionKind::Pick, 1, "Miya", None).unwrap_err();
        assert!(matches!(
            err,
            AppError::Action(ActionError::WrongPhase { .. })
        ));
    }

    #[test]
    fn racing_callers_cannot_claim_the_same_hero_or_slot() {
        let registry = Arc::new(DraftRegistry::new());
        let id = registry.create("race").unwrap().id();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.apply_action(id, ActionKind::Ban, 5, "Nana", None))
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|r| r.is_ok())
            .count();

        assert_eq!(wins, 1);
        let session = registry.snapshot(id).unwrap();
        assert_eq!(session.current_turn_index(), 1);
        assert_eq!(session.all_bans(), vec![5]);
    }

    #[test]
    fn notes_are_appended() {
        let registry = DraftRegistry::new();
        let id = registry.create("notes").unwrap().id();
        registry.add_note(id, "first").unwrap();
        let session = registry.add_note(id, "second").unwrap();
        let notes: Vec<_> = session.notes().iter().map(|n| n.content.as_str()).collect();
        assert_eq!(notes, vec!["first", "second"]);
    }
}
