//! Store middleware
//!
//! Thunks run before the chain: [`LayoutStore::dispatch_thunk`](super::LayoutStore::dispatch_thunk)
//! calls them directly and only the plain actions they dispatch enter it.
//!
//! Every plain action then passes through, in order: logging (debug
//! builds), event-bus emission, the reducer, notification forwarding,
//! persistence.

use std::cell::Cell;
use std::rc::Rc;

use crate::events::{DeskEvent, EventBus};
use crate::messages::Action;
use crate::model::{AppState, NotificationKind, NotificationRequest};

use super::persistence::{whitelisted_changed, LayoutStorage, PersistedSnapshot, StorageError};
use super::scheduler::Clock;

pub trait Middleware {
    fn name(&self) -> &'static str;

    /// Runs before the reducer sees `action`
    fn before_reduce(&self, _action: &Action, _state: &AppState) {}

    /// Runs after the reducer produced `next`
    fn after_reduce(&self, _action: &Action, _prev: &AppState, _next: &AppState) {}
}

// ============================================================================
// Logging
// ============================================================================

/// Action log, installed only in debug builds
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn before_reduce(&self, action: &Action, state: &AppState) {
        tracing::debug!(
            target: "store",
            action = action.name(),
            panels = state.panels.len(),
            "dispatch"
        );
    }

    fn after_reduce(&self, action: &Action, prev: &AppState, next: &AppState) {
        if prev == next {
            tracing::trace!(target: "store", action = action.name(), "no state change");
        } else {
            tracing::debug!(
                target: "store",
                action = action.name(),
                panels = next.panels.len(),
                active = ?next.ui.active_panel,
                "state changed"
            );
        }
    }
}

// ============================================================================
// Event bus emission
// ============================================================================

#[derive(Debug)]
pub struct EventBusMiddleware {
    bus: Rc<EventBus>,
}

impl EventBusMiddleware {
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self { bus }
    }
}

impl Middleware for EventBusMiddleware {
    fn name(&self) -> &'static str {
        "events"
    }

    fn before_reduce(&self, action: &Action, _state: &AppState) {
        self.bus.emit(DeskEvent::ActionDispatched {
            action: action.name(),
        });
    }
}

// ============================================================================
// Notification forwarding
// ============================================================================

/// External consumer of user-facing notifications
pub trait NotificationSink {
    fn notify(&self, request: &NotificationRequest);
}

/// Sink that writes notifications to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, request: &NotificationRequest) {
        match request.kind {
            NotificationKind::Error => {
                tracing::error!(target: "notify", title = %request.title, "{}", request.message)
            }
            NotificationKind::Warning => {
                tracing::warn!(target: "notify", title = %request.title, "{}", request.message)
            }
            NotificationKind::Info | NotificationKind::Success => {
                tracing::info!(target: "notify", title = %request.title, "{}", request.message)
            }
        }
    }
}

pub struct NotificationMiddleware {
    sink: Rc<dyn NotificationSink>,
}

impl NotificationMiddleware {
    pub fn new(sink: Rc<dyn NotificationSink>) -> Self {
        Self { sink }
    }
}

impl Middleware for NotificationMiddleware {
    fn name(&self) -> &'static str {
        "notifications"
    }

    fn after_reduce(&self, action: &Action, prev: &AppState, next: &AppState) {
        let Action::AddNotification(notification) = action else {
            return;
        };
        let added = !prev.notifications.iter().any(|n| n.id == notification.id)
            && next.notifications.iter().any(|n| n.id == notification.id);
        if added {
            self.sink.notify(&NotificationRequest::from(notification));
        }
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// Writes the whitelisted slices after every commit that changed them
///
/// Writing is skipped while `settings.auto_save` is off. The first failed
/// write switches the store to in-memory only for the rest of the session.
pub struct PersistenceMiddleware {
    storage: Box<dyn LayoutStorage>,
    clock: Rc<dyn Clock>,
    degraded: Cell<bool>,
    writes: Cell<u64>,
}

impl PersistenceMiddleware {
    pub fn new(storage: Box<dyn LayoutStorage>, clock: Rc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            degraded: Cell::new(false),
            writes: Cell::new(0),
        }
    }

    /// Read the stored snapshot, if there is one
    pub fn load(&self) -> Result<Option<PersistedSnapshot>, StorageError> {
        match self.storage.read()? {
            Some(json) => PersistedSnapshot::from_json(&json).map(Some),
            None => Ok(None),
        }
    }

    /// Write `state` now, regardless of auto-save or degraded mode
    pub fn persist(&self, state: &AppState) -> Result<(), StorageError> {
        let snapshot = PersistedSnapshot::from_state(state, self.clock.now_ms());
        self.storage.write(&snapshot.to_json()?)?;
        self.writes.set(self.writes.get() + 1);
        tracing::debug!(
            target: "persistence",
            location = %self.storage.describe(),
            panels = state.panels.len(),
            "snapshot written"
        );
        Ok(())
    }

    /// Stop automatic writes for the rest of the session
    pub fn degrade(&self, error: &StorageError) {
        if !self.degraded.replace(true) {
            tracing::error!(
                target: "persistence",
                location = %self.storage.describe(),
                "{error}; continuing with in-memory state only"
            );
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    pub fn write_count(&self) -> u64 {
        self.writes.get()
    }
}

impl Middleware for PersistenceMiddleware {
    fn name(&self) -> &'static str {
        "persistence"
    }

    fn after_reduce(&self, _action: &Action, prev: &AppState, next: &AppState) {
        if self.is_degraded() || !next.settings.auto_save || !whitelisted_changed(prev, next) {
            return;
        }
        if let Err(e) = self.persist(next) {
            self.degrade(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Notification, PanelConfig};
    use crate::store::persistence::MemoryStorage;
    use crate::store::scheduler::ManualClock;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<NotificationRequest>>);

    impl NotificationSink for Recorder {
        fn notify(&self, request: &NotificationRequest) {
            self.0.borrow_mut().push(request.clone());
        }
    }

    fn with_panel() -> AppState {
        let mut state = AppState::new();
        state.panels.push(PanelConfig::new("a", "notes"));
        state
    }

    #[test]
    fn test_persistence_skips_unchanged_and_disabled() {
        let storage = MemoryStorage::new();
        let persistence =
            PersistenceMiddleware::new(Box::new(storage.clone()), Rc::new(ManualClock::new(0)));

        let prev = AppState::new();
        let next = with_panel();
        persistence.after_reduce(&Action::Unknown, &prev, &prev);
        assert_eq!(storage.writes(), 0);

        persistence.after_reduce(&Action::Unknown, &prev, &next);
        assert_eq!(storage.writes(), 1);

        let mut off = next.clone();
        off.settings.auto_save = false;
        off.panels.clear();
        persistence.after_reduce(&Action::Unknown, &next, &off);
        assert_eq!(storage.writes(), 1);
    }

    #[test]
    fn test_persistence_degrades_after_failure() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let persistence =
            PersistenceMiddleware::new(Box::new(storage.clone()), Rc::new(ManualClock::new(0)));

        persistence.after_reduce(&Action::Unknown, &AppState::new(), &with_panel());
        assert!(persistence.is_degraded());

        storage.set_fail_writes(false);
        persistence.after_reduce(&Action::Unknown, &with_panel(), &AppState::new());
        assert_eq!(storage.writes(), 0);
        assert!(persistence.persist(&AppState::new()).is_ok());
        assert_eq!(storage.writes(), 1);
    }

    #[test]
    fn test_notification_forwarded_once() {
        let recorder = Rc::new(Recorder::default());
        let middleware = NotificationMiddleware::new(recorder.clone());
        let notification = Notification {
            id: 1,
            kind: NotificationKind::Warning,
            title: "Limit".into(),
            message: "Too many panels".into(),
            duration: 3000,
            timestamp: 0,
        };
        let prev = AppState::new();
        let mut next = prev.clone();
        next.notifications.push(notification.clone());
        let action = Action::AddNotification(notification);

        middleware.after_reduce(&action, &prev, &next);
        middleware.after_reduce(&action, &next, &next);

        let seen = recorder.0.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, NotificationKind::Warning);
        assert_eq!(seen[0].title, "Limit");
    }
}
