//! Layout store - the single serialized owner of application state
//!
//! State changes only through [`LayoutStore::dispatch`]. Each dispatch runs
//! the middleware chain around the pure reducer, then notifies subscribers
//! with the new snapshot. A dispatch issued while another is being
//! processed (for example from inside a subscriber) is queued and applied
//! once the current round has finished, so every subscriber observes a
//! consistent snapshot before the next action starts.

pub mod middleware;
pub mod persistence;
pub mod scheduler;
pub mod thunks;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::events::EventBus;
use crate::messages::Action;
use crate::model::{AppState, PanelId, PanelType};
use crate::update::reduce;

pub use middleware::{
    EventBusMiddleware, LogSink, LoggingMiddleware, Middleware, NotificationMiddleware,
    NotificationSink, PersistenceMiddleware,
};
pub use persistence::{
    FileStorage, LayoutStorage, MemoryStorage, PersistedSnapshot, StorageError,
};
pub use scheduler::{Clock, ManualClock, Scheduler, SystemClock, Task, TaskId};

/// Handle returned by the subscribe methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<RefCell<dyn FnMut(&AppState)>>;

/// Resets the dispatching flag even if a subscriber panics
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct LayoutStore {
    state: RefCell<Rc<AppState>>,
    middleware: Vec<Rc<dyn Middleware>>,
    persistence: Option<Rc<PersistenceMiddleware>>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    queue: RefCell<VecDeque<Action>>,
    dispatching: Cell<bool>,
    events: Rc<EventBus>,
    clock: Rc<dyn Clock>,
    scheduler: Scheduler,
    next_notification: Cell<u64>,
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore")
            .field("panels", &self.state.borrow().panels.len())
            .field("subscribers", &self.subscribers.borrow().len())
            .field(
                "middleware",
                &self.middleware.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

pub struct LayoutStoreBuilder {
    state: AppState,
    events: Option<Rc<EventBus>>,
    clock: Option<Rc<dyn Clock>>,
    storage: Option<Box<dyn LayoutStorage>>,
    sink: Option<Rc<dyn NotificationSink>>,
    logging: bool,
}

impl LayoutStoreBuilder {
    pub fn state(mut self, state: AppState) -> Self {
        self.state = state;
        self
    }

    pub fn events(mut self, events: Rc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Enable persistence through `storage`
    pub fn storage(mut self, storage: impl LayoutStorage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn sink(mut self, sink: Rc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Override the action log (on by default in debug builds)
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    pub fn build(self) -> Rc<LayoutStore> {
        let events = self.events.unwrap_or_else(EventBus::new);
        let clock = self.clock.unwrap_or_else(|| Rc::new(SystemClock));
        let sink = self.sink.unwrap_or_else(|| Rc::new(LogSink));

        let mut chain: Vec<Rc<dyn Middleware>> = Vec::new();
        if self.logging {
            chain.push(Rc::new(LoggingMiddleware));
        }
        chain.push(Rc::new(EventBusMiddleware::new(events.clone())));
        chain.push(Rc::new(NotificationMiddleware::new(sink)));

        let persistence = self
            .storage
            .map(|storage| Rc::new(PersistenceMiddleware::new(storage, clock.clone())));
        if let Some(persistence) = &persistence {
            chain.push(persistence.clone());
        }

        Rc::new(LayoutStore {
            state: RefCell::new(Rc::new(self.state)),
            middleware: chain,
            persistence,
            subscribers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            queue: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
            events,
            clock,
            scheduler: Scheduler::new(),
            next_notification: Cell::new(1),
        })
    }
}

impl LayoutStore {
    pub fn builder() -> LayoutStoreBuilder {
        LayoutStoreBuilder {
            state: AppState::default(),
            events: None,
            clock: None,
            storage: None,
            sink: None,
            logging: cfg!(debug_assertions),
        }
    }

    /// In-memory store with default collaborators
    pub fn new() -> Rc<Self> {
        Self::builder().build()
    }

    // ========================================================================
    // State access
    // ========================================================================

    /// Current state snapshot
    pub fn state(&self) -> Rc<AppState> {
        self.state.borrow().clone()
    }

    pub fn events(&self) -> &Rc<EventBus> {
        &self.events
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Apply `action` and return the resulting state
    ///
    /// When called while another dispatch is in progress the action is
    /// queued, and the returned snapshot does not include it yet.
    pub fn dispatch(&self, action: Action) -> Rc<AppState> {
        self.queue.borrow_mut().push_back(action);
        if self.dispatching.get() {
            tracing::trace!(target: "store", "dispatch queued behind an active round");
            return self.state();
        }

        self.dispatching.set(true);
        let _guard = DispatchGuard(&self.dispatching);
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(action) = next else {
                break;
            };
            self.apply(action);
        }
        self.state()
    }

    fn apply(&self, action: Action) {
        let prev = self.state();
        for middleware in &self.middleware {
            middleware.before_reduce(&action, &prev);
        }

        let reduced = reduce(&prev, &action);
        let changed = reduced != *prev;
        let next = if changed { Rc::new(reduced) } else { prev.clone() };
        *self.state.borrow_mut() = next.clone();

        for middleware in &self.middleware {
            middleware.after_reduce(&action, &prev, &next);
        }

        if changed {
            self.notify_subscribers(&next);
        }
    }

    fn notify_subscribers(&self, state: &AppState) {
        let subscribers: Vec<(SubscriptionId, Subscriber)> = self.subscribers.borrow().clone();
        for (id, subscriber) in subscribers {
            // Skip anything unsubscribed earlier in this round
            if !self.subscribers.borrow().iter().any(|(s, _)| *s == id) {
                continue;
            }
            match subscriber.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(state),
                Err(_) => tracing::warn!(target: "store", "subscriber re-entered, skipping"),
            };
        }
    }

    /// Run a multi-step flow with access to dispatch and state
    pub fn dispatch_thunk<R>(&self, thunk: impl FnOnce(&LayoutStore) -> R) -> R {
        thunk(self)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Call `callback` after every state change
    pub fn subscribe(&self, callback: impl FnMut(&AppState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        let subscriber: Subscriber = Rc::new(RefCell::new(callback));
        self.subscribers.borrow_mut().push((id, subscriber));
        id
    }

    /// Call `callback` with the selected value whenever it changes
    pub fn subscribe_to_slice<T, S, F>(&self, selector: S, mut callback: F) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&AppState) -> T + 'static,
        F: FnMut(&T) + 'static,
    {
        let mut last = selector(&self.state());
        self.subscribe(move |state| {
            let value = selector(state);
            if value != last {
                callback(&value);
                last = value;
            }
        })
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(s, _)| *s != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    // ========================================================================
    // Deferred tasks
    // ========================================================================

    /// Run `task` once `delay_ms` have passed on the store clock
    pub fn schedule(&self, delay_ms: u64, task: impl FnOnce(&LayoutStore) + 'static) -> TaskId {
        self.scheduler
            .schedule(self.now_ms().saturating_add(delay_ms), Box::new(task))
    }

    pub fn cancel_task(&self, id: TaskId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Execute every task that is due; returns how many ran
    pub fn run_due_tasks(&self) -> usize {
        let due = self.scheduler.take_due(self.now_ms());
        let count = due.len();
        for task in due {
            task(self);
        }
        count
    }

    /// Due time of the next scheduled task, on the store clock
    pub fn next_task_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Fresh panel id of the form `<type>-<n>`
    pub fn next_panel_id(&self, panel_type: &PanelType) -> PanelId {
        let state = self.state();
        let mut n = state
            .panels
            .iter()
            .filter(|p| &p.panel_type == panel_type)
            .count()
            + 1;
        loop {
            let id = PanelId::new(format!("{panel_type}-{n}"));
            if !state.has_panel(&id) {
                return id;
            }
            n += 1;
        }
    }

    pub(crate) fn next_notification_id(&self) -> u64 {
        let id = self.next_notification.get();
        self.next_notification.set(id + 1);
        id
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Load the stored snapshot into the store
    ///
    /// Returns whether a snapshot was found. A read failure switches the
    /// store to in-memory only; a corrupt snapshot is ignored and the
    /// defaults are kept.
    pub fn hydrate(&self) -> bool {
        let Some(persistence) = &self.persistence else {
            return false;
        };
        match persistence.load() {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    target: "persistence",
                    panels = snapshot.panels.len(),
                    layouts = snapshot.layouts.len(),
                    "restoring saved state"
                );
                self.dispatch(snapshot.into_action());
                true
            }
            Ok(None) => false,
            Err(e @ StorageError::Parse(_)) => {
                tracing::warn!(target: "persistence", "{e}; starting with defaults");
                false
            }
            Err(e) => {
                persistence.degrade(&e);
                false
            }
        }
    }

    /// Write the current state immediately, bypassing auto-save
    pub fn persist_now(&self) -> Result<(), StorageError> {
        match &self.persistence {
            Some(persistence) => persistence.persist(&self.state()),
            None => Err(StorageError::Unavailable("no storage configured".into())),
        }
    }

    pub fn has_storage(&self) -> bool {
        self.persistence.is_some()
    }

    /// Whether automatic writes were disabled after a storage failure
    pub fn is_persistence_degraded(&self) -> bool {
        self.persistence.as_ref().is_some_and(|p| p.is_degraded())
    }

    /// Drop subscribers, pending tasks and event listeners
    pub fn shutdown(&self) {
        self.subscribers.borrow_mut().clear();
        self.scheduler.clear();
        self.queue.borrow_mut().clear();
        self.events.clear();
        tracing::debug!(target: "store", "store shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PanelConfig;

    #[test]
    fn test_dispatch_notifies_only_on_change() {
        let store = LayoutStore::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        store.subscribe(move |_| c.set(c.get() + 1));

        store.dispatch(Action::AddPanel(PanelConfig::new("a", "notes")));
        store.dispatch(Action::Unknown);
        store.dispatch(Action::RemovePanel { id: "ghost".into() });
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_slice_subscription_fires_on_value_change() {
        let store = LayoutStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        store.subscribe_to_slice(|state| state.panels.len(), move |n| s.borrow_mut().push(*n));

        store.dispatch(Action::AddPanel(PanelConfig::new("a", "notes")));
        store.dispatch(Action::ToggleSidebar);
        store.dispatch(Action::AddPanel(PanelConfig::new("b", "notes")));
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_reentrant_dispatch_is_queued() {
        let store = LayoutStore::new();
        let weak = Rc::downgrade(&store);
        let observed = Rc::new(RefCell::new(Vec::new()));
        let o = observed.clone();
        store.subscribe(move |state| {
            o.borrow_mut().push(state.panels.len());
            if state.panels.len() == 1 {
                if let Some(store) = weak.upgrade() {
                    let during = store.dispatch(Action::AddPanel(PanelConfig::new("b", "notes")));
                    // Not applied yet
                    assert_eq!(during.panels.len(), 1);
                }
            }
        });

        let after = store.dispatch(Action::AddPanel(PanelConfig::new("a", "notes")));
        assert_eq!(after.panels.len(), 2);
        assert_eq!(*observed.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_thunk_actions_enter_the_chain_one_by_one() {
        use crate::events::DeskEvent;

        let store = LayoutStore::new();
        let names = Rc::new(RefCell::new(Vec::new()));
        let sink = names.clone();
        store.events().on("store:action", move |e| {
            if let DeskEvent::ActionDispatched { action } = e {
                sink.borrow_mut().push(*action);
            }
        });

        let added = store.dispatch_thunk(|s| {
            assert!(names.borrow().is_empty());
            s.dispatch(Action::AddPanel(PanelConfig::new("a", "notes")));
            s.dispatch(Action::ToggleSidebar);
            s.state().panels.len()
        });
        assert_eq!(added, 1);
        assert_eq!(*names.borrow(), vec!["ADD_PANEL", "TOGGLE_SIDEBAR"]);
    }

    #[test]
    fn test_unsubscribe() {
        let store = LayoutStore::new();
        let id = store.subscribe(|_| {});
        assert_eq!(store.subscriber_count(), 1);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_next_panel_id_skips_taken() {
        let store = LayoutStore::new();
        store.dispatch(Action::AddPanel(PanelConfig::new("notes-2", "notes")));
        assert_eq!(store.next_panel_id(&"notes".into()).as_str(), "notes-3");
        assert_eq!(store.next_panel_id(&"dice".into()).as_str(), "dice-1");
    }

    #[test]
    fn test_scheduled_tasks_run_when_due() {
        let clock = Rc::new(ManualClock::new(0));
        let store = LayoutStore::builder().clock(clock.clone()).build();
        store.schedule(100, |s| {
            s.dispatch(Action::ToggleSidebar);
        });

        assert_eq!(store.run_due_tasks(), 0);
        clock.advance(100);
        assert_eq!(store.run_due_tasks(), 1);
        assert!(store.state().ui.sidebar_open);
    }
}
