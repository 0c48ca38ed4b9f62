//! Session Manager
//!
//! Owns the authenticated user, the "keep me logged in" preference, the
//! loading flag and the idle timer. Every mutation writes storage first and
//! memory second so `is_authenticated()` (a storage read) and `user()` agree.
//!
//! The manager is a cheap `Rc` handle. Timer callbacks hold only a weak
//! reference, so dropping the last handle cancels the timer.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::store::{SessionStore, CURRENT_USER_KEY, KEEP_LOGGED_IN_KEY};
use super::timer::{IdleTimer, Scheduler};
use super::types::{Destination, Navigator, SessionSnapshot, SessionUser};
use crate::credentials::{CredentialError, CredentialService, NewUser};

/// Idle period after which a non-persistent session is logged out
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Session policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

/// Returned by [`SessionManager::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&SessionSnapshot)>;

struct SessionState<H: super::timer::TimerHandle> {
    user: Option<SessionUser>,
    keep_logged_in: bool,
    loading: bool,
    initialized: bool,
    torn_down: bool,
    timer: IdleTimer<H>,
}

struct Inner<St, C, Sch: Scheduler> {
    state: RefCell<SessionState<Sch::Handle>>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_listener: RefCell<u64>,
    store: St,
    credentials: C,
    scheduler: Sch,
    navigator: Box<dyn Navigator>,
    config: SessionConfig,
}

/// Client-side session lifecycle
pub struct SessionManager<St, C, Sch: Scheduler> {
    inner: Rc<Inner<St, C, Sch>>,
}

impl<St, C, Sch: Scheduler> Clone for SessionManager<St, C, Sch> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

fn bool_item(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl<St, C, Sch> SessionManager<St, C, Sch>
where
    St: SessionStore + 'static,
    C: CredentialService + 'static,
    Sch: Scheduler + 'static,
{
    pub fn new(
        store: St,
        credentials: C,
        scheduler: Sch,
        navigator: impl Navigator + 'static,
        config: SessionConfig,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(SessionState {
                    user: None,
                    keep_logged_in: false,
                    loading: true,
                    initialized: false,
                    torn_down: false,
                    timer: IdleTimer::new(),
                }),
                listeners: RefCell::new(Vec::new()),
                next_listener: RefCell::new(0),
                store,
                credentials,
                scheduler,
                navigator: Box::new(navigator),
                config,
            }),
        }
    }

    // ---- accessors ----

    pub fn user(&self) -> Option<SessionUser> {
        self.inner.state.borrow().user.clone()
    }

    pub fn keep_logged_in(&self) -> bool {
        self.inner.state.borrow().keep_logged_in
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.state.borrow().initialized
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.state.borrow().torn_down
    }

    pub fn timer_armed(&self) -> bool {
        self.inner.state.borrow().timer.is_armed()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &St {
        &self.inner.store
    }

    pub fn credentials(&self) -> &C {
        &self.inner.credentials
    }

    /// True iff a user is persisted in storage
    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.inner.store.get_item(CURRENT_USER_KEY),
            Ok(Some(raw)) if !raw.is_empty()
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let is_authenticated = self.is_authenticated();
        let state = self.inner.state.borrow();
        SessionSnapshot {
            user: state.user.clone(),
            keep_logged_in: state.keep_logged_in,
            loading: state.loading,
            is_authenticated,
        }
    }

    // ---- listeners ----

    pub fn subscribe(&self, listener: impl Fn(&SessionSnapshot) + 'static) -> ListenerId {
        let id = {
            let mut next = self.inner.next_listener.borrow_mut();
            *next += 1;
            ListenerId(*next)
        };
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.inner.listeners.borrow_mut().retain(|(l, _)| *l != id);
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn navigate(&self, destination: Destination) {
        debug!(path = destination.path(), "Navigating");
        self.inner.navigator.navigate(destination);
    }

    fn set_loading(&self, loading: bool) {
        self.inner.state.borrow_mut().loading = loading;
        self.notify();
    }

    // ---- storage ----

    fn read_keep_logged_in(&self) -> bool {
        match self.inner.store.get_item(KEEP_LOGGED_IN_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "Failed to read keepLoggedIn");
                false
            }
        }
    }

    /// Stored user, or `None` when absent, unreadable or malformed.
    /// Malformed data is removed.
    fn read_stored_user(&self) -> Option<SessionUser> {
        let raw = match self.inner.store.get_item(CURRENT_USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                return None;
            }
        };

        match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Discarding malformed stored session");
                if let Err(e) = self.inner.store.remove_item(CURRENT_USER_KEY) {
                    warn!(error = %e, "Failed to remove malformed session");
                }
                None
            }
        }
    }

    /// Write user and preference to storage, then memory. On a storage
    /// failure nothing in memory changes and storage is restored.
    fn establish(&self, user: SessionUser, keep_logged_in: bool) -> bool {
        let raw = match serde_json::to_string(&user) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize session");
                return false;
            }
        };

        let store = &self.inner.store;
        let previous = store.get_item(CURRENT_USER_KEY).ok().flatten();
        if let Err(e) = store.set_item(CURRENT_USER_KEY, &raw) {
            warn!(error = %e, "Failed to persist session");
            return false;
        }
        if let Err(e) = store.set_item(KEEP_LOGGED_IN_KEY, bool_item(keep_logged_in)) {
            warn!(error = %e, "Failed to persist keepLoggedIn");
            let restored = match previous {
                Some(previous) => store.set_item(CURRENT_USER_KEY, &previous),
                None => store.remove_item(CURRENT_USER_KEY),
            };
            if let Err(e) = restored {
                warn!(error = %e, "Failed to restore previous session");
            }
            return false;
        }

        {
            let mut state = self.inner.state.borrow_mut();
            state.user = Some(user);
            state.keep_logged_in = keep_logged_in;
        }
        self.refresh_timer();
        true
    }

    fn clear_session(&self) -> bool {
        let store = &self.inner.store;
        if let Err(e) = store.remove_item(CURRENT_USER_KEY) {
            warn!(error = %e, "Failed to remove stored session");
        }
        if let Err(e) = store.set_item(KEEP_LOGGED_IN_KEY, bool_item(false)) {
            warn!(error = %e, "Failed to reset keepLoggedIn");
        }

        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let changed = state.user.is_some() || state.keep_logged_in;
            state.user = None;
            state.keep_logged_in = false;
            changed
        };
        self.disarm();
        changed
    }

    // ---- idle timer ----

    fn refresh_timer(&self) {
        let should_arm = {
            let state = self.inner.state.borrow();
            !state.torn_down && state.user.is_some() && !state.keep_logged_in
        };
        if should_arm && self.is_authenticated() {
            self.arm();
        } else {
            self.disarm();
        }
    }

    fn arm(&self) {
        let generation = self.inner.state.borrow_mut().timer.begin_arm();
        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            self.inner.config.idle_timeout,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    SessionManager { inner }.expire(generation);
                }
            }),
        );
        self.inner.state.borrow_mut().timer.set_handle(handle);
        debug!(
            generation,
            timeout_secs = self.inner.config.idle_timeout.as_secs(),
            "Idle timer armed"
        );
    }

    fn disarm(&self) {
        if self.inner.state.borrow_mut().timer.disarm() {
            debug!("Idle timer cancelled");
        }
    }

    fn expire(&self, generation: u64) {
        {
            let state = self.inner.state.borrow();
            if state.torn_down || !state.timer.is_current(generation) {
                debug!(generation, "Ignoring stale idle timer");
                return;
            }
        }

        info!("Session expired after inactivity");
        self.clear_session();
        self.notify();
        self.navigate(Destination::Public);
    }

    // ---- lifecycle ----

    /// Hydrate from storage. Runs once; later calls are ignored.
    pub fn initialize(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.initialized {
                debug!("Session already initialized");
                return;
            }
            state.initialized = true;
        }

        let keep_logged_in = self.read_keep_logged_in();
        let user = self.read_stored_user();
        let restored = user.is_some();
        {
            let mut state = self.inner.state.borrow_mut();
            state.user = user;
            state.keep_logged_in = keep_logged_in;
            state.loading = false;
        }
        self.refresh_timer();

        info!(restored, keep_logged_in, "Session initialized");
        self.notify();
    }

    /// Verify credentials and start a session. Returns whether it succeeded.
    pub async fn login(&self, email: &str, password: &str, keep_logged_in: bool) -> bool {
        if self.is_torn_down() {
            return false;
        }

        self.set_loading(true);
        let success = match self.inner.credentials.authenticate(email, password).await {
            Ok(Some(user)) => self.establish(user, keep_logged_in),
            Ok(None) => {
                info!(email, "Login rejected: invalid email or password");
                false
            }
            Err(e) => {
                warn!(email, error = %e, "Login failed");
                false
            }
        };
        self.set_loading(false);

        if success {
            info!(email, keep_logged_in, "User logged in");
            self.navigate(Destination::Protected);
        }
        success
    }

    /// Create an account, then log into it without "keep me logged in".
    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> bool {
        if self.is_torn_down() {
            return false;
        }

        self.set_loading(true);
        let new_user = NewUser::new(email, password, full_name);
        let success = match self.inner.credentials.create_user(&new_user).await {
            Ok(record) => {
                info!(email, id = ?record.id, "Account created");
                match self.inner.credentials.authenticate(email, password).await {
                    Ok(Some(user)) => self.establish(user, false),
                    Ok(None) => {
                        warn!(email, "New account could not be verified");
                        false
                    }
                    Err(e) => {
                        warn!(email, error = %e, "Login after registration failed");
                        false
                    }
                }
            }
            Err(CredentialError::Conflict) => {
                info!(email, "Registration rejected: email already in use");
                false
            }
            Err(e) => {
                warn!(email, error = %e, "Registration failed");
                false
            }
        };
        self.set_loading(false);

        if success {
            self.navigate(Destination::Protected);
        }
        success
    }

    pub fn logout(&self) {
        if self.clear_session() {
            info!("User logged out");
            self.notify();
        }
        self.navigate(Destination::Public);
    }

    /// Tracked user activity: restart the idle countdown if it applies.
    pub fn record_activity(&self) {
        if self.is_torn_down() {
            return;
        }
        self.refresh_timer();
    }

    pub fn set_keep_logged_in(&self, keep_logged_in: bool) {
        if let Err(e) = self
            .inner
            .store
            .set_item(KEEP_LOGGED_IN_KEY, bool_item(keep_logged_in))
        {
            warn!(error = %e, "Failed to persist keepLoggedIn");
        }
        self.inner.state.borrow_mut().keep_logged_in = keep_logged_in;
        self.refresh_timer();
        self.notify();
    }

    /// Stop the timer for good; later firings are ignored.
    pub fn teardown(&self) {
        self.inner.state.borrow_mut().torn_down = true;
        self.disarm();
        debug!("Session torn down");
    }
}
