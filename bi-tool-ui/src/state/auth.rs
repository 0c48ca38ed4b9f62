//! Authentication Context
//!
//! Wraps the core [`SessionManager`] for the component tree: a reactive
//! snapshot signal, window activity listeners that reset the idle timer,
//! and router navigation on login, logout and expiry.

use bi_tool::session::{Destination, SessionConfig, SessionManager, SessionSnapshot, SessionUser};
use leptos::*;
use leptos_router::{use_navigate, NavigateOptions};

use super::storage::BrowserStorage;
use super::timer::BrowserScheduler;
use crate::api::{get_api_base, RemoteCredentials};

pub type BrowserSession = SessionManager<BrowserStorage, RemoteCredentials, BrowserScheduler>;

/// Session handle plus its reactive snapshot
#[derive(Clone)]
pub struct AuthContext {
    pub session: BrowserSession,
    pub snapshot: RwSignal<SessionSnapshot>,
}

impl AuthContext {
    pub fn user(&self) -> Option<SessionUser> {
        self.snapshot.with(|s| s.user.clone())
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext not found")
}

/// Owns the session for everything rendered inside it. Must sit inside
/// the `<Router>` so navigation works.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let navigate = use_navigate();
    let session = SessionManager::new(
        BrowserStorage::new(),
        RemoteCredentials::new(get_api_base()),
        BrowserScheduler,
        move |to: Destination| navigate(to.path(), NavigateOptions::default()),
        SessionConfig::default(),
    );

    let snapshot = create_rw_signal(session.snapshot());
    let listener = session.subscribe(move |s| snapshot.set(s.clone()));

    // Any of these counts as activity and restarts the idle countdown
    let handles = vec![
        {
            let session = session.clone();
            window_event_listener(ev::mousemove, move |_| session.record_activity())
        },
        {
            let session = session.clone();
            window_event_listener(ev::mousedown, move |_| session.record_activity())
        },
        {
            let session = session.clone();
            window_event_listener(ev::keydown, move |_| session.record_activity())
        },
        {
            let session = session.clone();
            window_event_listener(ev::scroll, move |_| session.record_activity())
        },
        {
            let session = session.clone();
            window_event_listener(ev::touchstart, move |_| session.record_activity())
        },
    ];

    session.initialize();

    let cleanup_session = session.clone();
    on_cleanup(move || {
        for handle in handles {
            handle.remove();
        }
        cleanup_session.unsubscribe(listener);
        cleanup_session.teardown();
    });

    provide_context(AuthContext { session, snapshot });

    children()
}
