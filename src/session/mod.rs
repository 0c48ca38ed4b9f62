//! Session Lifecycle
//!
//! Login, registration, "keep me logged in" persistence and idle auto-logout.
//! Platform specifics plug in through [`SessionStore`], [`Scheduler`],
//! [`Navigator`] and [`CredentialService`](crate::credentials::CredentialService).

mod manager;
mod store;
mod timer;
mod types;

#[cfg(feature = "native")]
mod file_store;
#[cfg(feature = "native")]
mod tokio_timer;

pub use manager::{ListenerId, SessionConfig, SessionManager, DEFAULT_IDLE_TIMEOUT};
pub use store::{MemoryStore, SessionStore, StoreError, CURRENT_USER_KEY, KEEP_LOGGED_IN_KEY};
pub use timer::{IdleTimer, ManualScheduler, ManualTimerHandle, Scheduler, TimerHandle};
pub use types::{Destination, Navigator, SessionSnapshot, SessionUser};

#[cfg(feature = "native")]
pub use file_store::FileStore;
#[cfg(feature = "native")]
pub use tokio_timer::{TokioScheduler, TokioTimerHandle};
