//! Global Application State
//!
//! Notifications for login and registration outcomes.

use leptos::*;

/// Auth outcome shown as a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LoginFailed,
    RegistrationSucceeded,
    RegistrationFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::LoginFailed => "Login failed: Invalid email or password.",
            Notice::RegistrationSucceeded => "Registration successful! Redirecting to dashboard.",
            Notice::RegistrationFailed => "Registration failed. This email might already be in use.",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::RegistrationSucceeded)
    }

    /// Success toasts clear sooner since the page navigates away
    pub fn duration_ms(&self) -> u32 {
        if self.is_error() {
            5000
        } else {
            2000
        }
    }
}

/// A notice currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveNotice {
    pub id: u64,
    pub notice: Notice,
}

/// Provided once at the root; `Copy` so closures can capture it freely
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Oldest first
    pub notices: RwSignal<Vec<ActiveNotice>>,
    next_id: StoredValue<u64>,
}

pub fn provide_global_state() {
    provide_context(GlobalState {
        notices: create_rw_signal(Vec::new()),
        next_id: store_value(0),
    });
}

impl GlobalState {
    /// Show `notice` until it times out or is clicked away
    pub fn notify(&self, notice: Notice) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        // Repeating the same outcome replaces the earlier toast
        self.notices.update(|list| {
            list.retain(|n| n.notice != notice);
            list.push(ActiveNotice { id, notice });
        });

        let this = *self;
        gloo_timers::callback::Timeout::new(notice.duration_ms(), move || this.dismiss(id)).forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|list| list.retain(|n| n.id != id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_notice_kinds() {
        assert!(Notice::LoginFailed.is_error());
        assert!(Notice::RegistrationFailed.is_error());
        assert!(!Notice::RegistrationSucceeded.is_error());
        assert_eq!(Notice::LoginFailed.duration_ms(), 5000);
        assert_eq!(Notice::RegistrationSucceeded.duration_ms(), 2000);
        assert_eq!(
            Notice::RegistrationFailed.message(),
            "Registration failed. This email might already be in use."
        );
    }
}
