//! Protected Route
//!
//! Renders its children only for an authenticated session.

use leptos::*;
use leptos_router::Redirect;

use super::Loading;
use crate::state::use_auth;

/// Spinner while the session hydrates, redirect to `/` when logged out
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    move || {
        let snapshot = auth.snapshot.get();
        if snapshot.loading {
            view! { <Loading label="Loading" /> }.into_view()
        } else if !snapshot.is_authenticated {
            view! { <Redirect path="/" /> }.into_view()
        } else {
            children().into_view()
        }
    }
}
