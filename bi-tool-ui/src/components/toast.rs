//! Toasts
//!
//! Stack of auth notices in the top-right corner, oldest on top.
//! Clicking a toast dismisses it.

use leptos::*;

use crate::state::global::{ActiveNotice, GlobalState};

#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="fixed top-4 right-4 z-50 flex flex-col space-y-2 w-80">
            <For
                each=move || state.notices.get()
                key=|active| active.id
                children=move |active: ActiveNotice| {
                    let accent = if active.notice.is_error() {
                        "border-l-red-500 text-red-700"
                    } else {
                        "border-l-green-500 text-green-700"
                    };
                    view! {
                        <div
                            role="alert"
                            class=format!(
                                "bg-white rounded border border-slate-200 border-l-4 shadow px-4 py-3 text-sm cursor-pointer {}",
                                accent
                            )
                            on:click=move |_| state.dismiss(active.id)
                        >
                            {active.notice.message()}
                        </div>
                    }
                }
            />
        </div>
    }
}
