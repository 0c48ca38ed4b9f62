//! Loading Component

use leptos::*;

/// Full-page loading spinner
#[component]
pub fn Loading(
    #[prop(optional, into)]
    label: Option<String>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-screen">
            <div class="loading-spinner w-8 h-8 mb-2" />
            {label.map(|l| view! { <span class="text-lg text-slate-500">{l}</span> })}
        </div>
    }
}
