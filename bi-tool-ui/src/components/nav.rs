//! Navigation Components
//!
//! App bar with drawer toggle and user menu, and the side drawer.

use leptos::*;
use leptos_router::*;

use crate::state::use_auth;

/// Top bar; the menu shows the user's name and email with a Logout button
#[component]
pub fn AppBar(drawer_open: RwSignal<bool>) -> impl IntoView {
    let auth = use_auth();
    let menu_open = create_rw_signal(false);

    let menu_auth = auth.clone();
    let logout_auth = auth.clone();

    view! {
        <header class="fixed top-0 left-0 right-0 h-16 bg-blue-600 text-white shadow z-40">
            <div class="flex items-center h-full px-4">
                <button
                    aria-label="open drawer"
                    class=move || if drawer_open.get() { "hidden" } else { "mr-4 text-xl" }
                    on:click=move |_| drawer_open.set(true)
                >
                    "☰"
                </button>

                <div class="flex-1" />

                <div class="relative flex items-center space-x-3">
                    <span class="text-lg">"🔔"</span>
                    <div class="w-8 h-8 rounded-full bg-blue-300 flex items-center justify-center text-sm font-semibold">
                        {move || initials(&auth.user().map(|u| u.full_name).unwrap_or_default())}
                    </div>
                    <button class="text-sm" on:click=move |_| menu_open.update(|o| *o = !*o)>
                        "▾"
                    </button>

                    {move || menu_open.get().then(|| {
                        let user = menu_auth.user();
                        let auth = logout_auth.clone();
                        view! {
                            <div class="absolute right-0 top-10 min-w-[200px] bg-white text-slate-700 rounded shadow-lg py-2">
                                <div class="px-4 py-1">
                                    <div class="text-sm font-semibold">
                                        {user.as_ref().map(|u| u.full_name.clone())}
                                    </div>
                                    <div class="text-xs opacity-80">
                                        {user.as_ref().map(|u| u.email.clone())}
                                    </div>
                                </div>
                                <hr class="my-2" />
                                <div class="px-4">
                                    <button
                                        class="w-full bg-blue-600 text-white rounded py-1"
                                        on:click=move |_| {
                                            menu_open.set(false);
                                            auth.logout();
                                        }
                                    >
                                        "Logout"
                                    </button>
                                </div>
                            </div>
                        }
                    })}
                </div>
            </div>
        </header>
    }
}

/// Collapsible left navigation
#[component]
pub fn SideDrawer(open: RwSignal<bool>) -> impl IntoView {
    let auth = use_auth();

    view! {
        <aside class=move || {
            let width = if open.get() { "w-60" } else { "w-16" };
            format!("fixed top-16 left-0 bottom-0 bg-white shadow z-30 transition-all {}", width)
        }>
            <div class="flex justify-end p-2">
                <button
                    class=move || if open.get() { "text-slate-500" } else { "hidden" }
                    on:click=move |_| open.set(false)
                >
                    "‹"
                </button>
            </div>
            <nav class="flex flex-col">
                <DrawerLink href="/dashboard" icon="📥" label="Dashboard" open=open />
                <DrawerLink href="/dashboard" icon="✉" label="Reports" open=open />
                <DrawerLink href="/dashboard" icon="⚙" label="Settings" open=open />
                <hr class="my-2" />
                <DrawerLink href="/dashboard" icon="👤" label="Profile" open=open />
                <DrawerLink href="/dashboard" icon="❓" label="Help" open=open />
                <hr class="my-2" />
                <button
                    class="flex items-center px-4 py-3 text-slate-600 hover:bg-slate-100"
                    on:click=move |_| auth.logout()
                >
                    <span class="w-8">"⎋"</span>
                    <span class=move || if open.get() { "" } else { "opacity-0" }>"Logout"</span>
                </button>
            </nav>
        </aside>
    }
}

#[component]
fn DrawerLink(
    href: &'static str,
    icon: &'static str,
    label: &'static str,
    open: RwSignal<bool>,
) -> impl IntoView {
    view! {
        <A href=href class="flex items-center px-4 py-3 text-slate-600 hover:bg-slate-100">
            <span class="w-8">{icon}</span>
            <span class=move || if open.get() { "" } else { "opacity-0" }>{label}</span>
        </A>
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_initials() {
        assert_eq!(initials("Jane Smith"), "JS");
        assert_eq!(initials("alice"), "A");
        assert_eq!(initials("Mary Ann Lee"), "MA");
        assert_eq!(initials(""), "");
    }
}
