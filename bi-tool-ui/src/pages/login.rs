//! Login Page
//!
//! Email/password form with "Keep me logged in". Errors show once a field
//! has been touched; submit stays disabled while the form is untouched,
//! invalid or in flight.

use bi_tool::validation::{Field, LoginForm, ValidationErrors};
use leptos::*;
use leptos_router::*;

use crate::state::{use_auth, GlobalState, Notice};

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_context::<GlobalState>().expect("GlobalState not found");

    let form = create_rw_signal(LoginForm::default());
    let touched = create_rw_signal(Vec::<Field>::new());
    let (show_password, set_show_password) = create_signal(false);
    let (submitting, set_submitting) = create_signal(false);

    let errors = create_memo(move |_| form.with(|f| f.validate().err()));
    let dirty = create_memo(move |_| form.with(|f| *f != LoginForm::default()));
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if errors.get_untracked().is_some() {
            touched.set(vec![Field::Email, Field::Password]);
            return;
        }
        if submitting.get_untracked() {
            return;
        }

        let values = form.get_untracked();
        let session = auth.session.clone();
        set_submitting.set(true);
        spawn_local(async move {
            let success = session
                .login(&values.email, &values.password, values.keep_logged_in)
                .await;
            if !success {
                web_sys::console::error_1(&format!("Login failed for {}", values.email).into());
                toasts.notify(Notice::LoginFailed);
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center px-4">
            <div class="w-full max-w-md bg-white rounded-xl shadow-lg p-8">
                <h1 class="text-2xl font-bold text-center text-slate-700 mb-6">"Login to BI Tool"</h1>

                <form on:submit=on_submit novalidate=true class="space-y-4">
                    <div>
                        <label class="block text-sm text-slate-600 mb-1" for="email">"Email Address"</label>
                        <input
                            id="email"
                            type="email"
                            autocomplete="email"
                            class="w-full border border-slate-300 rounded px-3 py-2"
                            prop:value=move || form.with(|f| f.email.clone())
                            on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                            on:blur=move |_| touch(touched, Field::Email)
                        />
                        <FieldError message=field_error(touched, errors, Field::Email) />
                    </div>

                    <div>
                        <label class="block text-sm text-slate-600 mb-1" for="password">"Password"</label>
                        <div class="flex">
                            <input
                                id="password"
                                type=move || if show_password.get() { "text" } else { "password" }
                                autocomplete="current-password"
                                class="flex-1 border border-slate-300 rounded-l px-3 py-2"
                                prop:value=move || form.with(|f| f.password.clone())
                                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                                on:blur=move |_| touch(touched, Field::Password)
                            />
                            <button
                                type="button"
                                aria-label="toggle password visibility"
                                class="border border-l-0 border-slate-300 rounded-r px-3"
                                on:click=move |_| set_show_password.update(|s| *s = !*s)
                            >
                                {move || if show_password.get() { "Hide" } else { "Show" }}
                            </button>
                        </div>
                        <FieldError message=field_error(touched, errors, Field::Password) />
                    </div>

                    <label class="flex items-center space-x-2 text-sm text-slate-600">
                        <input
                            type="checkbox"
                            prop:checked=move || form.with(|f| f.keep_logged_in)
                            on:change=move |ev| form.update(|f| f.keep_logged_in = event_target_checked(&ev))
                        />
                        <span>"Keep me logged in"</span>
                    </label>

                    <SubmitButton
                        label="Login"
                        submitting=submitting.into()
                        disabled=Signal::derive(move || !dirty.get() || errors.with(|e| e.is_some()) || submitting.get())
                    />
                </form>

                <p class="text-center text-sm text-slate-500 mt-6">
                    "Don't have an account? "
                    <A href="/register" class="text-blue-600 hover:underline">"Register"</A>
                </p>
            </div>
        </div>
    }
}

/// Error for `field`, shown only after the field lost focus once
pub(super) fn field_error(
    touched: RwSignal<Vec<Field>>,
    errors: Memo<Option<ValidationErrors>>,
    field: Field,
) -> Signal<Option<&'static str>> {
    Signal::derive(move || {
        if !touched.with(|t| t.contains(&field)) {
            return None;
        }
        errors.with(|e| e.as_ref().and_then(|e| e.get(field)))
    })
}

pub(super) fn touch(touched: RwSignal<Vec<Field>>, field: Field) {
    touched.update(|t| {
        if !t.contains(&field) {
            t.push(field);
        }
    });
}

#[component]
pub fn FieldError(message: Signal<Option<&'static str>>) -> impl IntoView {
    move || message.get().map(|m| view! { <p class="text-xs text-red-600 mt-1">{m}</p> })
}

#[component]
pub fn SubmitButton(
    label: &'static str,
    submitting: Signal<bool>,
    disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <button
            type="submit"
            disabled=move || disabled.get()
            class="w-full bg-blue-600 hover:bg-blue-700 disabled:bg-slate-400 disabled:cursor-not-allowed
                   text-white rounded-lg py-3 font-semibold flex items-center justify-center space-x-2"
        >
            {move || if submitting.get() {
                view! { <div class="loading-spinner w-5 h-5" /> }.into_view()
            } else {
                view! { <span>{label}</span> }.into_view()
            }}
        </button>
    }
}
