//! Register Page
//!
//! Creates an account and logs straight into it.

use bi_tool::validation::{Field, RegisterForm};
use leptos::*;
use leptos_router::*;

use super::login::{field_error, touch, FieldError, SubmitButton};
use crate::state::{use_auth, GlobalState, Notice};

const ALL_FIELDS: [Field; 4] = [
    Field::FullName,
    Field::Email,
    Field::Password,
    Field::ConfirmPassword,
];

#[component]
pub fn Register() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_context::<GlobalState>().expect("GlobalState not found");

    let form = create_rw_signal(RegisterForm::default());
    let touched = create_rw_signal(Vec::<Field>::new());
    let (submitting, set_submitting) = create_signal(false);

    let errors = create_memo(move |_| form.with(|f| f.validate().err()));
    let dirty = create_memo(move |_| form.with(|f| *f != RegisterForm::default()));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if errors.get_untracked().is_some() {
            touched.set(ALL_FIELDS.to_vec());
            return;
        }
        if submitting.get_untracked() {
            return;
        }

        let values = form.get_untracked();
        let session = auth.session.clone();
        set_submitting.set(true);
        spawn_local(async move {
            if session
                .register(&values.email, &values.password, &values.full_name)
                .await
            {
                toasts.notify(Notice::RegistrationSucceeded);
            } else {
                web_sys::console::error_1(&format!("Registration failed for {}", values.email).into());
                toasts.notify(Notice::RegistrationFailed);
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center px-4">
            <div class="w-full max-w-md bg-white rounded-xl shadow-lg p-8">
                <h1 class="text-2xl font-bold text-center text-slate-700 mb-6">"Create an Account"</h1>

                <form on:submit=on_submit novalidate=true class="space-y-4">
                    <TextField
                        id="fullName"
                        label="Full Name"
                        input_type="text"
                        autocomplete="name"
                        value=Signal::derive(move || form.with(|f| f.full_name.clone()))
                        on_input=Callback::new(move |v: String| form.update(|f| f.full_name = v))
                        on_blur=Callback::new(move |_: ()| touch(touched, Field::FullName))
                        error=field_error(touched, errors, Field::FullName)
                    />
                    <TextField
                        id="email"
                        label="Email Address"
                        input_type="email"
                        autocomplete="email"
                        value=Signal::derive(move || form.with(|f| f.email.clone()))
                        on_input=Callback::new(move |v: String| form.update(|f| f.email = v))
                        on_blur=Callback::new(move |_: ()| touch(touched, Field::Email))
                        error=field_error(touched, errors, Field::Email)
                    />
                    <TextField
                        id="password"
                        label="Password"
                        input_type="password"
                        autocomplete="new-password"
                        value=Signal::derive(move || form.with(|f| f.password.clone()))
                        on_input=Callback::new(move |v: String| form.update(|f| f.password = v))
                        on_blur=Callback::new(move |_: ()| touch(touched, Field::Password))
                        error=field_error(touched, errors, Field::Password)
                    />
                    <TextField
                        id="confirmPassword"
                        label="Confirm Password"
                        input_type="password"
                        autocomplete="new-password"
                        value=Signal::derive(move || form.with(|f| f.confirm_password.clone()))
                        on_input=Callback::new(move |v: String| form.update(|f| f.confirm_password = v))
                        on_blur=Callback::new(move |_: ()| touch(touched, Field::ConfirmPassword))
                        error=field_error(touched, errors, Field::ConfirmPassword)
                    />

                    <SubmitButton
                        label="Register"
                        submitting=submitting.into()
                        disabled=Signal::derive(move || !dirty.get() || errors.with(|e| e.is_some()) || submitting.get())
                    />
                </form>

                <p class="text-center text-sm text-slate-500 mt-6">
                    "Already have an account? "
                    <A href="/" class="text-blue-600 hover:underline">"Login"</A>
                </p>
            </div>
        </div>
    }
}

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    input_type: &'static str,
    autocomplete: &'static str,
    value: Signal<String>,
    on_input: Callback<String>,
    on_blur: Callback<()>,
    error: Signal<Option<&'static str>>,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-slate-600 mb-1" for=id>{label}</label>
            <input
                id=id
                type=input_type
                autocomplete=autocomplete
                class="w-full border border-slate-300 rounded px-3 py-2"
                prop:value=move || value.get()
                on:input=move |ev| on_input.call(event_target_value(&ev))
                on:blur=move |_| on_blur.call(())
            />
            <FieldError message=error />
        </div>
    }
}
