//! BI Tool Dashboard
//!
//! Business-intelligence dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Login and registration against the credential service
//! - "Keep me logged in" persistence and idle auto-logout
//! - Indicator cards, canvas charts and a filterable "New Users" table
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Session and table state live in the `bi-tool` core crate;
//! this crate supplies browser storage, timers, HTTP and the views.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
