//! App Root Component
//!
//! Routing, the session provider and toasts.

use leptos::*;
use leptos_router::*;

use crate::components::{ProtectedRoute, Toast};
use crate::pages::{Dashboard, DashboardLayout, Login, Register};
use crate::state::{provide_global_state, AuthProvider};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    view! {
        <Router>
            <AuthProvider>
                <Routes>
                    <Route path="/" view=Login />
                    <Route path="/register" view=Register />
                    <Route path="/dashboard" view=ProtectedDashboard />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </AuthProvider>
            <Toast />
        </Router>
    }
}

#[component]
fn ProtectedDashboard() -> impl IntoView {
    view! {
        <ProtectedRoute>
            <DashboardLayout>
                <Dashboard />
            </DashboardLayout>
        </ProtectedRoute>
    }
}

/// 404 page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="min-h-screen flex flex-col items-center justify-center space-y-4">
            <h1 class="text-6xl font-bold text-slate-400">"404"</h1>
            <p class="text-xl text-slate-500">"Page not found"</p>
            <A href="/" class="px-4 py-2 bg-blue-600 text-white rounded-lg hover:bg-blue-700">
                "Back to Login"
            </A>
        </div>
    }
}
