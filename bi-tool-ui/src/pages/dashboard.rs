//! Dashboard Page
//!
//! Welcome banner, indicator cards, the "New Users" table and the three
//! charts, framed by the app bar and side drawer.

use bi_tool::dashboard::{self, ChartHeadline};
use leptos::*;

use crate::components::{
    AppBar, BarChart, DataTable, IndicatorCard, LineChart, PieChart, SideDrawer,
};
use crate::state::use_auth;

/// App bar, drawer and the content column beside them
#[component]
pub fn DashboardLayout(children: Children) -> impl IntoView {
    let drawer_open = create_rw_signal(true);

    view! {
        <div class="min-h-screen bg-slate-100">
            <AppBar drawer_open=drawer_open />
            <SideDrawer open=drawer_open />
            <main class=move || {
                let offset = if drawer_open.get() { "ml-60" } else { "ml-16" };
                format!("pt-20 px-6 pb-10 transition-all {}", offset)
            }>
                {children()}
            </main>
        </div>
    }
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let auth = use_auth();
    let name_auth = auth.clone();

    view! {
        <div class="space-y-6">
            <div class="bg-blue-600 text-white rounded-lg p-6 flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-bold">
                        {move || format!("Welcome Back, {}", name_auth.user().map(|u| u.full_name).unwrap_or_default())}
                    </h1>
                    <p class="text-blue-100">"Here’s what’s happening with your dashboard today."</p>
                </div>
                <button
                    class="bg-white text-blue-600 rounded px-4 py-2 font-semibold hover:bg-blue-50"
                    on:click=move |_| auth.logout()
                >
                    "Logout"
                </button>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <div class="lg:col-span-2 grid grid-cols-1 md:grid-cols-3 gap-4 content-start">
                    {dashboard::indicator_cards()
                        .into_iter()
                        .map(|card| view! { <IndicatorCard card=card /> })
                        .collect_view()}
                    <div class="md:col-span-3 bg-white rounded-lg shadow p-4">
                        <DataTable title=dashboard::NEW_USERS_TITLE engine=dashboard::new_users_table() />
                    </div>
                </div>

                <ChartPanel headline=dashboard::USER_GROWTH_HEADLINE>
                    <BarChart data=dashboard::user_growth() />
                </ChartPanel>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <ChartPanel headline=dashboard::DISTRIBUTION_HEADLINE>
                    <PieChart data=dashboard::category_distribution() />
                </ChartPanel>
                <div class="lg:col-span-2">
                    <ChartPanel headline=dashboard::SALES_TRENDS_HEADLINE>
                        <LineChart data=dashboard::sales_trends() />
                    </ChartPanel>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ChartPanel(headline: ChartHeadline, children: Children) -> impl IntoView {
    view! {
        <div class="bg-white rounded-lg shadow p-4 h-full">
            <div class="flex items-baseline justify-between mb-4">
                <h2 class="text-lg font-semibold text-slate-700">{headline.title}</h2>
                {headline.value.map(|value| view! {
                    <div class="flex items-baseline space-x-2">
                        <span class="text-xl font-bold text-slate-800">{value}</span>
                        {headline.change.map(|change| view! {
                            <span class="text-xs rounded px-2 py-0.5 bg-green-100 text-green-700">
                                {format!("↑ {}", change)}
                            </span>
                        })}
                    </div>
                })}
            </div>
            {children()}
        </div>
    }
}
