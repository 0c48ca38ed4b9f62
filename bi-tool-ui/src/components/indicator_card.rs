//! Indicator Card Component
//!
//! KPI tile with a value, caption and up/down change badge.

use bi_tool::dashboard;
use leptos::*;

#[component]
pub fn IndicatorCard(card: dashboard::IndicatorCard) -> impl IntoView {
    let (arrow, badge) = if card.is_positive {
        ("↑", "bg-green-100 text-green-700")
    } else {
        ("↓", "bg-red-100 text-red-700")
    };

    view! {
        <div class="bg-white rounded-lg shadow p-4 flex flex-col space-y-2">
            <div class="flex items-center space-x-2 text-slate-500">
                <span class="text-lg">{icon_glyph(card.icon)}</span>
                <span class="text-sm font-medium">{card.title}</span>
            </div>
            <div class="flex items-center justify-between">
                <span class="text-2xl font-bold text-slate-700">{card.value}</span>
                <span class=format!("text-xs font-semibold px-2 py-1 rounded {}", badge)>
                    {arrow} " " {card.change}
                </span>
            </div>
            <span class="text-xs text-slate-400">{card.caption}</span>
        </div>
    }
}

fn icon_glyph(name: &str) -> &'static str {
    match name {
        "users" => "👥",
        "chart-line" => "📈",
        "shopping-cart" => "🛒",
        _ => "•",
    }
}
