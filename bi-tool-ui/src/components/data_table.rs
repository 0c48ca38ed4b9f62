//! Data Table Component
//!
//! Paginated table over a [`TableEngine`] with a filter editor popover,
//! committed filter chips and rows-per-page selection.

use bi_tool::table::{Align, Column, FilterChip, TableBody, TableEngine, TableRow};
use leptos::*;

#[component]
pub fn DataTable<R>(
    #[prop(into)]
    title: String,
    engine: TableEngine<R>,
) -> impl IntoView
where
    R: TableRow + 'static,
{
    // Columns are fixed for the engine's lifetime
    let has_categories = engine.has_filter_categories();
    let table = create_rw_signal(engine);

    view! {
        <div class="flex flex-col space-y-3">
            <div class="flex items-center justify-between relative">
                <h2 class="text-lg font-semibold text-slate-700">{title}</h2>
                {has_categories.then(|| view! {
                    <button
                        class="px-3 py-1 rounded text-sm text-blue-600 border border-blue-600 hover:bg-blue-50"
                        on:click=move |_| table.update(|t| {
                            if t.is_editor_open() { t.close_filter_editor() } else { t.open_filter_editor() }
                        })
                    >
                        "Filter"
                    </button>
                })}
                {move || table.with(|t| t.is_editor_open()).then(|| view! { <FilterEditor table=table /> })}
            </div>

            <FilterChips table=table />

            <div class="overflow-x-auto">
                <table class="min-w-full text-sm">
                    <thead>
                        <tr class="border-b border-slate-200">
                            {move || table.with(|t| t.columns().iter().map(header_cell).collect_view())}
                        </tr>
                    </thead>
                    <tbody>
                        {move || table.with(|t| body_rows(t.columns(), t.body()))}
                    </tbody>
                </table>
            </div>

            <Pagination table=table />
        </div>
    }
}

fn align_class(column: &Column) -> &'static str {
    match column.align {
        Align::Left => "text-left",
        Align::Center => "text-center",
        Align::Right => "text-right",
    }
}

fn header_cell(column: &Column) -> impl IntoView {
    let style = column
        .min_width
        .map(|w| format!("min-width: {}px", w))
        .unwrap_or_default();
    view! {
        <th class=format!("px-3 py-2 font-semibold text-slate-600 {}", align_class(column)) style=style>
            {column.label.clone()}
        </th>
    }
}

fn body_rows(columns: &[Column], body: TableBody) -> View {
    match body {
        TableBody::Empty { colspan, message } => view! {
            <tr>
                <td colspan=colspan class="px-3 py-6 text-center text-slate-400">{message}</td>
            </tr>
        }
        .into_view(),
        TableBody::Rows(rows) => rows
            .into_iter()
            .map(|cells| {
                view! {
                    <tr class="border-b border-slate-100 hover:bg-slate-50">
                        {cells.into_iter().zip(columns.iter()).map(|(cell, column)| view! {
                            <td class=format!("px-3 py-2 text-slate-700 {}", align_class(column))>{cell}</td>
                        }).collect_view()}
                    </tr>
                }
            })
            .collect_view(),
    }
}

/// Popover editing the draft selection; nothing applies until "Apply"
#[component]
fn FilterEditor<R>(table: RwSignal<TableEngine<R>>) -> impl IntoView
where
    R: TableRow + 'static,
{
    let categories = move || {
        table.with(|t| {
            t.filter_categories()
                .map(|c| (c.id.clone(), c.label.clone(), c.filter_options.clone()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="absolute right-0 top-10 z-20 w-72 bg-white rounded shadow-lg border border-slate-200">
            <div class="max-h-80 overflow-y-auto">
                {move || categories().into_iter().map(|(id, label, options)| {
                    let expanded_id = id.clone();
                    let toggle_id = id.clone();
                    let is_expanded = move || table.with(|t| t.expanded_category() == Some(expanded_id.as_str()));
                    let is_expanded_for_click = is_expanded.clone();
                    let is_expanded_for_body = is_expanded.clone();
                    view! {
                        <div class="border-b border-slate-100">
                            <button
                                class="w-full flex justify-between px-4 py-2 text-sm font-medium text-slate-700"
                                on:click=move |_| {
                                    let open = !is_expanded_for_click();
                                    table.update(|t| t.expand_category(&toggle_id, open));
                                }
                            >
                                <span>{label}</span>
                                <span>{move || if is_expanded() { "▴" } else { "▾" }}</span>
                            </button>
                            {move || is_expanded_for_body().then(|| {
                                let column_id = id.clone();
                                options.clone().into_iter().map(|option| {
                                    let checked_col = column_id.clone();
                                    let checked_val = option.value.clone();
                                    let change_col = column_id.clone();
                                    let change_val = option.value.clone();
                                    view! {
                                        <label class="flex items-center space-x-2 px-6 py-1 text-sm text-slate-600">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || table.with(|t| t.draft_selected(&checked_col, &checked_val))
                                                on:change=move |ev| {
                                                    let included = event_target_checked(&ev);
                                                    table.update(|t| t.toggle_filter_value(&change_col, &change_val, included));
                                                }
                                            />
                                            <span>{option.label}</span>
                                        </label>
                                    }
                                }).collect_view()
                            })}
                        </div>
                    }
                }).collect_view()}
            </div>
            <div class="flex justify-end space-x-2 p-3">
                <button
                    class="px-3 py-1 text-sm text-slate-600"
                    on:click=move |_| table.update(|t| t.clear_draft_filters())
                >
                    "Clear All"
                </button>
                <button
                    class="px-3 py-1 text-sm text-white bg-blue-600 rounded"
                    on:click=move |_| table.update(|t| t.apply_filters())
                >
                    "Apply"
                </button>
            </div>
        </div>
    }
}

/// One chip per committed value; removing a chip applies immediately
#[component]
fn FilterChips<R>(table: RwSignal<TableEngine<R>>) -> impl IntoView
where
    R: TableRow + 'static,
{
    let chips = move || table.with(|t| t.active_chips());

    move || {
        let chips: Vec<FilterChip> = chips();
        if chips.is_empty() {
            return view! {}.into_view();
        }

        view! {
            <div class="flex flex-wrap items-center gap-2">
                {chips.into_iter().map(|chip| {
                    let FilterChip { column_id, value, label } = chip;
                    view! {
                        <span class="flex items-center bg-blue-50 text-blue-700 text-xs rounded-full px-3 py-1">
                            {label}
                            <button
                                class="ml-2"
                                on:click=move |_| table.update(|t| t.remove_committed_filter_value(&column_id, &value))
                            >
                                "✕"
                            </button>
                        </span>
                    }
                }).collect_view()}
                <button
                    class="text-xs text-blue-600 underline"
                    on:click=move |_| table.update(|t| t.clear_all_committed_filters())
                >
                    "Clear All"
                </button>
            </div>
        }
        .into_view()
    }
}

#[component]
fn Pagination<R>(table: RwSignal<TableEngine<R>>) -> impl IntoView
where
    R: TableRow + 'static,
{
    let options = table.with_untracked(|t| t.page_size_options().to_vec());

    view! {
        <div class="flex items-center justify-end space-x-4 text-sm text-slate-600">
            <label class="flex items-center space-x-2">
                <span>"Rows per page:"</span>
                <select
                    class="border border-slate-300 rounded px-1"
                    on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse::<usize>() {
                            table.update(|t| t.set_page_size(size));
                        }
                    }
                >
                    {options.into_iter().map(|size| view! {
                        <option
                            value=size.to_string()
                            selected=move || table.with(|t| t.page_size() == size)
                        >
                            {size}
                        </option>
                    }).collect_view()}
                </select>
            </label>
            <span>{move || table.with(|t| t.range_label())}</span>
            <button
                class="px-2 disabled:opacity-40"
                disabled=move || table.with(|t| !t.has_previous_page())
                on:click=move |_| table.update(|t| {
                    let page = t.page();
                    t.set_page(page.saturating_sub(1));
                })
            >
                "‹"
            </button>
            <button
                class="px-2 disabled:opacity-40"
                disabled=move || table.with(|t| !t.has_next_page())
                on:click=move |_| table.update(|t| {
                    let page = t.page();
                    t.set_page(page + 1);
                })
            >
                "›"
            </button>
        </div>
    }
}
