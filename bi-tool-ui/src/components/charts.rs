//! Chart Components
//!
//! Bar, line and donut charts drawn on HTML5 Canvas with geometry from the
//! core `chart` module.

use bi_tool::chart::{
    bar_layout, category_centers, line_points, Axis, ChartData, Margins, PieData, PlotArea,
};
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const GRID_COLOR: &str = "#e5e7eb";
const LABEL_COLOR: &str = "#6b7280";
const TICK_TARGET: usize = 5;

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

#[component]
pub fn BarChart(data: ChartData) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_bars(&canvas, &data);
        }
    });

    view! {
        <canvas node_ref=canvas_ref width="480" height="300" class="w-full h-64" />
    }
}

#[component]
pub fn LineChart(data: ChartData) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let legend = data.clone();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_lines(&canvas, &data);
        }
    });

    view! {
        <div>
            <canvas node_ref=canvas_ref width="720" height="300" class="w-full h-64" />
            <div class="flex justify-center flex-wrap gap-4 mt-2">
                {legend.series.into_iter().map(|s| view! {
                    <div class="flex items-center space-x-2">
                        <div class="w-3 h-3 rounded-full" style=format!("background-color: {}", s.color) />
                        <span class="text-sm text-slate-500">{s.label}</span>
                    </div>
                }).collect_view()}
            </div>
        </div>
    }
}

/// Donut chart with a percentage label on every slice
#[component]
pub fn PieChart(data: PieData) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let legend = data.slices();

    create_effect(move |_| {
        if let Some(canvas) = canvas_ref.get() {
            draw_pie(&canvas, &data);
        }
    });

    view! {
        <div>
            <canvas node_ref=canvas_ref width="300" height="300" class="w-full h-64" />
            <div class="flex justify-center flex-wrap gap-4 mt-2">
                {legend.into_iter().map(|slice| view! {
                    <div class="flex items-center space-x-2">
                        <div class="w-3 h-3 rounded-full" style=format!("background-color: {}", slice.color) />
                        <span class="text-sm text-slate-500">{slice.caption()}</span>
                    </div>
                }).collect_view()}
            </div>
        </div>
    }
}

fn draw_grid(ctx: &CanvasRenderingContext2d, area: &PlotArea, axis: &Axis) {
    ctx.set_stroke_style(&GRID_COLOR.into());
    ctx.set_line_width(1.0);
    ctx.set_fill_style(&LABEL_COLOR.into());
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("right");

    for tick in axis.ticks() {
        let y = area.scale_y(tick, axis);
        ctx.begin_path();
        ctx.move_to(area.x, y);
        ctx.line_to(area.right(), y);
        ctx.stroke();
        let _ = ctx.fill_text(&format!("{}", tick), area.x - 8.0, y + 4.0);
    }
}

fn draw_category_labels(ctx: &CanvasRenderingContext2d, labels: &[String], xs: &[f64], y: f64) {
    ctx.set_fill_style(&LABEL_COLOR.into());
    ctx.set_text_align("center");
    for (label, x) in labels.iter().zip(xs) {
        let _ = ctx.fill_text(label, *x, y);
    }
}

fn draw_bars(canvas: &HtmlCanvasElement, data: &ChartData) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);

    let area = PlotArea::new(width, height, Margins::default());
    let axis = data.value_axis(TICK_TARGET);
    draw_grid(&ctx, &area, &axis);

    for bar in bar_layout(data, &area, &axis) {
        let series = &data.series[bar.series];
        ctx.set_fill_style(&series.fill_color().into());
        ctx.fill_rect(bar.x, bar.y, bar.width, bar.height);
        ctx.set_stroke_style(&series.color.as_str().into());
        ctx.stroke_rect(bar.x, bar.y, bar.width, bar.height);
    }

    let centers = category_centers(data.labels.len(), &area);
    draw_category_labels(&ctx, &data.labels, &centers, area.bottom() + 18.0);
}

fn draw_lines(canvas: &HtmlCanvasElement, data: &ChartData) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);

    let area = PlotArea::new(width, height, Margins::default());
    let axis = data.value_axis(TICK_TARGET);
    draw_grid(&ctx, &area, &axis);

    let categories = data.labels.len();
    for series in &data.series {
        let points = line_points(series, categories, &area, &axis);
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            continue;
        };

        // Filled area under the line
        ctx.set_fill_style(&series.fill_color().into());
        ctx.begin_path();
        ctx.move_to(first.0, area.bottom());
        for (x, y) in &points {
            ctx.line_to(*x, *y);
        }
        ctx.line_to(last.0, area.bottom());
        ctx.close_path();
        ctx.fill();

        ctx.set_stroke_style(&series.color.as_str().into());
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(first.0, first.1);
        for (x, y) in points.iter().skip(1) {
            ctx.line_to(*x, *y);
        }
        ctx.stroke();
    }

    let xs: Vec<f64> = bi_tool::chart::line_x_positions(categories, &area);
    draw_category_labels(&ctx, &data.labels, &xs, area.bottom() + 18.0);
}

fn draw_pie(canvas: &HtmlCanvasElement, data: &PieData) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);

    let (cx, cy) = (width / 2.0, height / 2.0);
    let outer = width.min(height) / 2.0 - 10.0;
    let inner = outer * 0.55;
    let label_radius = (outer + inner) / 2.0;

    for slice in data.slices() {
        ctx.set_fill_style(&slice.color.as_str().into());
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, outer, slice.start_angle, slice.end_angle);
        let _ = ctx.arc_with_anticlockwise(cx, cy, inner, slice.end_angle, slice.start_angle, true);
        ctx.close_path();
        ctx.fill();

        let angle = slice.mid_angle();
        ctx.set_fill_style(&"#ffffff".into());
        ctx.set_font("bold 14px sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(
            &format!("{}%", slice.percent()),
            cx + label_radius * angle.cos(),
            cy + label_radius * angle.sin(),
        );
    }
}
