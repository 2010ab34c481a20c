use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::{ScatterDatum, StackChart};
use crate::state::DashboardOutput;

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Render both charts side by side.
pub fn charts(ui: &mut Ui, output: &DashboardOutput, colors: &ColorMap) {
    let height = (ui.available_height() - 30.0).max(200.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("The interrelation between the platforms and genres");
        cols[1].strong("The correlation of the Critic & User scores and genres");
        match output {
            DashboardOutput::Results { stack, scatter, .. } if !scatter.is_empty() => {
                stack_plot(&mut cols[0], stack, colors, height);
                scatter_plot(&mut cols[1], scatter, colors, height);
            }
            _ => {
                empty_plot(&mut cols[0]);
                empty_plot(&mut cols[1]);
            }
        }
    });
}

fn empty_plot(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Empty plot");
    });
}

/// 100%-stacked bars, one bar per platform, one layer per genre.
fn stack_plot(ui: &mut Ui, stack: &StackChart, colors: &ColorMap, height: f32) {
    let mut charts: Vec<BarChart> = Vec::with_capacity(stack.series.len());
    for (series, shares) in stack.series.iter().zip(stack.percentages()) {
        let bars = shares
            .iter()
            .enumerate()
            .map(|(i, &pct)| Bar::new(i as f64, pct).name(&stack.platforms[i]).width(0.7))
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&series.genre)
            .color(colors.color_for(&series.genre))
            .stack_on(&below);
        charts.push(chart);
    }

    let platforms = stack.platforms.clone();
    Plot::new("stack_plot")
        .legend(Legend::default())
        .height(height)
        .x_axis_label("Platform")
        .y_axis_label("Percentage (%)")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            platforms.get(idx as usize).cloned().unwrap_or_default()
        })
        .include_y(0.0)
        .include_y(100.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// User score against critic score, coloured by genre.
fn scatter_plot(ui: &mut Ui, scatter: &[ScatterDatum], colors: &ColorMap, height: f32) {
    // Group per genre, keeping first-seen order for the legend.
    let mut groups: Vec<(&str, Vec<[f64; 2]>)> = Vec::new();
    for datum in scatter {
        let point = [datum.user_score, datum.critic_score];
        match groups.iter_mut().find(|(g, _)| *g == datum.genre) {
            Some((_, points)) => points.push(point),
            None => groups.push((datum.genre.as_str(), vec![point])),
        }
    }

    Plot::new("scatter_plot")
        .legend(Legend::default())
        .height(height)
        .x_axis_label("User score")
        .y_axis_label("Critic score")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (genre, points) in groups {
                let markers = Points::new(PlotPoints::from(points))
                    .name(genre)
                    .color(colors.color_for(genre))
                    .radius(3.0);
                plot_ui.points(markers);
            }
        });
}
