use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::color::ColorMap;
use crate::state::{DashboardOutput, DashboardState, FilterEvent};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// What the user did with a checkbox list this frame.
enum ListAction {
    Toggle(String),
    All,
    None,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState, colors: &ColorMap) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset().is_empty() {
        ui.label("The dataset has no records.");
        return;
    }

    // Clone what we need so we can mutate state inside the panel.
    let catalog = state.catalog().clone();
    let selection = state.selection().clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let genre_action = choice_list(
                ui,
                "Filter 1: Choose genre",
                &catalog.genres,
                &selection.genres,
                Some(colors),
            );
            match genre_action {
                Some(ListAction::Toggle(g)) => state.toggle_genre(&g),
                Some(ListAction::All) => state.select_all_genres(),
                Some(ListAction::None) => state.select_no_genres(),
                None => {}
            }

            let rating_action = choice_list(
                ui,
                "Filter 2: Choose age rating",
                &catalog.ratings,
                &selection.ratings,
                None,
            );
            match rating_action {
                Some(ListAction::Toggle(r)) => state.toggle_rating(&r),
                Some(ListAction::All) => state.select_all_ratings(),
                Some(ListAction::None) => state.select_no_ratings(),
                None => {}
            }

            ui.separator();
            ui.strong("Filter 3: Choose release years");
            if let Some(bounds) = catalog.year_bounds() {
                let mut from = selection.years.min().max(bounds.min());
                let mut to = selection.years.max().min(bounds.max());
                let from_changed = ui
                    .add(Slider::new(&mut from, bounds.min()..=bounds.max()).text("from"))
                    .changed();
                let to_changed = ui
                    .add(Slider::new(&mut to, bounds.min()..=bounds.max()).text("to"))
                    .changed();
                if from_changed || to_changed {
                    state.handle(FilterEvent::YearRangeChanged(from, to));
                }
            }
        });
}

/// Collapsible checkbox list with All/None buttons.
fn choice_list(
    ui: &mut Ui,
    title: &str,
    values: &[String],
    selected: &BTreeSet<String>,
    colors: Option<&ColorMap>,
) -> Option<ListAction> {
    let mut action = None;
    let header_text = format!("{title}  ({}/{})", selected.len(), values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    action = Some(ListAction::All);
                }
                if ui.small_button("None").clicked() {
                    action = Some(ListAction::None);
                }
            });

            for value in values {
                let mut text = RichText::new(value);
                if let Some(cm) = colors {
                    text = text.color(cm.color_for(value));
                }
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, text).changed() {
                    action = Some(ListAction::Toggle(value.clone()));
                }
            }
        });

    action
}

// ---------------------------------------------------------------------------
// Header and top bar
// ---------------------------------------------------------------------------

/// Title and short description above the charts.
pub fn header(ui: &mut Ui) {
    ui.heading("Games market dashboard");
    ui.label("The dashboard with a brief games market analysis.");
    ui.label("Filter the games according to its genre, age rating and the year of release.");
    ui.separator();
}

/// Render the status bar with the filtered count.
pub fn top_bar(ui: &mut Ui, state: &DashboardState) {
    ui.horizontal(|ui: &mut Ui| {
        let loaded = ui.label(format!("{} games loaded", state.dataset().len()));
        let columns = state.dataset().extra_columns();
        if !columns.is_empty() {
            loaded.on_hover_text(format!("Other columns: {}", columns.join(", ")));
        }
        if let Some(source) = &state.source {
            ui.label(RichText::new(source).weak());
        }

        ui.separator();

        ui.strong("The number of filtered games:");
        match state.output() {
            DashboardOutput::NoSelection => {
                ui.label(
                    RichText::new("Choose at least one genre and one rating")
                        .color(Color32::from_rgb(200, 140, 40)),
                );
            }
            DashboardOutput::Results { count, .. } => {
                ui.label(RichText::new(count.to_string()).strong());
            }
        }
    });
}
