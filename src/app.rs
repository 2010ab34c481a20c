use eframe::egui;

use crate::color::ColorMap;
use crate::state::DashboardState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GamesDashApp {
    pub state: DashboardState,
    colors: ColorMap,
}

impl GamesDashApp {
    pub fn new(state: DashboardState) -> Self {
        let colors = ColorMap::new(&state.catalog().genres);
        Self { state, colors }
    }
}

impl eframe::App for GamesDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: status and count ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &self.colors);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::header(ui);
            plot::charts(ui, self.state.output(), &self.colors);
        });
    }
}
