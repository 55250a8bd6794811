use eframe::egui;

use crate::app::{BrowseState, InspectorApp};
use crate::models::ClassDistribution;
use crate::utils::class_color;

pub fn statistics_panel(app: &mut InspectorApp, ctx: &egui::Context) {
    egui::SidePanel::right("statistics_panel")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Distribution");

            match &app.state {
                BrowseState::Idle => {
                    ui.label("Select a split to see label counts.");
                }
                BrowseState::SplitChosen(context) => {
                    ui.label(format!("{} split", context.split));
                    ui.label(format!("Images: {}", context.listing.len()));
                    match &context.distribution {
                        Some(distribution) => {
                            ui.label(format!("Labels: {}", distribution.total()));
                            ui.separator();
                            if let Some(dataset) = &app.dataset {
                                bar_chart(ui, &dataset.names, distribution);
                            }
                        }
                        None => {
                            ui.label("Distribution unavailable, see status below.");
                        }
                    }
                }
            }

            if !app.current_counts.is_empty() {
                ui.separator();
                ui.heading("Current image");
                for (class_id, count) in &app.current_counts {
                    ui.label(format!("{}: {}", app.class_name(*class_id), count));
                }
            }

            // Pin the status message to the bottom of the panel.
            ui.add_space((ui.available_height() - 30.0).max(0.0));
            if let Some(message) = &app.status_message {
                ui.horizontal(|ui| {
                    ui.label(message);
                });
            }
        });
}

/// Horizontal bar per class, count annotated at the bar end.
fn bar_chart(ui: &mut egui::Ui, names: &[String], distribution: &ClassDistribution) {
    let max = distribution.max_count().max(1);

    for (class_id, name) in names.iter().enumerate() {
        let count = distribution.count(class_id);

        ui.label(name);
        let desired = egui::vec2(ui.available_width(), 14.0);
        let (rect, _) = ui.allocate_exact_size(desired, egui::Sense::hover());

        // Leave room on the right for the count annotation.
        let usable = (rect.width() - 48.0).max(0.0);
        let bar_width = usable * (count as f32 / max as f32);
        let bar = egui::Rect::from_min_size(rect.min, egui::vec2(bar_width, rect.height()));

        ui.painter().rect_filled(bar, 0.0, class_color(class_id));
        ui.painter().text(
            egui::pos2(bar.max.x + 4.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            count.to_string(),
            egui::FontId::proportional(11.0),
            ui.visuals().text_color(),
        );
    }
}
