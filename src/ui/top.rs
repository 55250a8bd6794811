use eframe::egui;

use crate::app::InspectorApp;
use crate::dataset::Split;

pub fn top_panel(app: &mut InspectorApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Open dataset…").clicked() {
                app.select_dataset_dir();
            }
            if let Some(dataset) = &app.dataset {
                ui.label(format!("Dataset: {}", dataset.root.display()));
            }

            ui.separator();

            let have_dataset = app.dataset.is_some();
            let current = app.current_split();
            for split in Split::ALL {
                let selected = current == Some(split);
                if ui
                    .add_enabled(
                        have_dataset,
                        egui::SelectableLabel::new(selected, split.as_str()),
                    )
                    .clicked()
                {
                    app.select_split(split);
                }
            }

            if app.split_context().is_some() {
                ui.separator();
                ui.label("Index:");
                let response =
                    ui.add(egui::TextEdit::singleline(&mut app.jump_input).desired_width(48.0));
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Go").clicked() || submitted {
                    app.jump_to_input();
                }
            }
        });
    });
}
