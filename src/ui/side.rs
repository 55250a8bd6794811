use eframe::egui;

use crate::app::InspectorApp;

pub fn side_panel(app: &mut InspectorApp, ctx: &egui::Context) {
    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        let names: Vec<String> = match app.split_context() {
            Some(context) => context
                .listing
                .entries
                .iter()
                .map(|entry| entry.file_name.clone())
                .collect(),
            None => {
                ui.label("Open a dataset and pick a split.");
                return;
            }
        };
        let current = app.current_index;

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for (index, file_name) in names.iter().enumerate() {
                    let is_selected = current == Some(index);

                    let button = egui::Button::new(
                        egui::RichText::new(format!("{index:>4}  {file_name}")).color(
                            if is_selected {
                                egui::Color32::YELLOW
                            } else {
                                egui::Color32::BLACK
                            },
                        ),
                    )
                    .fill(if is_selected {
                        egui::Color32::DARK_BLUE
                    } else {
                        egui::Color32::from_gray(230)
                    });

                    let response = ui.add(button);
                    if response.clicked() {
                        clicked = Some(index);
                    }

                    if is_selected && app.scroll_to_current {
                        response.scroll_to_me(Some(egui::Align::Center));
                        app.scroll_to_current = false;
                    }
                }
            });

        if let Some(index) = clicked {
            app.load_index(index);
        }
    });
}
