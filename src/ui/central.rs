use eframe::egui;

use crate::app::InspectorApp;
use crate::geometry;
use crate::utils::class_color;

pub fn central_panel(app: &mut InspectorApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        // Keys navigate only while no text field has focus.
        if !ctx.wants_keyboard_input() {
            if ui.input(|i| i.key_pressed(egui::Key::W) || i.key_pressed(egui::Key::A)) {
                app.switch_image(false, false);
            }
            if ui.input(|i| i.key_pressed(egui::Key::S) || i.key_pressed(egui::Key::D)) {
                app.switch_image(true, false);
            }
            if ui.input(|i| i.key_pressed(egui::Key::Space)) {
                app.switch_image(false, true);
            }
            if ui.input(|i| i.key_pressed(egui::Key::B)) {
                app.go_back();
            }
        }

        let records = app.current_records.clone();
        let captions: Vec<String> = records
            .iter()
            .map(|record| app.class_name(record.class_id))
            .collect();

        if let Some(image) = &app.current_image {
            let available_size = ui.available_size();
            let image_size = egui::vec2(image.width() as f32, image.height() as f32);

            let scale = (available_size.x / image_size.x).min(available_size.y / image_size.y);
            let displayed_size = image_size * scale;

            let texture: &egui::TextureHandle = app.texture.get_or_insert_with(|| {
                ctx.load_texture(
                    "current_image",
                    egui::ColorImage::from_rgb(
                        [image.width() as _, image.height() as _],
                        image.to_rgb8().as_raw(),
                    ),
                    Default::default(),
                )
            });

            let response = ui
                .with_layout(
                    egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                    |ui| ui.image((texture.id(), displayed_size)),
                )
                .inner;

            let image_rect = response.rect;
            let offset_x = image_rect.min.x + (available_size.x - displayed_size.x) / 2.0;
            let offset_y = image_rect.min.y + (available_size.y - displayed_size.y) / 2.0;

            // Geometry runs in displayed-pixel space; the painter owns all
            // actual pixel writes.
            let view_w = displayed_size.x as u32;
            let view_h = displayed_size.y as u32;

            for (record, caption) in records.iter().zip(&captions) {
                let pixel_box = geometry::to_pixel_box(&record.bbox, view_w, view_h);
                let color = class_color(record.class_id);

                let rect = egui::Rect::from_min_max(
                    egui::pos2(offset_x + pixel_box.x1 as f32, offset_y + pixel_box.y1 as f32),
                    egui::pos2(offset_x + pixel_box.x2 as f32, offset_y + pixel_box.y2 as f32),
                );
                ui.painter().rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(2.0, color),
                    egui::StrokeKind::Middle,
                );

                let galley = ui.painter().layout_no_wrap(
                    caption.clone(),
                    egui::FontId::proportional(13.0),
                    color,
                );
                let text_size = (
                    galley.size().x.ceil() as i32,
                    galley.size().y.ceil() as i32,
                );
                let (anchor_x, anchor_y) =
                    geometry::place_caption(&pixel_box, text_size, view_w, view_h);
                ui.painter().galley(
                    egui::pos2(
                        offset_x + anchor_x as f32,
                        offset_y + (anchor_y - text_size.1) as f32,
                    ),
                    galley,
                    color,
                );
            }
        } else {
            ui.centered_and_justified(|ui| {
                ui.label("No image loaded");
            });
        }
    });
}
