use eframe::egui;
use image::DynamicImage;

/// Color cycle shared by the chart bars and the box overlays.
const CLASS_COLORS: [egui::Color32; 3] = [
    egui::Color32::from_rgb(0x1f, 0x77, 0xb4),
    egui::Color32::from_rgb(0xff, 0x7f, 0x0e),
    egui::Color32::from_rgb(0x2c, 0xa0, 0x2c),
];

pub fn class_color(class_id: usize) -> egui::Color32 {
    CLASS_COLORS[class_id % CLASS_COLORS.len()]
}

pub fn resize_to_limit(img: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let width = img.width();
    let height = img.height();

    if width <= max_width && height <= max_height {
        return img.clone();
    }

    let ratio = (max_width as f32 / width as f32).min(max_height as f32 / height as f32);

    let new_width = (width as f32 * ratio) as u32;
    let new_height = (height as f32 * ratio) as u32;

    img.resize(new_width, new_height, image::imageops::FilterType::Triangle)
}
