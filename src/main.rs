#![windows_subsystem = "windows"]

mod annotation;
mod app;
mod dataset;
mod distribution;
mod error;
mod geometry;
mod models;
mod ui;
mod utils;

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use crate::app::InspectorApp;
use crate::dataset::Split;

/// Browse a YOLO-format detection dataset: per-class label counts per split
/// and per-image bounding box overlays.
#[derive(Parser, Debug)]
#[command(name = "label_lens", version, about)]
struct Args {
    /// Dataset root containing data.yaml and train/valid/test directories.
    dataset: Option<PathBuf>,

    /// Split to open at startup (train, valid or test).
    #[arg(long)]
    split: Option<Split>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut app = InspectorApp::default();
    if let Some(root) = args.dataset {
        if let Err(e) = app.load_dataset(root) {
            log::error!("{e:#}");
            std::process::exit(1);
        }
        if let Some(split) = args.split {
            app.select_split(split);
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("Label Lens"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Label Lens",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    ) {
        eprintln!("Error running native application: {}", e);
    }
}
