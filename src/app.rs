use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use anyhow::Context;
use eframe::egui;
use image::DynamicImage;
use log::{error, info, warn};
use rand::Rng;

use crate::annotation;
use crate::dataset::{DatasetConfig, Split, SplitEntry, SplitListing};
use crate::distribution;
use crate::error::LensError;
use crate::models::{ClassDistribution, LabelRecord};
use crate::ui;
use crate::utils::resize_to_limit;

/// Everything the panels need for the chosen split, carried as one value.
pub struct SplitContext {
    pub split: Split,
    pub listing: SplitListing,
    /// `None` when the split scan succeeded but aggregation failed; the
    /// split stays browsable either way.
    pub distribution: Option<ClassDistribution>,
}

pub enum BrowseState {
    Idle,
    SplitChosen(SplitContext),
}

pub struct InspectorApp {
    pub dataset: Option<DatasetConfig>,
    pub state: BrowseState,
    pub current_index: Option<usize>,
    pub current_image: Option<DynamicImage>,
    pub current_records: Vec<LabelRecord>,
    pub current_counts: BTreeMap<usize, usize>,
    pub texture: Option<egui::TextureHandle>,
    pub image_cache: HashMap<PathBuf, DynamicImage>,
    pub max_cache_size: usize,
    pub history: Vec<usize>,
    pub status_message: Option<String>,
    pub jump_input: String,
    pub scroll_to_current: bool,
}

impl Default for InspectorApp {
    fn default() -> Self {
        Self {
            dataset: None,
            state: BrowseState::Idle,
            current_index: None,
            current_image: None,
            current_records: Vec::new(),
            current_counts: BTreeMap::new(),
            texture: None,
            image_cache: HashMap::new(),
            max_cache_size: 5,
            history: Vec::new(),
            status_message: None,
            jump_input: String::new(),
            scroll_to_current: false,
        }
    }
}

impl InspectorApp {
    pub fn show_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn split_context(&self) -> Option<&SplitContext> {
        match &self.state {
            BrowseState::SplitChosen(context) => Some(context),
            BrowseState::Idle => None,
        }
    }

    pub fn current_split(&self) -> Option<Split> {
        self.split_context().map(|context| context.split)
    }

    pub fn load_dataset(&mut self, root: PathBuf) -> anyhow::Result<()> {
        let config = DatasetConfig::load(&root)
            .with_context(|| format!("failed to load dataset at {}", root.display()))?;
        info!(
            "loaded catalog with {} classes from {}",
            config.num_classes(),
            root.display()
        );
        self.dataset = Some(config);
        self.state = BrowseState::Idle;
        self.reset_current();
        self.history.clear();
        self.image_cache.clear();
        Ok(())
    }

    pub fn select_dataset_dir(&mut self) {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            match self.load_dataset(path) {
                Ok(()) => self.show_status("dataset loaded"),
                Err(e) => {
                    error!("{e:#}");
                    self.show_status(&format!("{e:#}"));
                }
            }
        }
    }

    /// Scan the split and build its distribution, then enter browsing.
    pub fn select_split(&mut self, split: Split) {
        let Some(dataset) = self.dataset.clone() else {
            self.show_status("open a dataset first");
            return;
        };

        let listing = match SplitListing::scan(&dataset.root, split) {
            Ok(listing) => listing,
            Err(e) => {
                error!("{e}");
                self.show_status(&e.to_string());
                return;
            }
        };
        info!(
            "{split}: {} images, {} label files",
            listing.len(),
            listing.label_files.len()
        );

        let distribution =
            match distribution::aggregate(&listing.label_files, dataset.num_classes()) {
                Ok(distribution) => Some(distribution),
                Err(e) => {
                    error!("{e}");
                    self.show_status(&format!("distribution unavailable: {e}"));
                    None
                }
            };

        let empty = listing.is_empty();
        self.state = BrowseState::SplitChosen(SplitContext {
            split,
            listing,
            distribution,
        });
        self.reset_current();
        self.history.clear();
        self.image_cache.clear();
        self.jump_input.clear();

        if empty {
            self.show_status(&format!("{split} split has no images"));
        } else {
            self.load_index(0);
        }
    }

    /// Load the image and labels at `index` in the current listing.
    pub fn load_index(&mut self, index: usize) {
        let entry = {
            let Some(context) = self.split_context() else {
                return;
            };
            match validate_selection(index, context.listing.len()) {
                Ok(index) => context.listing.entries[index].clone(),
                Err(e) => {
                    warn!("{e}");
                    self.show_status(&e.to_string());
                    return;
                }
            }
        };

        if let Some(current) = self.current_index {
            if current != index {
                self.history.push(current);
            }
        }
        self.current_index = Some(index);
        self.texture = None;

        if let Some(img) = self.image_cache.get(&entry.image_path).cloned() {
            self.current_image = Some(img);
        } else {
            match image::open(&entry.image_path) {
                Ok(img) => {
                    let img = resize_to_limit(&img, 1920, 1080);
                    self.current_image = Some(img.clone());
                    self.update_image_cache(index, entry.image_path.clone(), img);
                }
                Err(e) => {
                    error!("failed to decode {}: {e}", entry.image_path.display());
                    self.current_image = None;
                    self.show_status(&format!("failed to load {}", entry.file_name));
                }
            }
        }

        self.load_annotations(&entry);
    }

    fn load_annotations(&mut self, entry: &SplitEntry) {
        self.current_records.clear();
        self.current_counts.clear();

        let Some(dataset) = &self.dataset else {
            return;
        };
        let num_classes = dataset.num_classes();

        if !entry.label_path.exists() {
            warn!("no label file for {}", entry.file_name);
            self.show_status(&format!("no label file for {}", entry.file_name));
            return;
        }

        let records = match annotation::read_label_file(&entry.label_path) {
            Ok(records) => records,
            Err(e) => {
                error!("{e}");
                self.show_status(&e.to_string());
                return;
            }
        };
        if let Err(e) = annotation::check_class_ids(&records, num_classes, &entry.label_path) {
            error!("{e}");
            self.show_status(&e.to_string());
            return;
        }

        for record in &records {
            *self.current_counts.entry(record.class_id).or_insert(0) += 1;
        }
        self.current_records = records;
    }

    fn update_image_cache(&mut self, index: usize, path: PathBuf, img: DynamicImage) {
        self.image_cache.insert(path, img);

        let order: Vec<PathBuf> = self
            .split_context()
            .map(|context| {
                context
                    .listing
                    .entries
                    .iter()
                    .map(|entry| entry.image_path.clone())
                    .collect()
            })
            .unwrap_or_default();

        // Prefetch the neighbors the user is most likely to visit next.
        let mut neighbors = Vec::new();
        if index + 1 < order.len() {
            neighbors.push(order[index + 1].clone());
        }
        if index > 0 {
            neighbors.push(order[index - 1].clone());
        }
        for neighbor in neighbors {
            if !self.image_cache.contains_key(&neighbor) {
                if let Ok(img) = image::open(&neighbor) {
                    self.image_cache
                        .insert(neighbor, resize_to_limit(&img, 1920, 1080));
                }
            }
        }

        // Evict whatever is furthest from the current position.
        while self.image_cache.len() > self.max_cache_size {
            let mut furthest: Option<(PathBuf, usize)> = None;
            for cached in self.image_cache.keys() {
                if let Some(pos) = order.iter().position(|p| p == cached) {
                    let distance = pos.abs_diff(index);
                    if furthest.as_ref().map_or(true, |(_, d)| distance > *d) {
                        furthest = Some((cached.clone(), distance));
                    }
                }
            }
            match furthest {
                Some((path, _)) => {
                    self.image_cache.remove(&path);
                }
                None => break,
            }
        }
    }

    pub fn switch_image(&mut self, next: bool, random: bool) {
        let len = match self.split_context() {
            Some(context) => context.listing.len(),
            None => return,
        };
        if len == 0 {
            return;
        }

        let target = if random {
            rand::rng().random_range(0..len)
        } else {
            match self.current_index {
                Some(current) => {
                    if next {
                        if current + 1 < len { current + 1 } else { 0 }
                    } else {
                        if current > 0 { current - 1 } else { len - 1 }
                    }
                }
                None => 0,
            }
        };

        self.load_index(target);
        self.scroll_to_current = true;
    }

    pub fn go_back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.load_index(previous);
            self.scroll_to_current = true;
        }
    }

    /// Jump to the index typed into the top panel, rejecting bad input
    /// before any file is touched.
    pub fn jump_to_input(&mut self) {
        let len = match self.split_context() {
            Some(context) => context.listing.len(),
            None => return,
        };

        let parsed = self
            .jump_input
            .trim()
            .parse::<usize>()
            .map_err(|_| {
                LensError::InvalidSelection(format!("'{}' is not an index", self.jump_input.trim()))
            })
            .and_then(|index| validate_selection(index, len));

        match parsed {
            Ok(index) => {
                self.load_index(index);
                self.scroll_to_current = true;
            }
            Err(e) => {
                warn!("{e}");
                self.show_status(&e.to_string());
            }
        }
    }

    pub fn class_name(&self, class_id: usize) -> String {
        self.dataset
            .as_ref()
            .and_then(|dataset| dataset.class_name(class_id))
            .map(str::to_string)
            .unwrap_or_else(|| format!("class {class_id}"))
    }

    fn reset_current(&mut self) {
        self.current_index = None;
        self.current_image = None;
        self.current_records.clear();
        self.current_counts.clear();
        self.texture = None;
    }
}

pub(crate) fn validate_selection(index: usize, len: usize) -> Result<usize, LensError> {
    if index >= len {
        return Err(LensError::InvalidSelection(format!(
            "index {index} out of range (0-{})",
            len.saturating_sub(1)
        )));
    }
    Ok(index)
}

impl eframe::App for InspectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::top_panel(self, ctx);
        ui::side_panel(self, ctx);
        ui::statistics_panel(self, ctx);
        ui::central_panel(self, ctx);
    }
}
