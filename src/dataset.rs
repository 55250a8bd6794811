use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::LensError;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Dataset partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Valid,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Valid, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Valid => "valid",
            Split::Test => "test",
        }
    }

    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(self.as_str())
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "valid" => Ok(Split::Valid),
            "test" => Ok(Split::Test),
            other => Err(LensError::InvalidSelection(format!(
                "unknown split '{other}' (expected train, valid or test)"
            ))),
        }
    }
}

/// `names:` accepts both the sequence form and the index-keyed map form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NamesField {
    List(Vec<String>),
    Map(BTreeMap<usize, String>),
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    names: NamesField,
    nc: Option<usize>,
}

/// Class catalog loaded from `data.yaml` at the dataset root.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub root: PathBuf,
    pub names: Vec<String>,
}

impl DatasetConfig {
    pub fn load(root: &Path) -> Result<Self, LensError> {
        let path = root.join("data.yaml");
        let text = fs::read_to_string(&path).map_err(|source| LensError::Io {
            path: path.clone(),
            source,
        })?;
        let raw: RawConfig = serde_yaml::from_str(&text).map_err(|e| LensError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let names = match raw.names {
            NamesField::List(names) => names,
            NamesField::Map(map) => {
                let mut names = Vec::with_capacity(map.len());
                for (expected, (id, name)) in map.into_iter().enumerate() {
                    if id != expected {
                        return Err(LensError::Config {
                            path: path.clone(),
                            message: format!(
                                "names map must use dense zero-based ids, missing id {expected}"
                            ),
                        });
                    }
                    names.push(name);
                }
                names
            }
        };

        if names.is_empty() {
            return Err(LensError::Config {
                path,
                message: "names is empty".to_string(),
            });
        }
        if let Some(nc) = raw.nc {
            if nc != names.len() {
                return Err(LensError::Config {
                    path,
                    message: format!("nc is {nc} but names lists {} class(es)", names.len()),
                });
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            names,
        })
    }

    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    pub fn class_name(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }
}

/// One browsable image and the label file that belongs to it.
///
/// The label path is derived from the image's filename stem; it may not
/// exist on disk (an unlabeled image).
#[derive(Debug, Clone)]
pub struct SplitEntry {
    pub image_path: PathBuf,
    pub label_path: PathBuf,
    pub file_name: String,
}

/// Directory contents of one split: images paired with their labels for
/// browsing, plus every label file for aggregation.
#[derive(Debug, Clone, Default)]
pub struct SplitListing {
    pub entries: Vec<SplitEntry>,
    pub label_files: Vec<PathBuf>,
}

impl SplitListing {
    pub fn scan(root: &Path, split: Split) -> Result<Self, LensError> {
        let split_dir = split.dir(root);
        let images_dir = split_dir.join("images");
        let labels_dir = split_dir.join("labels");

        let mut entries = Vec::new();
        for entry in read_dir(&images_dir)? {
            let entry = entry.map_err(|source| LensError::Io {
                path: images_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !is_image_file(&path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let file_name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            entries.push(SplitEntry {
                label_path: labels_dir.join(stem).with_extension("txt"),
                file_name,
                image_path: path,
            });
        }
        entries.sort_by(|a, b| a.image_path.cmp(&b.image_path));

        let mut label_files = Vec::new();
        for entry in read_dir(&labels_dir)? {
            let entry = entry.map_err(|source| LensError::Io {
                path: labels_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
            {
                label_files.push(path);
            }
        }
        label_files.sort();

        Ok(Self {
            entries,
            label_files,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_dir(path: &Path) -> Result<fs::ReadDir, LensError> {
    fs::read_dir(path).map_err(|source| LensError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_names_list() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("data.yaml"),
            "train: train/images\nnames:\n  - leaf spot\n  - rust\n  - healthy\n",
        );

        let config = DatasetConfig::load(dir.path()).unwrap();
        assert_eq!(config.num_classes(), 3);
        assert_eq!(config.class_name(1), Some("rust"));
        assert_eq!(config.class_name(3), None);
    }

    #[test]
    fn loads_names_map() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("data.yaml"),
            "names:\n  0: cat\n  1: dog\n",
        );

        let config = DatasetConfig::load(dir.path()).unwrap();
        assert_eq!(config.names, vec!["cat", "dog"]);
    }

    #[test]
    fn rejects_sparse_names_map() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("data.yaml"), "names:\n  0: cat\n  2: dog\n");

        let err = DatasetConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, LensError::Config { .. }));
    }

    #[test]
    fn rejects_mismatched_nc() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("data.yaml"),
            "nc: 5\nnames:\n  - cat\n  - dog\n",
        );

        let err = DatasetConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, LensError::Config { .. }));
    }

    #[test]
    fn rejects_empty_names() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("data.yaml"), "names: []\n");

        let err = DatasetConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, LensError::Config { .. }));
    }

    #[test]
    fn missing_config_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatasetConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, LensError::Io { .. }));
    }

    #[test]
    fn split_parses_known_names_only() {
        assert_eq!("train".parse::<Split>().unwrap(), Split::Train);
        assert_eq!("VALID".parse::<Split>().unwrap(), Split::Valid);
        assert_eq!("test".parse::<Split>().unwrap(), Split::Test);
        assert!(matches!(
            "validation".parse::<Split>(),
            Err(LensError::InvalidSelection(_))
        ));
    }

    #[test]
    fn scan_pairs_labels_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("train/images");
        let labels = dir.path().join("train/labels");
        fs::create_dir_all(&images).unwrap();
        fs::create_dir_all(&labels).unwrap();
        write(&images.join("b.png"), "");
        write(&images.join("a.jpg"), "");
        write(&images.join("notes.md"), "");
        write(&labels.join("a.txt"), "0 0.5 0.5 0.2 0.2\n");
        write(&labels.join("orphan.txt"), "1 0.5 0.5 0.2 0.2\n");

        let listing = SplitListing::scan(dir.path(), Split::Train).unwrap();

        assert_eq!(listing.len(), 2);
        assert_eq!(listing.entries[0].file_name, "a.jpg");
        assert_eq!(listing.entries[1].file_name, "b.png");
        assert_eq!(listing.entries[0].label_path, labels.join("a.txt"));
        assert_eq!(listing.entries[1].label_path, labels.join("b.txt"));
        assert!(listing.entries[0].label_path.exists());
        assert!(!listing.entries[1].label_path.exists());

        // Aggregation sees every label file, matched to an image or not.
        assert_eq!(
            listing.label_files,
            vec![labels.join("a.txt"), labels.join("orphan.txt")]
        );
    }

    #[test]
    fn scan_of_missing_split_fails_with_path_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = SplitListing::scan(dir.path(), Split::Test).unwrap_err();
        assert!(matches!(err, LensError::Io { .. }));
    }
}
