use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LensError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    MalformedLabel {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: class id {class_id} has no catalog entry ({num_classes} class(es) defined)", path.display())]
    ClassIndexOutOfRange {
        path: PathBuf,
        class_id: usize,
        num_classes: usize,
    },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("{}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}
