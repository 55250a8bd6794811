use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::LensError;
use crate::models::{LabelRecord, NormalizedBox};

/// Decode one label file into records, preserving line order.
///
/// The first undecodable line aborts the whole file: no partial record set
/// is returned.
pub fn read_label_file(path: &Path) -> Result<Vec<LabelRecord>, LensError> {
    let file = File::open(path).map_err(|source| LensError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| LensError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(record) = parse_label_line(&line, path, idx + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Decode a single `class_id x_center y_center width height` line.
///
/// Blank or whitespace-only lines yield `Ok(None)`.
pub fn parse_label_line(
    line: &str,
    path: &Path,
    line_num: usize,
) -> Result<Option<LabelRecord>, LensError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Cap the token scan so a pathological line is not collected whole.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();
    if tokens.len() < 5 {
        return Err(malformed(
            path,
            line_num,
            format!("expected 5 fields, found {}", tokens.len()),
        ));
    }
    if tokens.len() > 5 {
        return Err(malformed(
            path,
            line_num,
            "expected 5 fields, found more (segmentation or pose rows are not supported)"
                .to_string(),
        ));
    }

    let class_id = tokens[0].parse::<usize>().map_err(|_| {
        malformed(
            path,
            line_num,
            format!("invalid class id '{}', expected a non-negative integer", tokens[0]),
        )
    })?;

    let x_center = parse_coordinate(tokens[1], "x_center", path, line_num)?;
    let y_center = parse_coordinate(tokens[2], "y_center", path, line_num)?;
    let width = parse_coordinate(tokens[3], "width", path, line_num)?;
    let height = parse_coordinate(tokens[4], "height", path, line_num)?;

    Ok(Some(LabelRecord {
        class_id,
        bbox: NormalizedBox {
            x_center,
            y_center,
            width,
            height,
        },
    }))
}

/// Reject any record whose class id has no catalog entry.
pub fn check_class_ids(
    records: &[LabelRecord],
    num_classes: usize,
    path: &Path,
) -> Result<(), LensError> {
    for record in records {
        if record.class_id >= num_classes {
            return Err(LensError::ClassIndexOutOfRange {
                path: path.to_path_buf(),
                class_id: record.class_id,
                num_classes,
            });
        }
    }
    Ok(())
}

fn parse_coordinate(
    token: &str,
    field: &str,
    path: &Path,
    line_num: usize,
) -> Result<f64, LensError> {
    token
        .parse::<f64>()
        .map_err(|_| malformed(path, line_num, format!("invalid {field} '{token}'")))
}

fn malformed(path: &Path, line: usize, message: String) -> LensError {
    LensError::MalformedLabel {
        path: path.to_path_buf(),
        line,
        message,
    }
}
