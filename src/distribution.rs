use std::path::PathBuf;

use crate::annotation;
use crate::error::LensError;
use crate::models::ClassDistribution;

/// Count label records per class across every label file of one split.
///
/// Accumulation is commutative, so the file order does not change the
/// resulting counts; it only decides which error surfaces first when more
/// than one file is bad.
pub fn aggregate(
    label_files: &[PathBuf],
    num_classes: usize,
) -> Result<ClassDistribution, LensError> {
    let mut distribution = ClassDistribution::new(num_classes);

    for path in label_files {
        let records = annotation::read_label_file(path)?;
        annotation::check_class_ids(&records, num_classes, path)?;
        for record in &records {
            distribution.increment(record.class_id);
        }
    }

    Ok(distribution)
}
