//! Training dataset loading.
//!
//! Expected format: a header row followed by comma-separated numeric rows.
//! Header names are normalized (trimmed, lowercased, spaces to `_`) before
//! the feature and target columns are looked up, so `"ST slope"` and
//! `" st_slope"` both resolve to `st_slope`. Values are never rewritten.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{GuardianError, Result};
use crate::schema::{column_aliases, FEATURE_COUNT, FEATURE_NAMES, TARGET_COLUMN};

/// Features in schema order plus the binary target.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<u8>,
    /// Dataset column index used for each schema feature.
    pub feature_columns: [usize; FEATURE_COUNT],
    /// Normalized names of columns that were present but not used.
    pub ignored_columns: Vec<String>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.targets.iter().filter(|t| **t == 1).count()
    }

    /// Rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> (Vec<Vec<f64>>, Vec<u8>) {
        let x = indices.iter().map(|&i| self.features[i].clone()).collect();
        let y = indices.iter().map(|&i| self.targets[i]).collect();
        (x, y)
    }
}

/// Trim, lowercase and replace spaces with `_`. Idempotent.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        GuardianError::Dataset(format!("failed to open {}: {}", path.display(), e))
    })?;
    let dataset = parse_csv(BufReader::new(file))?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        positives = dataset.positives(),
        "loaded training dataset"
    );
    Ok(dataset)
}

pub fn parse_csv<R: BufRead>(reader: R) -> Result<Dataset> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((i, line)) => {
                let line = line.map_err(|e| {
                    GuardianError::Dataset(format!("failed to read line {}: {}", i + 1, e))
                })?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(GuardianError::Dataset("dataset is empty".to_string())),
        }
    };

    let columns: Vec<String> = split_fields(header.trim_start_matches('\u{feff}'))
        .map(normalize_column_name)
        .collect();
    let (feature_columns, target_column) = resolve_columns(&columns)?;

    let ignored_columns: Vec<String> = columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target_column && !feature_columns.contains(i))
        .map(|(_, c)| c.clone())
        .collect();
    if !ignored_columns.is_empty() {
        warn!(columns = ?ignored_columns, "ignoring columns outside the feature schema");
    }

    let mut features = Vec::new();
    let mut targets = Vec::new();
    for (i, line) in lines {
        let line_no = i + 1;
        let line = line
            .map_err(|e| GuardianError::Dataset(format!("failed to read line {line_no}: {e}")))?;
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = split_fields(&line).collect();
        if parts.len() != columns.len() {
            return Err(GuardianError::Dataset(format!(
                "line {}: expected {} fields, found {}",
                line_no,
                columns.len(),
                parts.len()
            )));
        }

        let mut row = Vec::with_capacity(FEATURE_COUNT);
        for (name, &col) in FEATURE_NAMES.iter().zip(&feature_columns) {
            row.push(parse_number(parts[col], name, line_no)?);
        }
        features.push(row);
        targets.push(parse_target(parts[target_column], line_no)?);
    }

    if targets.is_empty() {
        return Err(GuardianError::Dataset(
            "dataset has a header but no data rows".to_string(),
        ));
    }

    Ok(Dataset {
        features,
        targets,
        feature_columns,
        ignored_columns,
    })
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|f| f.trim().trim_matches('"').trim())
}

/// Map each schema feature and the target onto a header index.
fn resolve_columns(columns: &[String]) -> Result<([usize; FEATURE_COUNT], usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, name) in columns.iter().enumerate() {
        if index.insert(name.as_str(), i).is_some() {
            return Err(GuardianError::Dataset(format!(
                "duplicate column '{name}' after normalization"
            )));
        }
    }

    let target = *index
        .get(TARGET_COLUMN)
        .ok_or_else(|| GuardianError::MissingColumn(TARGET_COLUMN.to_string()))?;

    let mut feature_columns = [0usize; FEATURE_COUNT];
    for (slot, feature) in feature_columns.iter_mut().zip(FEATURE_NAMES) {
        let found = std::iter::once(feature)
            .chain(column_aliases(feature).iter().copied())
            .find_map(|name| index.get(name).copied());
        *slot = found.ok_or_else(|| GuardianError::MissingColumn(feature.to_string()))?;
    }

    Ok((feature_columns, target))
}

fn parse_number(raw: &str, column: &str, line: usize) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(GuardianError::NonNumeric {
            column: column.to_string(),
            line,
            value: raw.to_string(),
        }),
    }
}

fn parse_target(raw: &str, line: usize) -> Result<u8> {
    match raw.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => Err(GuardianError::InvalidTarget {
            line,
            value: raw.to_string(),
        }),
    }
}
