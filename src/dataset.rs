//! Labeled measurements and subgroup partitioning.
//!
//! A [`Dataset`] is an ordered, immutable list of [`Measurement`]s. Each
//! measurement carries the label of the subgroup (sampling occasion) it was
//! taken in. Subgroups are reported in order of first appearance, so a dataset
//! read from a time-ordered file keeps its time order.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SpcError};

/// A single observed value tagged with its subgroup label.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Subgroup label (e.g. a month index).
    pub label: String,
    /// Observed value.
    pub value: f64,
}

impl Measurement {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Which CSV columns hold the subgroup label and the measured value.
///
/// # Examples
///
/// ```
/// use u_spc::dataset::ColumnSelection;
///
/// let cols = ColumnSelection::new("time", "temp");
/// assert_eq!(cols.label, "time");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnSelection {
    pub label: String,
    pub value: String,
}

impl ColumnSelection {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One subgroup's observations, borrowed from a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Subgroup<'a> {
    pub label: &'a str,
    pub values: Vec<f64>,
}

/// An ordered collection of labeled measurements.
///
/// # Examples
///
/// ```
/// use u_spc::dataset::Dataset;
///
/// let data = Dataset::from_pairs([("1", 10.0), ("1", 11.0), ("2", 12.0)]).unwrap();
/// let groups = data.subgroups();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].values, vec![10.0, 11.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    measurements: Vec<Measurement>,
}

impl Dataset {
    /// Builds a dataset, rejecting non-finite values.
    pub fn new(measurements: Vec<Measurement>) -> Result<Self> {
        if let Some(pos) = measurements.iter().position(|m| !m.value.is_finite()) {
            return Err(SpcError::invalid(
                "measurements",
                format!("value at position {pos} is not finite"),
            ));
        }
        Ok(Self { measurements })
    }

    /// Builds a dataset from `(label, value)` pairs.
    pub fn from_pairs<L, I>(pairs: I) -> Result<Self>
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(label, value)| Measurement::new(label, value))
                .collect(),
        )
    }

    /// Builds a dataset from explicit subgroups, labeled `"1"`, `"2"`, ...
    pub fn from_subgroups(groups: &[&[f64]]) -> Result<Self> {
        Self::from_pairs(groups.iter().enumerate().flat_map(|(i, group)| {
            let label = (i + 1).to_string();
            group.iter().map(move |&v| (label.clone(), v))
        }))
    }

    /// Reads a headed CSV table and selects the label and value columns.
    pub fn from_csv_reader<R: Read>(reader: R, columns: &ColumnSelection) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SpcError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let label_idx = find(&columns.label)?;
        let value_idx = find(&columns.value)?;

        let mut measurements = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let label = record.get(label_idx).unwrap_or_default();
            let text = record.get(value_idx).unwrap_or_default();
            let value: f64 = text.parse().map_err(|_| SpcError::InvalidValue {
                row: row + 1,
                column: columns.value.clone(),
                text: text.to_string(),
            })?;
            measurements.push(Measurement::new(label, value));
        }
        log::debug!(
            "loaded {} measurements ({} ~ {})",
            measurements.len(),
            columns.value,
            columns.label
        );
        Self::new(measurements)
    }

    /// Reads a headed CSV file, e.g. `onsen.csv` with `time`/`temp` columns.
    pub fn from_csv_path(path: impl AsRef<Path>, columns: &ColumnSelection) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file, columns)
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// All values in recorded order, ignoring subgroup membership.
    pub fn values(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.value).collect()
    }

    /// Partitions the measurements by label, in order of first appearance.
    pub fn subgroups(&self) -> Vec<Subgroup<'_>> {
        group_by_label(self.measurements.iter())
    }
}

/// Groups borrowed measurements by label, preserving first-appearance order.
pub(crate) fn group_by_label<'a, I>(measurements: I) -> Vec<Subgroup<'a>>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<Subgroup<'a>> = Vec::new();
    for m in measurements {
        let slot = *index.entry(m.label.as_str()).or_insert_with(|| {
            groups.push(Subgroup {
                label: m.label.as_str(),
                values: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].values.push(m.value);
    }
    groups
}
