//! Read-only dataset and selection collaborators
//!
//! Viewers never load or mutate data. The host hands every instance the same
//! attribute list and selection set behind an `Arc`, and render routines
//! only read from them.

use serde::{Deserialize, Serialize};

use crate::plugin::ValueType;

/// A column of data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum DataColumn {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    String(Vec<String>),
    Boolean(Vec<bool>),
}

impl DataColumn {
    /// Get the column type
    pub fn value_type(&self) -> ValueType {
        match self {
            DataColumn::Integer(_) => ValueType::Integer,
            DataColumn::Float(_) => ValueType::Float,
            DataColumn::String(_) => ValueType::String,
            DataColumn::Boolean(_) => ValueType::Boolean,
        }
    }

    /// Get the number of elements
    pub fn len(&self) -> usize {
        match self {
            DataColumn::Integer(v) => v.len(),
            DataColumn::Float(v) => v.len(),
            DataColumn::String(v) => v.len(),
            DataColumn::Boolean(v) => v.len(),
        }
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric value at a row (integer and float columns only)
    pub fn numeric_at(&self, row: usize) -> Option<f64> {
        match self {
            DataColumn::Integer(v) => v.get(row).map(|&x| x as f64),
            DataColumn::Float(v) => v.get(row).copied(),
            _ => None,
        }
    }

    /// Convert to f64 (for numeric types)
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            DataColumn::Integer(v) => Some(v.iter().map(|&x| x as f64).collect()),
            DataColumn::Float(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// One named column of the host dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetAttribute {
    /// Column name
    pub name: String,

    /// Column values
    pub column: DataColumn,
}

impl DatasetAttribute {
    pub fn new(name: impl Into<String>, column: DataColumn) -> Self {
        Self {
            name: name.into(),
            column,
        }
    }

    /// Concrete type of this attribute
    pub fn value_type(&self) -> ValueType {
        self.column.value_type()
    }

    /// Smallest finite value of a numeric column
    pub fn min(&self) -> Option<f64> {
        self.column
            .to_f64()?
            .into_iter()
            .filter(|v| v.is_finite())
            .reduce(f64::min)
    }

    /// Largest finite value of a numeric column
    pub fn max(&self) -> Option<f64> {
        self.column
            .to_f64()?
            .into_iter()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}

/// A named subset of dataset rows with a display color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub name: String,

    /// Dataset row indices
    pub items: Vec<usize>,

    /// CSS-style color string (e.g., "#1f77b4")
    pub color: String,
}

impl Selection {
    pub fn new(name: impl Into<String>, items: Vec<usize>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items,
            color: color.into(),
        }
    }
}

/// Read-only access to the host's selection set
pub trait Selections: Send + Sync {
    /// Number of selections
    fn size(&self) -> usize;

    /// Selection at position `i`
    fn get(&self, i: usize) -> Option<&Selection>;

    /// Display color of a selection
    fn color_of<'a>(&'a self, selection: &'a Selection) -> &'a str {
        &selection.color
    }
}

/// In-memory selection set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSet {
    selections: Vec<Selection>,
}

impl SelectionSet {
    pub fn new(selections: Vec<Selection>) -> Self {
        Self { selections }
    }

    pub fn push(&mut self, selection: Selection) {
        self.selections.push(selection);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.selections.iter()
    }
}

impl Selections for SelectionSet {
    fn size(&self) -> usize {
        self.selections.len()
    }

    fn get(&self, i: usize) -> Option<&Selection> {
        self.selections.get(i)
    }
}
