//! Named data channels attached to a mesh.
//!
//! Raw storage is a flat map from key to `f64` array. Two naming conventions
//! group several raw keys into one logical channel:
//!
//! * `name_x`, `name_y`, `name_z` form the vector channel `name`;
//! * `name#0`, `name#1`, … form the stacked channel `name` (indices are zero
//!   padded so lexicographic order equals numeric order).
//!
//! See [`Mesh::set_data`](crate::topology::mesh::Mesh::set_data) and
//! [`Mesh::data`](crate::topology::mesh::Mesh::data).

pub mod channels;

use std::collections::BTreeMap;

/// Flat key → array storage.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataMap {
    entries: BTreeMap<String, Vec<f64>>,
}

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`, returning the previous array.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<f64>) -> Option<Vec<f64>> {
        self.entries.insert(key.into(), values)
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<f64>> {
        self.entries.remove(key)
    }

    /// Raw keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A logical data channel.
#[derive(Clone, Debug, PartialEq)]
pub enum DataValue {
    /// One value per entity.
    Scalar(Vec<f64>),
    /// One 3-vector per entity.
    Vector(Vec<[f64; 3]>),
    /// A stack of channels, e.g. a time series.
    Series(Vec<DataValue>),
}

impl DataValue {
    /// Extent of the first axis.
    pub fn len(&self) -> usize {
        match self {
            DataValue::Scalar(v) => v.len(),
            DataValue::Vector(v) => v.len(),
            DataValue::Series(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Array shape; series with differently shaped members only report their length.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            DataValue::Scalar(v) => vec![v.len()],
            DataValue::Vector(v) => vec![v.len(), 3],
            DataValue::Series(items) => {
                let mut shape = vec![items.len()];
                if let Some(first) = items.first() {
                    let inner = first.shape();
                    if items.iter().all(|i| i.shape() == inner) {
                        shape.extend(inner);
                    }
                }
                shape
            }
        }
    }

    /// Shape rendered as a tuple, e.g. `(3,)` or `(2, 5)`.
    pub fn shape_string(&self) -> String {
        let shape = self.shape();
        if shape.len() == 1 {
            format!("({},)", shape[0])
        } else {
            let parts: Vec<String> = shape.iter().map(usize::to_string).collect();
            format!("({})", parts.join(", "))
        }
    }
}
