//! Data channel access on [`Mesh`]: grouping of raw keys into logical channels.

use std::collections::BTreeMap;

use crate::data::{DataMap, DataValue};
use crate::mesh_error::MeshSeamError;
use crate::topology::mesh::Mesh;

const AXES: [&str; 3] = ["_x", "_y", "_z"];

fn has_triplet(map: &DataMap, base: &str) -> bool {
    AXES.iter().all(|axis| map.contains(&format!("{base}{axis}")))
}

/// Zero-padded index width for a stack of `len` channels.
fn stack_digits(len: usize) -> usize {
    if len <= 1 {
        0
    } else {
        (len - 1).to_string().len()
    }
}

/// A raw key seen as a member of a logical channel.
struct Member<'a> {
    name: &'a str,
    key: &'a str,
    stacked: bool,
    vector_base: Option<&'a str>,
}

impl Member<'_> {
    fn load(&self, map: &DataMap) -> DataValue {
        match self.vector_base {
            Some(base) => {
                let comp = |axis: &str| map.get(&format!("{base}{axis}")).unwrap_or(&[]).to_vec();
                let (x, y, z) = (comp("_x"), comp("_y"), comp("_z"));
                DataValue::Vector(
                    x.iter()
                        .zip(&y)
                        .zip(&z)
                        .map(|((&x, &y), &z)| [x, y, z])
                        .collect(),
                )
            }
            None => DataValue::Scalar(map.get(self.key).unwrap_or(&[]).to_vec()),
        }
    }
}

/// Members of all logical channels in raw key order. `_y`/`_z` partners of a
/// complete vector triplet are folded into their `_x` key.
fn members(map: &DataMap) -> Vec<Member<'_>> {
    map.keys()
        .filter_map(|key| {
            let vector_base = key.strip_suffix("_x").filter(|b| has_triplet(map, b));
            if vector_base.is_none()
                && ["_y", "_z"]
                    .iter()
                    .any(|axis| key.strip_suffix(axis).is_some_and(|b| has_triplet(map, b)))
            {
                return None;
            }
            let base = vector_base.unwrap_or(key);
            let (name, stacked) = match base.find('#') {
                Some(i) => (&base[..i], true),
                None => (base, false),
            };
            Some(Member {
                name,
                key,
                stacked,
                vector_base,
            })
        })
        .collect()
}

fn flatten(key: &str, value: DataValue, out: &mut Vec<(String, Vec<f64>)>) {
    match value {
        DataValue::Scalar(v) => out.push((key.to_string(), v)),
        DataValue::Vector(v) => {
            for (axis, suffix) in AXES.iter().enumerate() {
                out.push((format!("{key}{suffix}"), v.iter().map(|p| p[axis]).collect()));
            }
        }
        DataValue::Series(items) => {
            let width = stack_digits(items.len());
            for (i, item) in items.into_iter().enumerate() {
                flatten(&format!("{key}#{i:0width$}"), item, out);
            }
        }
    }
}

impl Mesh {
    pub fn data_map(&self) -> &DataMap {
        &self.data
    }

    pub fn data_map_mut(&mut self) -> &mut DataMap {
        &mut self.data
    }

    /// Stores a raw array under `key` without any size check.
    pub fn add_data(&mut self, key: impl Into<String>, values: Vec<f64>) {
        self.data.insert(key, values);
    }

    /// `true` if `key` is a raw key of the data map.
    pub fn have_data(&self, key: &str) -> bool {
        self.data.contains(key)
    }

    pub fn clear_data(&mut self) {
        self.data = DataMap::default();
    }

    fn check_data_size(&self, key: &str, len: usize) -> Result<(), MeshSeamError> {
        if len == self.node_count() || len == self.cell_count() || len == self.boundary_count() {
            return Ok(());
        }
        log::error!("could not add data `{key}`: {len} values do not fit the mesh ({self})");
        Err(MeshSeamError::DataSizeMismatch {
            key: key.to_string(),
            len,
            nodes: self.node_count(),
            cells: self.cell_count(),
            boundaries: self.boundary_count(),
        })
    }

    /// Stores a logical channel under `key`.
    ///
    /// Vectors are split into `key_x`, `key_y`, `key_z`; series into
    /// `key#i`. Every resulting array must have node, cell or boundary
    /// count length; nothing is stored if one does not.
    pub fn set_data(&mut self, key: &str, value: DataValue) -> Result<(), MeshSeamError> {
        let mut arrays = Vec::new();
        flatten(key, value, &mut arrays);
        for (raw_key, values) in &arrays {
            self.check_data_size(raw_key, values.len())?;
        }
        for (raw_key, values) in arrays {
            self.data.insert(raw_key, values);
        }
        Ok(())
    }

    /// Returns the channel `key`.
    ///
    /// A raw key is returned as is. Otherwise the logical channel of that name
    /// is assembled; several members come back as [`DataValue::Series`].
    pub fn data(&self, key: &str) -> Result<DataValue, MeshSeamError> {
        if let Some(values) = self.data.get(key) {
            return Ok(DataValue::Scalar(values.to_vec()));
        }
        let all = members(&self.data);
        let mut found: Vec<DataValue> = all
            .iter()
            .filter(|m| m.name == key)
            .map(|m| m.load(&self.data))
            .collect();
        match found.len() {
            0 => {
                let available: Vec<String> = self.data_keys().into_keys().collect();
                log::error!("the mesh does not have the requested data `{key}`");
                Err(MeshSeamError::MissingData {
                    key: key.to_string(),
                    available,
                })
            }
            1 => Ok(found.remove(0)),
            _ => Ok(DataValue::Series(found)),
        }
    }

    /// Unique channel names with the raw keys that make them up.
    pub fn data_keys(&self) -> BTreeMap<String, Vec<String>> {
        let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for m in members(&self.data) {
            out.entry(m.name.to_string())
                .or_default()
                .push(m.key.to_string());
        }
        out
    }

    /// All logical channels; stacked channels are always series.
    pub fn data_dict(&self) -> BTreeMap<String, DataValue> {
        let mut out = BTreeMap::new();
        let mut stacks: BTreeMap<String, Vec<DataValue>> = BTreeMap::new();
        for m in members(&self.data) {
            let value = m.load(&self.data);
            if m.stacked {
                stacks.entry(m.name.to_string()).or_default().push(value);
            } else {
                out.insert(m.name.to_string(), value);
            }
        }
        for (name, items) in stacks {
            out.insert(name, DataValue::Series(items));
        }
        out
    }
}
