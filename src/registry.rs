use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::grid::{GridCell, GridSpec};

/// What clicking a location's marker does. Exactly one record in the
/// shipped data carries `Transition`; everything else opens the info panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkerBehavior {
    #[default]
    ShowPanel,
    Transition,
}

/// One place on the world map, as authored in the locations file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    pub name: String,
    /// Free-form classification tag ("keep", "town", ...) - informational only
    pub category: String,
    pub grid: GridCell,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub behavior: MarkerBehavior,
}

// Locations bundled with the binary; an external file can override them
const BUILTIN_LOCATIONS: &str = include_str!("../data/locations.json");

/// Fixed, ordered collection of locations. Built once at startup and never
/// mutated afterwards; iteration follows authoring order.
pub struct LocationRegistry {
    records: Vec<LocationRecord>,
    by_id: HashMap<String, usize>,
}

impl LocationRegistry {
    /// Builds the registry, rejecting duplicate ids. Grid cells outside the
    /// given spec are reported as authoring warnings; a misplaced marker is
    /// not worth refusing to start over.
    pub fn new(records: Vec<LocationRecord>, spec: &GridSpec) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if by_id.insert(record.id.clone(), index).is_some() {
                anyhow::bail!("Duplicate location id: {}", record.id);
            }
            if !spec.contains(record.grid) {
                eprintln!(
                    "⚠️  Location '{}' has grid [{}, {}] outside the {}x{} grid",
                    record.id, record.grid.col, record.grid.row, spec.cols, spec.rows
                );
            }
        }
        Ok(Self { records, by_id })
    }

    /// Loads the built-in location data shipped inside the binary.
    pub fn builtin(spec: &GridSpec) -> Result<Self> {
        let records: Vec<LocationRecord> = serde_json::from_str(BUILTIN_LOCATIONS)
            .context("Failed to parse built-in locations.json")?;
        Self::new(records, spec)
    }

    /// Loads locations from an external JSON file (same shape as the
    /// built-in data), for authoring without rebuilding.
    pub fn from_file<P: AsRef<Path>>(path: P, spec: &GridSpec) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read locations file {}", path.as_ref().display())
        })?;
        let records: Vec<LocationRecord> =
            serde_json::from_str(&content).context("Failed to parse locations file")?;
        Self::new(records, spec)
    }

    pub fn get(&self, id: &str) -> Option<&LocationRecord> {
        self.by_id.get(id).map(|&index| &self.records[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
