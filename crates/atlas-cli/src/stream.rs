// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON Lines entity stream reader.
//!
//! Collaborator glue, not the engine: one entity per line, tagged by
//! `kind`. Delivery order is the producer's contract — points must
//! precede the chains that reference them; this reader preserves file
//! order and does nothing else.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use atlas_graph::PointId;
use atlas_ingest::Entity;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RawEntity {
    Point { id: u64, lon: f64, lat: f64 },
    Chain { refs: Vec<u64>, category: String },
    Group {
        #[serde(default)]
        members: Vec<u64>,
    },
}

impl From<RawEntity> for Entity {
    fn from(raw: RawEntity) -> Self {
        match raw {
            RawEntity::Point { id, lon, lat } => Entity::Point {
                id: PointId(id),
                lon,
                lat,
            },
            RawEntity::Chain { refs, category } => Entity::Chain {
                refs: refs.into_iter().map(PointId).collect(),
                category,
            },
            RawEntity::Group { members } => Entity::Group { members },
        }
    }
}

/// Reads every entity from a JSON Lines file, preserving delivery order.
/// Blank lines are skipped.
pub fn read_entities(path: &Path) -> Result<Vec<Entity>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entities = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: RawEntity = serde_json::from_str(&line)
            .with_context(|| format!("entity stream line {}", lineno + 1))?;
        entities.push(raw.into());
    }
    Ok(entities)
}
