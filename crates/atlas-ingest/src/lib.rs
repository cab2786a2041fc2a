// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Entity stream ingestion for the Atlas routing graph.
//!
//! The caller owns the [`RoadGraph`] and [`IdIndex`] for the run and
//! lends both to an [`Ingestor`], which folds entities in strict delivery
//! order. There is no buffering, reordering, or two-pass reconciliation:
//! the producer's contract is that every point a chain references was
//! delivered before the chain itself.
//!
//! A chain of N point refs produces exactly `2·(N−1)` directed edges —
//! one forward and one reverse per consecutive pair — because the graph
//! models traversal in both directions by default.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self
)]

use atlas_graph::{
    encode_degrees, haversine_m, CoordError, EncodedCoord, IdIndex, PointId, RoadGraph,
    UnknownPointId,
};
use thiserror::Error;
use tracing::{debug, warn};

/// One record of the external entity stream.
///
/// Exactly two variants are consumed by the graph builder; [`Entity::Group`]
/// is delivered by real streams but explicitly ignored here.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// A geographic point: external id plus WGS84 degrees.
    Point {
        /// Stream-supplied identifier, unique per point.
        id: PointId,
        /// Longitude in degrees.
        lon: f64,
        /// Latitude in degrees.
        lat: f64,
    },
    /// An ordered path over previously delivered points.
    Chain {
        /// Point ids in path order.
        refs: Vec<PointId>,
        /// Classification label attached to every derived edge.
        category: String,
    },
    /// A grouping of other entities; not consumed by the graph builder.
    Group {
        /// Identifiers of the grouped members (opaque here).
        members: Vec<u64>,
    },
}

/// Error raised while folding the stream into the graph.
///
/// Every variant is fatal for the run: skipping a bad entity would
/// silently corrupt the produced topology, so the caller must abort and
/// persist nothing.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IngestError {
    /// A chain referenced a point id that was never delivered.
    #[error(transparent)]
    UnknownPoint(#[from] UnknownPointId),
    /// A point coordinate could not be encoded.
    #[error(transparent)]
    Coord(#[from] CoordError),
}

/// Folds stream entities into a caller-owned graph + id index pair.
pub struct Ingestor<'a> {
    graph: &'a mut RoadGraph,
    index: &'a mut IdIndex,
}

impl<'a> Ingestor<'a> {
    /// Borrows the run's graph and id index for ingestion.
    pub fn new(graph: &'a mut RoadGraph, index: &'a mut IdIndex) -> Self {
        Self { graph, index }
    }

    /// Ingests a single entity.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] on the first unresolvable chain ref or
    /// unencodable coordinate. A failed chain adds no partial edges.
    pub fn ingest(&mut self, entity: Entity) -> Result<(), IngestError> {
        match entity {
            Entity::Point { id, lon, lat } => self.ingest_point(id, lon, lat),
            Entity::Chain { refs, category } => self.ingest_chain(&refs, &category),
            Entity::Group { members } => {
                debug!(members = members.len(), "ignoring group entity");
                Ok(())
            }
        }
    }

    /// Drains an entity iterator, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first [`IngestError`]; entities after it are not
    /// consumed.
    pub fn ingest_all<I>(&mut self, entities: I) -> Result<(), IngestError>
    where
        I: IntoIterator<Item = Entity>,
    {
        for entity in entities {
            self.ingest(entity)?;
        }
        Ok(())
    }

    fn ingest_point(&mut self, id: PointId, lon: f64, lat: f64) -> Result<(), IngestError> {
        let coord = EncodedCoord {
            lon: encode_degrees(lon)?,
            lat: encode_degrees(lat)?,
        };
        match self.index.insert(id) {
            Some(idx) => {
                let stored = self.graph.add_vertex(id, coord);
                debug_assert_eq!(stored, idx, "id index and store out of lockstep");
            }
            // The producer contract says no entity arrives twice; a repeat
            // is noise, not a graph defect. First-seen coordinate wins.
            None => warn!(%id, "duplicate point id; keeping first-seen coordinate"),
        }
        Ok(())
    }

    fn ingest_chain(&mut self, refs: &[PointId], category: &str) -> Result<(), IngestError> {
        // Resolve the whole chain before touching the store: a failed
        // lookup must leave the graph exactly as it was.
        let mut path = Vec::with_capacity(refs.len());
        for id in refs {
            path.push(self.index.lookup(*id)?);
        }
        for pair in path.windows(2) {
            let (src, dst) = (pair[0], pair[1]);
            let (Some(a), Some(b)) = (self.graph.vertex(src), self.graph.vertex(dst)) else {
                debug_assert!(false, "resolved index missing from store: {src:?}/{dst:?}");
                continue;
            };
            let length_m = haversine_m(a.coord, b.coord);
            self.graph.add_edge(src, dst, length_m, category);
            self.graph.add_edge(dst, src, length_m, category);
        }
        debug!(refs = refs.len(), category, "chain ingested");
        Ok(())
    }
}
