// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Versioned CBOR archive codec for the Atlas routing graph.
//!
//! This crate provides:
//! - [`encode_graph`] / [`decode_graph`] for the whole-graph archive
//! - structural validation on decode (version, counts, edge endpoints)
//!
//! # Design
//!
//! Serialization is deliberately separated from the graph store. This
//! keeps `atlas-graph` pure of the wire format, and lets the codec
//! validate everything before the store sees a byte.

mod archive;

pub use archive::{
    decode_graph, encode_graph, ArchiveError, ARCHIVE_VERSION, MAX_EDGES, MAX_VERTICES,
};
