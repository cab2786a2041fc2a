// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Atlas core: routing graph store, fixed-point coordinates, id interning.
//!
//! This crate holds the pure data side of the graph builder: the
//! fixed-point degree codec, the external-id → dense-index map, and the
//! append-only [`RoadGraph`] container. It contains NO serialization
//! logic — that lives in `atlas-codec` — and NO stream handling — that
//! lives in `atlas-ingest`.
//!
//! # Design
//!
//! Vertices and edges are addressed by opaque dense indices
//! ([`VertexIdx`], [`EdgeIdx`]) rather than references, so the store can
//! be mutated and serialized without aliasing hazards. Both collections
//! are append-only for the lifetime of a run; removal is not supported.
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

mod coord;
mod dist;
mod ident;
mod store;

pub use coord::{decode_degrees, encode_degrees, CoordError, EncodedCoord, COORD_SCALE};
pub use dist::haversine_m;
pub use ident::{IdIndex, PointId, UnknownPointId, VertexIdx};
pub use store::{Edge, EdgeIdx, RoadGraph, Vertex};
