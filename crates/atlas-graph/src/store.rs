// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Append-only directed graph container for the routing network.

use crate::coord::EncodedCoord;
use crate::ident::{PointId, VertexIdx};

/// Position of an edge in the store's edge list (insertion order).
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EdgeIdx(pub u32);

impl EdgeIdx {
    /// Returns the index as a `usize` for slice addressing.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A graph vertex: external id plus encoded coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    /// External identifier supplied by the stream.
    pub id: PointId,
    /// Encoded `(lon, lat)` pair.
    pub coord: EncodedCoord,
}

/// A directed edge with a derived length and a category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Source vertex.
    pub src: VertexIdx,
    /// Destination vertex.
    pub dst: VertexIdx,
    /// Great-circle length between the endpoints, in whole meters.
    pub length_m: u32,
    /// Classification label copied from the originating chain.
    pub category: String,
}

/// Directed routing graph: vertices and edges in arrival order, plus
/// out-adjacency for degree queries.
///
/// The store is append-only for the duration of a run. Adjacency is
/// derived data — it is maintained here for [`RoadGraph::out_degree`] but
/// is always recoverable from the edge list, so codecs must not persist
/// it redundantly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadGraph {
    /// Graph-level metadata label, immutable after construction.
    name: String,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    /// Outbound edge indices per vertex, in insertion order.
    out: Vec<Vec<EdgeIdx>>,
}

impl RoadGraph {
    /// Creates an empty graph carrying `name` as its metadata label.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            edges: Vec::new(),
            out: Vec::new(),
        }
    }

    /// Returns the metadata label set at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a vertex and returns its dense index.
    ///
    /// The caller (normally the ingestor) keeps this in lockstep with
    /// [`crate::IdIndex::insert`]; the store itself does not deduplicate.
    pub fn add_vertex(&mut self, id: PointId, coord: EncodedCoord) -> VertexIdx {
        debug_assert!(self.vertices.len() < u32::MAX as usize);
        #[allow(clippy::cast_possible_truncation)]
        let idx = VertexIdx(self.vertices.len() as u32);
        self.vertices.push(Vertex { id, coord });
        self.out.push(Vec::new());
        idx
    }

    /// Appends a directed edge and returns its handle.
    ///
    /// Parallel edges are not deduplicated. `src` and `dst` must have been
    /// returned by [`RoadGraph::add_vertex`] on this store.
    pub fn add_edge(
        &mut self,
        src: VertexIdx,
        dst: VertexIdx,
        length_m: u32,
        category: impl Into<String>,
    ) -> EdgeIdx {
        debug_assert!(src.as_usize() < self.vertices.len());
        debug_assert!(dst.as_usize() < self.vertices.len());
        debug_assert!(self.edges.len() < u32::MAX as usize);
        #[allow(clippy::cast_possible_truncation)]
        let idx = EdgeIdx(self.edges.len() as u32);
        self.edges.push(Edge {
            src,
            dst,
            length_m,
            category: category.into(),
        });
        self.out[src.as_usize()].push(idx);
        idx
    }

    /// Number of vertices in the store.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of directed edges in the store.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges leaving `idx`.
    pub fn out_degree(&self, idx: VertexIdx) -> usize {
        self.out.get(idx.as_usize()).map_or(0, Vec::len)
    }

    /// Returns a vertex by index when it exists.
    pub fn vertex(&self, idx: VertexIdx) -> Option<&Vertex> {
        self.vertices.get(idx.as_usize())
    }

    /// Returns an edge by handle when it exists.
    pub fn edge(&self, idx: EdgeIdx) -> Option<&Edge> {
        self.edges.get(idx.as_usize())
    }

    /// Iterate over all vertices in insertion order.
    pub fn iter_vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Iterate over all edges in insertion order.
    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Iterate over the edges leaving `idx`, in insertion order.
    pub fn edges_from(&self, idx: VertexIdx) -> impl Iterator<Item = &Edge> {
        self.out
            .get(idx.as_usize())
            .into_iter()
            .flatten()
            .filter_map(|e| self.edges.get(e.as_usize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lon: i32, lat: i32) -> EncodedCoord {
        EncodedCoord { lon, lat }
    }

    #[test]
    fn vertices_get_dense_indices_in_arrival_order() {
        let mut graph = RoadGraph::new("test");
        let a = graph.add_vertex(PointId(10), coord(1, 2));
        let b = graph.add_vertex(PointId(20), coord(3, 4));
        assert_eq!(a, VertexIdx(0));
        assert_eq!(b, VertexIdx(1));
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.vertex(a).map(|v| v.id), Some(PointId(10)));
    }

    #[test]
    fn parallel_edges_are_kept() {
        let mut graph = RoadGraph::new("test");
        let a = graph.add_vertex(PointId(1), coord(0, 0));
        let b = graph.add_vertex(PointId(2), coord(0, 0));
        graph.add_edge(a, b, 5, "service");
        graph.add_edge(a, b, 5, "service");
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.out_degree(a), 2);
        assert_eq!(graph.out_degree(b), 0);
    }

    #[test]
    fn edges_from_follows_insertion_order() {
        let mut graph = RoadGraph::new("test");
        let a = graph.add_vertex(PointId(1), coord(0, 0));
        let b = graph.add_vertex(PointId(2), coord(0, 0));
        let c = graph.add_vertex(PointId(3), coord(0, 0));
        graph.add_edge(a, b, 1, "x");
        graph.add_edge(a, c, 2, "y");
        let dsts: Vec<_> = graph.edges_from(a).map(|e| e.dst).collect();
        assert_eq!(dsts, vec![b, c]);
    }

    #[test]
    fn name_is_set_at_construction() {
        let graph = RoadGraph::new("bavaria");
        assert_eq!(graph.name(), "bavaria");
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
