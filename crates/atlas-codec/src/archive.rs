// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Whole-graph CBOR archive encoding and decoding.
//!
//! Wire layout, definite-length arrays throughout:
//!
//! ```text
//! archive = [version: u8, name: str, vertices: [vertex*], edges: [edge*]]
//! vertex  = [id: u64, lon: i32, lat: i32]
//! edge    = [src: u32, dst: u32, length_m: u32, category: str]
//! ```
//!
//! Adjacency is not stored — it is always recoverable from the edge list
//! plus the vertex count, and is rebuilt through the store on decode.

use atlas_graph::{EncodedCoord, PointId, RoadGraph, VertexIdx};
use minicbor::{Decoder, Encoder};
use thiserror::Error;

/// Archive wire version understood by this codec.
pub const ARCHIVE_VERSION: u8 = 1;

/// Upper bound on vertices accepted from the wire (dense `u32` indices).
pub const MAX_VERTICES: u64 = u32::MAX as u64;

/// Upper bound on edges accepted from the wire.
pub const MAX_EDGES: u64 = u32::MAX as u64;

/// Error raised by [`decode_graph`] on malformed or inconsistent input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    /// Truncated or malformed CBOR.
    #[error("malformed archive: {0}")]
    Corrupt(String),
    /// The archive was written by an unknown codec version.
    #[error("unsupported archive version: {0}")]
    UnsupportedVersion(u8),
    /// A declared element count exceeds what dense `u32` indices address.
    #[error("archive element count out of range: {0}")]
    CountOutOfRange(u64),
    /// An edge endpoint referenced a vertex index past the vertex count.
    #[error("edge {edge} endpoint {endpoint} out of range (vertex count {vertex_count})")]
    EndpointOutOfRange {
        /// Position of the offending edge in the archive.
        edge: u64,
        /// The out-of-range vertex index.
        endpoint: u32,
        /// Vertex count declared by the archive.
        vertex_count: u64,
    },
    /// Bytes remained after the archive payload.
    #[error("trailing bytes after archive")]
    TrailingBytes,
}

impl From<minicbor::decode::Error> for ArchiveError {
    fn from(err: minicbor::decode::Error) -> Self {
        Self::Corrupt(err.to_string())
    }
}

fn encode_graph_inner<W: minicbor::encode::Write>(
    e: &mut Encoder<W>,
    graph: &RoadGraph,
) -> Result<(), minicbor::encode::Error<W::Error>> {
    e.array(4)?;
    e.u8(ARCHIVE_VERSION)?;
    e.str(graph.name())?;
    e.array(graph.vertex_count() as u64)?;
    for v in graph.iter_vertices() {
        e.array(3)?;
        e.u64(v.id.0)?;
        e.i32(v.coord.lon)?;
        e.i32(v.coord.lat)?;
    }
    e.array(graph.edge_count() as u64)?;
    for edge in graph.iter_edges() {
        e.array(4)?;
        e.u32(edge.src.0)?;
        e.u32(edge.dst.0)?;
        e.u32(edge.length_m)?;
        e.str(&edge.category)?;
    }
    Ok(())
}

fn decode_graph_inner(d: &mut Decoder<'_>) -> Result<RoadGraph, ArchiveError> {
    let len = d
        .array()?
        .ok_or_else(|| ArchiveError::Corrupt("expected definite array for archive".into()))?;
    if len != 4 {
        return Err(ArchiveError::Corrupt(format!(
            "archive expected 4 fields, got {len}"
        )));
    }
    let version = d.u8()?;
    if version != ARCHIVE_VERSION {
        return Err(ArchiveError::UnsupportedVersion(version));
    }
    let name = d.str()?.to_owned();
    let mut graph = RoadGraph::new(name);

    let n_vertices = d
        .array()?
        .ok_or_else(|| ArchiveError::Corrupt("expected definite array for vertices".into()))?;
    if n_vertices > MAX_VERTICES {
        return Err(ArchiveError::CountOutOfRange(n_vertices));
    }
    for _ in 0..n_vertices {
        let len = d
            .array()?
            .ok_or_else(|| ArchiveError::Corrupt("expected definite array for vertex".into()))?;
        if len != 3 {
            return Err(ArchiveError::Corrupt(format!(
                "vertex expected 3 fields, got {len}"
            )));
        }
        let id = PointId(d.u64()?);
        let lon = d.i32()?;
        let lat = d.i32()?;
        graph.add_vertex(id, EncodedCoord { lon, lat });
    }

    let n_edges = d
        .array()?
        .ok_or_else(|| ArchiveError::Corrupt("expected definite array for edges".into()))?;
    if n_edges > MAX_EDGES {
        return Err(ArchiveError::CountOutOfRange(n_edges));
    }
    let vertex_count = graph.vertex_count() as u64;
    for i in 0..n_edges {
        let len = d
            .array()?
            .ok_or_else(|| ArchiveError::Corrupt("expected definite array for edge".into()))?;
        if len != 4 {
            return Err(ArchiveError::Corrupt(format!(
                "edge expected 4 fields, got {len}"
            )));
        }
        let src = d.u32()?;
        let dst = d.u32()?;
        let length_m = d.u32()?;
        let category = d.str()?.to_owned();
        for endpoint in [src, dst] {
            if u64::from(endpoint) >= vertex_count {
                return Err(ArchiveError::EndpointOutOfRange {
                    edge: i,
                    endpoint,
                    vertex_count,
                });
            }
        }
        graph.add_edge(VertexIdx(src), VertexIdx(dst), length_m, category);
    }
    Ok(graph)
}

/// Encodes a graph into archive bytes.
///
/// The byte sequence is fully materialized before any I/O can happen, so
/// a caller that fails later writes no partial archive.
pub fn encode_graph(graph: &RoadGraph) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut encoder = Encoder::new(&mut buf);
    #[allow(clippy::expect_used)]
    encode_graph_inner(&mut encoder, graph).expect("encoding should not fail");
    buf
}

/// Decodes archive bytes back into a graph.
///
/// # Errors
///
/// Returns [`ArchiveError`] for truncated or malformed CBOR, an unknown
/// wire version, element counts past the dense-index range, an edge
/// endpoint at or past the vertex count, or trailing bytes.
pub fn decode_graph(bytes: &[u8]) -> Result<RoadGraph, ArchiveError> {
    let mut decoder = Decoder::new(bytes);
    let graph = decode_graph_inner(&mut decoder)?;
    if decoder.position() < bytes.len() {
        return Err(ArchiveError::TrailingBytes);
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_graph() -> RoadGraph {
        let mut graph = RoadGraph::new("sample");
        let a = graph.add_vertex(PointId(1), EncodedCoord { lon: 100_000_000, lat: 200_000_000 });
        let b = graph.add_vertex(PointId(2), EncodedCoord { lon: 100_010_000, lat: 200_010_000 });
        let c = graph.add_vertex(PointId(3), EncodedCoord { lon: 100_020_000, lat: 200_020_000 });
        graph.add_edge(a, b, 157, "residential");
        graph.add_edge(b, a, 157, "residential");
        graph.add_edge(b, c, 157, "residential");
        graph.add_edge(c, b, 157, "residential");
        graph
    }

    #[test]
    fn roundtrip_preserves_structure() {
        let graph = sample_graph();
        let decoded = decode_graph(&encode_graph(&graph)).unwrap();
        assert_eq!(decoded, graph);
        // Adjacency is rebuilt, not stored: degrees must still match.
        assert_eq!(decoded.out_degree(VertexIdx(1)), 2);
    }

    #[test]
    fn roundtrip_of_empty_graph() {
        let graph = RoadGraph::new("empty");
        let decoded = decode_graph(&encode_graph(&graph)).unwrap();
        assert_eq!(decoded.vertex_count(), 0);
        assert_eq!(decoded.edge_count(), 0);
        assert_eq!(decoded.name(), "empty");
    }

    #[test]
    fn truncated_archive_is_rejected() {
        let bytes = encode_graph(&sample_graph());
        for cut in [1, bytes.len() / 2, bytes.len() - 1] {
            let result = decode_graph(&bytes[..cut]);
            assert!(
                matches!(result, Err(ArchiveError::Corrupt(_))),
                "cut at {cut} should fail, got {result:?}"
            );
        }
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = encode_graph(&sample_graph());
        bytes.push(0xFF);
        assert_eq!(decode_graph(&bytes), Err(ArchiveError::TrailingBytes));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut buf = Vec::new();
        let mut e = Encoder::new(&mut buf);
        e.array(4).unwrap();
        e.u8(ARCHIVE_VERSION + 1).unwrap();
        e.str("future").unwrap();
        e.array(0).unwrap();
        e.array(0).unwrap();
        assert_eq!(
            decode_graph(&buf),
            Err(ArchiveError::UnsupportedVersion(ARCHIVE_VERSION + 1))
        );
    }

    #[test]
    fn edge_endpoint_past_vertex_count_is_rejected() {
        let mut buf = Vec::new();
        let mut e = Encoder::new(&mut buf);
        e.array(4).unwrap();
        e.u8(ARCHIVE_VERSION).unwrap();
        e.str("bad").unwrap();
        // One vertex, one edge pointing past it.
        e.array(1).unwrap();
        e.array(3).unwrap();
        e.u64(1).unwrap();
        e.i32(0).unwrap();
        e.i32(0).unwrap();
        e.array(1).unwrap();
        e.array(4).unwrap();
        e.u32(0).unwrap();
        e.u32(7).unwrap();
        e.u32(12).unwrap();
        e.str("service").unwrap();
        assert_eq!(
            decode_graph(&buf),
            Err(ArchiveError::EndpointOutOfRange {
                edge: 0,
                endpoint: 7,
                vertex_count: 1,
            })
        );
    }

    #[test]
    fn oversized_vertex_count_is_rejected() {
        let mut buf = Vec::new();
        let mut e = Encoder::new(&mut buf);
        e.array(4).unwrap();
        e.u8(ARCHIVE_VERSION).unwrap();
        e.str("huge").unwrap();
        e.array(MAX_VERTICES + 1).unwrap();
        assert_eq!(
            decode_graph(&buf),
            Err(ArchiveError::CountOutOfRange(MAX_VERTICES + 1))
        );
    }

    #[test]
    fn garbage_input_is_rejected() {
        assert!(matches!(
            decode_graph(b"not an archive"),
            Err(ArchiveError::Corrupt(_))
        ));
        assert!(matches!(decode_graph(&[]), Err(ArchiveError::Corrupt(_))));
    }

    proptest! {
        #[test]
        fn roundtrip_holds_for_arbitrary_small_graphs(
            coords in proptest::collection::vec((any::<i32>(), any::<i32>()), 0..16),
            edge_seed in proptest::collection::vec((any::<u8>(), any::<u8>(), any::<u32>()), 0..32),
        ) {
            let mut graph = RoadGraph::new("prop");
            let mut verts = Vec::new();
            for (i, (lon, lat)) in coords.iter().enumerate() {
                verts.push(graph.add_vertex(
                    PointId(i as u64),
                    EncodedCoord { lon: *lon, lat: *lat },
                ));
            }
            for (a, b, len) in &edge_seed {
                if verts.is_empty() {
                    break;
                }
                let src = verts[*a as usize % verts.len()];
                let dst = verts[*b as usize % verts.len()];
                graph.add_edge(src, dst, *len, "prop");
            }
            let decoded = decode_graph(&encode_graph(&graph)).unwrap();
            prop_assert_eq!(decoded, graph);
        }
    }
}
