//! Plain-text graph format.
//!
//! ```text
//! {
//! (<id> <x> <y> <cost>)
//! }
//! {
//! (<from> <to> <cost>)
//! }
//! ```
//!
//! Unset costs are written as `NaN`. Set costs must be finite and not
//! negative, coordinates must lie in `[0, 1]`. Only the first two brace
//! groups are read; anything after them is ignored.

use crate::error::AppError;
use crate::graph::edge::Edge;
use crate::graph::graph::{Graph, GraphError};
use crate::graph::vertex::{Point, Vertex, VertexId};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("group {0} is missing or not closed")]
    MissingGroup(usize),
    #[error("malformed record on line {line}")]
    MalformedRecord { line: usize },
    #[error("invalid number {token:?} on line {line}")]
    InvalidNumber { line: usize, token: String },
    #[error("vertex {0} is defined twice")]
    DuplicateVertex(VertexId),
    #[error("edge {from}->{to} references a missing vertex")]
    DanglingEdge { from: VertexId, to: VertexId },
}

pub fn encode_to_string(graph: &Graph) -> String {
    let mut out = String::from("{\n");
    for (id, vertex) in graph.vertices() {
        let p = vertex.position();
        let _ = writeln!(out, "({} {} {} {})", id, p.x, p.y, vertex.cost());
    }
    out.push_str("}\n{\n");
    for edge in graph.edges() {
        let _ = writeln!(out, "({} {} {})", edge.from(), edge.to(), edge.cost());
    }
    out.push_str("}\n");
    out
}

pub fn encode<W: Write>(graph: &Graph, mut writer: W) -> io::Result<()> {
    writer.write_all(encode_to_string(graph).as_bytes())?;
    writer.flush()
}

pub fn decode(text: &str) -> Result<Graph, FormatError> {
    let (vertex_group, rest) = next_group(text, 0, 1)?;
    let (edge_group, _) = next_group(text, rest, 2)?;

    let vertices = records(text, vertex_group, 4)?
        .into_iter()
        .map(|(line, fields)| {
            let id = parse::<usize>(fields[0], line)?;
            let x = parse_coordinate(fields[1], line)?;
            let y = parse_coordinate(fields[2], line)?;
            let cost = parse_cost(fields[3], line)?;
            Ok((VertexId(id), Vertex::with_cost(Point::new(x, y), cost)))
        })
        .collect::<Result<Vec<_>, FormatError>>()?;

    let edges = records(text, edge_group, 3)?
        .into_iter()
        .map(|(line, fields)| {
            let from = parse::<usize>(fields[0], line)?;
            let to = parse::<usize>(fields[1], line)?;
            let cost = parse_cost(fields[2], line)?;
            Ok(Edge::new(VertexId(from), VertexId(to), cost))
        })
        .collect::<Result<Vec<_>, FormatError>>()?;

    let lookup = edges.clone();
    Graph::from_parts(vertices, edges).map_err(|e| match e {
        GraphError::DuplicateVertex(id) => FormatError::DuplicateVertex(id),
        GraphError::InvalidReference(id) => {
            let edge = lookup
                .iter()
                .find(|e| e.from() == id || e.to() == id)
                .copied()
                .unwrap_or(Edge::unweighted(id, id));
            FormatError::DanglingEdge {
                from: edge.from(),
                to: edge.to(),
            }
        }
    })
}

pub fn load(path: &Path) -> Result<Graph, AppError> {
    let text = fs::read_to_string(path)?;
    let graph = decode(&text)
        .inspect_err(|e| warn!(path = %path.display(), error = %e, "rejected graph file"))?;
    info!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    Ok(graph)
}

pub fn save(graph: &Graph, path: &Path) -> Result<(), AppError> {
    if graph.is_empty() {
        return Err(AppError::EmptyGraph);
    }
    encode(graph, fs::File::create(path)?)?;
    info!(path = %path.display(), vertices = graph.vertex_count(), "graph saved");
    Ok(())
}

type Span = (usize, usize);

/// Byte range between the next `{` at or after `from` and the first `}`
/// following it, plus the offset just past that `}`.
fn next_group(text: &str, from: usize, group: usize) -> Result<(Span, usize), FormatError> {
    let open = text[from..]
        .find('{')
        .map(|i| from + i)
        .ok_or(FormatError::MissingGroup(group))?;
    let close = text[open..]
        .find('}')
        .map(|i| open + i)
        .ok_or(FormatError::MissingGroup(group))?;
    Ok(((open + 1, close), close + 1))
}

fn records(text: &str, (start, end): Span, arity: usize) -> Result<Vec<(usize, Vec<&str>)>, FormatError> {
    let mut out = Vec::new();
    let mut pos = start;
    let mut line = text[..start].matches('\n').count() + 1;
    let mut counted = start;
    while pos < end {
        let rest = &text[pos..end];
        let skipped = rest.len() - rest.trim_start().len();
        pos += skipped;
        if pos >= end {
            break;
        }
        line += text[counted..pos].matches('\n').count();
        counted = pos;
        if !text[pos..end].starts_with('(') {
            return Err(FormatError::MalformedRecord { line });
        }
        let close = text[pos..end]
            .find(')')
            .map(|i| pos + i)
            .ok_or(FormatError::MalformedRecord { line })?;
        let fields = text[pos + 1..close].split_whitespace().collect::<Vec<&str>>();
        if fields.len() != arity {
            return Err(FormatError::MalformedRecord { line });
        }
        out.push((line, fields));
        pos = close + 1;
    }
    Ok(out)
}

fn parse_cost(token: &str, line: usize) -> Result<f64, FormatError> {
    let cost = parse::<f64>(token, line)?;
    if cost.is_nan() || (cost.is_finite() && cost >= 0.0) {
        Ok(cost)
    } else {
        Err(invalid(token, line))
    }
}

fn parse_coordinate(token: &str, line: usize) -> Result<f64, FormatError> {
    let value = parse::<f64>(token, line)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(invalid(token, line))
    }
}

fn invalid(token: &str, line: usize) -> FormatError {
    FormatError::InvalidNumber {
        line,
        token: token.to_string(),
    }
}

fn parse<T: FromStr>(token: &str, line: usize) -> Result<T, FormatError> {
    token.parse().map_err(|_| invalid(token, line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn sample() -> Graph {
        let mut graph = Graph::new();
        let a = graph.add_vertex(Vertex::new(Point::new(0.25, 0.5)));
        let b = graph.add_vertex(Vertex::with_cost(Point::new(0.75, 0.125), 3.5));
        let c = graph.add_vertex(Vertex::new(Point::new(0.1, 0.9)));
        graph.remove_vertex(a);
        graph.add_edge(b, c, 2.0).unwrap();
        graph.add_edge(c, b, f64::NAN).unwrap();
        graph
    }

    #[test]
    fn test_encoded_shape() {
        let expected = "{\n(1 0.75 0.125 3.5)\n(2 0.1 0.9 NaN)\n}\n{\n(1 2 2)\n(2 1 NaN)\n}\n";
        assert_eq!(expected, encode_to_string(&sample()));
    }

    #[test]
    fn test_decode_keeps_ids_and_costs() {
        let mut graph = decode(&encode_to_string(&sample())).unwrap();
        assert!(!graph.contains_vertex(VertexId(0)));
        let b = graph.vertex(VertexId(1)).unwrap();
        assert_relative_eq!(3.5, b.cost());
        assert_relative_eq!(0.125, b.position().y);
        assert!(!graph.vertex(VertexId(2)).unwrap().has_cost());
        assert_eq!(Some(2.0), graph.edge_cost(VertexId(1), VertexId(2)));
        assert!(graph.edge_cost(VertexId(2), VertexId(1)).unwrap().is_nan());
        assert_eq!(1, graph.incoming(VertexId(2)).count());
        // the free-id counter resumes after the highest id
        assert_eq!(VertexId(3), graph.add_vertex(Vertex::new(Point::new(0.5, 0.5))));
    }

    #[test]
    fn test_encode_is_stable_through_decode() {
        let once = encode_to_string(&sample());
        let twice = encode_to_string(&decode(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_trailing_content_is_ignored() {
        let text = "{\n(0 0.5 0.5 NaN)\n}\n{\n}\ntrailing { junk";
        assert_eq!(1, decode(text).unwrap().vertex_count());
    }

    #[test]
    fn test_empty_graph() {
        let graph = decode(&encode_to_string(&Graph::new())).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_missing_groups() {
        assert_eq!(Err(FormatError::MissingGroup(1)), decode("").map(|_| ()));
        assert_eq!(
            Err(FormatError::MissingGroup(2)),
            decode("{\n(0 0.5 0.5 1)\n}\n").map(|_| ())
        );
        assert_eq!(Err(FormatError::MissingGroup(1)), decode("{\n(0 0.5").map(|_| ()));
    }

    #[test]
    fn test_malformed_records() {
        assert_eq!(
            Err(FormatError::MalformedRecord { line: 3 }),
            decode("{\n(0 0.5 0.5 1)\n(1 0.5 0.5)\n}\n{\n}\n").map(|_| ())
        );
        assert_eq!(
            Err(FormatError::MalformedRecord { line: 2 }),
            decode("{\nvertex\n}\n{\n}\n").map(|_| ())
        );
        assert_eq!(
            Err(FormatError::InvalidNumber {
                line: 2,
                token: "x".to_string()
            }),
            decode("{\n(0 x 0.5 1)\n}\n{\n}\n").map(|_| ())
        );
        assert_eq!(
            Err(FormatError::InvalidNumber {
                line: 5,
                token: "-1".to_string()
            }),
            decode("{\n(0 0.5 0.5 1)\n}\n{\n(-1 0 1)\n}\n").map(|_| ())
        );
    }

    #[test]
    fn test_out_of_range_numbers() {
        let rejected = |text: &str, line: usize, token: &str| {
            assert_eq!(
                Err(FormatError::InvalidNumber {
                    line,
                    token: token.to_string()
                }),
                decode(text).map(|_| ())
            );
        };
        rejected("{\n(0 0.5 0.5 -2)\n}\n{\n}\n", 2, "-2");
        rejected("{\n(0 1.5 0.5 1)\n}\n{\n}\n", 2, "1.5");
        rejected("{\n(0 0.5 0.5 1)\n(1 0.5 0.5 1)\n}\n\n{\n(0 1 2)\n\n(1 0 inf)\n}\n", 9, "inf");
        assert!(decode("{\n(0 0 1 NaN)\n(1 1 0 0)\n}\n{\n(0 1 0)\n}\n").is_ok());
    }

    #[test]
    fn test_reference_errors() {
        assert_eq!(
            Err(FormatError::DuplicateVertex(VertexId(0))),
            decode("{\n(0 0.5 0.5 1)\n(0 0.1 0.1 1)\n}\n{\n}\n").map(|_| ())
        );
        assert_eq!(
            Err(FormatError::DanglingEdge {
                from: VertexId(0),
                to: VertexId(4)
            }),
            decode("{\n(0 0.5 0.5 1)\n}\n{\n(0 4 1)\n}\n").map(|_| ())
        );
    }

    #[test]
    fn test_save_refuses_empty_graph() {
        let path = std::env::temp_dir().join("pathgraph-empty-save.txt");
        assert!(matches!(save(&Graph::new(), &path), Err(AppError::EmptyGraph)));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("pathgraph-{}.txt", std::process::id()));
        save(&sample(), &path).unwrap();
        let graph = load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(encode_to_string(&sample()), encode_to_string(&graph));
    }

    proptest! {
        #[test]
        fn random_graphs_round_trip(
            points in prop::collection::vec((0.0..1.0f64, 0.0..1.0f64, prop::option::of(0.0..100.0f64)), 1..12),
            links in prop::collection::vec((0..12usize, 0..12usize, 0.0..50.0f64), 0..30),
        ) {
            let mut graph = Graph::new();
            for (x, y, cost) in &points {
                graph.add_vertex(Vertex::with_cost(Point::new(*x, *y), cost.unwrap_or(f64::NAN)));
            }
            for (from, to, cost) in links {
                let _ = graph.add_edge(VertexId(from), VertexId(to), cost);
            }
            let decoded = decode(&encode_to_string(&graph)).unwrap();
            prop_assert_eq!(graph.vertex_count(), decoded.vertex_count());
            for (id, vertex) in graph.vertices() {
                let other = decoded.vertex(id).unwrap();
                prop_assert_eq!(vertex.position(), other.position());
                prop_assert!(vertex.cost() == other.cost() || (vertex.cost().is_nan() && other.cost().is_nan()));
            }
            prop_assert_eq!(graph.edges().collect::<Vec<_>>(), decoded.edges().collect::<Vec<_>>());
            for edge in graph.edges() {
                prop_assert_eq!(Some(edge.cost()), decoded.edge_cost(edge.from(), edge.to()));
            }
        }
    }
}
