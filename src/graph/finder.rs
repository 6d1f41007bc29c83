use crate::graph::edge::Edge;
use crate::graph::graph::Graph;
use crate::graph::vertex::{Point, VertexId};

/// Picks the vertex closest to a point, within a radius given in normalized
/// canvas units.
pub struct VertexFinder {
    radius_squared: f64,
}

impl VertexFinder {
    pub fn new(radius: f64) -> Self {
        Self {
            radius_squared: radius * radius,
        }
    }

    pub fn find(&self, position: Point, graph: &Graph) -> Option<VertexId> {
        graph
            .vertices()
            .map(|(id, v)| (id, v.position().distance_squared(position)))
            .filter(|(_, d)| *d < self.radius_squared)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

/// Picks the edge whose segment passes closest to a point.
pub struct EdgeFinder {
    radius_squared: f64,
}

impl EdgeFinder {
    pub fn new(radius: f64) -> Self {
        Self {
            radius_squared: radius * radius,
        }
    }

    pub fn find(&self, position: Point, graph: &Graph) -> Option<Edge> {
        graph
            .edges()
            .filter_map(|edge| {
                let a = graph.vertex(edge.from())?.position();
                let b = graph.vertex(edge.to())?.position();
                Some((edge, segment_distance_squared(a, b, position)))
            })
            .filter(|(_, d)| *d < self.radius_squared)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(edge, _)| edge)
    }
}

fn segment_distance_squared(a: Point, b: Point, p: Point) -> f64 {
    let px = b.x - a.x;
    let py = b.y - a.y;
    let len = px * px + py * py;
    if len == 0.0 {
        return a.distance_squared(p);
    }
    let u = (((p.x - a.x) * px + (p.y - a.y) * py) / len).clamp(0.0, 1.0);
    Point::new(a.x + u * px, a.y + u * py).distance_squared(p)
}
