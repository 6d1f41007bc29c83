use crate::edit::mode::Selection;
use crate::graph::graph::Graph;
use crate::graph::vertex::{Point, Vertex, VertexId};
use crate::scenario::scenario::Scenario;
use rand::{Rng, SeedableRng, rngs::StdRng};

pub struct RandomScenario;

impl RandomScenario {
    const NEIGHBOURS: usize = 3;

    /// Scatters `count` vertices and links each to its nearest neighbours in
    /// both directions with small integer costs, so ties show up often.
    /// Start is the leftmost vertex, end the rightmost.
    pub fn build(seed: u64, count: usize) -> Scenario {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::new();

        let ids = (0..count)
            .map(|_| {
                let position = Point::new(rng.gen_range(0.05..0.95), rng.gen_range(0.05..0.95));
                let vertex = if rng.gen_bool(0.2) {
                    Vertex::with_cost(position, rng.gen_range(1..4) as f64)
                } else {
                    Vertex::new(position)
                };
                graph.add_vertex(vertex)
            })
            .collect::<Vec<VertexId>>();

        let position = |graph: &Graph, id: VertexId| {
            graph
                .vertex(id)
                .map(|v| v.position())
                .unwrap_or(Point::new(0.0, 0.0))
        };

        for &from in &ids {
            let origin = position(&graph, from);
            let mut nearest = ids
                .iter()
                .filter(|id| **id != from)
                .map(|id| (*id, position(&graph, *id).distance_squared(origin)))
                .collect::<Vec<_>>();
            nearest.sort_by(|a, b| a.1.total_cmp(&b.1));
            for (to, _) in nearest.into_iter().take(Self::NEIGHBOURS) {
                if graph.contains_edge(from, to) {
                    continue;
                }
                let cost = rng.gen_range(1..6) as f64;
                let _ = graph.add_edge(from, to, cost);
                let _ = graph.add_edge(to, from, cost);
            }
        }

        let by_x = |pick_max: bool| {
            ids.iter()
                .copied()
                .map(|id| (id, position(&graph, id).x))
                .reduce(|a, b| if (b.1 > a.1) == pick_max { b } else { a })
                .map(|(id, _)| id)
        };
        let selection = Selection {
            start: by_x(false).into_iter().collect(),
            end: by_x(true).into_iter().collect(),
        };
        Scenario { graph, selection }
    }
}
