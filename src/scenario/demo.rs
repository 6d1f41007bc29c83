use crate::edit::mode::Selection;
use crate::graph::graph::Graph;
use crate::graph::vertex::{Point, Vertex, VertexId};
use crate::scenario::scenario::Scenario;

pub struct DemoScenario;

impl DemoScenario {
    //        1 ── 4
    //      ↗   ↘    ↘
    //    0       3 ──→ 6
    //      ↘   ↗    ↗
    //        2 ── 5
    pub fn build() -> Scenario {
        let mut graph = Graph::new();
        let points = [
            (0.08, 0.5),
            (0.3, 0.2),
            (0.3, 0.8),
            (0.55, 0.5),
            (0.7, 0.15),
            (0.7, 0.85),
            (0.92, 0.5),
        ];
        for (x, y) in points {
            graph.add_vertex(Vertex::new(Point::new(x, y)));
        }
        graph.set_vertex_cost(VertexId(3), 1.0);

        let links = [
            (0, 1, 2.0),
            (0, 2, 2.0),
            (1, 3, 1.0),
            (2, 3, 1.0),
            (1, 4, 4.0),
            (2, 5, 3.0),
            (3, 6, 2.0),
            (4, 6, 1.0),
            (5, 6, 2.0),
        ];
        for (from, to, cost) in links {
            // every endpoint was inserted above
            let _ = graph.add_edge(VertexId(from), VertexId(to), cost);
        }

        let selection = Selection {
            start: [VertexId(0)].into_iter().collect(),
            end: [VertexId(6)].into_iter().collect(),
        };
        Scenario { graph, selection }
    }
}
