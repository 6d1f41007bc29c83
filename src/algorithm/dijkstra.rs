use crate::algorithm::step::GraphStep;
use crate::graph::edge::Edge;
use crate::graph::graph::Graph;
use crate::graph::vertex::VertexId;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use tracing::{debug, warn};

const DEFAULT_VERTEX_COST: f64 = 0.0;
const DEFAULT_EDGE_COST: f64 = 1.0;

#[derive(Debug)]
struct QueueEntry {
    cost: f64,
    vertex: VertexId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // reversed so the max-heap pops the cheapest entry, lower id first on ties
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

fn or_default(cost: f64, default: f64) -> f64 {
    if cost.is_nan() { default } else { cost }
}

/// Shortest paths from a start set to an end set.
///
/// Distances are computed once, backwards from the end vertices over the
/// reversed edges, so `dist[v]` is the cheapest cost of getting from `v` to
/// any end vertex. Leaving a vertex costs its vertex cost (unset: 0) plus the
/// edge cost (unset: 1). Every successor reaching the same distance is kept,
/// so equal-cost branches are all visible to [`Dijkstra::generate`].
///
/// The engine copies what it needs out of the graph; the graph is never
/// modified and may change afterwards without affecting the result.
#[derive(Clone, Debug)]
pub struct Dijkstra {
    start: BTreeSet<VertexId>,
    end: BTreeSet<VertexId>,
    dist: BTreeMap<VertexId, f64>,
    /// `successors[p][v]` is the cost of edge `p -> v` on a cheapest path
    successors: BTreeMap<VertexId, BTreeMap<VertexId, f64>>,
    path_cost: f64,
}

impl Dijkstra {
    pub fn new(
        start: impl IntoIterator<Item = VertexId>,
        end: impl IntoIterator<Item = VertexId>,
        graph: &Graph,
    ) -> Self {
        let start = known_vertices(start, graph, "start");
        let end = known_vertices(end, graph, "end");

        let mut dist = BTreeMap::new();
        let mut successors: BTreeMap<VertexId, BTreeMap<VertexId, f64>> = BTreeMap::new();
        let mut settled = BTreeSet::new();
        let mut queue = BinaryHeap::new();

        for id in &end {
            dist.insert(*id, 0.0);
            queue.push(QueueEntry { cost: 0.0, vertex: *id });
        }

        while let Some(QueueEntry { cost, vertex }) = queue.pop() {
            if cost > dist.get(&vertex).copied().unwrap_or(f64::INFINITY) {
                continue;
            }
            if !settled.insert(vertex) {
                continue;
            }
            for (pred, edge_cost) in graph.incoming(vertex) {
                let Some(pred_vertex) = graph.vertex(pred) else {
                    continue;
                };
                let candidate = cost
                    + or_default(pred_vertex.cost(), DEFAULT_VERTEX_COST)
                    + or_default(edge_cost, DEFAULT_EDGE_COST);
                let best = dist.get(&pred).copied().unwrap_or(f64::INFINITY);

                if candidate < best && !settled.contains(&pred) {
                    dist.insert(pred, candidate);
                    successors.insert(pred, BTreeMap::from([(vertex, edge_cost)]));
                    queue.push(QueueEntry {
                        cost: candidate,
                        vertex: pred,
                    });
                } else if candidate == best {
                    successors.entry(pred).or_default().insert(vertex, edge_cost);
                }
            }
        }

        let path_cost = start
            .iter()
            .filter_map(|id| dist.get(id))
            .fold(f64::INFINITY, |acc, d| acc.min(*d));
        debug!(
            start = start.len(),
            end = end.len(),
            reached = dist.len(),
            path_cost,
            "shortest paths computed"
        );

        Self {
            start,
            end,
            dist,
            successors,
            path_cost,
        }
    }

    /// Cheapest start-to-end cost, infinite when no path exists.
    pub fn path_cost(&self) -> f64 {
        self.path_cost
    }

    pub fn has_path(&self) -> bool {
        self.path_cost.is_finite()
    }

    /// Cost from `id` to the nearest end vertex.
    pub fn distance(&self, id: VertexId) -> Option<f64> {
        self.dist.get(&id).copied()
    }

    pub fn successors(&self, id: VertexId) -> impl Iterator<Item = Edge> + '_ {
        self.successors
            .get(&id)
            .into_iter()
            .flat_map(move |m| m.iter().map(move |(to, cost)| Edge::new(id, *to, *cost)))
    }

    /// Frames of the expansion from the start set along every cheapest path.
    ///
    /// Frame 0 shows the start set. Each following frame moves the ready part
    /// of the wavefront to `used` and shows the edges it fans out over. A
    /// vertex is ready once every cheapest-path edge leading into it has been
    /// traversed, so a vertex reached early by one branch waits for its
    /// equal-cost siblings. End vertices are absorbed into `used` as soon as
    /// they are reached. The last frame has no current vertices or edges.
    ///
    /// Returns an empty list when no path exists. Calling it again yields the
    /// same frames.
    pub fn generate(&self) -> Vec<GraphStep> {
        if !self.has_path() {
            return Vec::new();
        }

        let optimal: BTreeSet<VertexId> = self
            .start
            .iter()
            .filter(|id| self.dist.get(*id) == Some(&self.path_cost))
            .copied()
            .collect();
        let mut remaining = self.incoming_counts(&optimal);

        let mut steps = vec![self.step(
            self.start.clone(),
            BTreeSet::new(),
            BTreeSet::new(),
            BTreeSet::new(),
        )];

        let mut wavefront = optimal.clone();
        let mut used_vertices: BTreeSet<VertexId> =
            self.start.difference(&optimal).copied().collect();
        let mut used_edges = BTreeSet::new();

        loop {
            let mut ready: Vec<VertexId> = wavefront
                .iter()
                .filter(|id| remaining.get(*id).copied().unwrap_or(0) == 0)
                .copied()
                .collect();
            if ready.is_empty() {
                // only zero-cost cycles get here
                ready = wavefront.iter().copied().collect();
            }

            let mut current_edges = BTreeSet::new();
            for id in &ready {
                wavefront.remove(id);
                used_vertices.insert(*id);
                if self.end.contains(id) {
                    continue;
                }
                for edge in self.successors(*id) {
                    let child = edge.to();
                    current_edges.insert(edge);
                    if let Some(count) = remaining.get_mut(&child) {
                        *count = count.saturating_sub(1);
                    }
                    if self.end.contains(&child) {
                        used_vertices.insert(child);
                    } else if !used_vertices.contains(&child) {
                        wavefront.insert(child);
                    }
                }
            }

            if wavefront.is_empty() {
                used_edges.extend(current_edges);
                steps.push(self.step(BTreeSet::new(), BTreeSet::new(), used_vertices, used_edges));
                break;
            }
            steps.push(self.step(
                wavefront.clone(),
                current_edges.clone(),
                used_vertices.clone(),
                used_edges.clone(),
            ));
            used_edges.extend(current_edges);
        }

        debug!(frames = steps.len(), "steps generated");
        steps
    }

    /// Number of cheapest-path edges entering each vertex reachable from
    /// `roots`. End vertices are not expanded.
    fn incoming_counts(&self, roots: &BTreeSet<VertexId>) -> BTreeMap<VertexId, usize> {
        let mut counts: BTreeMap<VertexId, usize> = BTreeMap::new();
        let mut seen = roots.clone();
        let mut stack: Vec<VertexId> = roots.iter().copied().collect();
        while let Some(id) = stack.pop() {
            if self.end.contains(&id) {
                continue;
            }
            for edge in self.successors(id) {
                *counts.entry(edge.to()).or_default() += 1;
                if seen.insert(edge.to()) {
                    stack.push(edge.to());
                }
            }
        }
        counts
    }

    fn step(
        &self,
        current_vertices: BTreeSet<VertexId>,
        current_edges: BTreeSet<Edge>,
        used_vertices: BTreeSet<VertexId>,
        used_edges: BTreeSet<Edge>,
    ) -> GraphStep {
        GraphStep::new(
            self.start.clone(),
            self.end.clone(),
            current_vertices,
            current_edges,
            used_vertices,
            used_edges,
        )
    }
}

fn known_vertices(
    ids: impl IntoIterator<Item = VertexId>,
    graph: &Graph,
    role: &str,
) -> BTreeSet<VertexId> {
    ids.into_iter()
        .filter(|id| {
            let known = graph.contains_vertex(*id);
            if !known {
                warn!(vertex = %id, role, "ignoring unknown vertex");
            }
            known
        })
        .collect()
}
