use crate::graph::vertex::VertexId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Directed edge. Identity is the `(from, to)` pair; the cost takes no part
/// in equality, ordering or hashing.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    from: VertexId,
    to: VertexId,
    /// NaN when no cost was assigned
    cost: f64,
}

impl Edge {
    pub fn new(from: VertexId, to: VertexId, cost: f64) -> Self {
        Self { from, to, cost }
    }

    pub fn unweighted(from: VertexId, to: VertexId) -> Self {
        Self::new(from, to, f64::NAN)
    }

    pub fn from(&self) -> VertexId {
        self.from
    }

    pub fn to(&self) -> VertexId {
        self.to
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn reversed(&self) -> Edge {
        Edge::new(self.to, self.from, self.cost)
    }

    fn key(&self) -> (VertexId, VertexId) {
        (self.from, self.to)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
