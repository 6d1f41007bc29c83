use crate::edit::mode::Selection;
use crate::graph::graph::Graph;

/// A graph ready to explore, with its default start and end picks.
pub struct Scenario {
    pub graph: Graph,
    pub selection: Selection,
}
