use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canvas position, normalized to `[0, 1] x [0, 1]` with `y` growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    position: Point,
    /// NaN when no cost was assigned
    cost: f64,
}

impl Vertex {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            cost: f64::NAN,
        }
    }

    pub fn with_cost(position: Point, cost: f64) -> Self {
        Self { position, cost }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn has_cost(&self) -> bool {
        !self.cost.is_nan()
    }

    pub(crate) fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }
}
