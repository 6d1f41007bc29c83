pub mod edge;
pub mod editor;
pub mod finder;
pub mod graph;
pub mod vertex;
