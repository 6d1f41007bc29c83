pub mod dijkstra;
pub mod playback;
pub mod step;
