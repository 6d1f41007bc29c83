use crate::codec::codec::FormatError;
use crate::graph::graph::GraphError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid graph file: {0}")]
    Format(#[from] FormatError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("refusing to save an empty graph")]
    EmptyGraph,
    #[error("logging setup failed: {0}")]
    Logging(String),
}
