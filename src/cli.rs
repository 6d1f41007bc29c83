use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pathgraph", about = "Graph editor and step-by-step shortest path visualizer")]
pub struct Cli {
    /// Load the graph from a saved file
    #[arg(long, conflicts_with = "seed")]
    pub file: Option<PathBuf>,

    /// Generate a random graph from this seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Vertex count for random graphs
    #[arg(long, default_value_t = 12)]
    pub vertices: usize,

    /// Start (source) vertex ids, comma separated
    #[arg(long, value_delimiter = ',')]
    pub start: Vec<usize>,

    /// End (sink) vertex ids, comma separated
    #[arg(long, value_delimiter = ',')]
    pub end: Vec<usize>,

    /// Add and update edges in both directions while editing
    #[arg(long)]
    pub bidirectional: bool,

    /// Delay between animation steps
    #[arg(long, default_value_t = 400)]
    pub delay_ms: u64,

    /// Where the save key writes the graph
    #[arg(long, default_value = "graph.txt")]
    pub save: PathBuf,

    /// Print the path cost and steps instead of starting the TUI
    #[arg(long)]
    pub headless: bool,

    /// Write tracing output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pathgraph"]).unwrap();
        assert_eq!(12, cli.vertices);
        assert_eq!(400, cli.delay_ms);
        assert!(!cli.bidirectional);
        assert!(cli.start.is_empty());
        assert_eq!(PathBuf::from("graph.txt"), cli.save);
    }

    #[test]
    fn test_id_lists_are_comma_separated() {
        let cli =
            Cli::try_parse_from(["pathgraph", "--start", "0,3", "--end", "5", "--headless"])
                .unwrap();
        assert_eq!(vec![0, 3], cli.start);
        assert_eq!(vec![5], cli.end);
        assert!(cli.headless);
    }

    #[test]
    fn test_file_conflicts_with_seed() {
        assert!(Cli::try_parse_from(["pathgraph", "--file", "g.txt", "--seed", "1"]).is_err());
    }
}
