//! Command line interface, built using [`crate::clap` with `Derive`](https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html)

use clap::{ArgGroup, Parser, Subcommand};
use regex::Regex;

#[doc(hidden)]
fn valid_pattern(s: &str) -> Result<String, String> {
    match Regex::new(s) {
        Ok(_) => Ok(s.to_string()),
        Err(e) => Err(format!("`{s}` isn't a valid selection pattern: {e}")),
    }
}

/// Options that apply to all subcommands
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[doc(hidden)]
    #[command(subcommand)]
    pub command: Commands,

    /// Show progress messages
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands and their specific options
#[derive(Subcommand)]
pub enum Commands {
    #[command(group(
        ArgGroup::new("selection")
            .required(true)
            .args(["select", "pattern"]),
    ))]
    /// Collapse a selection of vertices into one cluster vertex
    Collapse {
        /// Input edge-list file (`source target [label]` per line)
        graph_file: String,

        /// Labels of the vertices to collapse
        #[arg(short, long, num_args = 2.., group = "selection")]
        select: Option<Vec<String>>,

        /// Collapse every vertex whose label matches this pattern
        #[arg(short, long, value_parser = valid_pattern, group = "selection")]
        pattern: Option<String>,

        /// Treat the input as a directed graph
        #[arg(long, default_value_t = false)]
        directed: bool,

        /// Write the collapsed graph as DOT to this file instead of stdout
        #[arg(long)]
        output: Option<String>,

        /// Also write the wrapped cluster subgraph as DOT
        #[arg(long, default_value_t = false)]
        with_cluster: bool,

        /// Expand the cluster again afterwards and check that the original
        /// graph comes back exactly
        #[arg(long, default_value_t = false)]
        expand_back: bool,
    },

    /// Mark the parallel edges between two vertices as compressed
    Compress {
        /// Input edge-list file (`source target [label]` per line)
        graph_file: String,

        /// Labels of exactly two vertices
        #[arg(short, long, num_args = 2)]
        select: Vec<String>,

        /// Treat the input as a directed graph
        #[arg(long, default_value_t = false)]
        directed: bool,
    },
}

/// Function to parse command line args into [`Args`] struct
pub fn cli_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pattern_accepts_regex() {
        assert!(valid_pattern("^[ab]$").is_ok());
        assert!(valid_pattern("a(b").is_err());
    }

    #[test]
    fn test_collapse_args_parse() {
        let args =
            Args::try_parse_from(["graphfold", "collapse", "g.txt", "--select", "a", "b"]).unwrap();
        match args.command {
            Commands::Collapse { select, pattern, .. } => {
                assert_eq!(select, Some(vec!["a".to_string(), "b".to_string()]));
                assert_eq!(pattern, None);
            }
            _ => panic!("expected the collapse subcommand"),
        }
    }

    #[test]
    fn test_selection_is_required() {
        assert!(Args::try_parse_from(["graphfold", "collapse", "g.txt"]).is_err());
    }
}
