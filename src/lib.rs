//! Collapse picked vertex subsets of a multigraph into cluster vertices, and expand them back
#![warn(missing_docs)]

/// Contains different traits that implement the contraction algorithms
pub mod algorithms;

/// Command line interface
pub mod cli;

/// Graph construction and collapse-session drivers
pub mod graph_works;

/// Contains the graph definitions
pub mod graphs;

/// Edge-list input parsing and output stream helpers
pub mod io_utils;

/// Vertex labelling for text output
pub mod labeller;

use crate::algorithms::compressor::EdgeExclusions;
use crate::cli::*;
use crate::graph_works::{compress_pair, BasicFold, Fold, FoldReport};
use crate::io_utils::{read_edge_list, set_ostream};

use std::io::Write;

/// Index type for both nodes and edges in the graph.
pub type Idx = usize;

#[doc(hidden)]
pub fn main() {
    let args = cli_args();
    if args.verbose {
        simple_logger::init_with_level(log::Level::Info).unwrap();
    } else {
        simple_logger::init_with_level(log::Level::Warn).unwrap();
    }

    log::info!("Starting program!");
    match &args.command {
        Commands::Collapse {
            graph_file,
            select,
            pattern,
            directed,
            output,
            with_cluster,
            expand_back,
        } => {
            let entries = read_edge_list(graph_file);
            let outcome = if *directed {
                BasicFold::fold::<petgraph::Directed>(
                    &entries,
                    select,
                    pattern,
                    *expand_back,
                    EdgeExclusions::new(),
                )
            } else {
                BasicFold::fold::<petgraph::Undirected>(
                    &entries,
                    select,
                    pattern,
                    *expand_back,
                    EdgeExclusions::new(),
                )
            };
            match outcome {
                Ok((report, _exclusions)) => {
                    write_report(&report, output, *with_cluster);
                    eprintln!(
                        "graphfold: collapsed {} vertices; {} vertices and {} edges remain",
                        report.collapsed, report.vertex_count, report.edge_count
                    );
                    if report.restored == Some(false) {
                        log::error!("expand did not restore the original graph");
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    log::error!("collapse failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Compress {
            graph_file,
            select,
            directed,
        } => {
            let entries = read_edge_list(graph_file);
            let outcome = if *directed {
                compress_pair::<petgraph::Directed>(&entries, select)
            } else {
                compress_pair::<petgraph::Undirected>(&entries, select)
            };
            match outcome {
                Ok((count, dot)) => {
                    let mut wbuf = set_ostream(&None);
                    let _ = wbuf.write(&dot.into_bytes()[..]);
                    eprintln!("graphfold: {} parallel edge(s) compressed", count);
                }
                Err(e) => {
                    log::error!("compress failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
    log::info!("Finishing program!");
}

fn write_report(report: &FoldReport, output: &Option<String>, with_cluster: bool) {
    let mut wbuf = set_ostream(output);
    let _ = wbuf.write(&report.dot_after.clone().into_bytes()[..]);
    if with_cluster {
        let _ = wbuf.write(b"\n");
        let _ = wbuf.write(&report.dot_cluster.clone().into_bytes()[..]);
    }
    if report.restored == Some(true) {
        log::info!("expand restored the original graph exactly");
    }
}
