//! Various algorithms used to transform graphs and their view state
pub mod collapser;
pub mod compressor;
