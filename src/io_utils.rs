//! Common helper functions for parsing edge-list input and setting output
//!
//! The edge-list format is line-oriented: `source target [label]`, fields
//! separated by whitespace. A line with a single field declares an isolated
//! vertex; empty lines and lines starting with `#` are skipped.

use std::fs::File;
use std::io::{stdout, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One parsed edge-list line: source label, optional target label, optional
/// edge label.
pub type EdgeListEntry = (String, Option<String>, Option<String>);

/// Set a buffered stream to write to.
///
/// Either a file (if [`Some`]) or stdout otherwise (if [`None`]).
pub fn set_ostream(oprefix: &Option<String>) -> BufWriter<Box<dyn Write>> {
    let out_writer = match oprefix {
        Some(prefix) => {
            let path = Path::new(prefix);
            Box::new(File::create(path).expect("Unable to create output file")) as Box<dyn Write>
        }
        None => Box::new(stdout()) as Box<dyn Write>,
    };
    BufWriter::new(out_writer)
}

/// Read edge-list entries from a file path.
pub fn read_edge_list(path: &str) -> Vec<EdgeListEntry> {
    let f = File::open(path).expect("Unable to open graph file");
    parse_edge_list(BufReader::new(f))
}

/// Parse edge-list entries from any buffered reader.
pub fn parse_edge_list<R: BufRead>(reader: R) -> Vec<EdgeListEntry> {
    let mut entries: Vec<EdgeListEntry> = Vec::new();
    for line in reader.lines() {
        let line = line.expect("Unable to read line in graph file");
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        entries.push((
            fields[0].to_string(),
            fields.get(1).map(|x| x.to_string()),
            fields.get(2).map(|x| x.to_string()),
        ));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_parse_edges_comments_and_isolated() {
        let input = "\
# a comment
a b
b c bridge

lonely
";
        let entries = parse_edge_list(Cursor::new(input));
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), Some("b".to_string()), None),
                ("b".to_string(), Some("c".to_string()), Some("bridge".to_string())),
                ("lonely".to_string(), None, None),
            ]
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let entries = parse_edge_list(Cursor::new("a b label trailing junk\n"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].2, Some("label".to_string()));
    }
}
