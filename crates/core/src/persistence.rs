//! Text persistence for the infoset table.
//!
//! One infoset per line, tab-separated:
//! `key \t visit_count \t r0,r1,... \t s0,s1,...` with 10-digit fixed
//! precision. Keys are written in sorted order so the serialized form is
//! deterministic and byte-exact across runs.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::error::SolverError;
use crate::infoset::{InfosetMap, InformationSet};

/// Write the table to `path`, truncating any existing file.
///
/// Entries that were never initialized (zero-arity) cannot round-trip and
/// are skipped with a warning.
///
/// # Errors
///
/// Returns [`SolverError::Io`] when the file cannot be created or written.
pub fn save_infosets(map: &InfosetMap, path: &Path) -> Result<(), SolverError> {
    let file = File::create(path).map_err(|e| {
        log::error!("cannot open {} for writing: {e}", path.display());
        e
    })?;
    let mut writer = BufWriter::new(file);

    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    let mut written = 0usize;
    for key in keys {
        let node = &map[key];
        if node.cumulative_regrets.is_empty() {
            log::warn!("skipping uninitialized infoset '{key}' on save");
            continue;
        }
        writeln!(
            writer,
            "{key}\t{}\t{}\t{}",
            node.visit_count,
            join_fixed(&node.cumulative_regrets),
            join_fixed(&node.cumulative_strategy)
        )?;
        written += 1;
    }
    writer.flush()?;
    log::info!("saved {written} infosets to {}", path.display());
    Ok(())
}

/// Load a table from `path`. Returns `None` (not an error) when the file
/// does not exist. Lines that fail to parse are skipped with a logged
/// diagnostic and loading continues.
///
/// # Errors
///
/// Returns [`SolverError::Io`] for read failures other than a missing
/// file.
pub fn load_infosets(path: &Path) -> Result<Option<InfosetMap>, SolverError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("infoset file {} not found; nothing loaded", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let reader = BufReader::new(file);
    let mut map = InfosetMap::default();
    let mut line_count = 0usize;

    for line in reader.lines() {
        let line = line?;
        line_count += 1;
        match parse_line(&line) {
            Ok(node) => {
                map.insert(node.key.clone(), node);
            }
            Err(reason) => {
                log::error!("skipping line {line_count}: {reason}");
            }
        }
    }

    log::info!(
        "loaded {} infosets from {} ({line_count} lines)",
        map.len(),
        path.display()
    );
    Ok(Some(map))
}

fn parse_line(line: &str) -> Result<InformationSet, String> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() != 4 {
        return Err(format!("expected 4 tab-separated fields, got {}", parts.len()));
    }

    let visit_count: u64 = parts[1]
        .parse()
        .map_err(|e| format!("bad visit count '{}': {e}", parts[1]))?;
    let cumulative_regrets = parse_values(parts[2])?;
    let cumulative_strategy = parse_values(parts[3])?;

    if cumulative_regrets.len() != cumulative_strategy.len() {
        return Err(format!(
            "regret/strategy arity mismatch ({} vs {})",
            cumulative_regrets.len(),
            cumulative_strategy.len()
        ));
    }

    Ok(InformationSet {
        key: parts[0].to_string(),
        cumulative_regrets,
        cumulative_strategy,
        visit_count,
    })
}

fn parse_values(field: &str) -> Result<Vec<f64>, String> {
    field
        .split(',')
        .map(|v| v.parse().map_err(|e| format!("bad value '{v}': {e}")))
        .collect()
}

fn join_fixed(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 14);
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{value:.10}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_map() -> InfosetMap {
        let mut map = InfosetMap::default();
        for (key, regrets, strategy, visits) in [
            (
                "P0;Ad-Ah||Preflop|",
                vec![1.25, -0.5, 0.0],
                vec![10.0, 2.5, 0.0],
                42u64,
            ),
            (
                "P1;Kh-As|Qc-2d-Td|Flop|A0R6,A1C6,",
                vec![0.000_000_000_1, 7.0],
                vec![0.25, 0.75],
                3,
            ),
        ] {
            map.insert(
                key.to_string(),
                InformationSet {
                    key: key.to_string(),
                    cumulative_regrets: regrets,
                    cumulative_strategy: strategy,
                    visit_count: visits,
                },
            );
        }
        map
    }

    #[test]
    fn save_load_round_trip_is_byte_exact() {
        let dir = tempdir().unwrap();
        let path_a = dir.path().join("a.tsv");
        let path_b = dir.path().join("b.tsv");

        let map = sample_map();
        save_infosets(&map, &path_a).unwrap();
        let loaded = load_infosets(&path_a).unwrap().unwrap();
        assert_eq!(loaded.len(), map.len());
        save_infosets(&loaded, &path_b).unwrap();

        let bytes_a = std::fs::read(&path_a).unwrap();
        let bytes_b = std::fs::read(&path_b).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn serialized_form_is_sorted_and_tab_separated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.tsv");
        save_infosets(&sample_map(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("P0;Ad-Ah||Preflop|\t42\t"));
        assert_eq!(lines[0].split('\t').count(), 4);
        assert!(lines[0].contains("1.2500000000,-0.5000000000,0.0000000000"));
    }

    #[test]
    fn missing_file_is_not_loaded_without_error() {
        let dir = tempdir().unwrap();
        let result = load_infosets(&dir.path().join("absent.tsv")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn malformed_lines_are_skipped_and_loading_continues() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.tsv");
        let good = "P0;Ad-Ah||Preflop|\t5\t1.0000000000,2.0000000000\t0.5000000000,0.5000000000";
        let contents = [
            "only-two\tfields",
            good,
            "key\tnot-a-number\t1.0\t1.0",
            "key\t1\t1.0,xyz\t1.0,2.0",
            "key\t1\t1.0,2.0\t1.0", // arity mismatch
        ]
        .join("\n");
        std::fs::write(&path, contents).unwrap();

        let loaded = load_infosets(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        let node = &loaded["P0;Ad-Ah||Preflop|"];
        assert_eq!(node.visit_count, 5);
        assert_eq!(node.cumulative_regrets, vec![1.0, 2.0]);
    }

    #[test]
    fn save_truncates_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.tsv");
        std::fs::write(&path, "stale line that would not parse\n").unwrap();

        save_infosets(&sample_map(), &path).unwrap();
        let loaded = load_infosets(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn uninitialized_entries_are_skipped_on_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.tsv");
        let mut map = sample_map();
        map.insert("empty".to_string(), InformationSet::default());

        save_infosets(&map, &path).unwrap();
        let loaded = load_infosets(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(!loaded.contains_key("empty"));
    }
}
