//! Golden exhaustive-search counts.
//!
//! Each JSON case under `tests/golden/` carries a puzzle script and the full
//! expected search report (reachable states, per-depth counts, optional
//! solution length). Cases run through the DDD engine, whose report is
//! deterministic and needs no scratch files.

use std::path::PathBuf;

use serde::Deserialize;
use statespace::domain::npuzzle::NPuzzleInstance;
use statespace::domain::plank::PlankInstance;
use statespace::domain::sokoban::{SokobanInstance, SokobanOptions};
use statespace::search::ddd::{self, DddOptions, GraphClass};
use statespace::search::SearchReport;

#[derive(Debug, Clone, Deserialize)]
struct GoldenCase {
    domain: String,
    puzzle: String,
    expected: SearchReport,
}

#[test]
fn golden_reports_match() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("golden");

    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .expect("failed to read golden directory")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    files.sort();

    assert!(!files.is_empty(), "no golden case JSONs found");

    let options = DddOptions {
        buffer_bytes: 1 << 20,
        graph: GraphClass::Directed,
        verbose: false,
    };

    for path in files {
        let bytes = std::fs::read(&path).expect("failed to read golden case");
        let case: GoldenCase =
            serde_json::from_slice(&bytes).expect("failed to parse golden case JSON");

        let observed = match case.domain.as_str() {
            "sokoban" => {
                let d = SokobanInstance::load(case.puzzle.as_bytes(), SokobanOptions::default())
                    .unwrap();
                ddd::solve(&d, &options).unwrap()
            }
            "plank" => {
                let d = PlankInstance::load(case.puzzle.as_bytes()).unwrap();
                ddd::solve(&d, &options).unwrap()
            }
            "npuzzle" => {
                let d = NPuzzleInstance::load(case.puzzle.as_bytes()).unwrap();
                ddd::solve(&d, &options).unwrap()
            }
            other => panic!("unknown domain {other:?} in {}", path.display()),
        };

        assert_eq!(observed.report, case.expected, "mismatch for {}", path.display());
    }
}
