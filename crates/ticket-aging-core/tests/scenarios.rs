use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use ticket_aging_core::{Cell, Selection, Snapshot, Status, TableConfig, TableModel, Variant};

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    #[allow(dead_code)]
    description: String,
    variant: Variant,
    snapshot: serde_json::Value,
    selection: Selection,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
struct Expected {
    title: String,
    columns: Vec<String>,
    row_names: Vec<String>,
    totals: Vec<u64>,
    #[serde(default)]
    empty_message: Option<String>,
    #[serde(default)]
    cells: Vec<ExpectedCell>,
    #[serde(default)]
    tooltips: Vec<ExpectedTooltip>,
}

#[derive(Debug, Deserialize)]
struct ExpectedCell {
    row: usize,
    column: String,
    #[serde(default)]
    status: Option<Status>,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct ExpectedTooltip {
    row: usize,
    column: String,
    #[serde(default)]
    status: Option<Status>,
    text: String,
}

fn fixtures_dir() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../fixtures/scenarios")
}

fn load_fixtures() -> Vec<Fixture> {
    let mut fixtures = Vec::new();
    let mut paths: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .expect("fixtures dir readable")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();
    for path in paths {
        let content = fs::read_to_string(&path).unwrap_or_else(|e| {
            panic!("failed to read fixture {:?}: {}", path, e);
        });
        let fixture: Fixture = serde_json::from_str(&content).unwrap_or_else(|e| {
            panic!("failed to parse fixture {:?}: {}", path, e);
        });
        fixtures.push(fixture);
    }
    fixtures
}

fn column_index(model: &TableModel, key: &str, fixture: &str) -> usize {
    model
        .columns
        .iter()
        .position(|c| c.key() == key)
        .unwrap_or_else(|| panic!("[{fixture}] no column {key:?}"))
}

fn run_fixture(fixture: &Fixture) {
    let name = &fixture.name;
    let snapshot = Snapshot::from_json(&fixture.snapshot.to_string())
        .unwrap_or_else(|e| panic!("[{name}] snapshot: {e}"));
    let view = TableConfig::preset(fixture.variant)
        .resolve(&fixture.selection)
        .unwrap_or_else(|e| panic!("[{name}] resolve: {e}"));
    let model = TableModel::build(&snapshot, &view);
    let expected = &fixture.expected;

    assert_eq!(model.title, expected.title, "[{name}] title");

    let keys: Vec<&str> = model.columns.iter().map(|c| c.key()).collect();
    assert_eq!(keys, expected.columns, "[{name}] columns");

    let names: Vec<&str> = (0..model.len())
        .filter_map(|row| model.row_name(row))
        .collect();
    assert_eq!(names, expected.row_names, "[{name}] row order");

    let total_col = column_index(&model, "total", name);
    let totals: Vec<u64> = (0..model.len())
        .map(|row| match &model.cells(row)[total_col] {
            Cell::Count(n) => *n,
            other => panic!("[{name}] total cell is {other:?}"),
        })
        .collect();
    assert_eq!(totals, expected.totals, "[{name}] totals");

    if let Some(message) = &expected.empty_message {
        assert!(model.is_empty(), "[{name}] expected empty table");
        assert_eq!(&model.empty_message, message, "[{name}] empty message");
    }

    for cell in &expected.cells {
        let col = column_index(&model, &cell.column, name);
        let actual = match (&model.cells(cell.row)[col], cell.status) {
            (Cell::Count(n), None) => *n,
            (Cell::Indicators(indicators), Some(status)) => indicators
                .iter()
                .find(|i| i.status == status)
                .map(|i| i.count)
                .unwrap_or_else(|| panic!("[{name}] no {status} indicator")),
            (other, status) => panic!("[{name}] cell {other:?} does not match status {status:?}"),
        };
        assert_eq!(
            actual, cell.count,
            "[{name}] row {} column {} status {:?}",
            cell.row, cell.column, cell.status
        );
    }

    for tooltip in &expected.tooltips {
        let col = column_index(&model, &tooltip.column, name);
        let actual = model
            .tooltip(&snapshot, tooltip.row, col, tooltip.status)
            .unwrap_or_else(|| panic!("[{name}] no tooltip for {tooltip:?}"));
        assert_eq!(actual, tooltip.text, "[{name}] tooltip {tooltip:?}");
    }
}

#[test]
fn all_scenarios_pass() {
    let fixtures = load_fixtures();
    assert!(!fixtures.is_empty(), "no scenario fixtures found");
    for fixture in &fixtures {
        run_fixture(fixture);
    }
}

#[test]
fn sample_snapshot_parses() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/sample_snapshot.json");
    let snapshot = Snapshot::load(&path).expect("sample snapshot loads");
    assert!(!snapshot.members_data.is_empty());
    assert!(snapshot.generated_at.is_some());

    let view = TableConfig::default()
        .resolve(&Selection::default())
        .expect("resolve");
    let model = TableModel::build(&snapshot, &view);
    assert!(!model.is_empty());
}
