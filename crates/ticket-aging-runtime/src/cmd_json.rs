//! `ticket-aging json`: machine-readable JSON output.

use serde_json::{Map, Value, json};
use ticket_aging_core::{AgingBucket, DepartmentBucket, Snapshot, TableBody, TableModel, ViewMode};

use crate::settings::Settings;
use crate::snapshot::{ModelCache, SnapshotSource};

fn view_name(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Agents => "agents",
        ViewMode::Departments => "departments",
    }
}

/// Tooltip text for every age column of `row`, keyed by column key.
fn row_tooltips(model: &TableModel, snapshot: &Snapshot, row: usize) -> Value {
    let mut out = Map::new();
    for col in model.age_columns() {
        if let Some(text) = model.tooltip(snapshot, row, col, None) {
            out.insert(model.columns[col].key().to_string(), Value::String(text));
        }
    }
    Value::Object(out)
}

fn agent_rows_json(model: &TableModel, snapshot: &Snapshot, tooltips: bool) -> Vec<Value> {
    let TableBody::Agents(rows) = &model.body else {
        return Vec::new();
    };
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut obj = Map::new();
            obj.insert("name".into(), json!(row.name));
            if let Some(department) = &row.department_name {
                obj.insert("department".into(), json!(department));
            }
            obj.insert("total".into(), json!(row.total));
            for (bucket, count) in &row.ages {
                obj.insert(bucket.key().into(), json!(count));
            }
            if !model.statuses.is_empty() {
                let mut by_status = Map::new();
                for bucket in row.ages.keys() {
                    let counts: Map<String, Value> = model
                        .statuses
                        .iter()
                        .map(|s| (s.as_str().to_string(), json!(row.status_count(*bucket, *s))))
                        .collect();
                    by_status.insert(bucket.key().into(), Value::Object(counts));
                }
                obj.insert("statusCounts".into(), Value::Object(by_status));
            }
            if tooltips {
                obj.insert("tooltips".into(), row_tooltips(model, snapshot, i));
            }
            Value::Object(obj)
        })
        .collect()
}

fn department_rows_json(model: &TableModel, snapshot: &Snapshot, tooltips: bool) -> Vec<Value> {
    let TableBody::Departments(rows) = &model.body else {
        return Vec::new();
    };
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut obj = Map::new();
            obj.insert("departmentId".into(), json!(row.department_id));
            obj.insert("departmentName".into(), json!(row.department_name));
            obj.insert("total".into(), json!(row.total()));
            for bucket in DepartmentBucket::ALL {
                obj.insert(bucket.key().into(), json!(row.bucket_total(bucket)));
            }
            for ((bucket, status), count) in &row.counts {
                obj.insert(
                    format!("tickets_{}_{}", bucket.key(), status.as_str()),
                    json!(count),
                );
            }
            if tooltips {
                obj.insert("tooltips".into(), row_tooltips(model, snapshot, i));
            }
            Value::Object(obj)
        })
        .collect()
}

/// Build the full JSON schema v1 output.
pub(crate) fn build_json_v1(model: &TableModel, snapshot: &Snapshot, tooltips: bool) -> Value {
    let rows = match model.mode() {
        ViewMode::Agents => agent_rows_json(model, snapshot, tooltips),
        ViewMode::Departments => department_rows_json(model, snapshot, tooltips),
    };
    let columns: Vec<Value> = model
        .columns
        .iter()
        .map(|c| json!({"key": c.key(), "label": c.label}))
        .collect();
    let statuses: Vec<&str> = model.statuses.iter().map(|s| s.as_str()).collect();
    let empty_message = model.is_empty().then(|| model.empty_message.clone());

    json!({
        "version": 1,
        "view": view_name(model.mode()),
        "title": model.title,
        "generatedAt": snapshot.generated_at,
        "departmentId": model.department_id,
        "statuses": statuses,
        "columns": columns,
        "rows": rows,
        "emptyMessage": empty_message,
    })
}

/// Entry point for `ticket-aging json`.
pub fn cmd_json(
    settings: &Settings,
    source: &SnapshotSource,
    tooltips: bool,
) -> anyhow::Result<()> {
    let mut cache = ModelCache::default();
    let model = cache.get(source, &settings.config, &settings.selection)?;
    let output = build_json_v1(model, source.snapshot(), tooltips);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
