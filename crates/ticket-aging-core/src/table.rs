//! Renderer-agnostic table model: which columns show, what each cell holds,
//! and the empty-state message. Text, JSON and TUI surfaces all render this.

use crate::aggregate::{AgentRow, DepartmentRow, agent_rows, department_rows};
use crate::selection::ResolvedView;
use crate::tooltip::{agent_ticket_ids, department_ticket_ids, format_ticket_ids};
use crate::types::{AgeBucket, AgingBucket, DepartmentBucket, Snapshot, Status, department_name};

pub const EMPTY_DEPARTMENT_VIEW: &str = "No department ticket data available";
pub const EMPTY_AGENT_VIEW: &str = "No agents with tickets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Serial,
    Name,
    Department,
    Total,
    Age(AgeBucket),
    DepartmentAge(DepartmentBucket),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub kind: ColumnKind,
    pub label: &'static str,
}

impl Column {
    fn new(kind: ColumnKind, label: &'static str) -> Self {
        Self { kind, label }
    }

    /// Stable key for JSON output.
    pub fn key(&self) -> &'static str {
        match self.kind {
            ColumnKind::Serial => "serial",
            ColumnKind::Name => "name",
            ColumnKind::Department => "department",
            ColumnKind::Total => "total",
            ColumnKind::Age(bucket) => bucket.key(),
            ColumnKind::DepartmentAge(bucket) => bucket.key(),
        }
    }

    pub fn is_age(&self) -> bool {
        matches!(self.kind, ColumnKind::Age(_) | ColumnKind::DepartmentAge(_))
    }

    /// Names read left-aligned; numbers are centered.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ColumnKind::Name | ColumnKind::Department)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub status: Status,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Count(u64),
    /// One entry per selected status.
    Indicators(Vec<Indicator>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Agents,
    Departments,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Agents(Vec<AgentRow>),
    Departments(Vec<DepartmentRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub title: String,
    pub columns: Vec<Column>,
    pub body: TableBody,
    /// Statuses broken out as indicators; empty → combined numbers.
    pub statuses: Vec<Status>,
    pub department_id: Option<String>,
    pub empty_message: String,
}

/// Column set for a resolved view.
pub fn columns(view: &ResolvedView) -> Vec<Column> {
    let mut columns = vec![Column::new(ColumnKind::Serial, "S.No")];
    if view.department_view {
        columns.push(Column::new(ColumnKind::Name, "Department"));
        columns.push(Column::new(ColumnKind::Total, "Total Ticket Count"));
        columns.extend(
            DepartmentBucket::ALL
                .into_iter()
                .map(|b| Column::new(ColumnKind::DepartmentAge(b), b.label())),
        );
    } else {
        columns.push(Column::new(ColumnKind::Name, "Agent Name"));
        if view.department_id.is_some() {
            columns.push(Column::new(ColumnKind::Department, "Department"));
        }
        columns.push(Column::new(ColumnKind::Total, "Total Ticket Count"));
        columns.extend(
            view.ages
                .iter()
                .map(|b| Column::new(ColumnKind::Age(*b), b.label())),
        );
    }
    columns
}

/// Message shown in place of the body when there are no rows.
pub fn empty_message(snapshot: &Snapshot, view: &ResolvedView) -> String {
    if view.department_view {
        return EMPTY_DEPARTMENT_VIEW.to_string();
    }
    match view.department_id.as_deref() {
        Some(id) => format!(
            "No tickets found for {}",
            department_name(&snapshot.departments_map, id)
        ),
        None => EMPTY_AGENT_VIEW.to_string(),
    }
}

impl TableModel {
    pub fn build(snapshot: &Snapshot, view: &ResolvedView) -> Self {
        let (title, body, statuses) = if view.department_view {
            let statuses = Status::ASSIGNABLE
                .into_iter()
                .filter(|s| view.statuses.contains(s))
                .collect();
            (
                "Department Ticket Age".to_string(),
                TableBody::Departments(department_rows(snapshot, view)),
                statuses,
            )
        } else {
            let title = match view.department_id.as_deref() {
                Some(id) => format!(
                    "Agent Ticket Age: {}",
                    department_name(&snapshot.departments_map, id)
                ),
                None => "Agent Ticket Age".to_string(),
            };
            (
                title,
                TableBody::Agents(agent_rows(snapshot, view)),
                view.statuses.clone(),
            )
        };

        Self {
            title,
            columns: columns(view),
            body,
            statuses,
            department_id: view.department_id.clone(),
            empty_message: empty_message(snapshot, view),
        }
    }

    pub fn mode(&self) -> ViewMode {
        match self.body {
            TableBody::Agents(_) => ViewMode::Agents,
            TableBody::Departments(_) => ViewMode::Departments,
        }
    }

    pub fn len(&self) -> usize {
        match &self.body {
            TableBody::Agents(rows) => rows.len(),
            TableBody::Departments(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indexes into `columns` of the age columns, left to right.
    pub fn age_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_age())
            .map(|(i, _)| i)
            .collect()
    }

    /// Display name of a row (agent or department).
    pub fn row_name(&self, row: usize) -> Option<&str> {
        match &self.body {
            TableBody::Agents(rows) => rows.get(row).map(|r| r.name.as_str()),
            TableBody::Departments(rows) => rows.get(row).map(|r| r.department_name.as_str()),
        }
    }

    /// Cells of one row, aligned with `columns`.
    pub fn cells(&self, row: usize) -> Vec<Cell> {
        self.columns
            .iter()
            .filter_map(|column| self.cell(row, column.kind))
            .collect()
    }

    fn indicators(&self, count: impl Fn(Status) -> u64) -> Cell {
        Cell::Indicators(
            self.statuses
                .iter()
                .map(|s| Indicator {
                    status: *s,
                    count: count(*s),
                })
                .collect(),
        )
    }

    fn cell(&self, row: usize, kind: ColumnKind) -> Option<Cell> {
        let serial = row as u64 + 1;
        match &self.body {
            TableBody::Agents(rows) => {
                let r = rows.get(row)?;
                Some(match kind {
                    ColumnKind::Serial => Cell::Count(serial),
                    ColumnKind::Name => Cell::Text(r.name.clone()),
                    ColumnKind::Department => {
                        Cell::Text(r.department_name.clone().unwrap_or_default())
                    }
                    ColumnKind::Total => Cell::Count(r.total),
                    ColumnKind::Age(bucket) if self.statuses.is_empty() => {
                        Cell::Count(r.age(bucket))
                    }
                    ColumnKind::Age(bucket) => self.indicators(|s| r.status_count(bucket, s)),
                    ColumnKind::DepartmentAge(_) => return None,
                })
            }
            TableBody::Departments(rows) => {
                let r = rows.get(row)?;
                Some(match kind {
                    ColumnKind::Serial => Cell::Count(serial),
                    ColumnKind::Name => Cell::Text(r.department_name.clone()),
                    ColumnKind::Total => Cell::Count(r.total()),
                    ColumnKind::DepartmentAge(bucket) if self.statuses.is_empty() => {
                        Cell::Count(r.bucket_total(bucket))
                    }
                    ColumnKind::DepartmentAge(bucket) => self.indicators(|s| r.count(bucket, s)),
                    ColumnKind::Department | ColumnKind::Age(_) => return None,
                })
            }
        }
    }

    /// Ticket IDs behind an age cell, derived from `snapshot` on demand.
    ///
    /// `status` picks one indicator; `None` covers the whole cell (the
    /// selected statuses, or every status the view knows when none are
    /// selected). Non-age columns have no tooltip. `snapshot` must be the one
    /// the model was built from.
    pub fn tooltip(
        &self,
        snapshot: &Snapshot,
        row: usize,
        column: usize,
        status: Option<Status>,
    ) -> Option<String> {
        let kind = self.columns.get(column)?.kind;
        let statuses: Vec<Status> = match status {
            Some(s) => vec![s],
            None if !self.statuses.is_empty() => self.statuses.clone(),
            None => match self.mode() {
                ViewMode::Agents => Status::ALL.to_vec(),
                ViewMode::Departments => Status::ASSIGNABLE.to_vec(),
            },
        };

        let ids = match (&self.body, kind) {
            (TableBody::Agents(rows), ColumnKind::Age(bucket)) => {
                let agent = snapshot.members_data.get(rows.get(row)?.agent_index)?;
                statuses
                    .iter()
                    .flat_map(|s| {
                        agent_ticket_ids(agent, self.department_id.as_deref(), bucket, *s)
                    })
                    .collect::<Vec<_>>()
            }
            (TableBody::Departments(rows), ColumnKind::DepartmentAge(bucket)) => {
                let department_id = &rows.get(row)?.department_id;
                statuses
                    .iter()
                    .flat_map(|s| {
                        department_ticket_ids(&snapshot.members_data, department_id, bucket, *s)
                    })
                    .collect::<Vec<_>>()
            }
            _ => return None,
        };
        Some(format_ticket_ids(&ids))
    }
}
