//! ticket-aging-core: data model and aggregation for the ticket-aging table.
//! Turns a pre-aggregated snapshot of agents into filtered, sorted rows and a
//! renderer-agnostic table model. No async, no terminal I/O.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod selection;
pub mod serde_helpers;
pub mod table;
pub mod tooltip;
pub mod types;

pub use aggregate::{AgentRow, DepartmentRow, agent_rows, compare_names, department_rows};
pub use config::{StatusFilterMode, TableConfig, Theme, Variant};
pub use error::AgingError;
pub use selection::{ResolvedView, Selection};
pub use table::{Cell, Column, ColumnKind, Indicator, TableBody, TableModel, ViewMode};
pub use tooltip::{NO_TICKETS, format_ticket_ids};
pub use types::{
    AgeBucket, Agent, AgingBucket, Department, DepartmentBucket, DepartmentsMap, Snapshot, Status,
    TicketCounts, TicketId,
};
