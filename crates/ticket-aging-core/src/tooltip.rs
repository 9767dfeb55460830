//! Ticket-ID lists behind a cell, recovered on demand from the nested aging
//! structure. Counts and IDs always come from the same lists; nothing here is
//! cached.

use crate::types::{AgeBucket, Agent, DepartmentBucket, Status, TicketId};

/// Tooltip text for a cell with no underlying tickets.
pub const NO_TICKETS: &str = "No tickets";

/// IDs for one agent, bucket and status.
///
/// With a department filter only that department's list is read; otherwise
/// the lists of every department are concatenated in the agent's map order.
/// IDs are not de-duplicated across departments.
pub fn agent_ticket_ids<'a>(
    agent: &'a Agent,
    department_id: Option<&str>,
    bucket: AgeBucket,
    status: Status,
) -> Vec<&'a TicketId> {
    match department_id {
        Some(id) => agent.aging_ids(id, status, bucket).iter().collect(),
        None => agent
            .department_aging_counts
            .keys()
            .flat_map(|id| agent.aging_ids(id, status, bucket))
            .collect(),
    }
}

/// IDs for one department, bucket and status, concatenated across agents in
/// input order.
pub fn department_ticket_ids<'a>(
    agents: &'a [Agent],
    department_id: &str,
    bucket: DepartmentBucket,
    status: Status,
) -> Vec<&'a TicketId> {
    agents
        .iter()
        .flat_map(|agent| agent.aging_ids(department_id, status, bucket))
        .collect()
}

/// Join IDs with `", "`, or [`NO_TICKETS`] when there are none.
pub fn format_ticket_ids(ids: &[&TicketId]) -> String {
    if ids.is_empty() {
        return NO_TICKETS.to_string();
    }
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
