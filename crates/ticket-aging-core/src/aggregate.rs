//! Aggregation: raw agents → filtered, counted and sorted table rows.
//!
//! Rows are ephemeral. They are rebuilt from the snapshot and the resolved
//! selection on every render and never mutated afterwards.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::selection::ResolvedView;
use crate::tooltip::agent_ticket_ids;
use crate::types::{
    AgeBucket, Agent, AgingLists, DepartmentBucket, Status, Snapshot, aging_key, department_name,
};

// ─── Agent view ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRow {
    /// Position of the source agent in `membersData`.
    pub agent_index: usize,
    pub name: String,
    /// Set when a department filter is active.
    pub department_name: Option<String>,
    /// Sum of the five status counts, or the agent's
    /// `departmentTicketCounts` entry under a department filter. In the
    /// filtered case the age cells count ticket IDs instead, so the two can
    /// disagree when the source's counts and ID lists are out of step.
    pub total: u64,
    pub ages: BTreeMap<AgeBucket, u64>,
    /// Per-status counts, filled only for the selected statuses.
    pub status_counts: BTreeMap<(AgeBucket, Status), u64>,
}

impl AgentRow {
    pub fn age(&self, bucket: AgeBucket) -> u64 {
        self.ages.get(&bucket).copied().unwrap_or(0)
    }

    pub fn status_count(&self, bucket: AgeBucket, status: Status) -> u64 {
        self.status_counts
            .get(&(bucket, status))
            .copied()
            .unwrap_or(0)
    }
}

/// Whether an agent gets a row in the agent view.
pub fn include_agent(agent: &Agent, view: &ResolvedView) -> bool {
    match view.department_id.as_deref() {
        None => agent.tickets.total() > 0,
        Some(department_id) => {
            let active = agent.department_ticket_count(department_id) > 0
                || agent.has_department_aging(department_id);
            active && view.allows_agent(&agent.name)
        }
    }
}

fn department_age_count(agent: &Agent, department_id: &str, bucket: AgeBucket) -> u64 {
    Status::ALL.iter().fold(0u64, |acc, status| {
        acc.saturating_add(agent.aging_ids(department_id, *status, bucket).len() as u64)
    })
}

fn agent_row(agent_index: usize, agent: &Agent, snapshot: &Snapshot, view: &ResolvedView) -> AgentRow {
    let department_id = view.department_id.as_deref();

    let (total, department) = match department_id {
        None => (agent.tickets.total(), None),
        Some(id) => (
            agent.department_ticket_count(id),
            Some(department_name(&snapshot.departments_map, id).to_string()),
        ),
    };

    let ages = view
        .ages
        .iter()
        .map(|bucket| {
            let count = match department_id {
                None => agent.age_count(*bucket),
                Some(id) => department_age_count(agent, id, *bucket),
            };
            (*bucket, count)
        })
        .collect();

    let mut status_counts = BTreeMap::new();
    for bucket in &view.ages {
        for status in &view.statuses {
            let count = agent_ticket_ids(agent, department_id, *bucket, *status).len() as u64;
            status_counts.insert((*bucket, *status), count);
        }
    }

    AgentRow {
        agent_index,
        name: agent.name.clone(),
        department_name: department,
        total,
        ages,
        status_counts,
    }
}

/// Filter, count and sort the agent view.
pub fn agent_rows(snapshot: &Snapshot, view: &ResolvedView) -> Vec<AgentRow> {
    let mut rows: Vec<AgentRow> = snapshot
        .members_data
        .iter()
        .enumerate()
        .filter(|(_, agent)| include_agent(agent, view))
        .map(|(i, agent)| agent_row(i, agent, snapshot, view))
        .collect();
    sort_by_name(&mut rows, |row| &row.name);
    rows
}

// ─── Department view ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRow {
    pub department_id: String,
    pub department_name: String,
    /// Twelve counters: three buckets × four assignable statuses.
    pub counts: BTreeMap<(DepartmentBucket, Status), u64>,
}

impl DepartmentRow {
    fn zeroed(department_id: &str, department_name: &str) -> Self {
        let counts = DepartmentBucket::ALL
            .into_iter()
            .flat_map(|b| Status::ASSIGNABLE.into_iter().map(move |s| ((b, s), 0u64)))
            .collect();
        Self {
            department_id: department_id.to_string(),
            department_name: department_name.to_string(),
            counts,
        }
    }

    fn absorb(&mut self, lists: &AgingLists) {
        for ((bucket, status), counter) in self.counts.iter_mut() {
            let n = lists
                .get(&aging_key(*status, *bucket))
                .map_or(0, |ids| ids.len() as u64);
            *counter = counter.saturating_add(n);
        }
    }

    pub fn count(&self, bucket: DepartmentBucket, status: Status) -> u64 {
        self.counts.get(&(bucket, status)).copied().unwrap_or(0)
    }

    pub fn bucket_total(&self, bucket: DepartmentBucket) -> u64 {
        Status::ASSIGNABLE
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(self.count(bucket, *s)))
    }

    /// Sum of all twelve counters.
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, n| acc.saturating_add(*n))
    }
}

/// Roll every agent's per-department aging lists into one row per department.
///
/// Only departments present in `departmentsMap` are counted; aging entries
/// for unknown department ids are skipped.
pub fn department_rows(snapshot: &Snapshot, view: &ResolvedView) -> Vec<DepartmentRow> {
    let mut rows: IndexMap<&str, DepartmentRow> = snapshot
        .departments_map
        .iter()
        .filter(|(id, _)| {
            view.department_id
                .as_deref()
                .is_none_or(|selected| selected == id.as_str())
        })
        .map(|(id, _)| {
            let name = department_name(&snapshot.departments_map, id);
            (id.as_str(), DepartmentRow::zeroed(id, name))
        })
        .collect();

    for agent in &snapshot.members_data {
        for (department_id, lists) in &agent.department_aging_counts {
            if let Some(row) = rows.get_mut(department_id.as_str()) {
                row.absorb(lists);
            }
        }
    }

    let mut rows: Vec<DepartmentRow> = rows.into_values().filter(|r| r.total() > 0).collect();
    sort_by_name(&mut rows, |row| &row.department_name);
    rows
}

// ─── Ordering ─────────────────────────────────────────────────────

fn collation_key(name: &str) -> String {
    name.trim().chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive name comparison used for both row kinds.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Stable ascending sort by case-folded display name; equal names keep
/// their input order.
pub fn sort_by_name<T>(rows: &mut [T], name: impl Fn(&T) -> &str) {
    rows.sort_by_cached_key(|row| collation_key(name(row)));
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::types::{Department, TicketCounts, TicketId};
    use proptest::prelude::*;

    fn arb_counts() -> impl Strategy<Value = TicketCounts> {
        (0u64..5, 0u64..5, 0u64..5, 0u64..5, 0u64..5).prop_map(
            |(open, hold, escalated, unassigned, in_progress)| TicketCounts {
                open,
                hold,
                escalated,
                unassigned,
                in_progress,
            },
        )
    }

    fn arb_lists() -> impl Strategy<Value = AgingLists> {
        proptest::collection::vec(
            (
                prop::sample::select(Status::ASSIGNABLE.to_vec()),
                prop::sample::select(DepartmentBucket::ALL.to_vec()),
                proptest::collection::vec(0u32..1000, 0..4),
            ),
            0..6,
        )
        .prop_map(|entries| {
            let mut lists = AgingLists::new();
            for (status, bucket, ids) in entries {
                lists.insert(
                    aging_key(status, bucket),
                    ids.into_iter().map(|id| TicketId::new(id.to_string())).collect(),
                );
            }
            lists
        })
    }

    fn arb_agent() -> impl Strategy<Value = Agent> {
        (
            "[A-Za-z]{1,6}",
            arb_counts(),
            proptest::collection::vec(
                (prop::sample::select(vec!["d1", "d2", "d3"]), arb_lists()),
                0..3,
            ),
        )
            .prop_map(|(name, tickets, aging)| Agent {
                name,
                tickets,
                department_aging_counts: aging
                    .into_iter()
                    .map(|(id, lists)| (id.to_string(), lists))
                    .collect(),
                ..Agent::default()
            })
    }

    fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
        proptest::collection::vec(arb_agent(), 0..12).prop_map(|members_data| {
            let departments_map = ["d1", "d2"]
                .iter()
                .map(|id| {
                    (
                        id.to_string(),
                        Department {
                            name: format!("Dept {id}"),
                        },
                    )
                })
                .collect();
            Snapshot {
                members_data,
                departments_map,
                generated_at: None,
            }
        })
    }

    proptest! {
        /// Agent totals equal the sum of the five status counts.
        #[test]
        fn agent_total_is_status_sum(snapshot in arb_snapshot()) {
            for row in agent_rows(&snapshot, &ResolvedView::default()) {
                let agent = &snapshot.members_data[row.agent_index];
                let sum = agent.tickets.open + agent.tickets.hold + agent.tickets.escalated
                    + agent.tickets.unassigned + agent.tickets.in_progress;
                prop_assert_eq!(row.total, sum);
                prop_assert!(row.total > 0);
            }
        }

        /// Rows are non-decreasing by folded name for any input order.
        #[test]
        fn agent_rows_are_sorted(snapshot in arb_snapshot()) {
            let rows = agent_rows(&snapshot, &ResolvedView::default());
            for pair in rows.windows(2) {
                prop_assert_ne!(compare_names(&pair[0].name, &pair[1].name), Ordering::Greater);
            }
        }

        /// Reversing the input yields the same multiset of names in sorted order.
        #[test]
        fn sorting_is_permutation_independent(snapshot in arb_snapshot()) {
            let mut reversed = snapshot.clone();
            reversed.members_data.reverse();
            let forward: Vec<String> = agent_rows(&snapshot, &ResolvedView::default())
                .into_iter().map(|r| r.name.to_lowercase()).collect();
            let backward: Vec<String> = agent_rows(&reversed, &ResolvedView::default())
                .into_iter().map(|r| r.name.to_lowercase()).collect();
            prop_assert_eq!(forward, backward);
        }

        /// Department totals equal the sum of their twelve counters, and each
        /// counter equals the number of contributing ticket IDs.
        #[test]
        fn department_counters_match_ids(snapshot in arb_snapshot()) {
            for row in department_rows(&snapshot, &ResolvedView::default()) {
                let mut sum = 0u64;
                for bucket in DepartmentBucket::ALL {
                    for status in Status::ASSIGNABLE {
                        let expected: u64 = snapshot.members_data.iter()
                            .map(|a| a.aging_ids(&row.department_id, status, bucket).len() as u64)
                            .sum();
                        prop_assert_eq!(row.count(bucket, status), expected);
                        sum += expected;
                    }
                }
                prop_assert_eq!(row.total(), sum);
                prop_assert!(row.total() > 0);
            }
        }
    }
}
