use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AgingError;
use crate::serde_helpers::{lenient, lenient_aging_map, lenient_map, lenient_seq};

// ─── Status ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Open,
    Hold,
    Escalated,
    Unassigned,
    InProgress,
}

impl Status {
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::Hold,
        Self::Escalated,
        Self::Unassigned,
        Self::InProgress,
    ];

    /// Statuses that can appear in an agent's per-department aging lists.
    /// Unassigned tickets have no owning agent.
    pub const ASSIGNABLE: [Self; 4] = [Self::Open, Self::Hold, Self::InProgress, Self::Escalated];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Hold => "hold",
            Self::Escalated => "escalated",
            Self::Unassigned => "unassigned",
            Self::InProgress => "inProgress",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Hold => "Hold",
            Self::Escalated => "Escalated",
            Self::Unassigned => "Unassigned",
            Self::InProgress => "In Progress",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = AgingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "open" => Ok(Self::Open),
            "hold" | "onhold" => Ok(Self::Hold),
            "escalated" => Ok(Self::Escalated),
            "unassigned" => Ok(Self::Unassigned),
            "inprogress" => Ok(Self::InProgress),
            _ => Err(AgingError::UnknownStatus(s.to_string())),
        }
    }
}

// ─── Age buckets ──────────────────────────────────────────────────

/// Shared shape of the two bucket families: both name a slice of the
/// `<status><Infix>Tickets` aging lists.
pub trait AgingBucket: Copy {
    /// Stable key used in selections, config and JSON output.
    fn key(self) -> &'static str;
    /// Column header text.
    fn label(self) -> &'static str;
    /// Middle segment of the aging list key.
    fn infix(self) -> &'static str;
}

/// Key of the ticket-ID list for `status` in `bucket`, e.g.
/// `openBetweenOneAndSevenDaysTickets`.
pub fn aging_key(status: Status, bucket: impl AgingBucket) -> String {
    format!("{}{}Tickets", status.as_str(), bucket.infix())
}

/// Age buckets offered in the agent view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AgeBucket {
    SevenDays,
    TwoWeeks,
    Month,
}

impl AgeBucket {
    pub const ALL: [Self; 3] = [Self::SevenDays, Self::TwoWeeks, Self::Month];
}

impl AgingBucket for AgeBucket {
    fn key(self) -> &'static str {
        match self {
            Self::SevenDays => "sevenDays",
            Self::TwoWeeks => "twoWeeks",
            Self::Month => "month",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::SevenDays => "1 - 7 Days Tickets",
            Self::TwoWeeks => "14 - 30 Days Tickets",
            Self::Month => "30+ Days Tickets",
        }
    }

    fn infix(self) -> &'static str {
        match self {
            Self::SevenDays => "BetweenOneAndSevenDays",
            Self::TwoWeeks => "BetweenTwoWeeksAndMonth",
            Self::Month => "OlderThanMonth",
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AgeBucket {
    type Err = AgingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sevendays" | "seven_days" | "7d" | "1-7" => Ok(Self::SevenDays),
            "twoweeks" | "two_weeks" | "14-30" => Ok(Self::TwoWeeks),
            "month" | "30+" => Ok(Self::Month),
            _ => Err(AgingError::UnknownAgeBucket(s.to_string())),
        }
    }
}

/// The three fixed buckets of the department view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DepartmentBucket {
    #[serde(rename = "1_7")]
    OneToSeven,
    #[serde(rename = "8_15")]
    EightToFifteen,
    #[serde(rename = "15_plus")]
    OverFifteen,
}

impl DepartmentBucket {
    pub const ALL: [Self; 3] = [Self::OneToSeven, Self::EightToFifteen, Self::OverFifteen];
}

impl AgingBucket for DepartmentBucket {
    fn key(self) -> &'static str {
        match self {
            Self::OneToSeven => "1_7",
            Self::EightToFifteen => "8_15",
            Self::OverFifteen => "15_plus",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::OneToSeven => "1-7 Days",
            Self::EightToFifteen => "8-15 Days",
            Self::OverFifteen => "15+ Days",
        }
    }

    fn infix(self) -> &'static str {
        match self {
            Self::OneToSeven => "BetweenOneAndSevenDays",
            Self::EightToFifteen => "BetweenEightAndFifteenDays",
            Self::OverFifteen => "OlderThanFifteenDays",
        }
    }
}

// ─── Ticket IDs ───────────────────────────────────────────────────

/// A ticket identifier as the upstream source sent it. Numeric IDs are kept
/// in their textual form so tooltips print them unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TicketId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TicketId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

// ─── Agents & departments ─────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketCounts {
    #[serde(deserialize_with = "lenient")]
    pub open: u64,
    #[serde(deserialize_with = "lenient")]
    pub hold: u64,
    #[serde(deserialize_with = "lenient")]
    pub escalated: u64,
    #[serde(deserialize_with = "lenient")]
    pub unassigned: u64,
    #[serde(deserialize_with = "lenient")]
    pub in_progress: u64,
}

impl TicketCounts {
    pub fn get(&self, status: Status) -> u64 {
        match status {
            Status::Open => self.open,
            Status::Hold => self.hold,
            Status::Escalated => self.escalated,
            Status::Unassigned => self.unassigned,
            Status::InProgress => self.in_progress,
        }
    }

    /// Sum of the five status counts.
    pub fn total(&self) -> u64 {
        Status::ALL
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(self.get(*s)))
    }
}

/// Ticket-ID lists of one agent in one department, keyed by aging key.
pub type AgingLists = IndexMap<String, Vec<TicketId>>;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Agent {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub tickets: TicketCounts,
    #[serde(deserialize_with = "lenient")]
    pub tickets_between_one_and_seven_days: u64,
    #[serde(deserialize_with = "lenient")]
    pub tickets_between_two_weeks_and_month: u64,
    #[serde(deserialize_with = "lenient")]
    pub tickets_older_than_month: u64,
    #[serde(deserialize_with = "lenient_map")]
    pub department_ticket_counts: IndexMap<String, u64>,
    #[serde(deserialize_with = "lenient_aging_map")]
    pub department_aging_counts: IndexMap<String, AgingLists>,
}

impl Agent {
    /// Pre-bucketed count for an agent-view age column.
    pub fn age_count(&self, bucket: AgeBucket) -> u64 {
        match bucket {
            AgeBucket::SevenDays => self.tickets_between_one_and_seven_days,
            AgeBucket::TwoWeeks => self.tickets_between_two_weeks_and_month,
            AgeBucket::Month => self.tickets_older_than_month,
        }
    }

    pub fn department_ticket_count(&self, department_id: &str) -> u64 {
        self.department_ticket_counts
            .get(department_id)
            .copied()
            .unwrap_or(0)
    }

    /// Ticket IDs in one department's list; empty when either level is absent.
    pub fn aging_ids(
        &self,
        department_id: &str,
        status: Status,
        bucket: impl AgingBucket,
    ) -> &[TicketId] {
        self.department_aging_counts
            .get(department_id)
            .and_then(|lists| lists.get(&aging_key(status, bucket)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when any aging list of the department holds at least one ID.
    pub fn has_department_aging(&self, department_id: &str) -> bool {
        self.department_aging_counts
            .get(department_id)
            .is_some_and(|lists| lists.values().any(|ids| !ids.is_empty()))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Department {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
}

/// Department id → department, in the order the source listed them.
pub type DepartmentsMap = IndexMap<String, Department>;

/// Display name of a department, falling back to its id when unmapped.
pub fn department_name<'a>(departments: &'a DepartmentsMap, department_id: &'a str) -> &'a str {
    departments
        .get(department_id)
        .map(|d| d.name.as_str())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(department_id)
}

// ─── Snapshot ─────────────────────────────────────────────────────

/// One pre-aggregated export of the ticketing system.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient_seq")]
    pub members_data: Vec<Agent>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub departments_map: DepartmentsMap,
}

impl Snapshot {
    /// Parse a snapshot document. A bare array is read as `membersData`.
    /// Malformed nested values degrade to zero or empty; only invalid JSON
    /// and a missing `membersData` are errors.
    pub fn from_json(s: &str) -> Result<Self, AgingError> {
        match serde_json::from_str::<serde_json::Value>(s)? {
            serde_json::Value::Array(items) => Ok(Self {
                members_data: items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value::<Agent>(item).ok())
                    .collect(),
                ..Self::default()
            }),
            value => Ok(serde_json::from_value(value)?),
        }
    }

    pub fn load(path: &Path) -> Result<Self, AgingError> {
        let content = std::fs::read_to_string(path).map_err(|e| AgingError::io(path, e))?;
        Self::from_json(&content)
    }
}
