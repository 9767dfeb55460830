//! Caller-side selections (ages, statuses, department, agents, view mode)
//! and their resolved, normalized form.

use serde::{Deserialize, Serialize};

use crate::serde_helpers::status_options;
use crate::types::{AgeBucket, Status};

/// What the dropdowns and toggles around the table currently select.
///
/// Mirrors the dashboard's input contract; `None` for `selected_ages` means
/// "use the configured default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selection {
    pub selected_ages: Option<Vec<AgeBucket>>,
    #[serde(deserialize_with = "status_options")]
    pub selected_statuses: Vec<Status>,
    pub selected_department_id: Option<String>,
    pub selected_agent_names: Option<Vec<String>>,
    pub department_view_enabled: bool,
}

impl Selection {
    /// Flip `bucket` in the selected ages, starting from `current` when no
    /// explicit selection exists yet.
    pub fn toggle_age(&mut self, bucket: AgeBucket, current: &[AgeBucket]) {
        let ages = self.selected_ages.get_or_insert_with(|| current.to_vec());
        if let Some(pos) = ages.iter().position(|a| *a == bucket) {
            ages.remove(pos);
        } else {
            ages.push(bucket);
        }
    }
}

/// A selection after defaults, config limits and trimming were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedView {
    /// Age columns in canonical order.
    pub ages: Vec<AgeBucket>,
    /// Statuses broken out as indicators; empty means one combined number.
    pub statuses: Vec<Status>,
    pub department_id: Option<String>,
    /// Trimmed allowed agent names; `None` when no name filter applies.
    pub agent_names: Option<Vec<String>>,
    pub department_view: bool,
}

impl ResolvedView {
    pub fn allows_agent(&self, name: &str) -> bool {
        match &self.agent_names {
            None => true,
            Some(names) => {
                let name = name.trim();
                names.iter().any(|n| n == name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_age_starts_from_current_defaults() {
        let mut selection = Selection::default();
        selection.toggle_age(AgeBucket::Month, &[AgeBucket::TwoWeeks, AgeBucket::Month]);
        assert_eq!(selection.selected_ages, Some(vec![AgeBucket::TwoWeeks]));

        selection.toggle_age(AgeBucket::SevenDays, &[]);
        assert_eq!(
            selection.selected_ages,
            Some(vec![AgeBucket::TwoWeeks, AgeBucket::SevenDays])
        );
    }

    #[test]
    fn selection_deserializes_dashboard_props() {
        let selection: Selection = serde_json::from_str(
            r#"{
                "selectedAges": ["sevenDays"],
                "selectedStatuses": [{"value": "open"}, {"value": "hold"}],
                "selectedDepartmentId": "d1",
                "selectedAgentNames": ["Ann "],
                "departmentViewEnabled": false
            }"#,
        )
        .expect("parse");
        assert_eq!(selection.selected_ages, Some(vec![AgeBucket::SevenDays]));
        assert_eq!(selection.selected_statuses, vec![Status::Open, Status::Hold]);
        assert_eq!(selection.selected_department_id.as_deref(), Some("d1"));
    }

    #[test]
    fn allows_agent_trims_names() {
        let view = ResolvedView {
            agent_names: Some(vec!["Ann".into()]),
            ..ResolvedView::default()
        };
        assert!(view.allows_agent("  Ann "));
        assert!(!view.allows_agent("ann"));
        assert!(ResolvedView::default().allows_agent("anyone"));
    }
}
