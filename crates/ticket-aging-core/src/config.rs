//! Table configuration: one parameterized table instead of per-layout copies.
//!
//! A config file only needs to name what differs from its variant preset:
//!
//! ```toml
//! variant = "filtered"
//! default_ages = ["twoWeeks", "month"]
//!
//! [theme]
//! header_bg = "#1E4489"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AgingError;
use crate::selection::{ResolvedView, Selection};
use crate::types::{AgeBucket, Status};

/// Presets reproducing the three historical table layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Two aging columns (14-30, 30+), combined counts only.
    Basic,
    /// Three aging columns with per-status breakdown.
    Filtered,
    /// `Filtered` plus the department pivot.
    #[default]
    Departmental,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Filtered => "filtered",
            Self::Departmental => "departmental",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = AgingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "filtered" => Ok(Self::Filtered),
            "departmental" | "department" => Ok(Self::Departmental),
            _ => Err(AgingError::UnknownVariant(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilterMode {
    #[default]
    Enabled,
    /// Selected statuses are ignored; cells always show one combined number.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusColors {
    pub open: String,
    pub hold: String,
    pub escalated: String,
    pub unassigned: String,
    pub in_progress: String,
}

impl Default for StatusColors {
    fn default() -> Self {
        Self {
            open: "#43a047".into(),
            hold: "#fdd835".into(),
            escalated: "#e53935".into(),
            unassigned: "#9e9e9e".into(),
            in_progress: "#1e88e5".into(),
        }
    }
}

impl StatusColors {
    pub fn get(&self, status: Status) -> &str {
        match status {
            Status::Open => &self.open,
            Status::Hold => &self.hold,
            Status::Escalated => &self.escalated,
            Status::Unassigned => &self.unassigned,
            Status::InProgress => &self.in_progress,
        }
    }
}

/// Colors as `#rrggbb` or a named terminal color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub header_bg: String,
    pub header_fg: String,
    pub row_bg: String,
    pub row_fg: String,
    pub hover_bg: String,
    pub border: String,
    pub close: String,
    pub status: StatusColors,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_bg: "#1e4489".into(),
            header_fg: "white".into(),
            row_bg: "black".into(),
            row_fg: "white".into(),
            hover_bg: "#2a3f66".into(),
            border: "#606060".into(),
            close: "#bd2331".into(),
            status: StatusColors::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub variant: Variant,
    /// Age columns the table offers, in canonical order.
    pub age_buckets: Vec<AgeBucket>,
    /// Ages shown when the caller selected none.
    pub default_ages: Vec<AgeBucket>,
    pub status_filter: StatusFilterMode,
    /// Whether the department pivot may be switched on.
    pub department_view: bool,
    pub theme: Theme,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::preset(Variant::default())
    }
}

/// On-disk shape; every field falls back to the variant preset.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    variant: Option<Variant>,
    age_buckets: Option<Vec<String>>,
    default_ages: Option<Vec<String>>,
    status_filter: Option<StatusFilterMode>,
    department_view: Option<bool>,
    theme: Option<Theme>,
}

fn parse_ages(keys: &[String]) -> Result<Vec<AgeBucket>, AgingError> {
    keys.iter().map(|k| k.parse()).collect()
}

fn canonical(ages: &[AgeBucket]) -> Vec<AgeBucket> {
    AgeBucket::ALL
        .into_iter()
        .filter(|a| ages.contains(a))
        .collect()
}

impl TableConfig {
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Basic => Self {
                variant,
                age_buckets: vec![AgeBucket::TwoWeeks, AgeBucket::Month],
                default_ages: vec![AgeBucket::TwoWeeks, AgeBucket::Month],
                status_filter: StatusFilterMode::Disabled,
                department_view: false,
                theme: Theme::default(),
            },
            Variant::Filtered | Variant::Departmental => Self {
                variant,
                age_buckets: AgeBucket::ALL.to_vec(),
                default_ages: AgeBucket::ALL.to_vec(),
                status_filter: StatusFilterMode::Enabled,
                department_view: variant == Variant::Departmental,
                theme: Theme::default(),
            },
        }
    }

    /// Parse a TOML config, overlaying it on its variant preset.
    pub fn from_toml(s: &str) -> Result<Self, AgingError> {
        let file: ConfigFile = toml::from_str(s)?;
        let mut config = Self::preset(file.variant.unwrap_or_default());

        if let Some(keys) = &file.age_buckets {
            config.age_buckets = canonical(&parse_ages(keys)?);
        }
        match &file.default_ages {
            Some(keys) => config.default_ages = canonical(&parse_ages(keys)?),
            None => config
                .default_ages
                .retain(|a| config.age_buckets.contains(a)),
        }
        if let Some(mode) = file.status_filter {
            config.status_filter = mode;
        }
        if let Some(enabled) = file.department_view {
            config.department_view = enabled;
        }
        if let Some(theme) = file.theme {
            config.theme = theme;
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, AgingError> {
        let content = std::fs::read_to_string(path).map_err(|e| AgingError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Switch to another preset, keeping the theme.
    pub fn with_variant(self, variant: Variant) -> Self {
        Self {
            theme: self.theme,
            ..Self::preset(variant)
        }
    }

    /// Apply defaults and config limits to a caller selection.
    pub fn resolve(&self, selection: &Selection) -> Result<ResolvedView, AgingError> {
        if selection.department_view_enabled && !self.department_view {
            return Err(AgingError::UnsupportedDepartmentView(self.variant));
        }

        let requested = selection
            .selected_ages
            .as_deref()
            .unwrap_or(&self.default_ages);
        let ages = canonical(requested)
            .into_iter()
            .filter(|a| self.age_buckets.contains(a))
            .collect();

        let statuses = match self.status_filter {
            StatusFilterMode::Disabled => Vec::new(),
            StatusFilterMode::Enabled => Status::ALL
                .into_iter()
                .filter(|s| selection.selected_statuses.contains(s))
                .collect(),
        };

        let department_id = selection
            .selected_department_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let agent_names = selection
            .selected_agent_names
            .as_ref()
            .map(|names| {
                names
                    .iter()
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|names| !names.is_empty());

        Ok(ResolvedView {
            ages,
            statuses,
            department_id,
            agent_names,
            department_view: selection.department_view_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_preset_matches_two_column_layout() {
        let config = TableConfig::preset(Variant::Basic);
        assert_eq!(config.default_ages, vec![AgeBucket::TwoWeeks, AgeBucket::Month]);
        assert_eq!(config.status_filter, StatusFilterMode::Disabled);
        assert!(!config.department_view);
    }

    #[test]
    fn default_is_departmental() {
        let config = TableConfig::default();
        assert_eq!(config.variant, Variant::Departmental);
        assert!(config.department_view);
        assert_eq!(config.age_buckets, AgeBucket::ALL.to_vec());
    }

    #[test]
    fn toml_overlays_preset() {
        let config = TableConfig::from_toml(
            r##"
variant = "filtered"
default_ages = ["month", "twoWeeks"]

[theme]
header_bg = "#000000"
"##,
        )
        .expect("parse");
        assert_eq!(config.variant, Variant::Filtered);
        assert_eq!(config.default_ages, vec![AgeBucket::TwoWeeks, AgeBucket::Month]);
        assert_eq!(config.theme.header_bg, "#000000");
        assert_eq!(config.theme.row_bg, "black");
        assert!(!config.department_view);
    }

    #[test]
    fn toml_empty_is_default() {
        assert_eq!(TableConfig::from_toml("").expect("parse"), TableConfig::default());
    }

    #[test]
    fn toml_narrowed_buckets_narrow_defaults() {
        let config = TableConfig::from_toml(r#"age_buckets = ["sevenDays"]"#).expect("parse");
        assert_eq!(config.age_buckets, vec![AgeBucket::SevenDays]);
        assert_eq!(config.default_ages, vec![AgeBucket::SevenDays]);
    }

    #[test]
    fn toml_unknown_bucket_is_error() {
        let err = TableConfig::from_toml(r#"age_buckets = ["year"]"#).unwrap_err();
        assert!(matches!(err, AgingError::UnknownAgeBucket(ref k) if k == "year"));
    }

    #[test]
    fn toml_unknown_field_is_error() {
        let err = TableConfig::from_toml("colour = 1").unwrap_err();
        assert!(matches!(err, AgingError::Toml(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "variant = \"basic\"\n").expect("write");
        let config = TableConfig::load(&path).expect("load");
        assert_eq!(config.variant, Variant::Basic);
    }

    #[test]
    fn with_variant_keeps_theme() {
        let mut config = TableConfig::default();
        config.theme.close = "red".into();
        let basic = config.with_variant(Variant::Basic);
        assert_eq!(basic.variant, Variant::Basic);
        assert_eq!(basic.theme.close, "red");
    }

    #[test]
    fn resolve_uses_default_ages_in_canonical_order() {
        let config = TableConfig::preset(Variant::Filtered);
        let selection = Selection {
            selected_ages: Some(vec![AgeBucket::Month, AgeBucket::SevenDays, AgeBucket::Month]),
            ..Selection::default()
        };
        let view = config.resolve(&selection).expect("resolve");
        assert_eq!(view.ages, vec![AgeBucket::SevenDays, AgeBucket::Month]);

        let view = config.resolve(&Selection::default()).expect("resolve");
        assert_eq!(view.ages, AgeBucket::ALL.to_vec());
    }

    #[test]
    fn resolve_drops_ages_outside_bucket_set() {
        let config = TableConfig::preset(Variant::Basic);
        let selection = Selection {
            selected_ages: Some(vec![AgeBucket::SevenDays, AgeBucket::Month]),
            ..Selection::default()
        };
        let view = config.resolve(&selection).expect("resolve");
        assert_eq!(view.ages, vec![AgeBucket::Month]);
    }

    #[test]
    fn resolve_ignores_statuses_when_filter_disabled() {
        let selection = Selection {
            selected_statuses: vec![Status::Open],
            ..Selection::default()
        };
        let basic = TableConfig::preset(Variant::Basic).resolve(&selection).expect("resolve");
        assert!(basic.statuses.is_empty());
        let filtered = TableConfig::preset(Variant::Filtered)
            .resolve(&selection)
            .expect("resolve");
        assert_eq!(filtered.statuses, vec![Status::Open]);
    }

    #[test]
    fn resolve_normalizes_department_and_names() {
        let selection = Selection {
            selected_department_id: Some("  ".into()),
            selected_agent_names: Some(vec![" Ann ".into(), "".into()]),
            ..Selection::default()
        };
        let view = TableConfig::default().resolve(&selection).expect("resolve");
        assert_eq!(view.department_id, None);
        assert_eq!(view.agent_names, Some(vec!["Ann".to_string()]));

        let selection = Selection {
            selected_agent_names: Some(vec![" ".into()]),
            ..Selection::default()
        };
        let view = TableConfig::default().resolve(&selection).expect("resolve");
        assert_eq!(view.agent_names, None);
    }

    #[test]
    fn resolve_rejects_department_view_when_unsupported() {
        let selection = Selection {
            department_view_enabled: true,
            ..Selection::default()
        };
        let err = TableConfig::preset(Variant::Filtered)
            .resolve(&selection)
            .unwrap_err();
        assert!(err.to_string().contains("filtered"));
    }
}
