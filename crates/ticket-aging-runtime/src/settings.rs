//! Config file resolution and CLI overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ticket_aging_core::{ResolvedView, Selection, TableConfig};

use crate::cli::{ViewOpts, default_config_path};

/// Config plus the caller selection derived from CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: TableConfig,
    pub selection: Selection,
}

impl Settings {
    pub fn resolve(&self) -> anyhow::Result<ResolvedView> {
        Ok(self.config.resolve(&self.selection)?)
    }
}

/// Load the config file. An explicit path must exist; the default path is
/// optional and falls back to the preset.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<TableConfig> {
    if let Some(path) = explicit {
        tracing::debug!(path = %path.display(), "loading config");
        return TableConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "loading default config");
            TableConfig::load(&path)
                .with_context(|| format!("cannot load config {}", path.display()))
        }
        _ => Ok(TableConfig::default()),
    }
}

pub fn selection_from_opts(opts: &ViewOpts) -> Selection {
    Selection {
        selected_ages: (!opts.ages.is_empty()).then(|| opts.ages.clone()),
        selected_statuses: opts.statuses.clone(),
        selected_department_id: opts.department.clone(),
        selected_agent_names: (!opts.agents.is_empty()).then(|| opts.agents.clone()),
        department_view_enabled: opts.department_view,
    }
}

pub fn load_settings(config_path: Option<&PathBuf>, opts: &ViewOpts) -> anyhow::Result<Settings> {
    let mut config = load_config(config_path.map(PathBuf::as_path))?;
    if let Some(variant) = opts.variant {
        config = config.with_variant(variant);
    }
    let settings = Settings {
        config,
        selection: selection_from_opts(opts),
    };
    // Surface flag/config conflicts before any rendering starts.
    settings.resolve()?;
    tracing::debug!(
        variant = %settings.config.variant,
        department_view = settings.selection.department_view_enabled,
        "settings resolved"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_aging_core::{AgeBucket, Status, Variant};

    fn opts() -> ViewOpts {
        ViewOpts {
            snapshot: PathBuf::from("s.json"),
            ..ViewOpts::default()
        }
    }

    #[test]
    fn empty_flags_leave_defaults() {
        let selection = selection_from_opts(&opts());
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn flags_map_onto_selection() {
        let opts = ViewOpts {
            ages: vec![AgeBucket::Month],
            statuses: vec![Status::Hold],
            department: Some("d1".into()),
            agents: vec!["Ann".into()],
            department_view: true,
            ..opts()
        };
        let selection = selection_from_opts(&opts);
        assert_eq!(selection.selected_ages, Some(vec![AgeBucket::Month]));
        assert_eq!(selection.selected_statuses, vec![Status::Hold]);
        assert_eq!(selection.selected_department_id.as_deref(), Some("d1"));
        assert_eq!(selection.selected_agent_names, Some(vec!["Ann".to_string()]));
        assert!(selection.department_view_enabled);
    }

    #[test]
    fn explicit_config_must_exist() {
        let missing = PathBuf::from("/nonexistent/ticket-aging.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/ticket-aging.toml"));
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "variant = \"filtered\"\n").expect("write");
        let settings = load_settings(Some(&path), &opts()).expect("settings");
        assert_eq!(settings.config.variant, Variant::Filtered);
    }

    #[test]
    fn variant_flag_overrides_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "variant = \"filtered\"\n").expect("write");
        let opts = ViewOpts {
            variant: Some(Variant::Basic),
            ..opts()
        };
        let settings = load_settings(Some(&path), &opts).expect("settings");
        assert_eq!(settings.config.variant, Variant::Basic);
    }

    #[test]
    fn department_view_conflict_is_reported_early() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "variant = \"basic\"\n").expect("write");
        let opts = ViewOpts {
            department_view: true,
            ..opts()
        };
        assert!(load_settings(Some(&path), &opts).is_err());
    }
}
