//! Snapshot file tracking and the derived-model cache.
//!
//! The table model is recomputed only when the snapshot generation or the
//! selection changes; hover and tooltip interactions reuse the cached model.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;
use ticket_aging_core::{ResolvedView, Selection, Snapshot, TableConfig, TableModel};

/// A snapshot file plus the modification time it was last read at.
#[derive(Debug)]
pub struct SnapshotSource {
    path: PathBuf,
    modified: Option<SystemTime>,
    generation: u64,
    snapshot: Snapshot,
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl SnapshotSource {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let snapshot = Snapshot::load(path)
            .with_context(|| format!("cannot read snapshot {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            agents = snapshot.members_data.len(),
            departments = snapshot.departments_map.len(),
            "snapshot loaded"
        );
        Ok(Self {
            path: path.to_path_buf(),
            modified: modified_at(path),
            generation: 0,
            snapshot,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Bumped every time a new snapshot replaces the old one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file if its mtime moved. Returns `Ok(true)` when a new
    /// snapshot was installed. A file that fails to parse keeps the previous
    /// snapshot in place.
    pub fn reload_if_changed(&mut self) -> anyhow::Result<bool> {
        let modified = modified_at(&self.path);
        if modified.is_some() && modified == self.modified {
            return Ok(false);
        }
        let snapshot = Snapshot::load(&self.path)
            .with_context(|| format!("cannot read snapshot {}", self.path.display()))?;
        self.modified = modified;
        if snapshot == self.snapshot {
            return Ok(false);
        }
        self.snapshot = snapshot;
        self.generation += 1;
        tracing::info!(generation = self.generation, "snapshot reloaded");
        Ok(true)
    }
}

/// Memoized table model keyed on (snapshot generation, selection).
#[derive(Debug, Default)]
pub struct ModelCache {
    key: Option<(u64, Selection)>,
    model: Option<TableModel>,
    view: Option<ResolvedView>,
}

impl ModelCache {
    /// Return the model for `selection`, rebuilding only when the key moved.
    pub fn get(
        &mut self,
        source: &SnapshotSource,
        config: &TableConfig,
        selection: &Selection,
    ) -> anyhow::Result<&TableModel> {
        let fresh = matches!(
            &self.key,
            Some((generation, cached)) if *generation == source.generation() && cached == selection
        );
        if !fresh || self.model.is_none() {
            let view = config.resolve(selection)?;
            let model = TableModel::build(source.snapshot(), &view);
            tracing::trace!(rows = model.len(), "table model rebuilt");
            self.key = Some((source.generation(), selection.clone()));
            self.view = Some(view);
            self.model = Some(model);
        }
        self.model
            .as_ref()
            .context("table model missing after rebuild")
    }

    /// Last built model, without checking freshness.
    pub fn model(&self) -> Option<&TableModel> {
        self.model.as_ref()
    }

    /// The resolved view behind the cached model.
    pub fn view(&self) -> Option<&ResolvedView> {
        self.view.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_aging_core::AgeBucket;

    const SNAPSHOT: &str = r#"{"membersData": [
        {"name": "Ann", "tickets": {"open": 1}, "ticketsOlderThanMonth": 1}
    ]}"#;

    fn write_snapshot(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("snapshot.json");
        std::fs::write(&path, content).expect("write snapshot");
        path
    }

    #[test]
    fn open_missing_file_names_path() {
        let err = SnapshotSource::open(Path::new("/nonexistent/snap.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/snap.json"));
    }

    #[test]
    fn unchanged_file_is_not_reloaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_snapshot(dir.path(), SNAPSHOT);
        let mut source = SnapshotSource::open(&path).expect("open");
        assert!(!source.reload_if_changed().expect("reload"));
        assert_eq!(source.generation(), 0);
    }

    #[test]
    fn changed_content_bumps_generation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_snapshot(dir.path(), SNAPSHOT);
        let mut source = SnapshotSource::open(&path).expect("open");
        // Forget the mtime so the rewrite is noticed even on coarse clocks.
        source.modified = None;
        write_snapshot(
            dir.path(),
            r#"{"membersData": [{"name": "Bob", "tickets": {"hold": 2}}]}"#,
        );
        assert!(source.reload_if_changed().expect("reload"));
        assert_eq!(source.generation(), 1);
        assert_eq!(source.snapshot().members_data[0].name, "Bob");
    }

    #[test]
    fn broken_rewrite_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_snapshot(dir.path(), SNAPSHOT);
        let mut source = SnapshotSource::open(&path).expect("open");
        source.modified = None;
        write_snapshot(dir.path(), "{not json");
        assert!(source.reload_if_changed().is_err());
        assert_eq!(source.snapshot().members_data[0].name, "Ann");
        assert_eq!(source.generation(), 0);
    }

    #[test]
    fn cache_rebuilds_only_on_key_change() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_snapshot(dir.path(), SNAPSHOT);
        let source = SnapshotSource::open(&path).expect("open");
        let config = TableConfig::default();
        let mut cache = ModelCache::default();

        let selection = Selection::default();
        let columns = cache.get(&source, &config, &selection).expect("model").columns.len();
        assert_eq!(columns, 6);

        let narrowed = Selection {
            selected_ages: Some(vec![AgeBucket::Month]),
            ..Selection::default()
        };
        let model = cache.get(&source, &config, &narrowed).expect("model");
        assert_eq!(model.columns.len(), 4);
        assert_eq!(cache.view().map(|v| v.ages.clone()), Some(vec![AgeBucket::Month]));
    }
}
