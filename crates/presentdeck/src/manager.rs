//! Presentation management on top of the store.
//!
//! [`PresentationManager`] is the only writer of the `has_assets` flag. Every
//! operation that touches both collections does so inside one transaction, so
//! the flag and the asset record either change together or not at all.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{AssetBundle, AssetRecord, PresentationRecord};
use crate::storage::{Records, Store};

/// Outcome of resolving a presentation for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Playback {
    /// The presentation exists and has assets.
    Ready(AssetRecord),
    /// Nothing to show: the presentation or its assets are missing.
    Unavailable,
}

impl Playback {
    /// The assets, if playback is possible.
    #[must_use]
    pub fn assets(&self) -> Option<&AssetRecord> {
        match self {
            Self::Ready(assets) => Some(assets),
            Self::Unavailable => None,
        }
    }
}

/// Changes made by [`PresentationManager::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Presentations whose `has_assets` flag was corrected.
    pub flags_fixed: Vec<String>,
    /// Asset records deleted because no presentation owns them.
    pub orphans_removed: Vec<String>,
}

impl ReconcileReport {
    /// Whether the store was already consistent.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.flags_fixed.is_empty() && self.orphans_removed.is_empty()
    }
}

/// Presentations written into an empty store.
fn default_presentations() -> [PresentationRecord; 2] {
    [
        PresentationRecord::new("1", "Presentation 001", "Primary presentation", false),
        PresentationRecord::new("2", "Presentation 002", "Secondary presentation", false),
    ]
}

/// Orchestrates reads and writes against a [`Store`].
#[derive(Debug)]
pub struct PresentationManager {
    store: Store,
}

impl PresentationManager {
    /// Wrap an open store.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Give the store back, e.g. to close it.
    #[must_use]
    pub fn into_store(self) -> Store {
        self.store
    }

    /// Get every presentation without seeding.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_presentations(&self) -> Result<Vec<PresentationRecord>> {
        self.store.list_presentations()
    }

    /// Get the presentations, writing the two defaults first if there are none.
    ///
    /// A store that already holds any presentation is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn ensure_seeded(&self) -> Result<Vec<PresentationRecord>> {
        let existing = self.store.list_presentations()?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        let tx = self.store.transaction()?;
        for record in &default_presentations() {
            tx.put_presentation(record)?;
        }
        tx.commit()?;

        info!("Seeded store with default presentations");
        self.store.list_presentations()
    }

    /// Store a complete asset bundle and flag its presentation.
    ///
    /// If no presentation exists for `presentation_id`, a placeholder one is
    /// created. The asset write and the metadata write commit together.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or either write fails; in that
    /// case neither write is kept.
    pub fn save_assets(&self, presentation_id: &str, bundle: AssetBundle) -> Result<()> {
        let record = bundle.into_record(presentation_id);

        let tx = self.store.transaction()?;
        tx.put_assets(&record)?;

        let presentation = match tx.get_presentation(presentation_id)? {
            Some(existing) => PresentationRecord {
                has_assets: true,
                ..existing
            },
            None => {
                debug!(
                    "No presentation {} yet, creating placeholder",
                    presentation_id
                );
                PresentationRecord::placeholder(presentation_id)
            }
        };
        tx.put_presentation(&presentation)?;
        tx.commit()?;

        info!("Saved assets for presentation {}", presentation_id);
        Ok(())
    }

    /// Remove a presentation's assets and clear its flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PresentationNotFound`] if there is no presentation
    /// with this id. Any asset record stored under the id is still removed,
    /// since it has no owner.
    pub fn clear_assets(&self, presentation_id: &str) -> Result<()> {
        let tx = self.store.transaction()?;
        let removed = tx.delete_assets(presentation_id)?;

        let Some(existing) = tx.get_presentation(presentation_id)? else {
            tx.commit()?;
            if removed {
                warn!(
                    "Removed orphaned assets for unknown presentation {}",
                    presentation_id
                );
            }
            return Err(Error::presentation_not_found(presentation_id));
        };

        tx.put_presentation(&PresentationRecord {
            has_assets: false,
            ..existing
        })?;
        tx.commit()?;

        info!("Cleared assets for presentation {}", presentation_id);
        Ok(())
    }

    /// Resolve the assets to play for a presentation.
    ///
    /// Returns [`Playback::Unavailable`] when either the presentation or its
    /// assets don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn assets_for_playback(&self, presentation_id: &str) -> Result<Playback> {
        if self.store.get_presentation(presentation_id)?.is_none() {
            debug!("Presentation {} not found for playback", presentation_id);
            return Ok(Playback::Unavailable);
        }

        Ok(self
            .store
            .get_assets(presentation_id)?
            .map_or(Playback::Unavailable, Playback::Ready))
    }

    /// Recompute every `has_assets` flag from the asset records actually
    /// stored, and delete asset records that no presentation owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails; no repair is kept
    /// in that case.
    pub fn reconcile(&self) -> Result<ReconcileReport> {
        let tx = self.store.transaction()?;
        let asset_ids = tx.list_asset_ids()?;
        let presentations = tx.list_presentations()?;
        let mut report = ReconcileReport::default();

        for presentation in &presentations {
            let has_assets = asset_ids.contains(&presentation.id);
            if presentation.has_assets != has_assets {
                tx.put_presentation(&PresentationRecord {
                    has_assets,
                    ..presentation.clone()
                })?;
                report.flags_fixed.push(presentation.id.clone());
            }
        }

        for id in asset_ids {
            if !presentations.iter().any(|p| p.id == id) {
                tx.delete_assets(&id)?;
                report.orphans_removed.push(id);
            }
        }

        tx.commit()?;

        if report.is_clean() {
            debug!("Store is consistent");
        } else {
            warn!(
                "Reconciled store: {} flag(s) fixed, {} orphaned asset record(s) removed",
                report.flags_fixed.len(),
                report.orphans_removed.len()
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;

    fn create_manager() -> PresentationManager {
        PresentationManager::new(Store::open_in_memory().expect("failed to create test store"))
    }

    fn payload(media_type: &str, bytes: &[u8]) -> Payload {
        Payload::new(media_type, bytes.to_vec())
    }

    /// Make every update of a presentation row fail.
    fn reject_metadata_updates(manager: &PresentationManager) {
        manager
            .store()
            .connection()
            .execute_batch(
                r"
                CREATE TRIGGER reject_presentation_update
                BEFORE UPDATE ON presentations
                BEGIN
                    SELECT RAISE(ABORT, 'metadata write rejected');
                END;
                ",
            )
            .unwrap();
    }

    fn bundle() -> AssetBundle {
        AssetBundle::new(
            [
                payload("image/png", b"A"),
                payload("image/png", b"B"),
                payload("image/png", b"C"),
            ],
            payload("video/mp4", b"V"),
        )
        .unwrap()
    }

    #[test]
    fn test_ensure_seeded_empty_store() {
        let manager = create_manager();
        let presentations = manager.ensure_seeded().unwrap();

        assert_eq!(presentations.len(), 2);
        assert_eq!(presentations[0].id, "1");
        assert_eq!(presentations[0].title, "Presentation 001");
        assert_eq!(presentations[1].id, "2");
        assert_eq!(presentations[1].description, "Secondary presentation");
        assert!(presentations.iter().all(|p| !p.has_assets));
    }

    #[test]
    fn test_ensure_seeded_idempotent() {
        let manager = create_manager();
        let first = manager.ensure_seeded().unwrap();
        let second = manager.ensure_seeded().unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.list_presentations().unwrap().len(), 2);
    }

    #[test]
    fn test_ensure_seeded_leaves_existing_store_alone() {
        let manager = create_manager();
        let custom = PresentationRecord::new("x", "Custom", "Mine", false);
        manager.store().put_presentation(&custom).unwrap();

        let presentations = manager.ensure_seeded().unwrap();
        assert_eq!(presentations, vec![custom]);
    }

    #[test]
    fn test_ensure_seeded_keeps_flags() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();
        manager.save_assets("1", bundle()).unwrap();

        let presentations = manager.ensure_seeded().unwrap();
        assert!(presentations[0].has_assets);
    }

    #[test]
    fn test_save_assets_flags_presentation() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();

        manager.save_assets("1", bundle()).unwrap();

        let presentation = manager.store().get_presentation("1").unwrap().unwrap();
        assert!(presentation.has_assets);
        assert_eq!(presentation.title, "Presentation 001");
        assert_eq!(
            manager.store().get_assets("1").unwrap(),
            Some(bundle().into_record("1"))
        );

        let other = manager.store().get_presentation("2").unwrap().unwrap();
        assert!(!other.has_assets);
    }

    #[test]
    fn test_save_assets_creates_placeholder() {
        let manager = create_manager();

        manager.save_assets("new", bundle()).unwrap();

        let presentation = manager.store().get_presentation("new").unwrap().unwrap();
        assert_eq!(presentation, PresentationRecord::placeholder("new"));
    }

    #[test]
    fn test_save_assets_overwrites_previous_bundle() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();
        manager.save_assets("1", bundle()).unwrap();

        let replacement = AssetBundle::new(
            [
                payload("image/gif", b"X"),
                payload("image/gif", b"Y"),
                payload("image/gif", b"Z"),
            ],
            payload("video/webm", b"W"),
        )
        .unwrap();
        manager.save_assets("1", replacement.clone()).unwrap();

        assert_eq!(
            manager.store().get_assets("1").unwrap(),
            Some(replacement.into_record("1"))
        );
    }

    #[test]
    fn test_save_assets_invalid_id_writes_nothing() {
        let manager = create_manager();

        let err = manager.save_assets("", bundle()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
        assert!(manager.store().list_asset_ids().unwrap().is_empty());
        assert!(manager.list_presentations().unwrap().is_empty());
    }

    #[test]
    fn test_save_assets_metadata_failure_rolls_back_assets() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();
        reject_metadata_updates(&manager);

        assert!(manager.save_assets("1", bundle()).is_err());

        assert!(manager.store().get_assets("1").unwrap().is_none());
        let presentation = manager.store().get_presentation("1").unwrap().unwrap();
        assert!(!presentation.has_assets);
    }

    #[test]
    fn test_clear_assets() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();
        manager.save_assets("1", bundle()).unwrap();

        manager.clear_assets("1").unwrap();

        assert!(manager.store().get_assets("1").unwrap().is_none());
        let presentation = manager.store().get_presentation("1").unwrap().unwrap();
        assert!(!presentation.has_assets);
    }

    #[test]
    fn test_clear_assets_metadata_failure_keeps_assets() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();
        manager.save_assets("1", bundle()).unwrap();
        reject_metadata_updates(&manager);

        assert!(manager.clear_assets("1").is_err());

        assert_eq!(
            manager.store().get_assets("1").unwrap(),
            Some(bundle().into_record("1"))
        );
        let presentation = manager.store().get_presentation("1").unwrap().unwrap();
        assert!(presentation.has_assets);
    }

    #[test]
    fn test_clear_assets_without_assets() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();

        manager.clear_assets("2").unwrap();

        let presentation = manager.store().get_presentation("2").unwrap().unwrap();
        assert!(!presentation.has_assets);
    }

    #[test]
    fn test_clear_assets_nonexistent_id() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();

        let err = manager.clear_assets("nonexistent-id").unwrap_err();
        assert!(err.is_presentation_not_found());
        assert!(manager.store().get_assets("nonexistent-id").unwrap().is_none());
        assert!(manager
            .store()
            .get_presentation("nonexistent-id")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_clear_assets_removes_orphan_before_failing() {
        let manager = create_manager();
        manager
            .store()
            .put_assets(&bundle().into_record("orphan"))
            .unwrap();

        let err = manager.clear_assets("orphan").unwrap_err();
        assert!(err.is_presentation_not_found());
        assert!(manager.store().get_assets("orphan").unwrap().is_none());
    }

    #[test]
    fn test_playback_after_save() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();
        manager.save_assets("1", bundle()).unwrap();

        let playback = manager.assets_for_playback("1").unwrap();
        let assets = playback.assets().expect("assets should be available");
        let logos: Vec<&[u8]> = assets
            .logos
            .iter()
            .map(|slot| slot.as_ref().unwrap().data())
            .collect();
        assert_eq!(logos, vec![&b"A"[..], &b"B"[..], &b"C"[..]]);
        assert_eq!(assets.video.as_ref().unwrap().data(), b"V");
    }

    #[test]
    fn test_playback_after_clear() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();
        manager.save_assets("1", bundle()).unwrap();
        manager.clear_assets("1").unwrap();

        assert_eq!(
            manager.assets_for_playback("1").unwrap(),
            Playback::Unavailable
        );
    }

    #[test]
    fn test_playback_without_assets() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();

        assert_eq!(
            manager.assets_for_playback("2").unwrap(),
            Playback::Unavailable
        );
    }

    #[test]
    fn test_playback_requires_presentation() {
        let manager = create_manager();
        manager
            .store()
            .put_assets(&bundle().into_record("orphan"))
            .unwrap();

        let playback = manager.assets_for_playback("orphan").unwrap();
        assert_eq!(playback, Playback::Unavailable);
        assert!(playback.assets().is_none());
    }

    #[test]
    fn test_reconcile_clean_store() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();
        manager.save_assets("1", bundle()).unwrap();

        let report = manager.reconcile().unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_reconcile_repairs_drift() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();
        let store = manager.store();

        // Flag set without assets.
        store
            .put_presentation(&PresentationRecord::new("1", "P1", "D", true))
            .unwrap();
        // Assets present without the flag.
        store.put_assets(&bundle().into_record("2")).unwrap();
        // Assets with no presentation at all.
        store.put_assets(&bundle().into_record("ghost")).unwrap();

        let report = manager.reconcile().unwrap();
        assert_eq!(report.flags_fixed, vec!["1", "2"]);
        assert_eq!(report.orphans_removed, vec!["ghost"]);

        assert!(!store.get_presentation("1").unwrap().unwrap().has_assets);
        assert!(store.get_presentation("2").unwrap().unwrap().has_assets);
        assert!(store.get_assets("ghost").unwrap().is_none());
        assert!(manager.reconcile().unwrap().is_clean());
    }

    #[test]
    fn test_into_store() {
        let manager = create_manager();
        manager.ensure_seeded().unwrap();

        let store = manager.into_store();
        assert_eq!(store.list_presentations().unwrap().len(), 2);
        store.close().unwrap();
    }
}
