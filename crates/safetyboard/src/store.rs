//! In-memory incident store.
//!
//! The store owns the canonical incident collection (newest additions first)
//! and the set of incidents whose details are expanded. Nothing is persisted.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::incident::{builtin_seed, Incident, IncidentDraft, IncidentId};

/// Largest id accepted from seed data. Ids above it are rejected so that
/// `max + 1` assignment can't run out of room.
pub const MAX_SEED_ID: u64 = 0xFFFF_FFFF;

/// Owns the incident collection and the expanded-details set.
#[derive(Debug, Clone, Default)]
pub struct IncidentStore {
    incidents: Vec<Incident>,
    expanded: HashSet<IncidentId>,
}

impl IncidentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the built-in seed incidents.
    #[must_use]
    pub fn with_builtin_seed() -> Self {
        Self {
            incidents: builtin_seed(),
            expanded: HashSet::new(),
        }
    }

    /// Create a store from an externally supplied collection, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateIncidentId`] if two incidents share an id, or
    /// [`Error::IncidentIdTooLarge`] if an id is above [`MAX_SEED_ID`].
    pub fn from_incidents(incidents: Vec<Incident>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(incidents.len());
        for incident in &incidents {
            if incident.id.0 > MAX_SEED_ID {
                return Err(Error::IncidentIdTooLarge {
                    id: incident.id.0,
                    max: MAX_SEED_ID,
                });
            }
            if !seen.insert(incident.id) {
                return Err(Error::DuplicateIncidentId { id: incident.id.0 });
            }
        }
        Ok(Self {
            incidents,
            expanded: HashSet::new(),
        })
    }

    /// All incidents in store order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Number of incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether the store holds no incidents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Look up an incident by id.
    #[must_use]
    pub fn get(&self, id: IncidentId) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == id)
    }

    /// The id the next added incident will receive: `max(ids ∪ {0}) + 1`.
    #[must_use]
    pub fn next_id(&self) -> IncidentId {
        let max = self.incidents.iter().map(|i| i.id.0).max().unwrap_or(0);
        IncidentId(max + 1)
    }

    /// Add an incident reported now.
    pub fn add_incident(&mut self, draft: IncidentDraft) -> IncidentId {
        self.add_incident_at(draft, Utc::now())
    }

    /// Add an incident with an explicit report time. The new incident is
    /// placed at the front of the collection.
    pub fn add_incident_at(&mut self, draft: IncidentDraft, reported_at: DateTime<Utc>) -> IncidentId {
        let id = self.next_id();
        let incident = Incident::from_draft(id, draft, reported_at);
        debug!(id = %id, severity = %incident.severity, "Adding incident");
        self.incidents.insert(0, incident);
        id
    }

    /// Flip whether an incident's details are expanded.
    ///
    /// Ids need not refer to a stored incident. Returns the new state.
    pub fn toggle_expanded(&mut self, id: IncidentId) -> bool {
        let expanded = if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        };
        debug!(id = %id, expanded, "Toggled incident details");
        expanded
    }

    /// Whether an incident's details are expanded.
    #[must_use]
    pub fn is_expanded(&self, id: IncidentId) -> bool {
        self.expanded.contains(&id)
    }

    /// The expanded-details set.
    #[must_use]
    pub fn expanded(&self) -> &HashSet<IncidentId> {
        &self.expanded
    }
}

/// Read a JSON array of incidents from disk.
///
/// # Errors
///
/// Returns an error if the file can't be read or isn't a valid incident list.
pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<Incident>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| Error::SeedRead {
        path: path.to_path_buf(),
        source,
    })?;
    let incidents: Vec<Incident> =
        serde_json::from_str(&raw).map_err(|source| Error::SeedParse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(count = incidents.len(), "Loaded seed incidents from {}", path.display());
    Ok(incidents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::Severity;
    use chrono::TimeZone;

    fn draft(title: &str, severity: Severity) -> IncidentDraft {
        IncidentDraft {
            title: title.to_string(),
            description: format!("{title} description"),
            severity,
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = IncidentStore::new();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), IncidentId(1));
    }

    #[test]
    fn test_builtin_seed_store() {
        let store = IncidentStore::with_builtin_seed();
        assert_eq!(store.len(), 5);
        assert_eq!(store.next_id(), IncidentId(6));
        assert!(store.expanded().is_empty());
    }

    #[test]
    fn test_add_incident_prepends_and_assigns_max_plus_one() {
        let mut store = IncidentStore::with_builtin_seed();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let id = store.add_incident_at(draft("Test A", Severity::Low), at);

        assert_eq!(id, IncidentId(6));
        assert_eq!(store.len(), 6);
        let first = &store.incidents()[0];
        assert_eq!(first.id, IncidentId(6));
        assert_eq!(first.title, "Test A");
        assert_eq!(first.reported_at, at);
    }

    #[test]
    fn test_next_id_uses_max_not_len() {
        let mut seed = builtin_seed();
        seed.truncate(1);
        seed[0].id = IncidentId(40);
        let mut store = IncidentStore::from_incidents(seed).unwrap();

        assert_eq!(store.add_incident(draft("x", Severity::High)), IncidentId(41));
        assert_eq!(store.add_incident(draft("y", Severity::High)), IncidentId(42));
    }

    #[test]
    fn test_ids_stay_unique() {
        let mut store = IncidentStore::with_builtin_seed();
        for n in 0..20 {
            store.add_incident(draft(&format!("n{n}"), Severity::Medium));
        }
        let ids: HashSet<IncidentId> = store.incidents().iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn test_add_incident_uses_current_time() {
        let mut store = IncidentStore::new();
        let before = Utc::now();
        let id = store.add_incident(draft("now", Severity::Low));
        let after = Utc::now();

        let at = store.get(id).unwrap().reported_at;
        assert!(at >= before && at <= after);
    }

    #[test]
    fn test_from_incidents_rejects_duplicates() {
        let mut seed = builtin_seed();
        seed[1].id = IncidentId(1);
        let err = IncidentStore::from_incidents(seed).unwrap_err();
        assert!(matches!(err, Error::DuplicateIncidentId { id: 1 }));
    }

    #[test]
    fn test_from_incidents_rejects_max_id() {
        let mut seed = builtin_seed();
        seed[0].id = IncidentId(u64::MAX);
        let err = IncidentStore::from_incidents(seed).unwrap_err();
        assert!(matches!(
            err,
            Error::IncidentIdTooLarge { id: u64::MAX, max: MAX_SEED_ID }
        ));
    }

    #[test]
    fn test_from_incidents_accepts_max_seed_id() {
        let mut seed = builtin_seed();
        seed[0].id = IncidentId(MAX_SEED_ID);
        let mut store = IncidentStore::from_incidents(seed).unwrap();
        let id = store.add_incident(draft("Late", Severity::High));
        assert_eq!(id, IncidentId(MAX_SEED_ID + 1));
    }

    #[test]
    fn test_toggle_expanded_is_involution() {
        let mut store = IncidentStore::with_builtin_seed();
        store.toggle_expanded(IncidentId(2));
        let before = store.expanded().clone();

        assert!(store.toggle_expanded(IncidentId(4)));
        assert!(store.is_expanded(IncidentId(4)));
        assert!(!store.toggle_expanded(IncidentId(4)));

        assert_eq!(store.expanded(), &before);
    }

    #[test]
    fn test_toggle_unknown_id_is_accepted() {
        let mut store = IncidentStore::new();
        assert!(store.toggle_expanded(IncidentId(999)));
        assert!(store.is_expanded(IncidentId(999)));
    }

    #[test]
    fn test_get() {
        let store = IncidentStore::with_builtin_seed();
        assert_eq!(store.get(IncidentId(3)).unwrap().severity, Severity::Low);
        assert!(store.get(IncidentId(99)).is_none());
    }

    #[test]
    fn test_load_seed_file() {
        let path = std::env::temp_dir().join(format!(
            "safetyboard_seed_test_{}.json",
            std::process::id()
        ));
        let json = serde_json::to_string(&builtin_seed()).unwrap();
        std::fs::write(&path, json).unwrap();

        let incidents = load_seed_file(&path).unwrap();
        assert_eq!(incidents, builtin_seed());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_seed_file_missing() {
        let err = load_seed_file("/nonexistent/safetyboard/seed.json").unwrap_err();
        assert!(matches!(err, Error::SeedRead { .. }));
    }

    #[test]
    fn test_load_seed_file_invalid() {
        let path = std::env::temp_dir().join(format!(
            "safetyboard_bad_seed_test_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"[{"id": 1, "severity": "Critical"}]"#).unwrap();

        let err = load_seed_file(&path).unwrap_err();
        assert!(matches!(err, Error::SeedParse { .. }));

        let _ = std::fs::remove_file(&path);
    }
}
