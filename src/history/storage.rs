use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::path::{Path, PathBuf};

use super::types::HistoryStore;

/// Get the default history file path (~/.config/tracer-picker/results_history.json)
pub fn get_history_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("results_history.json"))
}

fn read_history(path: &Path) -> Result<HistoryStore> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file at {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(HistoryStore::new());
    }

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history file at {}", path.display()))
}

/// Load the history ledger.
///
/// Never fails: a missing, empty or unreadable file yields an empty ledger.
pub fn load_history(path: &Path) -> HistoryStore {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no history file, starting empty");
        return HistoryStore::new();
    }

    match read_history(path) {
        Ok(store) => {
            tracing::debug!(records = store.len(), "loaded history");
            store
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable history, starting empty: {:#}", e);
            HistoryStore::new()
        }
    }
}

/// Save the history ledger to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_history(path: &Path, store: &HistoryStore) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, store).context("Failed to serialize history")?;

    file.commit().context("Failed to save history")?;

    tracing::info!(records = store.len(), path = %path.display(), "saved history");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::committee::CommitteeCode;
    use crate::history::types::RunAssignments;

    fn sample_store() -> HistoryStore {
        let mut store = HistoryStore::new();
        store.upsert(
            "29/11/2025_val_thorens_sl".to_string(),
            RunAssignments {
                manche1: Some(CommitteeCode::Sa),
                manche2: Some(CommitteeCode::Mb),
                manche3: Some(CommitteeCode::Sa),
                manche4: Some(CommitteeCode::Da),
            },
        );
        store
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_history(&dir.path().join("missing.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_empty_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "  \n").unwrap();
        assert!(load_history(&path).is_empty());
    }

    #[test]
    fn test_load_malformed_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_history(&path).is_empty());
    }

    #[test]
    fn test_load_unknown_committee_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(
            &path,
            r#"{"29/11/2025_a_sl": {"traceurs": {"manche2": "ZZ"}}}"#,
        )
        .unwrap();
        assert!(load_history(&path).is_empty());
    }

    #[test]
    fn test_load_directory_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_history(dir.path()).is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");
        let store = sample_store();

        save_history(&path, &store).unwrap();
        let loaded = load_history(&path);

        assert_eq!(loaded, store);
        assert_eq!(loaded.occurrences(CommitteeCode::Mb), 1);
    }

    #[test]
    fn test_save_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut store = sample_store();

        save_history(&path, &store).unwrap();
        let first = fs::read(&path).unwrap();

        store.upsert(
            "29/11/2025_val_thorens_sl".to_string(),
            store.get("29/11/2025_val_thorens_sl").unwrap().traceurs.clone(),
        );
        save_history(&path, &store).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_reload_keeps_same_day_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut store = HistoryStore::new();
        store.upsert(
            "24/01/2026_tignes_sl".to_string(),
            RunAssignments {
                manche2: Some(CommitteeCode::Mb),
                manche4: Some(CommitteeCode::Mb),
                ..RunAssignments::default()
            },
        );
        store.upsert(
            "24/01/2026_avoriaz_gs".to_string(),
            RunAssignments {
                manche2: Some(CommitteeCode::Da),
                manche4: Some(CommitteeCode::Da),
                ..RunAssignments::default()
            },
        );
        assert_eq!(store.competitions_since_last_trace(CommitteeCode::Mb), 1);

        save_history(&path, &store).unwrap();
        let first = fs::read(&path).unwrap();
        let loaded = load_history(&path);

        assert_eq!(loaded, store);
        assert_eq!(loaded.competitions_since_last_trace(CommitteeCode::Mb), 1);

        save_history(&path, &loaded).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);
    }
}
