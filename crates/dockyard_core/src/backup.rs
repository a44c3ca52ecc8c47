//! Module backups.
//!
//! A backup is a timestamped copy of a module directory stored under
//! `<backups_dir>/<module>/<timestamp>/`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Utc};
use fs_extra::dir::CopyOptions;
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::models::BackupInfo;

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Backup storage rooted at the backups directory.
#[derive(Debug, Clone)]
pub struct BackupStore {
    root: PathBuf,
}

impl BackupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn module_root(&self, module: &str) -> PathBuf {
        self.root.join(module)
    }

    /// Copy the contents of `module_dir` into a new backup.
    pub fn create(&self, module: &str, module_dir: &Path) -> CoreResult<BackupInfo> {
        let module_root = self.module_root(module);
        fs::create_dir_all(&module_root)?;

        let stamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let mut name = stamp.clone();
        let mut suffix = 1;
        while module_root.join(&name).exists() {
            name = format!("{}-{}", stamp, suffix);
            suffix += 1;
        }

        let path = module_root.join(&name);
        fs::create_dir_all(&path)?;
        fs_extra::dir::copy(module_dir, &path, &CopyOptions::new().content_only(true))?;

        info!("Backed up module {} to {:?}", module, path);
        Ok(self.info(module, name, path))
    }

    /// Backups of `module`, oldest first.
    pub fn list(&self, module: &str) -> CoreResult<Vec<BackupInfo>> {
        let module_root = self.module_root(module);
        if !module_root.is_dir() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&module_root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                backups.push(self.info(module, name.to_string(), entry.path()));
            }
        }
        backups.sort_by(|a, b| backup_order(&a.name).cmp(&backup_order(&b.name)));
        Ok(backups)
    }

    /// Copy backup `backup` of `module` over `module_dir`, creating it if needed.
    pub fn restore(&self, module: &str, backup: &str, module_dir: &Path) -> CoreResult<BackupInfo> {
        let path = self.module_root(module).join(backup);
        if dockyard_templates::validate_name("backup", backup).is_err() || !path.is_dir() {
            return Err(CoreError::BackupNotFound {
                module: module.to_string(),
                backup: backup.to_string(),
            });
        }

        fs::create_dir_all(module_dir)?;
        let options = CopyOptions::new().content_only(true).overwrite(true);
        fs_extra::dir::copy(&path, module_dir, &options)?;

        info!("Restored module {} from backup {}", module, backup);
        Ok(self.info(module, backup.to_string(), path))
    }

    fn info(&self, module: &str, name: String, path: PathBuf) -> BackupInfo {
        let (stamp, _) = backup_order(&name);
        let created_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc());

        BackupInfo {
            module: module.to_string(),
            name,
            path,
            created_at,
        }
    }
}

/// Split `<timestamp>[-N]` into its sort key. Plain timestamps sort first.
fn backup_order(name: &str) -> (&str, u32) {
    match name.split_once('-') {
        Some((stamp, suffix)) => (stamp, suffix.parse().unwrap_or(u32::MAX)),
        None => (name, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_list_restore() {
        let temp = tempdir().unwrap();
        let module_dir = temp.path().join("compose").join("web");
        fs::create_dir_all(&module_dir).unwrap();
        fs::write(module_dir.join(".env"), "PORT=80\n").unwrap();

        let store = BackupStore::new(temp.path().join("backups"));
        let first = store.create("web", &module_dir).unwrap();
        let second = store.create("web", &module_dir).unwrap();
        assert_ne!(first.name, second.name);
        assert!(first.created_at.is_some());
        assert_eq!(fs::read_to_string(first.path.join(".env")).unwrap(), "PORT=80\n");

        let names: Vec<_> = store.list("web").unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec![first.name.clone(), second.name.clone()]);

        fs::write(module_dir.join(".env"), "PORT=9999\n").unwrap();
        store.restore("web", &first.name, &module_dir).unwrap();
        assert_eq!(fs::read_to_string(module_dir.join(".env")).unwrap(), "PORT=80\n");
    }

    #[test]
    fn test_same_second_backups_sort_by_numeric_suffix() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("web");
        for name in [
            "20240101T000000-10",
            "20240101T000000-2",
            "20240101T000001",
            "20240101T000000",
            "20240101T000000-1",
        ] {
            fs::create_dir_all(root.join(name)).unwrap();
        }

        let store = BackupStore::new(temp.path());
        let backups = store.list("web").unwrap();
        let names: Vec<_> = backups.iter().map(|b| b.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "20240101T000000",
                "20240101T000000-1",
                "20240101T000000-2",
                "20240101T000000-10",
                "20240101T000001",
            ]
        );
        assert!(backups.iter().all(|b| b.created_at.is_some()));
    }

    #[test]
    fn test_restore_unknown_backup() {
        let temp = tempdir().unwrap();
        let store = BackupStore::new(temp.path());

        let err = store.restore("web", "20200101T000000", temp.path()).unwrap_err();
        assert!(matches!(err, CoreError::BackupNotFound { .. }));
        assert!(store.list("web").unwrap().is_empty());
    }
}
