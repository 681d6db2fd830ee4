use anyhow::Result;

use crate::backup;
use crate::persist::DataFiles;
use crate::store::RequestStore;

pub fn create(files: &DataFiles) -> Result<()> {
    let dir = backup::create_backup(files)?;
    println!("Backup at: {}", dir.display());
    Ok(())
}

pub fn restore(files: &DataFiles, store: &mut RequestStore) -> Result<()> {
    backup::restore_latest(files, store)?;
    println!("Restored latest backup.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_then_restore() {
        let dir = tempdir().unwrap();
        let files = DataFiles::new(dir.path().join("data"));
        let mut store = RequestStore::new();
        store.create_request(None, "IT Support - Hardware", "LOW", "s", "d");
        files.save(&mut store).unwrap();

        create(&files).unwrap();
        let mut restored = RequestStore::new();
        restore(&files, &mut restored).unwrap();
        assert_eq!(restored.requests().len(), 1);
    }

    #[test]
    fn test_restore_with_no_backups_fails() {
        let dir = tempdir().unwrap();
        let files = DataFiles::new(dir.path().join("data"));
        files.ensure_dir().unwrap();
        let mut store = RequestStore::new();
        assert!(restore(&files, &mut store).is_err());
    }
}
