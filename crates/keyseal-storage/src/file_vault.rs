use std::{fs, path::PathBuf};

use keyseal_core::vault::{Vault, VaultError};
use tracing::instrument;

/// Directory-rooted [`Vault`] writing each entry as a single text file.
///
/// Writes are a plain create-then-write: no existence check beforehand and
/// no atomic rename afterwards. A process killed mid-write can leave a
/// truncated file, which only surfaces later when someone tries to decode
/// or decrypt the entry.
pub struct FileVault {
    root: PathBuf,
}

impl FileVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn ensure_root(&self) -> Result<(), VaultError> {
        fs::create_dir_all(&self.root).map_err(io_err)
    }
}

impl Vault for FileVault {
    #[instrument(skip_all, fields(name))]
    fn write(&self, name: &str, payload: &str) -> Result<(), VaultError> {
        self.ensure_root()?;
        fs::write(self.path_for(name), payload).map_err(io_err)
    }

    #[instrument(skip_all, fields(name))]
    fn read(&self, name: &str) -> Result<String, VaultError> {
        fs::read_to_string(self.path_for(name)).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                VaultError::NotFound {
                    name: name.to_string(),
                }
            } else {
                io_err(err)
            }
        })
    }
}

fn io_err(err: std::io::Error) -> VaultError {
    VaultError::Io {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_file_with_exact_payload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FileVault::new(dir.path());

        vault.write("entry.txt", "c2VjcmV0").expect("write");

        let on_disk = fs::read_to_string(vault.path_for("entry.txt")).expect("read file");
        assert_eq!(on_disk, "c2VjcmV0");
    }

    #[test]
    fn read_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FileVault::new(dir.path());

        vault.write("entry.txt", "payload").expect("write");
        assert_eq!(vault.read("entry.txt").expect("read"), "payload");
    }

    #[test]
    fn read_of_missing_entry_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FileVault::new(dir.path());

        let err = vault.read("nope.txt").expect_err("missing entry");
        assert!(matches!(err, VaultError::NotFound { .. }));
    }

    #[test]
    fn write_surfaces_filesystem_failures() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Root path collides with an existing regular file, so the
        // directory cannot be created.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").expect("create blocker");
        let vault = FileVault::new(&blocker);

        let err = vault.write("entry.txt", "payload").expect_err("bad root");
        assert!(matches!(err, VaultError::Io { .. }));
    }

    #[test]
    fn root_is_created_lazily_on_first_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        let vault = FileVault::new(&nested);
        assert!(!nested.exists());

        vault.write("entry.txt", "payload").expect("write");
        assert!(nested.join("entry.txt").exists());
    }
}
