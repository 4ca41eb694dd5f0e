//! Scratch files holding the latest raw prediction of each session.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// A directory with one `<key>.pdb` file per scratch key.
///
/// Writing a key overwrites its previous content, so each key only ever
/// holds its most recent payload.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Path of the scratch file for `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let safe = if safe.is_empty() { "_".to_string() } else { safe };
        self.root.join(format!("{}.pdb", safe))
    }

    pub async fn write(&self, key: &str, payload: &str) -> std::io::Result<PathBuf> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.root).await?;
        fs::write(&path, payload).await?;
        debug!(path = %path.display(), bytes = payload.len(), "wrote scratch file");
        Ok(path)
    }

    pub async fn read(&self, key: &str) -> std::io::Result<String> {
        fs::read_to_string(self.path_for(key)).await
    }

    /// Removes the scratch file of `key`; a missing file is not an error.
    pub async fn remove(&self, key: &str) -> std::io::Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_overwrites_previous_payload() {
        let dir = tempdir().unwrap();
        let scratch = ScratchSpace::new(dir.path().join("nested"));

        let first = scratch.write("session-a", "first payload, longer than the second").await.unwrap();
        let second = scratch.write("session-a", "second").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(scratch.read("session-a").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_keys_do_not_share_files() {
        let dir = tempdir().unwrap();
        let scratch = ScratchSpace::new(dir.path());
        scratch.write("a", "alpha").await.unwrap();
        scratch.write("b", "beta").await.unwrap();
        assert_eq!(scratch.read("a").await.unwrap(), "alpha");
        assert_eq!(scratch.read("b").await.unwrap(), "beta");
    }

    #[test]
    fn test_path_for_cannot_escape_root() {
        let scratch = ScratchSpace::new("/srv/scratch");
        let path = scratch.path_for("../../etc/passwd");
        assert_eq!(path, PathBuf::from("/srv/scratch/______etc_passwd.pdb"));
        assert_eq!(scratch.path_for(""), PathBuf::from("/srv/scratch/_.pdb"));
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let dir = tempdir().unwrap();
        let scratch = ScratchSpace::new(dir.path());
        scratch.remove("never-written").await.unwrap();
        scratch.write("k", "x").await.unwrap();
        scratch.remove("k").await.unwrap();
        assert!(scratch.read("k").await.is_err());
    }
}
