//! Environment/runtime helpers
//!
//! Sanity checks to ensure the SQLite database file can be created at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding `db_path` exists.
///
/// In-memory databases and bare file names need nothing.
pub async fn ensure_db_dir(db_path: &str) -> anyhow::Result<()> {
    if db_path == ":memory:" {
        return Ok(());
    }
    let parent = match Path::new(db_path).parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if tokio::fs::metadata(parent).await.is_ok() {
        return Ok(());
    }
    warn!(dir = %parent.display(), "database directory missing; creating it");
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    info!(dir = %parent.display(), "database directory created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_and_bare_paths_are_noops() -> anyhow::Result<()> {
        ensure_db_dir(":memory:").await?;
        ensure_db_dir("laundry.db").await?;
        Ok(())
    }

    #[tokio::test]
    async fn creates_missing_parent() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("laundry-env-{}", uuid::Uuid::new_v4()));
        let db = dir.join("nested").join("laundry.db");
        ensure_db_dir(&db.to_string_lossy()).await?;
        assert!(dir.join("nested").is_dir());
        tokio::fs::remove_dir_all(&dir).await?;
        Ok(())
    }
}
