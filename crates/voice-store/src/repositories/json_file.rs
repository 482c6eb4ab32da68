//! JSON document implementation of DailyTotalStore
//!
//! The whole history lives in one JSON file that is rewritten on every
//! commit. Writes go to a sibling temp file which is then renamed over the
//! original, so a crash mid-write leaves the previous version intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use voice_core::{DailyTotal, DailyTotalStore, DayKey, DayWindow, RepoResult, Snowflake};

use crate::document::TotalsDocument;

use super::error::{map_io_error, map_json_error};

/// File-backed store holding the full document in memory
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: Mutex<TotalsDocument>,
}

impl JsonFileStore {
    /// Load the document at `path`
    ///
    /// A missing file is empty history. A file that cannot be parsed is
    /// renamed to `<path>.corrupt-<unix-seconds>` and history starts empty.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(map_io_error)?;
        }

        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) => match TotalsDocument::from_json(&bytes) {
                Ok((doc, skipped)) => {
                    if skipped > 0 {
                        warn!(skipped, "Dropped malformed entries from totals document");
                    }
                    info!("Loaded totals document");
                    doc
                }
                Err(e) => {
                    let aside = quarantine(&path).await;
                    warn!(
                        error = %e,
                        moved_to = %aside.display(),
                        "Totals document is corrupt, starting with empty history"
                    );
                    TotalsDocument::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No totals document yet, starting with empty history");
                TotalsDocument::new()
            }
            Err(e) => {
                warn!(error = %e, "Totals document is unreadable, starting with empty history");
                TotalsDocument::new()
            }
        };

        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, bytes: &[u8]) -> std::io::Result<()> {
        let tmp = sibling(&self.path, "tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await
    }
}

/// `<path>.<suffix>` next to the original
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Move an unparsable file out of the way, returning where it went
async fn quarantine(path: &Path) -> PathBuf {
    let aside = sibling(path, &format!("corrupt-{}", Utc::now().timestamp()));
    if let Err(e) = tokio::fs::rename(path, &aside).await {
        warn!(error = %e, "Failed to move corrupt totals document aside");
    }
    aside
}

#[async_trait]
impl DailyTotalStore for JsonFileStore {
    async fn get(&self, guild_id: Snowflake, member_id: Snowflake, day: DayKey) -> RepoResult<u64> {
        Ok(self.doc.lock().await.get(guild_id, member_id, day))
    }

    #[instrument(skip(self))]
    async fn add(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        day: DayKey,
        delta_seconds: u64,
    ) -> RepoResult<u64> {
        let mut doc = self.doc.lock().await;
        if delta_seconds == 0 {
            return Ok(doc.get(guild_id, member_id, day));
        }

        let applied = doc.add(guild_id, member_id, day, delta_seconds);

        let written = match doc.to_json() {
            Ok(bytes) => self.persist(&bytes).await.map_err(map_io_error),
            Err(e) => Err(map_json_error(e)),
        };

        if let Err(e) = written {
            // Keep memory in step with what is on disk
            doc.restore(guild_id, member_id, day, applied);
            return Err(e);
        }

        debug!(total = applied.total, "Totals document written");
        Ok(applied.total)
    }

    async fn list_days(&self, guild_id: Snowflake, member_id: Snowflake) -> RepoResult<Vec<DailyTotal>> {
        Ok(self.doc.lock().await.list_days(guild_id, member_id))
    }

    async fn totals_for_guild(&self, guild_id: Snowflake, window: DayWindow) -> RepoResult<Vec<DailyTotal>> {
        Ok(self.doc.lock().await.totals_for_guild(guild_id, window))
    }

    async fn ping(&self) -> RepoResult<()> {
        match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => tokio::fs::metadata(dir).await.map(|_| ()).map_err(map_io_error),
            None => Ok(()),
        }
    }
}
