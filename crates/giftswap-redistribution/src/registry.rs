//! Participant registry backends.
//!
//! - [`InMemoryRegistry`]: process-local, for tests and embedding
//! - [`JsonFileRegistry`]: one pretty-printed JSON array on disk
//!
//! Both keep participants in insertion order and upsert by id.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use giftswap_types::{ExchangeConfig, GiftswapError, Participant, ParticipantId, Result};
use tokio::sync::{Mutex, RwLock};

use crate::collaborators::ParticipantRegistry;

fn upsert(participants: &mut Vec<Participant>, participant: &Participant) {
    match participants.iter_mut().find(|p| p.id == participant.id) {
        Some(slot) => *slot = participant.clone(),
        None => participants.push(participant.clone()),
    }
}

/// Registry held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    participants: RwLock<Vec<Participant>>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with `participants`, later ids replacing earlier.
    #[must_use]
    pub fn with_participants(participants: impl IntoIterator<Item = Participant>) -> Self {
        let mut stored = Vec::new();
        for p in participants {
            upsert(&mut stored, &p);
        }
        Self {
            participants: RwLock::new(stored),
        }
    }
}

#[async_trait]
impl ParticipantRegistry for InMemoryRegistry {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        Ok(self.participants.read().await.clone())
    }

    async fn get_participant(&self, id: &ParticipantId) -> Result<Option<Participant>> {
        Ok(self
            .participants
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn save(&self, participant: &Participant) -> Result<()> {
        upsert(&mut *self.participants.write().await, participant);
        Ok(())
    }

    async fn save_all(&self, participants: &[Participant]) -> Result<()> {
        let mut stored = self.participants.write().await;
        for p in participants {
            upsert(&mut stored, p);
        }
        Ok(())
    }
}

/// Registry persisted as a JSON array of participant records.
///
/// Legacy records are accepted on read and rewritten in the canonical
/// shape on the next save. Writes go to a sibling temp file that is then
/// renamed over the target.
#[derive(Debug)]
pub struct JsonFileRegistry {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileRegistry {
    /// Open the registry at `path`, creating an empty one if absent.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, b"[]").await?;
            tracing::info!(path = %path.display(), "Created empty participants file");
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Open the registry at the configured `participants_path`.
    pub async fn from_config(config: &ExchangeConfig) -> Result<Self> {
        Self::open(config.participants_path.clone()).await
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Participant>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            GiftswapError::Serialization(format!("{}: {e}", self.path.display()))
        })
    }

    async fn write_all(&self, participants: &[Participant]) -> Result<()> {
        let body = serde_json::to_vec_pretty(participants)?;
        let mut tmp_name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        if let Err(e) = tokio::fs::write(&tmp_path, &body).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        tracing::debug!(
            path = %self.path.display(),
            participants = participants.len(),
            "Participants file written"
        );
        Ok(())
    }
}

#[async_trait]
impl ParticipantRegistry for JsonFileRegistry {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        self.read_all().await
    }

    async fn get_participant(&self, id: &ParticipantId) -> Result<Option<Participant>> {
        Ok(self.read_all().await?.into_iter().find(|p| &p.id == id))
    }

    async fn save(&self, participant: &Participant) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut stored = self.read_all().await?;
        upsert(&mut stored, participant);
        self.write_all(&stored).await
    }

    async fn save_all(&self, participants: &[Participant]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut stored = self.read_all().await?;
        for p in participants {
            upsert(&mut stored, p);
        }
        self.write_all(&stored).await
    }
}
