// ── Persistence collaborator ──
//
// The store never owns a storage format. It hands whole subnet records
// to a repository after every validated mutation and only publishes the
// change in memory once the repository accepted it.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::model::{EntityId, Subnet};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed subnet data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Storage backend for subnet records.
///
/// Implementations store records verbatim and must be safe to call from
/// several tasks at once.
pub trait SubnetRepository: Send + Sync {
    fn load_all(&self) -> impl Future<Output = Result<Vec<Subnet>, RepositoryError>> + Send;

    /// Insert or replace the record with `subnet.id`.
    fn persist(&self, subnet: &Subnet) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn remove(&self, id: &EntityId) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

// ── In-memory ───────────────────────────────────────────────────────

/// Process-local repository. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    subnets: Mutex<Vec<Subnet>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records, as if loaded from storage.
    pub fn with_subnets(subnets: Vec<Subnet>) -> Self {
        Self {
            subnets: Mutex::new(subnets),
        }
    }
}

impl SubnetRepository for MemoryRepository {
    async fn load_all(&self) -> Result<Vec<Subnet>, RepositoryError> {
        Ok(self.subnets.lock().await.clone())
    }

    async fn persist(&self, subnet: &Subnet) -> Result<(), RepositoryError> {
        upsert_record(&mut *self.subnets.lock().await, subnet);
        Ok(())
    }

    async fn remove(&self, id: &EntityId) -> Result<(), RepositoryError> {
        self.subnets.lock().await.retain(|s| &s.id != id);
        Ok(())
    }
}

fn upsert_record(records: &mut Vec<Subnet>, subnet: &Subnet) {
    match records.iter_mut().find(|s| s.id == subnet.id) {
        Some(slot) => *slot = subnet.clone(),
        None => records.push(subnet.clone()),
    }
}

// ── JSON file ───────────────────────────────────────────────────────

/// On-disk document layout: `{ "subnets": [ ... ] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SubnetFile {
    #[serde(default)]
    subnets: Vec<Subnet>,
}

/// Repository backed by a single pretty-printed JSON document.
///
/// Every write rewrites the whole file through a temporary sibling and
/// an atomic rename. A missing or empty file reads as no subnets.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn read(&self) -> Result<SubnetFile, RepositoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(SubnetFile::default()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(SubnetFile::default()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn write(&self, file: &SubnetFile) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(file)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), subnets = file.subnets.len(), "wrote subnet file");
        Ok(())
    }
}

impl SubnetRepository for JsonFileRepository {
    async fn load_all(&self) -> Result<Vec<Subnet>, RepositoryError> {
        Ok(self.read().await?.subnets)
    }

    async fn persist(&self, subnet: &Subnet) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        upsert_record(&mut file.subnets, subnet);
        self.write(&file).await
    }

    async fn remove(&self, id: &EntityId) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        file.subnets.retain(|s| &s.id != id);
        self.write(&file).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cidr::Cidr;
    use crate::generate::generate_addresses;

    fn subnet(name: &str, cidr: &str) -> Subnet {
        let block = Cidr::parse(cidr).unwrap();
        let space = generate_addresses(&block);
        Subnet {
            id: EntityId::generate(),
            name: name.into(),
            cidr: cidr.into(),
            mask: block.mask_string(),
            gateway: None,
            total_ips: block.total_ips(),
            used_ips: 0,
            addresses: space.addresses,
            dhcp_range: None,
            color_groups: Vec::new(),
            truncated: space.truncated,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested/subnets.json"));
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn persist_replace_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("data/subnets.json"));

        let mut a = subnet("a", "10.0.0.0/30");
        let b = subnet("b", "10.0.1.0/30");
        repo.persist(&a).await.unwrap();
        repo.persist(&b).await.unwrap();

        a.name = "renamed".into();
        repo.persist(&a).await.unwrap();

        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "renamed");
        assert_eq!(loaded[1], b);

        repo.remove(&a.id).await.unwrap();
        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded, vec![b]);
    }

    #[tokio::test]
    async fn file_layout_wraps_subnets_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subnets.json");
        let repo = JsonFileRepository::new(&path);
        repo.persist(&subnet("a", "192.168.0.0/30")).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["subnets"][0]["cidr"], "192.168.0.0/30");
        assert_eq!(raw["subnets"][0]["ips"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn garbage_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subnets.json");
        std::fs::write(&path, "{ not json").unwrap();
        let repo = JsonFileRepository::new(&path);
        assert!(matches!(
            repo.load_all().await,
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn memory_repository_round_trip() {
        let repo = MemoryRepository::new();
        let s = subnet("m", "172.16.0.0/30");
        repo.persist(&s).await.unwrap();
        assert_eq!(repo.load_all().await.unwrap(), vec![s.clone()]);
        repo.remove(&s.id).await.unwrap();
        assert!(repo.load_all().await.unwrap().is_empty());
    }
}
