//! In-process object store

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{ObjectInfo, ObjectStore, StorageError};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    info: ObjectInfo,
}

/// Object store backed by a sorted map, for development and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        let info = ObjectInfo {
            name: name.to_string(),
            size: data.len() as u64,
            content_type: Some(content_type.to_string()),
            updated: Some(Utc::now()),
        };
        self.objects
            .write()
            .await
            .insert(name.to_string(), StoredObject { data, info });
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Bytes, StorageError> {
        self.objects
            .read()
            .await
            .get(name)
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StorageError> {
        let objects = self.objects.read().await;
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(name, _)| name.starts_with(prefix))
            .map(|(_, object)| object.info.clone())
            .collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
