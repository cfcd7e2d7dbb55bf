//! In-process document database.
//!
//! Documents are JSON objects keyed by their string `_id` and grouped into
//! named collections. Collections must be declared before use. When a
//! snapshot path is configured the whole database is loaded from it on
//! open and written back by [`Database::flush`].

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};

const ID_FIELD: &str = "_id";

type Collection = BTreeMap<String, Value>;
type Collections = HashMap<String, Collection>;

/// Shared handle to the document database. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct Database {
    collections: Arc<RwLock<Collections>>,
    snapshot_path: Option<PathBuf>,
}

impl Database {
    /// Create an empty database with no snapshot persistence.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a database, loading `snapshot_path` when it exists.
    pub async fn open(snapshot_path: Option<PathBuf>) -> StoreResult<Self> {
        let collections = match &snapshot_path {
            Some(path) => load_snapshot(path).await?,
            None => Collections::new(),
        };

        Ok(Self {
            collections: Arc::new(RwLock::new(collections)),
            snapshot_path,
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Declare a collection. Existing collections keep their documents.
    pub async fn ensure_collection(&self, name: &str) {
        let mut collections = self.collections.write().await;
        if !collections.contains_key(name) {
            tracing::debug!(target: "adoptme-db", collection = name, "collection created");
            collections.insert(name.to_string(), Collection::new());
        }
    }

    pub async fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Insert a new document. Fails if its `_id` is already present.
    pub async fn insert(&self, collection: &str, document: Value) -> StoreResult<()> {
        let id = document_id(&document)?;
        let mut collections = self.collections.write().await;
        let docs = collection_mut(&mut collections, collection)?;
        if docs.contains_key(&id) {
            return Err(StoreError::duplicate(collection, id));
        }
        docs.insert(id, document);
        Ok(())
    }

    /// Replace an existing document. Fails if its `_id` is absent.
    pub async fn replace(&self, collection: &str, document: Value) -> StoreResult<()> {
        let id = document_id(&document)?;
        let mut collections = self.collections.write().await;
        let docs = collection_mut(&mut collections, collection)?;
        match docs.get_mut(&id) {
            Some(slot) => {
                *slot = document;
                Ok(())
            }
            None => Err(StoreError::missing(collection, id)),
        }
    }

    pub async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        let docs = collection_ref(&collections, collection)?;
        Ok(docs.get(id).cloned())
    }

    /// All documents whose top-level fields equal every field of `filter`.
    pub async fn find(&self, collection: &str, filter: &Map<String, Value>) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let docs = collection_ref(&collections, collection)?;
        Ok(docs
            .values()
            .filter(|doc| matches(doc, filter))
            .cloned()
            .collect())
    }

    pub async fn find_one(
        &self,
        collection: &str,
        filter: &Map<String, Value>,
    ) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        let docs = collection_ref(&collections, collection)?;

        // Direct lookup when the filter pins the id.
        if let Some(Value::String(id)) = filter.get(ID_FIELD) {
            return Ok(docs.get(id).filter(|doc| matches(doc, filter)).cloned());
        }

        Ok(docs.values().find(|doc| matches(doc, filter)).cloned())
    }

    /// Every document of the collection in id order.
    pub async fn all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let docs = collection_ref(&collections, collection)?;
        Ok(docs.values().cloned().collect())
    }

    /// Remove a document, returning whether it existed.
    pub async fn remove(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let docs = collection_mut(&mut collections, collection)?;
        Ok(docs.remove(id).is_some())
    }

    /// Write the snapshot file, if one is configured.
    pub async fn flush(&self) -> StoreResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let raw = {
            let collections = self.collections.read().await;
            serde_json::to_vec_pretty(&*collections)?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, path).await?;

        tracing::info!(target: "adoptme-db", path = %path.display(), "database snapshot written");
        Ok(())
    }
}

async fn load_snapshot(path: &Path) -> StoreResult<Collections> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(Collections::new());
    }

    let raw = tokio::fs::read(path).await?;
    let collections: Collections = serde_json::from_slice(&raw)?;
    tracing::info!(
        target: "adoptme-db",
        path = %path.display(),
        collections = collections.len(),
        "loaded database snapshot"
    );
    Ok(collections)
}

fn document_id(document: &Value) -> StoreResult<String> {
    let object = document
        .as_object()
        .ok_or_else(|| StoreError::invalid_document("document must be a JSON object"))?;
    match object.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(StoreError::invalid_document(
            "document must carry a non-empty string _id",
        )),
    }
}

fn matches(document: &Value, filter: &Map<String, Value>) -> bool {
    filter
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

fn collection_ref<'a>(collections: &'a Collections, name: &str) -> StoreResult<&'a Collection> {
    collections
        .get(name)
        .ok_or_else(|| StoreError::unknown_collection(name))
}

fn collection_mut<'a>(
    collections: &'a mut Collections,
    name: &str,
) -> StoreResult<&'a mut Collection> {
    collections
        .get_mut(name)
        .ok_or_else(|| StoreError::unknown_collection(name))
}
