//! Shared lock for read-modify-write sequences over users and pets.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Every service that reads a user or pet and writes it back holds this
/// gate for the whole sequence, so an adoption can never interleave with a
/// profile edit or a delete.
#[derive(Debug, Clone, Default)]
pub struct WriteGate(Arc<Mutex<()>>);

impl WriteGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}
