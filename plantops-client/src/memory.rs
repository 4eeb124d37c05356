//! In-process data service
//!
//! Partitions live in a map behind a lock. Failures can be injected per
//! partition, and every write call is journaled so tests can assert which
//! mutations reached the service.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::data::{DataResponse, WriteOp};
use shared::models::Record;

use crate::{ClientError, ClientResult, DataService};

/// One write call as received by the service
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub partition: String,
    pub op: WriteOp,
    pub payload: Record,
}

#[derive(Default)]
struct Inner {
    partitions: HashMap<String, Vec<Record>>,
    unreachable: HashSet<String>,
    rejections: HashMap<String, String>,
    /// Per partition: writes to let through, then writes to fail
    write_faults: HashMap<String, (usize, usize)>,
    journal: Vec<JournalEntry>,
}

#[derive(Default)]
pub struct MemoryDataService {
    inner: RwLock<Inner>,
}

impl MemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of a partition
    pub fn seed(&self, partition: impl Into<String>, records: Vec<Record>) {
        self.inner.write().partitions.insert(partition.into(), records);
    }

    /// Current contents of a partition
    pub fn records(&self, partition: &str) -> Vec<Record> {
        self.inner
            .read()
            .partitions
            .get(partition)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every call to `partition` fail at the transport level
    pub fn set_unreachable(&self, partition: impl Into<String>, unreachable: bool) {
        let partition = partition.into();
        let mut inner = self.inner.write();
        if unreachable {
            inner.unreachable.insert(partition);
        } else {
            inner.unreachable.remove(&partition);
        }
    }

    /// Answer every call to `partition` with `success: false`
    pub fn reject(&self, partition: impl Into<String>, message: impl Into<String>) {
        self.inner
            .write()
            .rejections
            .insert(partition.into(), message.into());
    }

    pub fn clear_rejection(&self, partition: &str) {
        self.inner.write().rejections.remove(partition);
    }

    /// Let the next `after` writes to `partition` through, then fail `count`
    /// writes at the transport level. Reads are unaffected.
    pub fn fail_writes(&self, partition: impl Into<String>, after: usize, count: usize) {
        let partition = partition.into();
        let mut inner = self.inner.write();
        if count == 0 {
            inner.write_faults.remove(&partition);
        } else {
            inner.write_faults.insert(partition, (after, count));
        }
    }

    /// Every write call received so far, in order
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.inner.read().journal.clone()
    }

    /// Number of write calls received for one partition
    pub fn write_count(&self, partition: &str) -> usize {
        self.inner
            .read()
            .journal
            .iter()
            .filter(|e| e.partition == partition)
            .count()
    }

    fn take_write_fault(inner: &mut Inner, partition: &str) -> bool {
        let Some((after, count)) = inner.write_faults.get_mut(partition) else {
            return false;
        };
        if *after > 0 {
            *after -= 1;
            return false;
        }
        *count -= 1;
        if *count == 0 {
            inner.write_faults.remove(partition);
        }
        true
    }

    fn check(inner: &Inner, partition: &str) -> ClientResult<Option<String>> {
        if inner.unreachable.contains(partition) {
            return Err(ClientError::Unreachable(partition.to_string()));
        }
        Ok(inner.rejections.get(partition).cloned())
    }
}

#[async_trait]
impl DataService for MemoryDataService {
    async fn read(&self, partition: &str) -> ClientResult<DataResponse<Vec<Record>>> {
        let inner = self.inner.read();
        if let Some(message) = Self::check(&inner, partition)? {
            return Ok(DataResponse::rejected(message));
        }
        Ok(DataResponse::ok(
            inner.partitions.get(partition).cloned().unwrap_or_default(),
        ))
    }

    async fn write(
        &self,
        partition: &str,
        op: WriteOp,
        payload: &Record,
    ) -> ClientResult<DataResponse<Record>> {
        let mut inner = self.inner.write();
        inner.journal.push(JournalEntry {
            partition: partition.to_string(),
            op,
            payload: payload.clone(),
        });
        if Self::take_write_fault(&mut inner, partition) {
            return Err(ClientError::Unreachable(partition.to_string()));
        }
        if let Some(message) = Self::check(&inner, partition)? {
            return Ok(DataResponse::rejected(message));
        }

        let rows = inner.partitions.entry(partition.to_string()).or_default();
        match op {
            WriteOp::Create => {
                let mut stored = payload.clone();
                if stored.id.is_none() {
                    stored.id = Some(uuid::Uuid::new_v4().simple().to_string());
                }
                rows.push(stored.clone());
                Ok(DataResponse::ok(stored))
            }
            WriteOp::Update => {
                let Some(id) = payload.id.as_deref() else {
                    return Ok(DataResponse::rejected("update requires an id"));
                };
                match rows.iter_mut().find(|r| r.id.as_deref() == Some(id)) {
                    Some(row) => {
                        row.merge(payload.clone());
                        Ok(DataResponse::ok(row.clone()))
                    }
                    None => Ok(DataResponse::rejected(format!(
                        "record {} not found in {}",
                        id, partition
                    ))),
                }
            }
            WriteOp::Delete => {
                let Some(id) = payload.id.as_deref() else {
                    return Ok(DataResponse::rejected("delete requires an id"));
                };
                let before = rows.len();
                rows.retain(|r| r.id.as_deref() != Some(id));
                if rows.len() == before {
                    Ok(DataResponse::rejected(format!(
                        "record {} not found in {}",
                        id, partition
                    )))
                } else {
                    Ok(DataResponse::ok_empty())
                }
            }
        }
    }
}
