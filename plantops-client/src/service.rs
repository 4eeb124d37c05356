//! Data service contract

use std::sync::Arc;

use async_trait::async_trait;
use shared::data::{DataResponse, WriteOp};
use shared::models::Record;

use crate::ClientResult;

/// Request/response access to physical partitions
///
/// `Err` means the exchange itself failed (transport). `Ok` with
/// `success: false` is the backend refusing a well-formed request.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Read every row of one partition
    async fn read(&self, partition: &str) -> ClientResult<DataResponse<Vec<Record>>>;

    /// Apply one write to one partition. Create and update answer with the
    /// stored row.
    async fn write(
        &self,
        partition: &str,
        op: WriteOp,
        payload: &Record,
    ) -> ClientResult<DataResponse<Record>>;
}

#[async_trait]
impl<S: DataService + ?Sized> DataService for Arc<S> {
    async fn read(&self, partition: &str) -> ClientResult<DataResponse<Vec<Record>>> {
        (**self).read(partition).await
    }

    async fn write(
        &self,
        partition: &str,
        op: WriteOp,
        payload: &Record,
    ) -> ClientResult<DataResponse<Record>> {
        (**self).write(partition, op, payload).await
    }
}
