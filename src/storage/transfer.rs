use crate::error::Result;
use crate::storage::transport::PutReceipt;
use bytes::Bytes;
use std::future::Future;

/// Chunked upload capability used for streams of unknown length.
pub trait Transfer: Send + Sync + 'static {
    type Upload: UploadSession;

    /// Open an upload for `key`. `chunk_size` is a hint for how large each
    /// part handed to [`UploadSession::write_chunk`] will be.
    fn start_upload(
        &self,
        bucket: &str,
        key: &str,
        chunk_size: usize,
    ) -> impl Future<Output = Result<Self::Upload>> + Send;
}

/// An upload in progress. Exactly one of `finish` or `abort` ends it.
pub trait UploadSession: Send + 'static {
    fn write_chunk(&mut self, chunk: Bytes) -> impl Future<Output = Result<()>> + Send;

    fn finish(self) -> impl Future<Output = Result<PutReceipt>> + Send;

    fn abort(self) -> impl Future<Output = Result<()>> + Send;
}
