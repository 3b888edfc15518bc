use crate::context::Context;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::AsyncRead;

pub mod backend;
pub mod constants;
mod operations;
pub mod transfer;
pub mod transport;
pub mod utils;

use self::backend::{OpenDalTransfer, OpenDalTransport};
use self::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_LIST_PAGE_SIZE};
use self::operations::{ChunkedUploader, KeyLister};
use self::transfer::Transfer;
use self::transport::{ObjectBody, ObjectMeta, PutReceipt, Transport};

pub use self::operations::KeyStream;

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Oss,
    S3,
    Fs,
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "oss" => Ok(Self::Oss),
            "s3" | "minio" => Ok(Self::S3),
            "fs" => Ok(Self::Fs),
            _ => Err(Error::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Connection settings shared by every bucket the client touches.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub root_path: Option<String>,
    /// Size of the chunks streamed uploads are cut into.
    pub chunk_size: usize,
    /// Keys requested per listing round trip.
    pub list_page_size: usize,
    pub upload_concurrency: usize,
}

impl StorageConfig {
    fn with_provider(provider: StorageProvider) -> Self {
        Self {
            provider,
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            list_page_size: DEFAULT_LIST_PAGE_SIZE,
            upload_concurrency: 1,
        }
    }

    pub fn oss(access_key_id: String, access_key_secret: String) -> Self {
        Self {
            access_key_id: Some(access_key_id),
            access_key_secret: Some(access_key_secret),
            ..Self::with_provider(StorageProvider::Oss)
        }
    }

    /// S3 or any S3-compatible service. Credentials left as `None` fall back
    /// to the ambient AWS credential chain.
    pub fn s3(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        region: Option<String>,
    ) -> Self {
        Self {
            access_key_id,
            access_key_secret: secret_access_key,
            region,
            ..Self::with_provider(StorageProvider::S3)
        }
    }

    /// Local filesystem; each bucket is a directory under `root_path`.
    pub fn fs(root_path: String) -> Self {
        Self {
            root_path: Some(root_path),
            ..Self::with_provider(StorageProvider::Fs)
        }
    }
}

/// Object storage client over a bucket/key namespace.
///
/// Holds the two injected capabilities and nothing else that changes, so a
/// clone shares the same transport and transfer and can be used from any
/// number of tasks at once.
pub struct StorageClient<T = OpenDalTransport, X = OpenDalTransfer> {
    transport: Arc<T>,
    transfer: Arc<X>,
    chunk_size: usize,
}

impl StorageClient {
    /// Build a client backed by live OpenDAL operators.
    pub fn from_config(config: &StorageConfig) -> Self {
        StorageClient::new(
            OpenDalTransport::new(config.clone()),
            OpenDalTransfer::new(config.clone()),
        )
        .with_chunk_size(config.chunk_size)
    }
}

impl<T: Transport, X: Transfer> StorageClient<T, X> {
    pub fn new(transport: T, transfer: X) -> Self {
        Self::from_shared(Arc::new(transport), Arc::new(transfer))
    }

    pub fn from_shared(transport: Arc<T>, transfer: Arc<X>) -> Self {
        Self {
            transport,
            transfer,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the chunk size for streamed uploads. Zero is treated as one byte.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn transfer(&self) -> &Arc<X> {
        &self.transfer
    }

    pub async fn check_bucket_exists(&self, ctx: &Context, bucket: &str) -> Result<()> {
        log::debug!("check_bucket_exists bucket={bucket}");
        ctx.run(self.transport.head_bucket(bucket))
            .await
            .inspect_err(|e| log::warn!("failed to head bucket {bucket}: {e}"))
    }

    pub async fn check_object_exists(
        &self,
        ctx: &Context,
        bucket: &str,
        key: &str,
    ) -> Result<ObjectMeta> {
        log::debug!("check_object_exists bucket={bucket} key={key}");
        ctx.run(self.transport.head_object(bucket, key))
            .await
            .inspect_err(|e| log::warn!("failed to head object {bucket}/{key}: {e}"))
    }

    /// Fetch an object's metadata and content stream.
    pub async fn fetch_object(&self, ctx: &Context, bucket: &str, key: &str) -> Result<ObjectBody> {
        log::debug!("fetch_object bucket={bucket} key={key}");
        ctx.run(self.transport.get_object(bucket, key))
            .await
            .inspect_err(|e| log::error!("failed to get object {bucket}/{key}: {e}"))
    }

    /// Store a payload that is already fully in memory.
    pub async fn store_object(
        &self,
        ctx: &Context,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<PutReceipt> {
        log::debug!("store_object bucket={bucket} key={key} size={}", body.len());
        ctx.run(self.transport.put_object(bucket, key, body))
            .await
            .inspect_err(|e| log::error!("failed to put object {bucket}/{key}: {e}"))
    }

    /// Store a stream of unknown length, buffering at most one chunk at a time.
    pub async fn store_object_streamed<R>(
        &self,
        ctx: &Context,
        bucket: &str,
        key: &str,
        body: R,
    ) -> Result<PutReceipt>
    where
        R: AsyncRead + Unpin + Send,
    {
        log::debug!(
            "store_object_streamed bucket={bucket} key={key} chunk_size={}",
            self.chunk_size
        );
        let uploader = ChunkedUploader::new(Arc::clone(&self.transfer), self.chunk_size);
        uploader
            .upload(ctx, bucket, key, body)
            .await
            .inspect_err(|e| log::error!("failed to upload {bucket}/{key}: {e}"))
    }

    /// List every non-folder key under `prefix` as a lazy stream.
    ///
    /// Returns immediately; a background task fetches pages as the stream is
    /// consumed. See [`KeyStream`] for termination semantics.
    pub fn list_keys(&self, ctx: &Context, bucket: &str, prefix: &str) -> KeyStream {
        log::debug!("list_keys bucket={bucket} prefix={prefix}");
        KeyLister::new(Arc::clone(&self.transport)).list(ctx, bucket, prefix)
    }
}

impl<T, X> Clone for StorageClient<T, X> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            transfer: Arc::clone(&self.transfer),
            chunk_size: self.chunk_size,
        }
    }
}

impl<T, X> fmt::Debug for StorageClient<T, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageClient")
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}
