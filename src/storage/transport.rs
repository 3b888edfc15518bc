use crate::error::Result;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use futures::stream::BoxStream;
use std::fmt;
use std::future::Future;

/// Stream of object content chunks.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Request/response capability performing the actual remote calls against a
/// bucket/key namespace.
///
/// Implementations must be safe to share between concurrent operations; the
/// storage client never serializes access to them.
pub trait Transport: Send + Sync + 'static {
    /// Probe that a bucket exists and is reachable.
    fn head_bucket(&self, bucket: &str) -> impl Future<Output = Result<()>> + Send;

    /// Fetch metadata for a single key.
    fn head_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<ObjectMeta>> + Send;

    fn get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<ObjectBody>> + Send;

    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> impl Future<Output = Result<PutReceipt>> + Send;

    /// Fetch one page of keys under `prefix`, resuming after `continuation`
    /// when given. The page size is the transport's choice.
    fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> impl Future<Output = Result<ListPage>> + Send;
}

/// One round trip of a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Present when more keys remain.
    pub continuation: Option<String>,
}

impl ListPage {
    pub fn last(keys: Vec<String>) -> Self {
        Self {
            keys,
            continuation: None,
        }
    }

    pub fn with_continuation(keys: Vec<String>, continuation: impl Into<String>) -> Self {
        Self {
            keys,
            continuation: Some(continuation.into()),
        }
    }
}

/// Object metadata returned by existence checks and fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    pub etag: Option<String>,
    pub version: Option<String>,
    pub last_modified: Option<String>,
    pub content_type: Option<String>,
}

impl ObjectMeta {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            ..Default::default()
        }
    }
}

/// A fetched object. Dropping the body releases the underlying reader.
pub struct ObjectBody {
    pub meta: ObjectMeta,
    pub body: ByteStream,
}

impl ObjectBody {
    pub fn new(meta: ObjectMeta, body: ByteStream) -> Self {
        Self { meta, body }
    }

    /// Build a body from bytes already in memory.
    pub fn from_bytes(meta: ObjectMeta, content: Bytes) -> Self {
        let body = futures::stream::once(async move { Ok::<_, std::io::Error>(content) });
        Self::new(meta, Box::pin(body))
    }

    /// Drain the whole body into memory.
    pub async fn collect(self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.meta.size as usize);
        let mut body = self.body;
        while let Some(chunk) = body.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

impl fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBody")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Confirmation of a completed upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutReceipt {
    pub bucket: String,
    pub key: String,
    pub etag: Option<String>,
    pub version: Option<String>,
}

impl PutReceipt {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            ..Default::default()
        }
    }
}
