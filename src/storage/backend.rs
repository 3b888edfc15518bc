//! Default capabilities backed by OpenDAL operators.
//!
//! An operator is bound to a single bucket, so one is built per call from the
//! shared [`StorageConfig`]. Building an operator performs no network I/O.
//! For the `fs` provider the bucket directory must already exist: OpenDAL
//! creates a missing root on build, which would make every bucket look present.
use crate::error::{Error, Result};
use crate::storage::transfer::{Transfer, UploadSession};
use crate::storage::transport::{ListPage, ObjectBody, ObjectMeta, PutReceipt, Transport};
use crate::storage::utils::error::ClassifyExt;
use crate::storage::{StorageConfig, StorageProvider};
use bytes::Bytes;
use futures::TryStreamExt;
use opendal::{Metadata, Operator, Writer};
use std::path::Path;

/// Build an operator for `bucket` from the shared configuration.
pub(crate) async fn build_operator(config: &StorageConfig, bucket: &str) -> Result<Operator> {
    match &config.provider {
        StorageProvider::Oss => {
            let mut builder = opendal::services::Oss::default().bucket(bucket);
            if let Some(access_key_id) = &config.access_key_id {
                builder = builder.access_key_id(access_key_id);
            }
            if let Some(access_key_secret) = &config.access_key_secret {
                builder = builder.access_key_secret(access_key_secret);
            }
            if let Some(endpoint) = &config.endpoint {
                builder = builder.endpoint(endpoint);
            }
            Ok(Operator::new(builder)?.finish())
        }
        StorageProvider::S3 => {
            let mut builder = opendal::services::S3::default().bucket(bucket);
            if let Some(access_key_id) = &config.access_key_id {
                builder = builder.access_key_id(access_key_id);
            }
            if let Some(secret_access_key) = &config.access_key_secret {
                builder = builder.secret_access_key(secret_access_key);
            }
            if let Some(region) = &config.region {
                builder = builder.region(region);
            }
            if let Some(endpoint) = &config.endpoint {
                builder = builder.endpoint(endpoint);
            }
            Ok(Operator::new(builder)?.finish())
        }
        StorageProvider::Fs => {
            // Each bucket is a directory under the configured root.
            let root = config
                .root_path
                .as_deref()
                .unwrap_or(crate::storage::constants::DEFAULT_FS_ROOT);
            let bucket_root = Path::new(root).join(bucket);
            let is_dir = tokio::fs::metadata(&bucket_root)
                .await
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            if !is_dir {
                return Err(Error::NotFound {
                    bucket: bucket.to_string(),
                    key: String::new(),
                });
            }
            let builder = opendal::services::Fs::default().root(&bucket_root.to_string_lossy());
            Ok(Operator::new(builder)?.finish())
        }
    }
}

fn object_meta(key: &str, meta: &Metadata) -> ObjectMeta {
    ObjectMeta {
        key: key.to_string(),
        size: meta.content_length(),
        etag: meta.etag().map(|s| s.to_string()),
        version: meta.version().map(|s| s.to_string()),
        last_modified: meta.last_modified().map(|t| t.to_string()),
        content_type: meta.content_type().map(|s| s.to_string()),
    }
}

fn put_receipt(bucket: &str, key: &str, meta: &Metadata) -> PutReceipt {
    PutReceipt {
        bucket: bucket.to_string(),
        key: key.to_string(),
        etag: meta.etag().map(|s| s.to_string()),
        version: meta.version().map(|s| s.to_string()),
    }
}

/// Request/response transport over OpenDAL.
#[derive(Debug, Clone)]
pub struct OpenDalTransport {
    config: StorageConfig,
}

impl OpenDalTransport {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub async fn operator(&self, bucket: &str) -> Result<Operator> {
        build_operator(&self.config, bucket).await
    }
}

impl Transport for OpenDalTransport {
    async fn head_bucket(&self, bucket: &str) -> Result<()> {
        let op = self.operator(bucket).await?;
        op.check().await.classify(bucket, "")
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMeta> {
        let op = self.operator(bucket).await?;
        let meta = op.stat(key).await.classify(bucket, key)?;
        Ok(object_meta(key, &meta))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody> {
        let op = self.operator(bucket).await?;
        let meta = op.stat(key).await.classify(bucket, key)?;
        let reader = op.reader(key).await.classify(bucket, key)?;
        let stream = reader.into_bytes_stream(..).await.classify(bucket, key)?;
        Ok(ObjectBody::new(object_meta(key, &meta), Box::pin(stream)))
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<PutReceipt> {
        let op = self.operator(bucket).await?;
        let meta = op.write(key, body).await.classify(bucket, key)?;
        Ok(put_receipt(bucket, key, &meta))
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage> {
        let op = self.operator(bucket).await?;
        // Backends that cannot resume a listing return everything in one page.
        let paged = op.info().full_capability().list_with_start_after;
        let page_size = self.config.list_page_size.max(1);

        let mut request = op.lister_with(prefix).recursive(true);
        if let (true, Some(token)) = (paged, continuation) {
            request = request.start_after(token);
        }
        let mut lister = request.await.classify(bucket, prefix)?;

        let mut keys = Vec::new();
        while let Some(entry) = lister.try_next().await.classify(bucket, prefix)? {
            keys.push(entry.path().to_string());
            if keys.len() == page_size {
                if paged {
                    break;
                }
                log::warn!(
                    "backend cannot resume listings, reading {bucket}/{prefix} as a single page beyond {page_size} keys"
                );
            }
        }

        let continuation = if paged && keys.len() >= page_size {
            keys.last().cloned()
        } else {
            None
        };
        Ok(ListPage { keys, continuation })
    }
}

/// Chunked upload capability over OpenDAL writers.
#[derive(Debug, Clone)]
pub struct OpenDalTransfer {
    config: StorageConfig,
}

impl OpenDalTransfer {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }
}

impl Transfer for OpenDalTransfer {
    type Upload = OpenDalUpload;

    async fn start_upload(&self, bucket: &str, key: &str, chunk_size: usize) -> Result<OpenDalUpload> {
        let op = build_operator(&self.config, bucket).await?;
        let writer = op
            .writer_with(key)
            .chunk(chunk_size)
            .concurrent(self.config.upload_concurrency.max(1))
            .await
            .classify(bucket, key)?;
        Ok(OpenDalUpload {
            writer,
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

pub struct OpenDalUpload {
    writer: Writer,
    bucket: String,
    key: String,
}

impl UploadSession for OpenDalUpload {
    async fn write_chunk(&mut self, chunk: Bytes) -> Result<()> {
        self.writer
            .write(chunk)
            .await
            .classify(&self.bucket, &self.key)
    }

    async fn finish(mut self) -> Result<PutReceipt> {
        let meta = self
            .writer
            .close()
            .await
            .classify(&self.bucket, &self.key)?;
        Ok(put_receipt(&self.bucket, &self.key, &meta))
    }

    async fn abort(mut self) -> Result<()> {
        self.writer
            .abort()
            .await
            .classify(&self.bucket, &self.key)
    }
}
