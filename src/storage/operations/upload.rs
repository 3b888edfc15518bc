use crate::context::Context;
use crate::error::Result;
use crate::storage::transfer::{Transfer, UploadSession};
use crate::storage::transport::PutReceipt;
use crate::storage::utils::size::format_size;
use bytes::{Bytes, BytesMut};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Uploads a stream of unknown length by cutting it into bounded chunks.
///
/// At most one chunk of `chunk_size` bytes is held in memory at a time by
/// this side; the transfer capability owns whatever it buffers beyond that.
pub struct ChunkedUploader<X> {
    transfer: Arc<X>,
    chunk_size: usize,
}

impl<X: Transfer> ChunkedUploader<X> {
    pub fn new(transfer: Arc<X>, chunk_size: usize) -> Self {
        Self {
            transfer,
            chunk_size: chunk_size.max(1),
        }
    }

    pub async fn upload<R>(
        &self,
        ctx: &Context,
        bucket: &str,
        key: &str,
        mut body: R,
    ) -> Result<PutReceipt>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut session = ctx
            .run(self.transfer.start_upload(bucket, key, self.chunk_size))
            .await?;

        match self.pump(ctx, &mut session, &mut body).await {
            Ok(total) => {
                let receipt = ctx.run(session.finish()).await?;
                log::debug!(
                    "upload finished bucket={bucket} key={key} size={}",
                    format_size(total)
                );
                Ok(receipt)
            }
            Err(e) => {
                if let Err(abort_err) = session.abort().await {
                    log::warn!("failed to abort upload bucket={bucket} key={key}: {abort_err}");
                }
                Err(e)
            }
        }
    }

    /// Move chunks from `body` into `session` until EOF. Returns the total
    /// number of bytes sent.
    async fn pump<R>(&self, ctx: &Context, session: &mut X::Upload, body: &mut R) -> Result<u64>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut total = 0u64;
        let mut parts = 0usize;
        loop {
            let chunk = ctx.run(async { Ok(fill_chunk(body, self.chunk_size).await?) }).await?;
            if chunk.is_empty() {
                break;
            }
            total += chunk.len() as u64;
            parts += 1;
            log::debug!("upload part={parts} size={}", format_size(chunk.len() as u64));
            ctx.run(session.write_chunk(chunk)).await?;
        }
        Ok(total)
    }
}

/// Read until `chunk_size` bytes are buffered or the reader is exhausted.
/// An empty chunk means EOF.
pub(crate) async fn fill_chunk<R>(reader: &mut R, chunk_size: usize) -> std::io::Result<Bytes>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(chunk_size);
    while buf.len() < chunk_size {
        let limit = (chunk_size - buf.len()) as u64;
        let read = (&mut *reader).take(limit).read_buf(&mut buf).await?;
        if read == 0 {
            break;
        }
    }
    Ok(buf.freeze())
}
