use crate::context::Context;
use crate::error::{Error, Result};
use crate::storage::constants::LIST_CHANNEL_CAPACITY;
use crate::storage::transport::Transport;
use crate::storage::utils::path::is_folder_marker;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use tokio::sync::mpsc;

/// Lazy sequence of keys produced by a background listing task.
///
/// Items are `Ok(key)` in page order. If the remote listing fails, one final
/// `Err` is yielded before the stream ends. Cancelling the listing's context
/// ends the stream without an error item. Dropping the stream stops the
/// producer at its next send.
#[derive(Debug)]
pub struct KeyStream {
    rx: mpsc::Receiver<Result<String>>,
}

impl KeyStream {
    /// Receive the next key, or `None` once the producer has finished.
    pub async fn next_key(&mut self) -> Option<Result<String>> {
        self.rx.recv().await
    }
}

impl Stream for KeyStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Turns paginated `list_page` calls into a back-pressured [`KeyStream`].
pub struct KeyLister<T> {
    transport: Arc<T>,
}

impl<T: Transport> KeyLister<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Spawn the producer task and hand back its stream immediately.
    /// Must be called from within a tokio runtime.
    pub fn list(&self, ctx: &Context, bucket: &str, prefix: &str) -> KeyStream {
        let (tx, rx) = mpsc::channel(LIST_CHANNEL_CAPACITY);
        let producer = KeyProducer {
            transport: Arc::clone(&self.transport),
            ctx: ctx.clone(),
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            tx,
        };
        tokio::spawn(producer.run());
        KeyStream { rx }
    }
}

struct KeyProducer<T> {
    transport: Arc<T>,
    ctx: Context,
    bucket: String,
    prefix: String,
    tx: mpsc::Sender<Result<String>>,
}

impl<T: Transport> KeyProducer<T> {
    // The sender is dropped when this returns, which closes the stream.
    async fn run(self) {
        let mut continuation: Option<String> = None;
        let mut emitted = 0usize;

        loop {
            if self.ctx.is_done() {
                log::debug!(
                    "list_keys cancelled bucket={} prefix={} emitted={emitted}",
                    self.bucket,
                    self.prefix
                );
                return;
            }

            let fetched = tokio::select! {
                biased;
                _ = self.ctx.done() => {
                    log::debug!(
                        "list_keys cancelled during page fetch bucket={} prefix={}",
                        self.bucket,
                        self.prefix
                    );
                    return;
                }
                page = self.transport.list_page(&self.bucket, &self.prefix, continuation.as_deref()) => page,
            };

            let page = match fetched {
                Ok(page) => page,
                Err(e) => return self.fail(e).await,
            };
            log::debug!(
                "list_keys page bucket={} prefix={} keys={} more={}",
                self.bucket,
                self.prefix,
                page.keys.len(),
                page.continuation.is_some()
            );

            // A repeated token means this page was already delivered.
            if let (Some(next), Some(prev)) = (&page.continuation, &continuation) {
                if next == prev {
                    let err = Error::Transport {
                        message: format!("listing did not advance past continuation token '{next}'"),
                    };
                    return self.fail(err).await;
                }
            }

            for key in page.keys {
                if is_folder_marker(&key) {
                    continue;
                }
                if !self.send(Ok(key)).await {
                    return;
                }
                emitted += 1;
            }

            match page.continuation {
                Some(next) => continuation = Some(next),
                None => {
                    log::debug!(
                        "list_keys finished bucket={} prefix={} emitted={emitted}",
                        self.bucket,
                        self.prefix
                    );
                    return;
                }
            }
        }
    }

    /// Send one item, suspending while the channel is full. Returns false if
    /// the consumer is gone or the context finished first.
    async fn send(&self, item: Result<String>) -> bool {
        tokio::select! {
            biased;
            _ = self.ctx.done() => false,
            sent = self.tx.send(item) => sent.is_ok(),
        }
    }

    async fn fail(&self, err: Error) {
        log::error!(
            "failed to list objects bucket={} prefix={}: {err}",
            self.bucket,
            self.prefix
        );
        self.send(Err(err)).await;
    }
}
