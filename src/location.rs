//! A storage URI treated as a pseudo-filesystem path.
use crate::address::Address;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::storage::backend::{OpenDalTransfer, OpenDalTransport};
use crate::storage::transfer::Transfer;
use crate::storage::transport::Transport;
use crate::storage::{KeyStream, StorageClient};
use futures::TryStreamExt;

#[derive(Debug, Clone)]
struct Current {
    address: Address,
    folder: String,
}

/// Binds a validated [`Address`] to a [`StorageClient`].
///
/// The address and its effective folder change together, and only after the
/// new address has been confirmed to exist.
#[derive(Debug)]
pub struct Location<T = OpenDalTransport, X = OpenDalTransfer> {
    client: StorageClient<T, X>,
    current: Option<Current>,
}

impl<T: Transport, X: Transfer> Location<T, X> {
    pub fn new(client: StorageClient<T, X>) -> Self {
        Self {
            client,
            current: None,
        }
    }

    pub fn name(&self) -> String {
        match &self.current {
            Some(current) => format!("bucketfs({})", current.address),
            None => "bucketfs(unset)".to_string(),
        }
    }

    pub fn address(&self) -> Option<&Address> {
        self.current.as_ref().map(|c| &c.address)
    }

    /// The prefix used by [`Location::list_folder`].
    pub fn folder(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.folder.as_str())
    }

    pub fn client(&self) -> &StorageClient<T, X> {
        &self.client
    }

    /// Parse `uri`, confirm it exists remotely and make it the current
    /// location.
    ///
    /// The existence check uses the exact parsed key, so a folder address is
    /// validated through its folder marker object. A bucket-root address
    /// checks the bucket instead. On any failure the previous location stays
    /// in place.
    pub async fn set_location_and_validate(&mut self, ctx: &Context, uri: &str) -> Result<()> {
        let address = Address::parse(uri)?;
        let folder = address.effective_folder();

        if address.is_root() {
            self.client
                .check_bucket_exists(ctx, address.bucket())
                .await?;
        } else {
            self.client
                .check_object_exists(ctx, address.bucket(), address.key())
                .await?;
        }

        log::debug!("location set to {address} folder={folder}");
        self.current = Some(Current { address, folder });
        Ok(())
    }

    /// Stream the keys under the current folder.
    pub fn list_folder_stream(&self, ctx: &Context) -> Result<KeyStream> {
        let current = self.current.as_ref().ok_or(Error::LocationNotSet)?;
        Ok(self
            .client
            .list_keys(ctx, current.address.bucket(), &current.folder))
    }

    /// Hand every key under the current folder to `on_key`, in listing
    /// order. Returns how many keys were delivered, or the error that ended
    /// the listing early.
    pub async fn list_folder<F>(&self, ctx: &Context, mut on_key: F) -> Result<usize>
    where
        F: FnMut(String),
    {
        let mut keys = self.list_folder_stream(ctx)?;
        let mut count = 0;
        while let Some(key) = keys.try_next().await? {
            on_key(key);
            count += 1;
        }
        Ok(count)
    }
}
