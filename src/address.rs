//! Storage URI parsing and folder/object classification.
use crate::error::{InvalidAddressSnafu, InvalidUriSnafu, Result};
use crate::storage::utils::path::{is_folder_marker, parent_folder};
use snafu::{OptionExt, ResultExt};
use std::fmt;
use url::Url;

/// A parsed `scheme://bucket/key` address.
///
/// The bucket is the URI authority and the key is the percent-decoded path
/// without its leading separator. A key ending with `/` addresses a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    raw: String,
    scheme: String,
    bucket: String,
    key: String,
    is_folder: bool,
}

impl Address {
    /// Parse a storage URI. Only syntax is checked here; whether the bucket
    /// or key exist is up to the storage client.
    pub fn parse(uri: &str) -> Result<Self> {
        let url = Url::parse(uri).context(InvalidUriSnafu { uri })?;

        let bucket = url
            .host_str()
            .filter(|host| !host.is_empty())
            .context(InvalidAddressSnafu {
                uri,
                reason: "missing bucket name",
            })?
            .to_string();

        let path = urlencoding::decode(url.path()).map_err(|e| {
            InvalidAddressSnafu {
                uri,
                reason: format!("key is not valid UTF-8: {e}"),
            }
            .build()
        })?;
        let key = path.strip_prefix('/').unwrap_or(&path).to_string();
        let is_folder = is_folder_marker(&key);

        Ok(Self {
            raw: uri.to_string(),
            scheme: url.scheme().to_string(),
            bucket,
            key,
            is_folder,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_folder(&self) -> bool {
        self.is_folder
    }

    /// True when the address names the bucket itself (empty key).
    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }

    /// The folder used as listing prefix: the key itself for folders,
    /// otherwise the key's parent folder.
    pub fn effective_folder(&self) -> String {
        if self.is_folder {
            self.key.clone()
        } else {
            parent_folder(&self.key)
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let object_type = if self.is_folder { "folder" } else { "object" };
        write!(
            f,
            "bucket: {}, key: {}, type: {object_type}",
            self.bucket, self.key
        )
    }
}
