//! Bucket/key object storage client with a pseudo-filesystem facade.
//!
//! - [`address`] parses `scheme://bucket/key` URIs and classifies them as
//!   folder or object.
//! - [`storage`] holds the [`storage::StorageClient`], its injected
//!   transport/transfer capabilities and the lazy key listing engine.
//! - [`location`] validates an address against the store and lists its
//!   folder.
pub mod address;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod location;
pub mod storage;
