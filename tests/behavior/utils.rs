use assert_cmd::prelude::*;
use bucketfs::error::Result;
use bucketfs::storage::{StorageClient, StorageConfig};
use libtest_mimic::{Failed, Trial};
use rand::Rng;
use rand::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;
use uuid::Uuid;

pub const TEST_BUCKET: &str = "test";
pub const TEST_SCHEME: &str = "fs";

pub static TEST_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
});

// Every run gets its own root so parallel runs never see each other's keys.
pub static TEST_ROOT: LazyLock<PathBuf> =
    LazyLock::new(|| std::env::temp_dir().join(format!("bucketfs-behavior-{}", Uuid::new_v4())));

pub fn test_config() -> StorageConfig {
    StorageConfig::fs(TEST_ROOT.to_string_lossy().to_string())
}

pub async fn init_test_service() -> Result<StorageClient> {
    tokio::fs::create_dir_all(TEST_ROOT.join(TEST_BUCKET)).await?;
    Ok(StorageClient::from_config(&test_config()))
}

/// URI for `key` inside the test bucket.
pub fn uri(key: &str) -> String {
    format!("{TEST_SCHEME}://{TEST_BUCKET}/{key}")
}

/// Create a base bucketfs Command with clean environment pointed at the test root
pub fn bucketfs_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bucketfs").unwrap();
    cmd.env_clear()
        .env("RUST_LOG", "info")
        .env("STORAGE_PROVIDER", "fs")
        .env("STORAGE_ROOT_PATH", TEST_ROOT.as_os_str());
    cmd
}

pub struct Fixture;

impl Fixture {
    pub const fn new() -> Self {
        Self
    }

    pub fn new_dir_path(&self) -> String {
        format!("{}/", Uuid::new_v4())
    }

    pub fn new_file_path(&self) -> String {
        Uuid::new_v4().to_string()
    }

    pub fn new_content(&self, range: std::ops::Range<usize>) -> Vec<u8> {
        let mut rng = rand::rng();
        let size = rng.random_range(range);
        let mut content = vec![0; size];
        rng.fill_bytes(&mut content);
        content
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(TEST_ROOT.as_path()).await;
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_async_trial<F, Fut>(name: &str, client: &StorageClient, f: F) -> Trial
where
    F: FnOnce(StorageClient) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<()>> + Send,
{
    let handle = TEST_RUNTIME.handle().clone();
    let client = client.clone();

    Trial::test(format!("behavior::{name}"), move || {
        handle
            .block_on(f(client))
            .map_err(|err| Failed::from(err.to_string()))
    })
}

#[macro_export]
macro_rules! async_trials {
    ($client:ident, $($test:ident),*) => {
        vec![$(build_async_trial(stringify!($test), $client, $test),)*]
    };
}

pub static TEST_FIXTURE: Fixture = Fixture::new();
