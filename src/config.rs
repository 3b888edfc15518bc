use crate::error::{Error, Result};
use crate::storage::constants::DEFAULT_FS_ROOT;
use crate::storage::utils::size::parse_size;
use crate::storage::{StorageConfig, StorageProvider};
use std::env;
use std::str::FromStr;

// Read the first of `keys` that is set.
fn get_env_var(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok())
}

fn require_env_var(keys: &[&str]) -> Result<String> {
    get_env_var(keys).ok_or_else(|| Error::MissingEnvVar {
        key: keys.join(" or "),
    })
}

fn positive(key: &str, value: String, parsed: Option<u64>) -> Result<usize> {
    match parsed {
        Some(n) if n > 0 => usize::try_from(n).map_err(|_| Error::InvalidConfig {
            key: key.to_string(),
            value,
            reason: "value is too large".to_string(),
        }),
        _ => Err(Error::InvalidConfig {
            key: key.to_string(),
            value,
            reason: "expected a positive number".to_string(),
        }),
    }
}

/// Load storage configuration from environment variables
pub fn load_storage_config() -> Result<StorageConfig> {
    let provider_str = env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "s3".to_string());
    let provider = StorageProvider::from_str(&provider_str)?;

    let mut config = match provider {
        StorageProvider::Oss => load_oss_config()?,
        StorageProvider::S3 => load_s3_config(&provider_str),
        StorageProvider::Fs => load_fs_config(),
    };
    apply_tuning(&mut config)?;
    Ok(config)
}

/// Load OSS (Alibaba Cloud) configuration
fn load_oss_config() -> Result<StorageConfig> {
    let access_key_id = require_env_var(&["STORAGE_ACCESS_KEY_ID", "OSS_ACCESS_KEY_ID"])?;
    let access_key_secret =
        require_env_var(&["STORAGE_ACCESS_KEY_SECRET", "OSS_ACCESS_KEY_SECRET"])?;

    let mut config = StorageConfig::oss(access_key_id, access_key_secret);
    config.region = get_env_var(&["STORAGE_REGION", "OSS_REGION"]);
    config.endpoint = Some(
        get_env_var(&["STORAGE_ENDPOINT", "OSS_ENDPOINT"])
            .unwrap_or_else(|| "https://oss-cn-hangzhou.aliyuncs.com".to_string()),
    );
    Ok(config)
}

/// Load S3 (AWS) or MinIO configuration. Missing AWS credentials are left to
/// the ambient credential chain.
fn load_s3_config(provider_str: &str) -> StorageConfig {
    let is_minio = provider_str.eq_ignore_ascii_case("minio");

    let (access_key_id, secret_access_key) = if is_minio {
        (
            get_env_var(&["STORAGE_ACCESS_KEY_ID", "MINIO_ACCESS_KEY"]),
            get_env_var(&["STORAGE_ACCESS_KEY_SECRET", "MINIO_SECRET_KEY"]),
        )
    } else {
        (
            get_env_var(&["STORAGE_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"]),
            get_env_var(&["STORAGE_ACCESS_KEY_SECRET", "AWS_SECRET_ACCESS_KEY"]),
        )
    };

    let region = get_env_var(&[
        "STORAGE_REGION",
        "AWS_DEFAULT_REGION",
        "MINIO_DEFAULT_REGION",
    ]);

    let endpoint = if is_minio {
        Some(
            get_env_var(&["STORAGE_ENDPOINT", "MINIO_ENDPOINT"])
                .unwrap_or_else(|| "http://localhost:9000".to_string()),
        )
    } else {
        get_env_var(&["STORAGE_ENDPOINT"])
    };

    let mut config = StorageConfig::s3(access_key_id, secret_access_key, region);
    config.endpoint = endpoint;
    config
}

/// Load filesystem configuration (for testing)
fn load_fs_config() -> StorageConfig {
    let root_path = env::var("STORAGE_ROOT_PATH").unwrap_or_else(|_| DEFAULT_FS_ROOT.to_string());
    StorageConfig::fs(root_path)
}

fn apply_tuning(config: &mut StorageConfig) -> Result<()> {
    if let Ok(value) = env::var("STORAGE_UPLOAD_CHUNK_SIZE") {
        let parsed = parse_size(&value);
        config.chunk_size = positive("STORAGE_UPLOAD_CHUNK_SIZE", value, parsed)?;
    }
    if let Ok(value) = env::var("STORAGE_LIST_PAGE_SIZE") {
        let parsed = value.trim().parse().ok();
        config.list_page_size = positive("STORAGE_LIST_PAGE_SIZE", value, parsed)?;
    }
    if let Ok(value) = env::var("STORAGE_UPLOAD_CONCURRENCY") {
        let parsed = value.trim().parse().ok();
        config.upload_concurrency = positive("STORAGE_UPLOAD_CONCURRENCY", value, parsed)?;
    }
    Ok(())
}
