use crate::*;
use bucketfs::context::Context;
use bucketfs::error::Result;
use bucketfs::storage::{StorageClient, StorageConfig};
use bytes::Bytes;
use futures::TryStreamExt;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_list_keys_nested,
        test_list_keys_skips_folders,
        test_list_keys_missing_prefix,
        test_list_keys_with_special_chars,
        test_list_keys_beyond_page_size
    ));
}

async fn write_all(client: &StorageClient, keys: &[String]) -> Result<()> {
    let ctx = Context::background();
    for key in keys {
        let content = TEST_FIXTURE.new_content(16..256);
        client
            .store_object(&ctx, TEST_BUCKET, key, Bytes::from(content))
            .await?;
    }
    Ok(())
}

pub async fn test_list_keys_nested(client: StorageClient) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();
    let mut expected = vec![
        format!("{dir}root.txt"),
        format!("{dir}sub/child.txt"),
        format!("{dir}sub/deeper/leaf.txt"),
    ];
    write_all(&client, &expected).await?;

    let mut keys: Vec<String> = client
        .list_keys(&Context::background(), TEST_BUCKET, &dir)
        .try_collect()
        .await?;

    keys.sort();
    expected.sort();
    assert_eq!(keys, expected);
    Ok(())
}

pub async fn test_list_keys_skips_folders(client: StorageClient) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();
    write_all(&client, &[format!("{dir}a/b/c.txt")]).await?;

    let keys: Vec<String> = client
        .list_keys(&Context::background(), TEST_BUCKET, &dir)
        .try_collect()
        .await?;

    assert!(
        keys.iter().all(|k| !k.ends_with('/')),
        "folder markers leaked into listing: {keys:?}"
    );
    assert_eq!(keys, vec![format!("{dir}a/b/c.txt")]);
    Ok(())
}

pub async fn test_list_keys_missing_prefix(client: StorageClient) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();

    let keys: Vec<String> = client
        .list_keys(&Context::background(), TEST_BUCKET, &dir)
        .try_collect()
        .await?;

    assert!(keys.is_empty(), "missing prefix should list nothing: {keys:?}");
    Ok(())
}

pub async fn test_list_keys_with_special_chars(client: StorageClient) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();
    let names = [
        "file with spaces.txt",
        "file-with-dashes.txt",
        "file_with_underscores.txt",
        "file.with.dots.txt",
    ];
    let mut expected: Vec<String> = names.iter().map(|n| format!("{dir}{n}")).collect();
    write_all(&client, &expected).await?;

    let mut keys: Vec<String> = client
        .list_keys(&Context::background(), TEST_BUCKET, &dir)
        .try_collect()
        .await?;

    keys.sort();
    expected.sort();
    assert_eq!(keys, expected);
    Ok(())
}

pub async fn test_list_keys_beyond_page_size(client: StorageClient) -> Result<()> {
    let small_pages = StorageClient::from_config(&StorageConfig {
        list_page_size: 2,
        ..test_config()
    });
    let dir = TEST_FIXTURE.new_dir_path();
    let mut expected: Vec<String> = (0..5).map(|i| format!("{dir}file-{i}")).collect();
    write_all(&client, &expected).await?;

    let mut keys: Vec<String> = small_pages
        .list_keys(&Context::background(), TEST_BUCKET, &dir)
        .try_collect()
        .await?;

    keys.sort();
    expected.sort();
    assert_eq!(keys, expected);
    Ok(())
}
