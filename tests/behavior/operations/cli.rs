use crate::*;
use assert_cmd::prelude::*;
use bucketfs::context::Context;
use bucketfs::error::Result;
use bucketfs::storage::StorageClient;
use bytes::Bytes;
use predicates::prelude::*;
use uuid::Uuid;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_cli_lists_folder,
        test_cli_object_lists_siblings,
        test_cli_json_output,
        test_cli_missing_location_fails,
        test_cli_missing_bucket_fails,
        test_cli_invalid_uri_fails,
        test_cli_requires_one_argument
    ));
}

async fn write_files(client: &StorageClient, dir: &str, names: &[&str]) -> Result<Vec<String>> {
    let ctx = Context::background();
    let mut keys = Vec::new();
    for name in names {
        let key = format!("{dir}{name}");
        let content = TEST_FIXTURE.new_content(10..100);
        client
            .store_object(&ctx, TEST_BUCKET, &key, Bytes::from(content))
            .await?;
        keys.push(key);
    }
    Ok(keys)
}

pub async fn test_cli_lists_folder(client: StorageClient) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();
    let keys = write_files(&client, &dir, &["object1", "object2", "nested/object3"]).await?;

    let mut assert = bucketfs_cmd().arg(uri(&dir)).assert().success();
    for key in &keys {
        assert = assert.stdout(predicate::str::contains(key.as_str()));
    }
    Ok(())
}

pub async fn test_cli_object_lists_siblings(client: StorageClient) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();
    let keys = write_files(&client, &dir, &["a.json", "b.json"]).await?;

    bucketfs_cmd()
        .arg(uri(&keys[0]))
        .assert()
        .success()
        .stdout(predicate::str::contains(keys[0].as_str()))
        .stdout(predicate::str::contains(keys[1].as_str()));
    Ok(())
}

pub async fn test_cli_json_output(client: StorageClient) -> Result<()> {
    let dir = TEST_FIXTURE.new_dir_path();
    let keys = write_files(&client, &dir, &["only.txt"]).await?;

    bucketfs_cmd()
        .arg("--json")
        .arg(uri(&dir))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stdout(predicate::str::contains(format!("\"key\":\"{}\"", keys[0])))
        .stdout(predicate::str::contains(format!("\"bucket\":\"{TEST_BUCKET}\"")));
    Ok(())
}

pub async fn test_cli_missing_location_fails(_client: StorageClient) -> Result<()> {
    let missing = uri(&TEST_FIXTURE.new_file_path());

    bucketfs_cmd()
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!("{missing} does not exist")));
    Ok(())
}

pub async fn test_cli_missing_bucket_fails(_client: StorageClient) -> Result<()> {
    let bucket = Uuid::new_v4().to_string();
    let missing = format!("{TEST_SCHEME}://{bucket}/");

    bucketfs_cmd()
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!("{missing} does not exist")));
    assert!(!TEST_ROOT.join(&bucket).exists());
    Ok(())
}

pub async fn test_cli_invalid_uri_fails(_client: StorageClient) -> Result<()> {
    bucketfs_cmd()
        .arg("not a uri")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid storage URI"));
    Ok(())
}

pub async fn test_cli_requires_one_argument(_client: StorageClient) -> Result<()> {
    bucketfs_cmd().assert().failure();
    bucketfs_cmd()
        .arg(uri("a/"))
        .arg(uri("b/"))
        .assert()
        .failure();
    Ok(())
}
