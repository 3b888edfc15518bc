use clap::Parser;
use serde::Serialize;
use std::time::Duration;

use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::location::Location;
use crate::storage::StorageClient;
use crate::wrap_err;

#[derive(Parser, Debug)]
#[command(
    name = "bucketfs",
    version,
    about = "List the objects of a storage folder, e.g. bucketfs s3://bucket/path/to/folder/"
)]
pub struct Args {
    /// Storage URI; a trailing '/' addresses a folder, anything else an object
    /// whose parent folder is listed
    pub uri: String,

    /// Give up after this many seconds
    #[arg(long, env = "BUCKETFS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Print one JSON object per key instead of bare keys
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct KeyRecord<'a> {
    bucket: &'a str,
    key: &'a str,
}

fn print_key(bucket: &str, key: &str, json: bool) {
    if !json {
        println!("{key}");
        return;
    }
    match serde_json::to_string(&KeyRecord { bucket, key }) {
        Ok(line) => println!("{line}"),
        Err(e) => log::error!("failed to encode key {key}: {e}"),
    }
}

// Malformed addresses and interrupted checks are reported as such; anything
// else means the location could not be confirmed.
fn validation_result(res: Result<()>, uri: &str) -> Result<()> {
    match res {
        Err(e) if matches!(e.kind(), ErrorKind::Parse | ErrorKind::Cancelled) => Err(e),
        res => wrap_err!(
            res,
            ValidateLocationFailed {
                uri: uri.to_string()
            }
        ),
    }
}

/// Validate the address, then print every key in its folder.
pub async fn run(args: Args, client: StorageClient) -> Result<()> {
    let ctx = match args.timeout {
        Some(secs) => Context::background().with_timeout(Duration::from_secs(secs)),
        None => Context::background(),
    };

    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupted, stopping");
            interrupt.cancel();
        }
    });

    let mut location = Location::new(client);
    let validated = location.set_location_and_validate(&ctx, &args.uri).await;
    validation_result(validated, &args.uri)?;
    log::info!("listing {}", location.name());

    let bucket = location
        .address()
        .map(|a| a.bucket().to_string())
        .unwrap_or_default();
    let listed = location
        .list_folder(&ctx, |key| print_key(&bucket, &key, args.json))
        .await;
    // A cancelled listing ends quietly; report why it stopped.
    let listed = match ctx.err() {
        Some(err) if listed.is_ok() => Err(err),
        _ => listed,
    };
    let count = wrap_err!(
        listed,
        ListFolderFailed {
            uri: args.uri.clone()
        }
    )?;
    log::info!("listed {count} key(s) under {}", args.uri);
    Ok(())
}
