// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tracing::{info, warn};

use origin_client::config::Config;
use origin_client::rest::WatchEvent;
use origin_client::BuildClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: namespace={}, label_selector={:?}, watch={}",
        config.namespace, config.label_selector, config.watch
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let builds = BuildClient::new(client).builds(&config.namespace);
    let options = config.list_options();

    let list = builds.list(&options).await?;
    for build in &list.items {
        info!(
            "{} {:?} {}",
            build.metadata.name.as_deref().unwrap_or("<unnamed>"),
            build.phase(),
            build.output_image().unwrap_or("")
        );
    }
    info!("Listed {} builds", list.items.len());

    if !config.watch {
        return Ok(());
    }

    // Resume from the list so no change between list and watch is missed
    let mut options = options.bookmarks();
    if let Some(version) = list.metadata.resource_version.as_deref() {
        options = options.at(version);
    }
    let mut handle = builds.watch(&options).await?;
    while let Some(event) = handle.next().await {
        match event {
            Ok(WatchEvent::Added(build)) | Ok(WatchEvent::Modified(build)) => info!(
                "{} is {:?}",
                build.metadata.name.as_deref().unwrap_or("<unnamed>"),
                build.phase()
            ),
            Ok(WatchEvent::Deleted(build)) => info!(
                "{} deleted",
                build.metadata.name.as_deref().unwrap_or("<unnamed>")
            ),
            Ok(WatchEvent::Bookmark { resource_version }) => {
                info!("Bookmark at {}", resource_version)
            }
            Err(e) => warn!("Watch ended: {}", e),
        }
    }
    handle.close();
    info!("Watch closed");
    Ok(())
}
