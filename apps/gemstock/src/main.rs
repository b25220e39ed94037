//! # Gemstock Host Entry Point
//!
//! Opens the inventory, syncs it once and, when configured, keeps syncing
//! on an interval until Ctrl-C.
//!
//! ```text
//! gemstock [LAUNCH_URL]
//!
//!   LAUNCH_URL   optional link carrying a one-time sync credential,
//!                e.g. https://inventory.example.com/?token=ghp_…
//! ```
//!
//! Configuration comes from `gemstock.toml` in the platform config directory
//! and `GEMSTOCK_*` environment variables.

use std::time::Duration;
use tracing::{info, warn};

use gemstock_app::{init_tracing, AppContext, NoticeLevel, SyncNotice};
use gemstock_sync::GemstockConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting Gemstock");

    let config = GemstockConfig::load_or_default(None);
    let interval_secs = config.sync.interval_secs;
    let ctx = AppContext::initialize(config).await?;

    if let Some(notice) = ctx.startup_notice() {
        report(notice);
    }

    if let Some(url) = std::env::args().nth(1) {
        match ctx.apply_launch_url(&url).await {
            Ok(Some(saved)) => {
                info!(url = %saved.value, "Launch URL consumed");
                if let Some(notice) = &saved.notice {
                    report(notice);
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring launch URL"),
        }
    }

    sync_once(&ctx).await;

    if interval_secs > 0 {
        info!(interval_secs, "Periodic sync enabled");
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick completes immediately; the startup sync covered it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => sync_once(&ctx).await,
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }
    }

    ctx.shutdown().await;
    info!("Gemstock stopped");
    Ok(())
}

async fn sync_once(ctx: &AppContext) {
    match ctx.sync_now().await {
        Ok(run) => run.notices.iter().for_each(report),
        Err(e) => warn!(error = %e, "Sync could not reload the collection"),
    }
}

fn report(notice: &SyncNotice) {
    match notice.level {
        NoticeLevel::Info => info!(message = %notice.message, "Sync notice"),
        NoticeLevel::Warning | NoticeLevel::Error => warn!(message = %notice.message, "Sync notice"),
    }
}
