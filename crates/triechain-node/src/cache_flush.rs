//! Periodic cache-flush task (§9): fires on a fixed interval, or early once
//! the acceptance cache crosses a size threshold, whichever comes first.
//! Grounded on `luxtensor-node/src/service.rs`'s `tokio::time::interval`
//! block-production loop and the auto-prune trigger in
//! `luxtensor-storage/src/maintenance.rs`'s `PruningConfig`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::config::CacheConfig;
use crate::context::AppContext;

/// Runs until `shutdown` fires. On each tick, and also whenever the
/// acceptance cache has already grown past `size_threshold` when a tick
/// arrives, both caches are cleared.
pub async fn run(ctx: Arc<AppContext>, config: CacheConfig, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(Duration::from_secs(config.flush_interval_secs));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                flush_if_due(&ctx, config.size_threshold);
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("cache-flush task shutting down");
                    break;
                }
            }
        }
    }
}

fn flush_if_due(ctx: &AppContext, size_threshold: usize) {
    let pending = ctx.acceptance_cache.len() + ctx.application_cache.len();
    if pending == 0 {
        return;
    }
    if pending >= size_threshold {
        info!(pending, size_threshold, "cache-flush: size threshold exceeded");
    } else {
        info!(pending, "cache-flush: interval tick");
    }
    ctx.acceptance_cache.clear();
    ctx.application_cache.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flush_clears_both_caches() {
        let ctx = Arc::new(AppContext::new());
        ctx.acceptance_cache.push();
        ctx.application_cache.clear();

        flush_if_due(&ctx, 10_000);

        assert!(ctx.acceptance_cache.is_empty());
        assert!(ctx.application_cache.is_empty());
    }

    #[tokio::test]
    async fn flush_is_a_no_op_on_empty_caches() {
        let ctx = Arc::new(AppContext::new());
        flush_if_due(&ctx, 10_000);
        assert!(ctx.acceptance_cache.is_empty());
    }

    #[tokio::test]
    async fn task_stops_promptly_on_shutdown_signal() {
        let ctx = Arc::new(AppContext::new());
        let config = CacheConfig {
            flush_interval_secs: 3600,
            size_threshold: 10_000,
        };
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(run(ctx, config, rx));
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should stop promptly after shutdown signal")
            .unwrap();
    }
}
