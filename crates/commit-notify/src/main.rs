//! commit-notify: announce unpublished git commits to a Slack channel
//!
//! Posts every commit between the marker tag and `HEAD` to a Slack webhook,
//! then moves the marker to `HEAD` and force-pushes it.

use anyhow::Context;
use clap::Parser;
use commit_notify::config::Config;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout stays free for callers piping the binary
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    let summary = commit_notify::run(&config).context("Commit notification run failed")?;

    info!(
        head = %summary.head,
        pending = summary.pending,
        sent = summary.sent,
        skipped = summary.skipped,
        marker_moved = summary.marker_moved,
        "Notification run complete"
    );
    Ok(())
}
