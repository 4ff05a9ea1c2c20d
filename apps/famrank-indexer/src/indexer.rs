use std::time::Duration;

use tokio::time as tokio_time;

use famrank_service::{FamRankService, ReindexReport};

pub const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Fills `display_name_lower` for every row missing it and mirrors those rows into the index.
pub async fn run_once(service: &FamRankService) -> famrank_service::Result<ReindexReport> {
	let report = service.update_all_users_for_search().await?;

	if report.updated > 0 {
		tracing::info!(
			updated = report.updated,
			indexed = report.indexed,
			"Search backfill pass finished."
		);
	} else {
		tracing::debug!("Search backfill pass found nothing to update.");
	}

	Ok(report)
}

pub async fn run_indexer(service: &FamRankService, interval: Duration) -> color_eyre::Result<()> {
	tracing::info!(interval_secs = interval.as_secs(), "Search indexer started.");

	loop {
		if let Err(err) = run_once(service).await {
			tracing::error!(error = %err, "Search backfill pass failed.");
		}

		tokio_time::sleep(interval).await;
	}
}
