use crate::error::{FetchError, SubmitError};
use crate::model::SavePayload;
use crate::omnivore::{OmnivoreClient, Saved};
use crate::readeck::ReadeckClient;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub attempted: usize,
    pub saved: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct ItemOutcome {
    pub url: String,
    pub result: Result<Saved, SubmitError>,
}

impl ItemOutcome {
    fn record(&self, stats: &mut SyncStats) {
        stats.attempted += 1;
        match self.result {
            Ok(_) => stats.saved += 1,
            Err(_) => stats.failed += 1,
        }
    }
}

/// Per-bookmark outcomes in the order readeck returned them.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub items: Vec<ItemOutcome>,
    pub stats: SyncStats,
}

impl SyncReport {
    fn push(&mut self, outcome: ItemOutcome) {
        outcome.record(&mut self.stats);
        self.items.push(outcome);
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(|item| item.result.is_err())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SyncOptions {
    pub dry_run: bool,
}

pub fn log_submit_error(url: &str, e: &SubmitError) {
    tracing::error!("Failed to save {} to omnivore: {}", url, crate::unpack_error(e));
}

/// Fetches marked bookmarks once and submits them one at a time. Only the
/// fetch can fail the run; submit failures land in the report.
pub async fn run(
    readeck: &ReadeckClient,
    omnivore: &OmnivoreClient,
    opts: SyncOptions,
) -> Result<SyncReport, FetchError> {
    let bookmarks = readeck.fetch_marked_bookmarks().await?;
    let mut report = SyncReport::default();

    for bookmark in &bookmarks {
        let payload = SavePayload::from_bookmark(bookmark);

        let result = if opts.dry_run {
            match serde_json::to_string(&payload) {
                Ok(json) => tracing::info!(payload = %json, "dry run, not saving {}", payload.url),
                Err(e) => tracing::info!("dry run, not saving {} ({})", payload.url, e),
            }
            Ok(Saved {
                url: payload.url.clone(),
            })
        } else {
            omnivore.save_url(&payload).await
        };

        match &result {
            Ok(saved) => tracing::info!("saved {}", saved.url),
            Err(e) => log_submit_error(&bookmark.url, e),
        }

        report.push(ItemOutcome {
            url: bookmark.url.clone(),
            result,
        });
    }

    tracing::info!(
        attempted = report.stats.attempted,
        saved = report.stats.saved,
        failed = report.stats.failed,
        "sync finished"
    );
    Ok(report)
}
