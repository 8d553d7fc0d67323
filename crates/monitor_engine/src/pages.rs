use monitor_core::{BatchId, BatchPage};
use monitor_logging::monitor_warn;

use crate::BackendApi;

/// Resolves a batch route segment into the page to show.
///
/// A malformed id never reaches the backend.
pub async fn load_batch_page(backend: &dyn BackendApi, raw_id: &str) -> BatchPage {
    let id = match BatchId::from_route(raw_id) {
        Ok(id) => id,
        Err(err) => {
            monitor_warn!("{}", err);
            return BatchPage::NotFound;
        }
    };
    match backend.batch(id).await {
        Ok(Some(batch)) => BatchPage::Loaded(batch),
        Ok(None) => BatchPage::NotFound,
        Err(err) => {
            monitor_warn!("Batch {} lookup failed: {}", id, err);
            BatchPage::Unavailable { id }
        }
    }
}
