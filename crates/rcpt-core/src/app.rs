//! Application state: the receipt store plus the current view settings.

use std::error::Error;

use tracing::{debug, info, warn};

use crate::error::{Result, ScanError};
use crate::export::to_csv;
use crate::extraction::ReceiptExtractor;
use crate::filter::{ReceiptQuery, filter_receipts};
use crate::models::receipt::Receipt;
use crate::payload::ImagePayload;
use crate::store::ReceiptStore;
use rcpt_vision::ExtractionClient;

/// Session state owned by a single controller.
///
/// Uploads take `&mut self`, so at most one is in flight at a time.
#[derive(Debug, Default)]
pub struct ReceiptBook {
    store: ReceiptStore,
    query: ReceiptQuery,
    loading: bool,
    error: Option<String>,
    selected: Option<usize>,
}

impl ReceiptBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a receipt to the store. Returns its position in the store.
    pub fn add_receipt(&mut self, receipt: Receipt) -> usize {
        // Positions shift on insert, so a selection by index would go stale.
        self.selected = None;
        self.store.insert(receipt)
    }

    pub fn receipts(&self) -> &[Receipt] {
        self.store.records()
    }

    pub fn store(&self) -> &ReceiptStore {
        &self.store
    }

    pub fn query(&self) -> &ReceiptQuery {
        &self.query
    }

    pub fn set_filter(&mut self, query: ReceiptQuery) {
        debug!(?query, "filter changed");
        self.query = query;
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
    }

    /// The receipts passing the current filter, in store order.
    pub fn filtered_view(&self) -> Vec<&Receipt> {
        filter_receipts(self.store.records(), &self.query)
    }

    /// Category choices for the filter form.
    pub fn categories(&self) -> Vec<String> {
        self.store.categories()
    }

    /// CSV of the current view, or `None` when there is nothing to export.
    pub fn export_view(&self) -> Option<String> {
        let view = self.filtered_view();
        if view.is_empty() {
            return None;
        }
        info!(rows = view.len(), "exporting receipts");
        Some(to_csv(view))
    }

    /// Open the detail view of a store position.
    pub fn select(&mut self, index: usize) -> Option<&Receipt> {
        let receipt = self.store.get(index)?;
        self.selected = Some(index);
        Some(receipt)
    }

    pub fn selected(&self) -> Option<&Receipt> {
        self.selected.and_then(|i| self.store.get(i))
    }

    pub fn close_selection(&mut self) {
        self.selected = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed upload, cleared when a new one starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record the outcome of an upload performed elsewhere.
    pub fn record_failure(&mut self, err: &ScanError) {
        warn!("upload failed: {}", err);
        self.error = Some(err.to_string());
    }

    /// Extract an in-memory image and add the result.
    pub async fn upload_payload<C: ExtractionClient>(
        &mut self,
        extractor: &ReceiptExtractor<C>,
        payload: ImagePayload,
    ) -> Result<&Receipt> {
        self.begin_upload();
        let result = extractor.extract(&payload).await;
        self.finish_upload(result.map(|fields| Receipt::new(fields, payload.to_data_url())))
    }

    /// Read an image file, extract it and add the result.
    #[cfg(feature = "native")]
    pub async fn upload<C: ExtractionClient>(
        &mut self,
        extractor: &ReceiptExtractor<C>,
        path: impl AsRef<std::path::Path>,
    ) -> Result<&Receipt> {
        self.begin_upload();
        let result = async {
            let payload = crate::payload::read_image(path).await?;
            let fields = extractor.extract(&payload).await?;
            Ok::<_, ScanError>(Receipt::new(fields, payload.to_data_url()))
        }
        .await;
        self.finish_upload(result)
    }

    /// Mark an upload as started: sets the loading flag and clears the last error.
    ///
    /// Callers that extract outside the book pair this with `finish_upload`.
    pub fn begin_upload(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Record the outcome of an upload: add the receipt or keep the error.
    pub fn finish_upload(&mut self, result: Result<Receipt>) -> Result<&Receipt> {
        self.loading = false;
        match result {
            Ok(receipt) => {
                let position = self.add_receipt(receipt);
                self.store.get(position).ok_or(ScanError::Unknown)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }
}

/// The single user-visible message for any error.
///
/// Errors that are not `ScanError` get the generic unknown-error message.
pub fn user_message(err: &(dyn Error + 'static)) -> String {
    match err.downcast_ref::<ScanError>() {
        Some(scan) => scan.to_string(),
        None => ScanError::Unknown.to_string(),
    }
}
