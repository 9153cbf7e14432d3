//! Detail modal: open with a full-plot lookup, close by dismissal.

use tracing::{debug, info, warn};

use super::{ModalDismissal, SearchSession};
use crate::external_catalog::PlotLength;

impl SearchSession {
    /// Fetch the full-plot record for `imdb_id` and show it in the modal.
    ///
    /// Always goes to the catalog; the short-plot cache is not consulted.
    /// Returns `true` if the modal opened. A failed lookup leaves the modal
    /// closed, and a lookup overtaken by a close or a newer open is dropped.
    pub async fn open_details(&self, imdb_id: &str) -> bool {
        let generation = {
            let mut state = self.lock();
            state.modal_generation += 1;
            state.details_loading = true;
            self.publish(&mut state);
            state.modal_generation
        };

        debug!("Loading details for {}", imdb_id);
        // Run the lookup on its own task so the loading flag is always
        // cleared, even if the caller's future is dropped.
        let catalog = self.shared.catalog.clone();
        let weak = self.downgrade();
        let id = imdb_id.to_string();
        let lookup = tokio::spawn(async move {
            let record = catalog.get_details(&id, PlotLength::Full).await;
            let session = Self::upgrade(&weak)?;

            let mut state = session.lock();
            if state.modal_generation != generation {
                debug!("Discarding stale details for {}", id);
                return Some(false);
            }
            state.details_loading = false;
            let opened = record.is_some();
            if opened {
                state.modal = record;
            } else {
                warn!("Details for {} unavailable, modal stays closed", id);
            }
            session.publish(&mut state);
            Some(opened)
        });

        match lookup.await {
            Ok(opened) => opened.unwrap_or(false),
            Err(e) => {
                warn!("Detail lookup task failed: {}", e);
                false
            }
        }
    }

    /// Close the modal. Also cancels an open that is still loading.
    ///
    /// Returns `true` if a modal was showing.
    pub fn close_details(&self, reason: ModalDismissal) -> bool {
        let mut state = self.lock();
        state.modal_generation += 1;
        state.details_loading = false;
        let closed = state.modal.take();
        self.publish(&mut state);

        if let Some(record) = &closed {
            info!("Closed details for {} ({})", record.imdb_id, reason.as_str());
        }
        closed.is_some()
    }
}
