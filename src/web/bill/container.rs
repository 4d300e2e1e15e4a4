use tracing::warn;

use crate::{
    db::{StoreRef, bill::StoreError},
    web::{
        bill::{
            data::{DisplayBill, ReceiptTrigger},
            format::{FormatOutcome, format_bill},
        },
        route::Route,
    },
};

/// Changes the active view
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Shows a receipt image in a modal
pub trait Presenter: Send + Sync {
    fn show_receipt(&self, url: &url::Url);
}

/// Fetches and formats the bills of the Bills page and handles its clicks
pub struct Bills<'a> {
    store: &'a StoreRef,
    navigator: &'a dyn Navigator,
    presenter: &'a dyn Presenter,
}

impl<'a> Bills<'a> {
    pub fn new(
        store: &'a StoreRef,
        navigator: &'a dyn Navigator,
        presenter: &'a dyn Presenter,
    ) -> Self {
        Self {
            store,
            navigator,
            presenter,
        }
    }

    /// Bills in store order, formatted where possible. `None` when no store is configured.
    pub async fn get_bills(&self) -> Result<Option<Vec<DisplayBill>>, StoreError> {
        let StoreRef::Connected(store) = self.store else {
            return Ok(None);
        };

        let bills = store
            .list()
            .await?
            .into_iter()
            .map(|record| {
                let outcome = format_bill(record);
                if let FormatOutcome::Fallback { original, error } = &outcome {
                    warn!("Keeping bill {} unformatted: {error}", original.id);
                }
                outcome.into_bill()
            })
            .collect();
        Ok(Some(bills))
    }

    pub fn handle_click_icon_eye(&self, icon: &ReceiptTrigger) {
        self.presenter.show_receipt(&icon.bill_url);
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }
}
