use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::error;

use crate::{
    Ctx,
    web::{
        Result,
        bill::{
            container::Bills,
            data::{ReceiptModal, ReceiptQuery, ReceiptTrigger},
        },
        error::Error,
        route::{RedirectNavigator, Route, VerticalLayout},
        session::Employee,
        templates::{BillsTemplate, HtmlTemplate, NewBillTemplate, ReceiptTemplate},
    },
};

#[tracing::instrument(level = tracing::Level::DEBUG, skip(ctx))]
pub async fn list(employee: Employee, State(ctx): State<Ctx>) -> Result<impl IntoResponse> {
    let navigator = RedirectNavigator::default();
    let modal = ReceiptModal::default();

    let bills = Bills::new(&ctx.store, &navigator, &modal)
        .get_bills()
        .await
        .map_err(|e| {
            error!("Error fetching bills for {}: {e}", employee.0.email);
            Error::Fetch(e.to_string())
        })?;

    Ok(HtmlTemplate(BillsTemplate {
        nav: VerticalLayout::active(Route::Bills),
        bills: bills.unwrap_or_default(),
    }))
}

#[tracing::instrument(level = tracing::Level::DEBUG, skip(ctx))]
pub async fn icon_eye(
    _employee: Employee,
    State(ctx): State<Ctx>,
    Query(query): Query<ReceiptQuery>,
) -> Result<impl IntoResponse> {
    let icon = ReceiptTrigger::parse(&query.url)
        .map_err(|_| Error::BadRequest("invalid receipt url".to_string()))?;

    let navigator = RedirectNavigator::default();
    let modal = ReceiptModal::default();
    Bills::new(&ctx.store, &navigator, &modal).handle_click_icon_eye(&icon);

    let receipt_url = modal.into_shown().ok_or(Error::Internal)?;
    Ok(HtmlTemplate(ReceiptTemplate {
        nav: VerticalLayout::active(Route::Bills),
        receipt_url: receipt_url.to_string(),
    }))
}

#[tracing::instrument(level = tracing::Level::DEBUG, skip(ctx))]
pub async fn new_bill_click(_employee: Employee, State(ctx): State<Ctx>) -> Result<impl IntoResponse> {
    let navigator = RedirectNavigator::default();
    let modal = ReceiptModal::default();
    Bills::new(&ctx.store, &navigator, &modal).handle_click_new_bill();

    navigator.into_redirect().ok_or(Error::Internal)
}

#[tracing::instrument(level = tracing::Level::DEBUG)]
pub async fn new_bill(_employee: Employee) -> Result<impl IntoResponse> {
    Ok(HtmlTemplate(NewBillTemplate {
        nav: VerticalLayout::active(Route::NewBill),
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        http::{StatusCode, header::LOCATION},
        response::Response,
    };
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::{
        db::{
            StoreRef,
            bill::StoreError,
            memory::{FailingBillStore, InMemBillStore, demo_bills},
        },
        web::session::SessionUser,
    };

    fn ctx(store: StoreRef) -> State<Ctx> {
        State(Ctx {
            store,
            session_store: MemoryStore::default(),
        })
    }

    fn employee() -> Employee {
        Employee(SessionUser::employee("employee@test.tld"))
    }

    async fn body(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn bills_page_lists_fetched_bills() {
        let store = StoreRef::connected(InMemBillStore::with_bills(demo_bills()));
        let resp = list(employee(), ctx(store)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let html = body(resp).await;
        assert!(html.contains("Mes notes de frais"));
        assert_eq!(html.matches("<tr class=\"bill-row\">").count(), 4);
        assert!(html.contains("4 Avr. 04"));
        assert!(html.contains("data-testid=\"icon-window\" class=\"active-icon\""));
    }

    #[tokio::test]
    async fn bills_page_without_store_has_empty_table() {
        let resp = list(employee(), ctx(StoreRef::Absent)).await.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let html = body(resp).await;
        assert!(html.contains("data-testid=\"tbody\""));
        assert!(!html.contains("<tr class=\"bill-row\">"));
    }

    #[tokio::test]
    async fn store_404_is_rendered_as_error_page() {
        let store = StoreRef::connected(FailingBillStore(|| StoreError::Status(404)));
        let resp = list(employee(), ctx(store)).await.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let html = body(resp).await;
        assert!(html.contains("Erreur 404"));
        assert!(html.contains("data-testid=\"error-message\""));
        assert!(!html.contains("data-testid=\"tbody\""));
    }

    #[tokio::test]
    async fn store_500_is_rendered_as_error_page() {
        let store = StoreRef::connected(FailingBillStore(|| {
            StoreError::Backend("Erreur 500".to_string())
        }));
        let html = body(list(employee(), ctx(store)).await.into_response()).await;
        assert!(html.contains("Erreur 500"));
        assert!(!html.contains("Erreur 404"));
    }

    #[tokio::test]
    async fn icon_eye_opens_receipt_modal() {
        let query = Query(ReceiptQuery {
            url: "https://test.storage.tld/receipts/a.jpg".to_string(),
        });
        let resp = icon_eye(employee(), ctx(StoreRef::Absent), query)
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let html = body(resp).await;
        assert!(html.contains("id=\"modaleFile\""));
        assert!(html.contains("src=\"https://test.storage.tld/receipts/a.jpg\""));
    }

    #[tokio::test]
    async fn icon_eye_rejects_bad_url() {
        let query = Query(ReceiptQuery {
            url: "javascript:alert(1)".to_string(),
        });
        let resp = icon_eye(employee(), ctx(StoreRef::Absent), query)
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn new_bill_click_redirects_to_new_bill_page() {
        let resp = new_bill_click(employee(), ctx(StoreRef::Absent))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[LOCATION], Route::NewBill.path());

        let html = body(new_bill(employee()).await.into_response()).await;
        assert!(html.contains("Envoyer une note de frais"));
        assert!(html.contains("data-testid=\"icon-mail\" class=\"active-icon\""));
    }
}
