use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::web::{bill::data::DisplayBill, route::VerticalLayout};

use super::error::Error;

pub struct HtmlTemplate<T>(pub T);

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub nav: VerticalLayout,
    pub error: String,
}

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!("Error rendering template: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error rendering template",
                )
                    .into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub nav: VerticalLayout,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "bills.html")]
pub struct BillsTemplate {
    pub nav: VerticalLayout,
    pub bills: Vec<DisplayBill>,
}

#[derive(Template)]
#[template(path = "receipt.html")]
pub struct ReceiptTemplate {
    pub nav: VerticalLayout,
    pub receipt_url: String,
}

#[derive(Template)]
#[template(path = "new_bill.html")]
pub struct NewBillTemplate {
    pub nav: VerticalLayout,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Fetch(_) => StatusCode::BAD_GATEWAY,
        };

        (
            status,
            HtmlTemplate(ErrorTemplate {
                nav: VerticalLayout::hidden(),
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
