use std::sync::{Mutex, PoisonError};

use axum::response::Redirect;

use crate::web::bill::container::Navigator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "/employee/bills",
            Route::NewBill => "/employee/bill/new",
        }
    }
}

/// Vertical navigation bar, with the icon of the current route highlighted
#[derive(Clone, Copy, Debug)]
pub struct VerticalLayout {
    active: Option<Route>,
}

impl VerticalLayout {
    pub fn active(route: Route) -> Self {
        Self {
            active: Some(route),
        }
    }

    pub fn hidden() -> Self {
        Self { active: None }
    }

    pub fn shown(&self) -> bool {
        self.active.is_some()
    }

    pub fn window_class(&self) -> &'static str {
        self.class_for(Route::Bills)
    }

    pub fn mail_class(&self) -> &'static str {
        self.class_for(Route::NewBill)
    }

    fn class_for(&self, route: Route) -> &'static str {
        if self.active == Some(route) {
            "active-icon"
        } else {
            ""
        }
    }
}

/// Collects the navigation requested while handling a request, answered with a redirect
#[derive(Debug, Default)]
pub struct RedirectNavigator {
    target: Mutex<Option<Route>>,
}

impl RedirectNavigator {
    pub fn into_redirect(self) -> Option<Redirect> {
        self.target
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|route| Redirect::to(route.path()))
    }
}

impl Navigator for RedirectNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!("navigating to {}", route.path());
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::header::LOCATION, response::IntoResponse};

    use super::*;

    #[test]
    fn only_the_active_icon_is_highlighted() {
        let bills = VerticalLayout::active(Route::Bills);
        assert_eq!(bills.window_class(), "active-icon");
        assert_eq!(bills.mail_class(), "");

        let new_bill = VerticalLayout::active(Route::NewBill);
        assert_eq!(new_bill.window_class(), "");
        assert_eq!(new_bill.mail_class(), "active-icon");

        assert!(!VerticalLayout::hidden().shown());
    }

    #[test]
    fn navigator_without_navigation_gives_no_redirect() {
        assert!(RedirectNavigator::default().into_redirect().is_none());
    }

    #[test]
    fn last_navigation_wins() {
        let nav = RedirectNavigator::default();
        nav.navigate(Route::Bills);
        nav.navigate(Route::NewBill);
        let resp = nav.into_redirect().unwrap().into_response();
        assert_eq!(resp.headers()[LOCATION], "/employee/bill/new");
    }
}
