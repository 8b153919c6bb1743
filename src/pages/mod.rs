//! Per-resource page configurations
//!
//! Each module declares columns, form fields and validation schemas for one
//! resource and hands them to the generic engine. These are data, not
//! logic; behavior differences between resources should stay out of here.

pub mod authors;
pub mod books;
pub mod categories;
pub mod circulation;
pub mod client;
pub mod publishers;
pub mod system;

use std::sync::Arc;

use crate::auth::AuthSession;
use crate::config::ListConfig;
use crate::crud::options::load_named_options;
use crate::crud::{
    CrudPage, HttpResourceService, OptionCache, ResourceService, SelectOption,
};
use crate::error::AppResult;
use crate::http::HttpService;
use crate::nav::routes;

/// Shared handles a page needs to build its service and option lists.
#[derive(Clone)]
pub struct PageContext {
    pub session: Arc<AuthSession>,
    pub http: Arc<HttpService>,
    pub options: Arc<OptionCache>,
    pub list: ListConfig,
}

impl PageContext {
    pub fn service(&self, path: &'static str) -> Arc<dyn ResourceService> {
        Arc::new(HttpResourceService::new(
            self.session.clone(),
            self.http.clone(),
            path,
        ))
    }

    /// Cached label/value options from a related resource's listing.
    pub async fn named_options(
        &self,
        key: &str,
        path: &'static str,
        label_field: &'static str,
    ) -> AppResult<Vec<SelectOption>> {
        let service = self.service(path);
        let page_size = self.list.options_page_size;
        let options = self
            .options
            .get_or_load(key, || async move {
                load_named_options(&*service, page_size, label_field).await
            })
            .await?;
        Ok((*options).clone())
    }
}

/// Render a date-time field as a plain date, leaving unparseable values as
/// they came.
pub(crate) fn date_cell(row: &crate::crud::Row, field: &str) -> String {
    let raw = row
        .get(field)
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Render a money field with two decimal places.
pub(crate) fn money_cell(row: &crate::crud::Row, field: &str) -> String {
    use rust_decimal::Decimal;
    use std::str::FromStr;

    row.get(field)
        .and_then(|value| match value {
            serde_json::Value::Number(n) => n.as_f64().and_then(Decimal::from_f64_retain),
            serde_json::Value::String(s) => Decimal::from_str(s).ok(),
            _ => None,
        })
        .map(|amount| format!("{:.2}", amount))
        .unwrap_or_default()
}

/// Resource name as used on the CLI and in routes.
pub fn route_for(resource: &str) -> Option<&'static str> {
    Some(match resource {
        "books" => routes::BOOKS,
        "authors" => routes::AUTHORS,
        "categories" => routes::CATEGORIES,
        "publishers" => routes::PUBLISHERS,
        "bookLoans" => routes::BOOK_LOANS,
        "fines" => routes::FINES,
        "roles" => routes::SYSTEM_ROLES,
        "accounts" => routes::SYSTEM_ACCOUNTS,
        "staffs" => routes::SYSTEM_STAFFS,
        "client/books" => routes::CLIENT_BOOKS,
        "client/bookLoans" => routes::CLIENT_BOOK_LOANS,
        "client/bookRequests" => routes::CLIENT_BOOK_REQUESTS,
        "client/fines" => routes::CLIENT_FINES,
        _ => return None,
    })
}

/// Build the page configured for a route, if the route has one.
pub async fn build_page(ctx: &PageContext, route: &str) -> AppResult<Option<CrudPage>> {
    let page = match route {
        routes::BOOKS => Some(books::page(ctx).await?),
        routes::AUTHORS => Some(authors::page(ctx)),
        routes::CATEGORIES => Some(categories::page(ctx)),
        routes::PUBLISHERS => Some(publishers::page(ctx)),
        routes::BOOK_LOANS => Some(circulation::book_loans_page(ctx).await?),
        routes::FINES => Some(circulation::fines_page(ctx)),
        routes::SYSTEM_ROLES => Some(system::roles_page(ctx)),
        routes::SYSTEM_ACCOUNTS => Some(system::accounts_page(ctx)),
        routes::SYSTEM_STAFFS => Some(system::staffs_page(ctx).await?),
        routes::CLIENT_BOOKS => Some(client::books_page(ctx).await?),
        routes::CLIENT_BOOK_LOANS => Some(client::book_loans_page(ctx)),
        routes::CLIENT_BOOK_REQUESTS => Some(client::book_requests_page(ctx).await?),
        routes::CLIENT_FINES => Some(client::fines_page(ctx)),
        _ => None,
    };
    Ok(page)
}
