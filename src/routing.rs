//! Application router configuration.

use axum::{
    Router,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use maud::html;
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    dashboard::{
        create_transaction_form_endpoint, delete_transaction_form_endpoint,
        edit_transaction_form_endpoint, get_dashboard_page,
    },
    endpoints,
    html::base,
    json_error,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, transaction_summary_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_SUMMARY_API,
            get(transaction_summary_endpoint),
        )
        .route(
            endpoints::TRANSACTION_API,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CREATE_TRANSACTION_FORM,
            post(create_transaction_form_endpoint),
        )
        .route(
            endpoints::TRANSACTION_FORM,
            put(edit_transaction_form_endpoint).delete(delete_transaction_form_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve a 404 response: JSON under `/api`, an HTML page everywhere else.
async fn get_404_not_found(uri: Uri) -> Response {
    if uri.path().starts_with("/api") {
        return json_error(StatusCode::NOT_FOUND, "Not Found");
    }

    let content = html! {
        h1 { "404" }
        p { "The page you are looking for does not exist." }
        a href=(endpoints::ROOT) { "Back to the dashboard" }
    };

    (StatusCode::NOT_FOUND, base("Not Found", &content)).into_response()
}
