//! API handlers for the lib-api REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON body extractor that answers malformed input with an [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path extractor that answers unparsable identifiers with an [`AppError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query string extractor that answers malformed input with an [`AppError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("An error occurred while reading body: {}", rejection.body_text());
        AppError::BadRequest("Invalid Book: input format unparsable".to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!("An error occurred while parsing query: {}", rejection.body_text());
        AppError::BadRequest("Invalid query: input format unparsable".to_string())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!("An error occurred while parsing identifier: {}", rejection.body_text());
        AppError::BadRequest("Invalid Identifier: input format unparsable".to_string())
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Utility
        .route("/", get(health::version))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route(
            "/books",
            get(books::list_books)
                .put(books::create_book)
                .patch(books::update_book),
        )
        .route(
            "/books/:id",
            get(books::get_book).delete(books::delete_book),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
