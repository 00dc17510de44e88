//! Book catalog endpoints

use axum::{
    extract::{Host, OriginalUri, State},
    http::{StatusCode, Uri},
    Json,
};
use serde::Serialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::AppResult,
    models::{Book, BookRequest, BookSummary},
    AppState,
};

use super::{AppJson, AppPath, AppQuery};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PAGE_INDEX: usize = 0;

/// Paging parameters; absent or unparsable values fall back to the defaults
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListQuery {
    /// Books per page (default: 10)
    #[param(value_type = Option<u32>)]
    pub page_size: Option<String>,
    /// Zero-based page number (default: 0)
    #[param(value_type = Option<u32>)]
    pub page_index: Option<String>,
}

impl ListQuery {
    /// Build from raw query pairs; the first occurrence of a key wins
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = ListQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "pageSize" => &mut query.page_size,
                "pageIndex" => &mut query.page_index,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    fn paging(&self) -> (usize, usize) {
        let parse = |v: &Option<String>, default| {
            v.as_deref()
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(default)
        };
        (
            parse(&self.page_size, DEFAULT_PAGE_SIZE),
            parse(&self.page_index, DEFAULT_PAGE_INDEX),
        )
    }
}

/// Authority used in list links: Host header, then request URI, then configured address
fn link_authority(host: Option<Host>, uri: &Uri, config: &AppConfig) -> String {
    match (host, uri.authority()) {
        (Some(Host(host)), _) => host,
        (None, Some(authority)) => authority.to_string(),
        (None, None) => format!("{}:{}", config.server.host, config.server.port),
    }
}

/// Paginated list response
#[derive(Debug, Serialize, ToSchema)]
pub struct QueryResponse {
    pub books: Vec<BookSummary>,
    /// Total number of books in the catalog
    pub total_books: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_href: Option<String>,
}

/// List books with pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of books", body = QueryResponse),
        (status = 500, description = "Unexpected failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    host: Option<Host>,
    OriginalUri(uri): OriginalUri,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> AppResult<Json<QueryResponse>> {
    let (page_size, page_index) = ListQuery::from_pairs(pairs).paging();
    let library = state.services.catalog.list_books(page_size, page_index)?;

    let authority = link_authority(host, &uri, &state.config);
    let base = format!("http://{}{}", authority, uri.path());
    let page_link = |page: usize| format!("{}?pageSize={}&pageIndex={}", base, page_size, page);

    let next_href = match page_index.checked_add(1).and_then(|p| p.checked_mul(page_size)) {
        Some(seen) if page_size > 0 && seen < library.total_books => Some(page_link(page_index + 1)),
        _ => None,
    };
    let prev_href = (page_index > 0).then(|| page_link(page_index - 1));

    let books = library
        .books
        .into_iter()
        .map(|book| BookSummary {
            href: format!("{}/{}", base, book.id),
            title: book.title,
        })
        .collect();

    Ok(Json(QueryResponse {
        books,
        total_books: library.total_books,
        next_href,
        prev_href,
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 400, description = "Unparsable identifier", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id)?;
    Ok(Json(book))
}

/// Create a book; an existing ID is overwritten
#[utoipa::path(
    put,
    path = "/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book stored", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AppJson(request): AppJson<BookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.catalog.create_book(request)?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update an existing book identified by the body's `id`
#[utoipa::path(
    patch,
    path = "/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AppJson(request): AppJson<BookRequest>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.update_book(request)?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Unparsable identifier", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id)?;
    Ok(StatusCode::NO_CONTENT)
}
