//! Book handlers: gallery, detail, add-book form, cover upload.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{BookListResponse, BookSummaryDto, PaginationParams, UploadCoverResponse};
use crate::app_state::AppState;
use crate::domain::{Book, BookDraft, BookId};
use crate::error::{ErrorResponse, ManagerError};

/// Largest accepted cover upload.
pub const MAX_COVER_BYTES: usize = 10 * 1024 * 1024;

/// `GET /books` — Book gallery with pagination.
///
/// # Errors
///
/// Returns the store's error if the books cannot be fetched.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    tag = "Books",
    summary = "List books",
    description = "Returns a paginated list of book tiles for the gallery.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated book list", body = BookListResponse),
        (status = 500, description = "Books could not be fetched", body = ErrorResponse),
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ManagerError> {
    let books = state.library.list_books().await?;
    let (page, pagination) = params.paginate(books);
    let data = page.into_iter().map(BookSummaryDto::from).collect();
    Ok(Json(BookListResponse { data, pagination }))
}

/// `GET /books/:id` — Book detail.
///
/// # Errors
///
/// Returns [`ManagerError::BookNotFound`] if the book does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    tag = "Books",
    summary = "Get book details",
    description = "Returns the full record: summary, lessons, takeaways, notes and links.",
    params(
        ("id" = i64, Path, description = "Book identifier"),
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse),
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ManagerError> {
    let book = state.library.get_book(BookId::new(id)).await?;
    Ok(Json(book))
}

/// `POST /books` — Submit the add-book form.
///
/// # Errors
///
/// Returns a validation error for a missing title, summary or cover, or
/// the store's error if the insert fails.
#[utoipa::path(
    post,
    path = "/api/v1/books",
    tag = "Books",
    summary = "Add a book",
    description = "Validates the form (title, summary, cover) and inserts the book. List fields are comma-separated text.",
    request_body = BookDraft,
    responses(
        (status = 201, description = "Book added", body = Book),
        (status = 400, description = "Incomplete form", body = ErrorResponse),
        (status = 500, description = "Insert failed", body = ErrorResponse),
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(draft): Json<BookDraft>,
) -> Result<impl IntoResponse, ManagerError> {
    let book = state.library.submit(&draft).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// `POST /covers` — Upload a cover image.
///
/// # Errors
///
/// Returns [`ManagerError::InvalidRequest`] for an empty body, or the
/// storage error if the upload fails.
#[utoipa::path(
    post,
    path = "/api/v1/covers",
    tag = "Books",
    summary = "Upload a cover image",
    description = "Stores the raw image under `book_images/` and returns its download URL.",
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "Raw image bytes"),
    responses(
        (status = 201, description = "Image stored", body = UploadCoverResponse),
        (status = 400, description = "Empty upload", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse),
    )
)]
pub async fn upload_cover(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ManagerError> {
    let url = state.library.upload_cover(body.to_vec()).await?;
    Ok((StatusCode::CREATED, Json(UploadCoverResponse { url })))
}

/// Book routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/{id}", get(get_book))
        .route(
            "/covers",
            post(upload_cover).layer(DefaultBodyLimit::max(MAX_COVER_BYTES)),
        )
}
