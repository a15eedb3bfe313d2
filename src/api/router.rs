use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_book, delete_book, get_book, register_loan, search_books, update_book,
};

/// Creates the API router with all catalog and loan endpoints
///
/// Catalog:
/// - POST /api/books - Register a book
/// - GET /api/books - Search books (query-by-example, paginated)
/// - GET /api/books/:id - Get book details
/// - PUT /api/books/:id - Update title and author
/// - DELETE /api/books/:id - Delete a book
///
/// Loans:
/// - POST /api/loans - Lend a book by isbn
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Catalog endpoints
        .route("/api/books", post(create_book).get(search_books))
        .route(
            "/api/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        // Loan endpoints
        .route("/api/loans", post(register_loan))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
