use crate::application::{Failure, ServiceDependencies, catalog, loan};
use crate::domain::{Book, BookId, commands::RegisterLoan};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{
    error::ApiError,
    types::{
        BookResponse, CreateBookRequest, LoanCreatedResponse, PageResponse, RegisterLoanRequest,
        SearchBooksQuery, UpdateBookRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// IDで書籍を取得し、存在しなければ404にする
async fn find_existing_book(deps: &ServiceDependencies, id: Uuid) -> Result<Book, ApiError> {
    let book = catalog::get_book_by_id(deps, BookId::from_uuid(id))
        .await?
        .ok_or(Failure::NotFound)?;
    Ok(book)
}

// ============================================================================
// Book handlers
// ============================================================================

/// POST /api/books - 書籍を登録
///
/// 強制されるビジネスルール:
/// - title, author, isbnが空でないこと
/// - isbnが未登録であること
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let Json(req) = payload?;
    req.validate().map_err(Failure::from)?;

    let book = catalog::create_book(&state.service_deps, req.into_book()).await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// GET /api/books/:id - 書籍詳細を取得
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BookResponse>, ApiError> {
    let Path(id) = path?;
    let book = find_existing_book(&state.service_deps, id).await?;
    Ok(Json(BookResponse::from(book)))
}

/// PUT /api/books/:id - 書籍のタイトルと著者を更新
///
/// 存在確認をしてから書き込む（isbnは変更しない）。
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateBookRequest>, JsonRejection>,
) -> Result<Json<BookResponse>, ApiError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    req.validate().map_err(Failure::from)?;

    let existing = find_existing_book(&state.service_deps, id).await?;
    let updated = catalog::update_book(
        &state.service_deps,
        Book {
            title: req.title,
            author: req.author,
            ..existing
        },
    )
    .await?;

    Ok(Json(BookResponse::from(updated)))
}

/// DELETE /api/books/:id - 書籍を削除
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let existing = find_existing_book(&state.service_deps, id).await?;
    catalog::delete_book(&state.service_deps, &existing).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/books - 書籍を検索
///
/// クエリパラメータ:
/// - title, author, isbn: 部分一致（大文字小文字を区別しない）、省略時は条件なし
/// - page: ページ番号（0始まり）
/// - size: 1ページあたりの件数
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchBooksQuery>, QueryRejection>,
) -> Result<Json<PageResponse<BookResponse>>, ApiError> {
    let Query(query) = query?;
    let page =
        catalog::find_books(&state.service_deps, &query.example(), query.page_request()).await?;

    Ok(Json(PageResponse::from_page(page)))
}

// ============================================================================
// Loan handlers
// ============================================================================

/// POST /api/loans - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - isbn, customerが空でないこと
/// - isbnに一致する書籍が存在すること
/// - 書籍に未返却の貸出がないこと
pub async fn register_loan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterLoanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LoanCreatedResponse>), ApiError> {
    let Json(req) = payload?;
    req.validate().map_err(Failure::from)?;

    let cmd = RegisterLoan::today(req.isbn, req.customer);
    let loan = loan::register_loan(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(LoanCreatedResponse::from(loan))))
}
