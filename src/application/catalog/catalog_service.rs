use crate::application::ServiceDependencies;
use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use crate::ports::{BOOK_ISBN_UNIQUE, RepositoryError};

use super::errors::{CatalogError, Result};

/// 保存時のストレージエラーを変換する
///
/// isbnの一意制約違反は業務エラー（DuplicateIsbn）として扱う。
fn map_save_error(err: RepositoryError) -> CatalogError {
    if err.violates(BOOK_ISBN_UNIQUE) {
        CatalogError::DuplicateIsbn
    } else {
        CatalogError::RepositoryError(err)
    }
}

/// 書籍を登録する
///
/// ビジネスルール：
/// - isbnがカタログ内で一意であること
/// - IDはストレージが採番する（候補に付いていても無視する）
///
/// # 並行性
///
/// 存在確認と書き込みは別々のストレージ呼び出しであり、アトミックではない。
/// 同じisbnでの同時登録は両方とも事前確認を通過しうる。
/// 一意性を最終的に保証するのはストレージの一意制約（`books_isbn_key`）であり、
/// ここでの事前確認は通常時にわかりやすい業務エラーを返すためのもの。
/// 制約違反が返った場合も同じ`DuplicateIsbn`に変換する。
pub async fn create_book(deps: &ServiceDependencies, candidate: Book) -> Result<Book> {
    // 1. isbnの重複確認
    let exists = deps
        .book_repository
        .exists_by_isbn(&candidate.isbn)
        .await
        .map_err(CatalogError::RepositoryError)?;

    if exists {
        tracing::info!(isbn = %candidate.isbn, "rejected book with duplicate isbn");
        return Err(CatalogError::DuplicateIsbn);
    }

    // 2. 保存（IDはストレージが採番）
    let saved = deps
        .book_repository
        .save(Book {
            id: None,
            ..candidate
        })
        .await
        .map_err(map_save_error)?;

    tracing::debug!(book_id = ?saved.id, isbn = %saved.isbn, "book registered");

    Ok(saved)
}

/// IDで書籍を取得する
///
/// 見つからないことはエラーではない。`None`を「存在しない」に
/// 変換するのは呼び出し側の責務。
pub async fn get_book_by_id(deps: &ServiceDependencies, id: BookId) -> Result<Option<Book>> {
    deps.book_repository
        .find_by_id(id)
        .await
        .map_err(CatalogError::RepositoryError)
}

/// 書籍を更新する
///
/// IDが必須。存在確認は呼び出し側が事前に行う（読み取り→書き込み）。
pub async fn update_book(deps: &ServiceDependencies, book: Book) -> Result<Book> {
    if book.id.is_none() {
        return Err(CatalogError::InvalidArgument("book id must not be null"));
    }

    deps.book_repository
        .save(book)
        .await
        .map_err(map_save_error)
}

/// 書籍を削除する
///
/// IDが必須。存在確認は呼び出し側が事前に行う。
pub async fn delete_book(deps: &ServiceDependencies, book: &Book) -> Result<()> {
    let id = book
        .id
        .ok_or(CatalogError::InvalidArgument("book id must not be null"))?;

    deps.book_repository
        .delete(id)
        .await
        .map_err(CatalogError::RepositoryError)?;

    tracing::debug!(book_id = %id, "book deleted");

    Ok(())
}

/// 例示検索で書籍をページ単位で取得する
///
/// 例示の書籍で値が入っている項目だけが条件になる：
/// - テキスト項目は大文字小文字を区別しない部分一致
/// - IDは完全一致
/// - 空の項目は条件にしない（空の例示は全件に一致）
pub async fn find_books(
    deps: &ServiceDependencies,
    example: &Book,
    page: PageRequest,
) -> Result<Page<Book>> {
    let filter = BookFilter::from_example(example);

    deps.book_repository
        .find_all(&filter, page)
        .await
        .map_err(CatalogError::RepositoryError)
}

/// isbnで書籍を取得する
///
/// isbnが空の場合は前提条件違反。
pub async fn get_book_by_isbn(deps: &ServiceDependencies, isbn: &str) -> Result<Option<Book>> {
    if isbn.is_empty() {
        return Err(CatalogError::InvalidArgument("isbn must not be empty"));
    }

    deps.book_repository
        .find_by_isbn(isbn)
        .await
        .map_err(CatalogError::RepositoryError)
}
