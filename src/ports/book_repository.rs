use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use async_trait::async_trait;

use super::error::Result;

/// 書籍ストレージポート
///
/// IDをキーとした書籍の永続化を抽象化する。
/// isbnの一意性はストレージ側の制約で最終的に保証される
/// （違反時は`RepositoryError::UniqueViolation(BOOK_ISBN_UNIQUE)`）。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 書籍を保存する
    ///
    /// `id`が`None`なら新規登録してIDを採番し、
    /// `Some`ならそのIDのレコードを置き換える（upsert）。
    async fn save(&self, book: Book) -> Result<Book>;

    /// IDで書籍を取得する
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// isbnで書籍を取得する（完全一致）
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;

    /// isbnが登録済みか
    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool>;

    /// IDで書籍を削除する（存在しなくてもエラーにしない）
    async fn delete(&self, id: BookId) -> Result<()>;

    /// 検索条件に一致する書籍をページ単位で取得する
    ///
    /// 並び順はタイトル→IDで固定。`total_elements`は条件に一致した全件数。
    async fn find_all(&self, filter: &BookFilter, page: PageRequest) -> Result<Page<Book>>;
}
