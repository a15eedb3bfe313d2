use thiserror::Error;

/// `books.isbn`の一意制約名
pub const BOOK_ISBN_UNIQUE: &str = "books_isbn_key";

/// 「1冊につき未返却の貸出は1件まで」を保証する部分一意インデックス名
pub const LOAN_UNRETURNED_BOOK_UNIQUE: &str = "loans_unreturned_book_key";

/// ストレージポート共通のエラー
///
/// 一意制約違反だけは業務エラーへ変換できるよう区別し、
/// それ以外はバックエンド固有のエラーとして不透明に扱う。
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 一意制約違反（制約名を保持）
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// バックエンドのエラー（接続断、SQLエラーなど）
    #[error("storage backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        RepositoryError::Backend(err.into())
    }

    /// 指定した制約の違反か
    pub fn violates(&self, constraint: &str) -> bool {
        matches!(self, RepositoryError::UniqueViolation(name) if name == constraint)
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
