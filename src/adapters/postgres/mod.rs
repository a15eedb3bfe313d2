pub mod book_repository;
pub mod loan_repository;

use crate::ports::RepositoryError;

// パブリックに型を再エクスポート
pub use book_repository::BookRepository as PostgresBookRepository;
pub use loan_repository::LoanRepository as PostgresLoanRepository;

/// sqlxのエラーをストレージポートのエラーに変換する
///
/// 一意制約違反は制約名付きで区別し、それ以外は不透明なバックエンドエラーとする。
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                if let Some(constraint) = db_err.constraint() {
                    return RepositoryError::UniqueViolation(constraint.to_string());
                }
            }
        }
        RepositoryError::backend(err)
    }
}
