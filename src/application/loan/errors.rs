use crate::application::catalog::CatalogError;
use crate::application::failure::Failure;
use crate::domain::LendBookError;
use crate::ports::RepositoryError;
use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LoanApplicationError {
    /// isbnに一致する書籍がない
    #[error("book not found for passed isbn")]
    BookNotFound,

    /// 書籍に未返却の貸出がある
    #[error("book already borrowed")]
    BookAlreadyBorrowed,

    /// カタログ参照時のエラー
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// ドメイン層のエラー
    #[error("Domain error: {0}")]
    DomainError(#[from] LendBookError),

    /// LoanRepositoryのエラー
    #[error("Loan repository error")]
    RepositoryError(#[source] RepositoryError),
}

impl LoanApplicationError {
    /// 境界へ伝える業務上の失敗に変換する
    pub fn failure(&self) -> Option<Failure> {
        match self {
            LoanApplicationError::BookNotFound | LoanApplicationError::BookAlreadyBorrowed => {
                Some(Failure::business_rule(self.to_string()))
            }
            LoanApplicationError::Catalog(err) => err.failure(),
            LoanApplicationError::DomainError(_) | LoanApplicationError::RepositoryError(_) => {
                None
            }
        }
    }
}

/// 貸出管理アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanApplicationError>;
