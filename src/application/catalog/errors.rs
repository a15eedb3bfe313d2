use crate::application::failure::Failure;
use crate::ports::RepositoryError;
use thiserror::Error;

/// カタログ管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    /// isbnが既に登録されている
    #[error("isbn already registered")]
    DuplicateIsbn,

    /// 前提条件違反（呼び出し側のバグ。業務エラーではない）
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// BookRepositoryのエラー
    #[error("Book repository error")]
    RepositoryError(#[source] RepositoryError),
}

impl CatalogError {
    /// 境界へ伝える業務上の失敗に変換する
    ///
    /// 前提条件違反とストレージ障害は`None`（内部エラーとして扱う）。
    pub fn failure(&self) -> Option<Failure> {
        match self {
            CatalogError::DuplicateIsbn => Some(Failure::business_rule(self.to_string())),
            CatalogError::InvalidArgument(_) | CatalogError::RepositoryError(_) => None,
        }
    }
}

/// カタログ管理アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, CatalogError>;
