use crate::domain::{BookId, Loan};
use async_trait::async_trait;

use super::error::Result;

/// 貸出ストレージポート
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 貸出を保存し、IDを採番して返す
    ///
    /// 同じ書籍に未返却の貸出が既にある場合、ストレージは
    /// `RepositoryError::UniqueViolation(LOAN_UNRETURNED_BOOK_UNIQUE)`を返す。
    async fn save(&self, loan: Loan) -> Result<Loan>;

    /// 書籍に未返却の貸出があるか
    async fn has_unreturned_loan(&self, book_id: BookId) -> Result<bool>;
}
