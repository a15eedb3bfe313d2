use crate::domain::{BookId, Loan, LoanId};
use crate::ports::error::{LOAN_UNRETURNED_BOOK_UNIQUE, RepositoryError, Result};
use crate::ports::loan_repository::LoanRepository as LoanRepositoryTrait;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// LoanRepositoryのインメモリ実装
///
/// 同じ書籍への2件目の未返却貸出は拒否する
/// （PostgreSQLの部分一意インデックスと同じ制約）。
pub struct LoanRepository {
    loans: Mutex<HashMap<LoanId, Loan>>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(HashMap::new()),
        }
    }

    /// 保存されている貸出の件数
    pub fn count(&self) -> Result<usize> {
        Ok(self.loans()?.len())
    }

    fn loans(&self) -> Result<MutexGuard<'_, HashMap<LoanId, Loan>>> {
        self.loans
            .lock()
            .map_err(|_| RepositoryError::backend("loan store lock poisoned"))
    }
}

impl Default for LoanRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn is_unreturned_for(loan: &Loan, book_id: BookId) -> bool {
    loan.is_active() && loan.book_id() == Some(book_id)
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn save(&self, loan: Loan) -> Result<Loan> {
        let mut loans = self.loans()?;
        let id = loan.id.unwrap_or_else(LoanId::new);

        if let Some(book_id) = loan.book_id() {
            let conflict = loan.is_active()
                && loans
                    .values()
                    .any(|existing| existing.id != Some(id) && is_unreturned_for(existing, book_id));
            if conflict {
                return Err(RepositoryError::UniqueViolation(
                    LOAN_UNRETURNED_BOOK_UNIQUE.to_string(),
                ));
            }
        }

        let stored = loan.with_id(id);
        loans.insert(id, stored.clone());
        Ok(stored)
    }

    async fn has_unreturned_loan(&self, book_id: BookId) -> Result<bool> {
        Ok(self
            .loans()?
            .values()
            .any(|loan| is_unreturned_for(loan, book_id)))
    }
}
