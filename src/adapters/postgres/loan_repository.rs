use crate::domain::{BookId, Loan, LoanId};
use crate::ports::error::{RepositoryError, Result};
use crate::ports::loan_repository::LoanRepository as LoanRepositoryTrait;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// LoanRepositoryのPostgreSQL実装
///
/// 1冊につき未返却の貸出は1件まで（`loans_unreturned_book_key`部分一意インデックス）。
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// PostgreSQLコネクションプールから新しいLoanRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    /// 貸出を保存（upsert）し、採番されたIDを付与して返す
    async fn save(&self, loan: Loan) -> Result<Loan> {
        let book_id = loan
            .book_id()
            .ok_or_else(|| RepositoryError::backend("loan references a book without id"))?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO loans (id, customer, book_id, loan_date, returned)
            VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4, $5)
            ON CONFLICT (id)
            DO UPDATE SET
                customer = EXCLUDED.customer,
                returned = EXCLUDED.returned
            RETURNING id
            "#,
        )
        .bind(loan.id.map(|id| id.value()))
        .bind(&loan.customer)
        .bind(book_id.value())
        .bind(loan.loan_date)
        .bind(loan.returned)
        .fetch_one(&self.pool)
        .await?;

        Ok(loan.with_id(LoanId::from_uuid(id)))
    }

    async fn has_unreturned_loan(&self, book_id: BookId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM loans WHERE book_id = $1 AND NOT returned)",
        )
        .bind(book_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
