use crate::application::{ServiceDependencies, catalog};
use crate::domain::{self, Loan, commands::RegisterLoan};
use crate::ports::LOAN_UNRETURNED_BOOK_UNIQUE;

use super::errors::{LoanApplicationError, Result};

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - isbnに一致する書籍がカタログに存在すること
/// - その書籍に未返却の貸出がないこと
/// - 貸出日はコマンドの日付、返却フラグはfalse
///
/// 書籍はカタログサービスのisbn検索で読み取るだけで、変更しない。
///
/// # 並行性
///
/// 未返却貸出の確認と保存はアトミックではない。同じ書籍への同時貸出は
/// ストレージの部分一意インデックス（`loans_unreturned_book_key`）が防ぎ、
/// その違反も`BookAlreadyBorrowed`に変換する。
///
/// # 戻り値
/// 成功時はIDが採番された貸出
pub async fn register_loan(deps: &ServiceDependencies, cmd: RegisterLoan) -> Result<Loan> {
    // 1. 書籍の存在確認
    let book = catalog::get_book_by_isbn(deps, &cmd.isbn)
        .await?
        .ok_or_else(|| {
            tracing::info!(isbn = %cmd.isbn, "rejected loan for unknown isbn");
            LoanApplicationError::BookNotFound
        })?;

    // 2. ドメイン層の純粋関数で貸出を組み立てる
    let loan = domain::loan::lend_book(book, cmd.customer, cmd.loan_date)?;

    // 3. 未返却の貸出がないか確認
    if let Some(book_id) = loan.book_id() {
        let borrowed = deps
            .loan_repository
            .has_unreturned_loan(book_id)
            .await
            .map_err(LoanApplicationError::RepositoryError)?;

        if borrowed {
            tracing::info!(book_id = %book_id, "rejected loan for book already borrowed");
            return Err(LoanApplicationError::BookAlreadyBorrowed);
        }
    }

    // 4. 保存
    let saved = deps.loan_repository.save(loan).await.map_err(|e| {
        if e.violates(LOAN_UNRETURNED_BOOK_UNIQUE) {
            LoanApplicationError::BookAlreadyBorrowed
        } else {
            LoanApplicationError::RepositoryError(e)
        }
    })?;

    tracing::debug!(loan_id = ?saved.id, isbn = %saved.book.isbn, "loan registered");

    Ok(saved)
}
