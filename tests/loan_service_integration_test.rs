use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use lending_library::adapters::memory::InMemoryLoanRepository;
use lending_library::application::catalog::{self, CatalogError};
use lending_library::application::loan::{LoanApplicationError, register_loan};
use lending_library::application::{Failure, ServiceDependencies};
use lending_library::domain::commands::RegisterLoan;
use lending_library::domain::*;
use lending_library::ports::{self, LoanRepository};
use std::sync::Arc;

mod common;

// ============================================================================
// テスト用モック
// ============================================================================

/// 未返却確認を素通りさせるLoanRepository
///
/// 同時貸出で事前確認をすり抜けた状況を再現する。
/// 保存は内側のインメモリ実装に任せるため、部分一意制約は効く。
struct RacingLoanRepository {
    inner: InMemoryLoanRepository,
}

#[async_trait]
impl LoanRepository for RacingLoanRepository {
    async fn save(&self, loan: Loan) -> ports::Result<Loan> {
        self.inner.save(loan).await
    }

    async fn has_unreturned_loan(&self, _book_id: BookId) -> ports::Result<bool> {
        Ok(false)
    }
}

async fn catalogue(deps: &ServiceDependencies, isbn: &str) -> Book {
    catalog::create_book(deps, Book::new("as aventuras", "renato", isbn))
        .await
        .unwrap()
}

// ============================================================================
// 正常系
// ============================================================================

#[tokio::test]
async fn test_register_loan_persists_unreturned_loan_dated_today() {
    let (deps, _, loans) = common::in_memory_deps();
    let book = catalogue(&deps, "123").await;

    let loan = register_loan(&deps, RegisterLoan::today("123", "fulano"))
        .await
        .unwrap();

    assert!(loan.id.is_some());
    assert_eq!(loan.customer, "fulano");
    assert_eq!(loan.book, book);
    assert_eq!(loan.loan_date, Utc::now().date_naive());
    assert!(!loan.returned);
    assert_eq!(loans.count().unwrap(), 1);
}

#[tokio::test]
async fn test_register_loan_uses_command_date() {
    let (deps, _, _) = common::in_memory_deps();
    catalogue(&deps, "123").await;
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

    let loan = register_loan(
        &deps,
        RegisterLoan {
            isbn: "123".to_string(),
            customer: "fulano".to_string(),
            loan_date: date,
        },
    )
    .await
    .unwrap();

    assert_eq!(loan.loan_date, date);
}

#[tokio::test]
async fn test_different_books_can_be_lent_at_the_same_time() {
    let (deps, _, loans) = common::in_memory_deps();
    catalogue(&deps, "123").await;
    catalogue(&deps, "456").await;

    register_loan(&deps, RegisterLoan::today("123", "fulano"))
        .await
        .unwrap();
    register_loan(&deps, RegisterLoan::today("456", "fulano"))
        .await
        .unwrap();

    assert_eq!(loans.count().unwrap(), 2);
}

// ============================================================================
// 異常系
// ============================================================================

#[tokio::test]
async fn test_register_loan_for_unknown_isbn_fails_without_writing() {
    let (deps, _, loans) = common::in_memory_deps();

    let err = register_loan(&deps, RegisterLoan::today("999", "fulano"))
        .await
        .unwrap_err();

    assert!(matches!(err, LoanApplicationError::BookNotFound));
    assert_eq!(
        err.failure(),
        Some(Failure::BusinessRule(
            "book not found for passed isbn".to_string()
        ))
    );
    assert_eq!(loans.count().unwrap(), 0);
}

#[tokio::test]
async fn test_register_loan_for_borrowed_book_fails() {
    let (deps, _, loans) = common::in_memory_deps();
    catalogue(&deps, "123").await;
    register_loan(&deps, RegisterLoan::today("123", "fulano"))
        .await
        .unwrap();

    let err = register_loan(&deps, RegisterLoan::today("123", "ciclano"))
        .await
        .unwrap_err();

    assert!(matches!(err, LoanApplicationError::BookAlreadyBorrowed));
    assert_eq!(
        err.failure(),
        Some(Failure::BusinessRule("book already borrowed".to_string()))
    );
    assert_eq!(loans.count().unwrap(), 1);
}

#[tokio::test]
async fn test_storage_constraint_backs_up_borrowed_check() {
    let (catalog_deps, _, _) = common::in_memory_deps();
    let racing = Arc::new(RacingLoanRepository {
        inner: InMemoryLoanRepository::new(),
    });
    let deps = ServiceDependencies {
        book_repository: catalog_deps.book_repository.clone(),
        loan_repository: racing.clone(),
    };
    catalogue(&deps, "123").await;

    register_loan(&deps, RegisterLoan::today("123", "fulano"))
        .await
        .unwrap();
    let err = register_loan(&deps, RegisterLoan::today("123", "ciclano"))
        .await
        .unwrap_err();

    assert!(matches!(err, LoanApplicationError::BookAlreadyBorrowed));
    assert_eq!(racing.inner.count().unwrap(), 1);
}

#[tokio::test]
async fn test_register_loan_with_empty_isbn_is_a_precondition_violation() {
    let (deps, _, loans) = common::in_memory_deps();

    let err = register_loan(&deps, RegisterLoan::today("", "fulano"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LoanApplicationError::Catalog(CatalogError::InvalidArgument(_))
    ));
    assert_eq!(err.failure(), None);
    assert_eq!(loans.count().unwrap(), 0);
}
