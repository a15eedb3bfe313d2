use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Book, BookId, LendBookError, LoanId};

/// Loan集約 - 1人の利用者による1冊の書籍の1回の貸出
///
/// 書籍は参照するだけで所有しない（同一性はBookIdで判断）。
/// 作成後に変わりうるのは`returned`フラグのみ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: Option<LoanId>,
    pub customer: String,
    pub book: Book,
    pub loan_date: NaiveDate,
    pub returned: bool,
}

impl Loan {
    /// 参照している書籍のID
    pub fn book_id(&self) -> Option<BookId> {
        self.book.id
    }

    /// 貸出中（未返却）か
    pub fn is_active(&self) -> bool {
        !self.returned
    }

    /// ストレージが採番したIDを付与する
    pub fn with_id(self, id: LoanId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 貸出日は呼び出し側が渡す「今日」
/// - 返却フラグはfalse
/// - 登録済み（IDを持つ）書籍のみ貸出可能
///
/// 副作用なし。未保存のLoanを返す。
pub fn lend_book(
    book: Book,
    customer: impl Into<String>,
    today: NaiveDate,
) -> Result<Loan, LendBookError> {
    if book.id.is_none() {
        return Err(LendBookError::BookNotPersisted);
    }

    Ok(Loan {
        id: None,
        customer: customer.into(),
        book,
        loan_date: today,
        returned: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_lend_book_creates_unreturned_loan_dated_today() {
        let book = Book::new("as aventuras", "renato", "123").with_id(BookId::new());

        let loan = lend_book(book.clone(), "fulano", today()).unwrap();

        assert!(loan.id.is_none());
        assert_eq!(loan.customer, "fulano");
        assert_eq!(loan.book, book);
        assert_eq!(loan.book_id(), book.id);
        assert_eq!(loan.loan_date, today());
        assert!(!loan.returned);
        assert!(loan.is_active());
    }

    #[test]
    fn test_lend_book_rejects_unsaved_book() {
        let book = Book::new("as aventuras", "renato", "123");

        let result = lend_book(book, "fulano", today());

        assert_eq!(result.unwrap_err(), LendBookError::BookNotPersisted);
    }

    #[test]
    fn test_returned_loan_is_not_active() {
        let book = Book::new("as aventuras", "renato", "123").with_id(BookId::new());
        let mut loan = lend_book(book, "fulano", today()).unwrap();
        loan.returned = true;
        assert!(!loan.is_active());
    }
}
