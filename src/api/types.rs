use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Book, Loan, Page, PageRequest, pagination::DEFAULT_PAGE_SIZE};

/// 書籍登録リクエスト（POST /api/books）
///
/// 項目が欠けている場合も空文字として受け取り、検証エラーにする。
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
}

impl CreateBookRequest {
    pub fn into_book(self) -> Book {
        Book::new(self.title, self.author, self.isbn)
    }
}

/// 書籍更新リクエスト（PUT /api/books/:id）
///
/// 変更できるのはタイトルと著者のみ。
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
}

/// 書籍検索のクエリパラメータ（GET /api/books）
///
/// 指定された項目だけが条件になる（部分一致・大文字小文字を区別しない）。
#[derive(Debug, Default, Deserialize)]
pub struct SearchBooksQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    /// ページ番号（0始まり）
    pub page: Option<u32>,
    /// 1ページあたりの件数
    pub size: Option<u32>,
}

impl SearchBooksQuery {
    /// 検索条件を例示の書籍として組み立てる
    pub fn example(&self) -> Book {
        Book::new(
            self.title.clone().unwrap_or_default(),
            self.author.clone().unwrap_or_default(),
            self.isbn.clone().unwrap_or_default(),
        )
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// 貸出登録リクエスト（POST /api/loans）
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterLoanRequest {
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "customer must not be empty"))]
    pub customer: String,
}

/// 書籍レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: Option<Uuid>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map(|id| id.value()),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
        }
    }
}

/// ページ分割レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PageResponse<T> {
    pub fn from_page<S>(page: Page<S>) -> Self
    where
        T: From<S>,
    {
        let total_pages = page.total_pages();
        let page = page.map(T::from);
        Self {
            content: page.content,
            total_elements: page.total_elements,
            total_pages,
            page: page.page,
            page_size: page.page_size,
        }
    }
}

/// 貸出作成レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanCreatedResponse {
    pub loan_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
    pub customer: String,
    pub loan_date: NaiveDate,
    pub returned: bool,
}

impl From<Loan> for LoanCreatedResponse {
    fn from(loan: Loan) -> Self {
        Self {
            loan_id: loan.id.map(|id| id.value()),
            book_id: loan.book_id().map(|id| id.value()),
            customer: loan.customer,
            loan_date: loan.loan_date,
            returned: loan.returned,
        }
    }
}
