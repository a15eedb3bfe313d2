use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use crate::ports::book_repository::BookRepository as BookRepositoryTrait;
use crate::ports::error::{BOOK_ISBN_UNIQUE, RepositoryError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// BookRepositoryのインメモリ実装
///
/// 書籍をIDをキーにしたマップで保持する。isbnの一意性は書き込みと
/// 同じロックの中で確認するため、同時に呼ばれても崩れない。
pub struct BookRepository {
    books: Mutex<HashMap<BookId, Book>>,
}

impl BookRepository {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashMap::new()),
        }
    }

    fn books(&self) -> Result<MutexGuard<'_, HashMap<BookId, Book>>> {
        self.books
            .lock()
            .map_err(|_| RepositoryError::backend("book store lock poisoned"))
    }
}

impl Default for BookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    /// 新規なら採番して追加、IDがあれば置き換える
    async fn save(&self, book: Book) -> Result<Book> {
        let mut books = self.books()?;
        let id = book.id.unwrap_or_else(BookId::new);

        let isbn_taken = books
            .values()
            .any(|existing| existing.isbn == book.isbn && existing.id != Some(id));
        if isbn_taken {
            return Err(RepositoryError::UniqueViolation(BOOK_ISBN_UNIQUE.to_string()));
        }

        let stored = book.with_id(id);
        books.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        Ok(self.books()?.get(&id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self.books()?.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        Ok(self.books()?.values().any(|b| b.isbn == isbn))
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        self.books()?.remove(&id);
        Ok(())
    }

    /// 例示検索の条件で絞り込み、タイトル（バイト順）とIDで並べる
    async fn find_all(&self, filter: &BookFilter, page: PageRequest) -> Result<Page<Book>> {
        let books = self.books()?;

        let mut matching: Vec<Book> = books
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.title
                .cmp(&b.title)
                .then_with(|| a.id.map(|id| id.value()).cmp(&b.id.map(|id| id.value())))
        });

        let total_elements = matching.len() as u64;
        let content = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(Page::new(content, page, total_elements))
    }
}
