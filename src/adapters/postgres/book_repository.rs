use crate::domain::{Book, BookFilter, BookId, Page, PageRequest};
use crate::ports::book_repository::BookRepository as BookRepositoryTrait;
use crate::ports::error::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};

/// PostgreSQLの行データをBookに変換する
fn map_row_to_book(row: &PgRow) -> Book {
    Book {
        id: Some(BookId::from_uuid(row.get("id"))),
        title: row.get("title"),
        author: row.get("author"),
        isbn: row.get("isbn"),
    }
}

/// 部分一致用のLIKEパターンを作る
///
/// 入力中の`%`、`_`、`\`はワイルドカードではなく文字として扱う。
fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// 例示検索の条件をWHERE句として追加する
///
/// テキスト項目はILIKEによる大文字小文字を区別しない部分一致、IDは完全一致。
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    builder.push(" WHERE 1=1");

    if let Some(id) = filter.id {
        builder.push(" AND id = ").push_bind(id.value());
    }

    for (field, value) in filter.text_criteria() {
        builder
            .push(" AND ")
            .push(field.column())
            .push(" ILIKE ")
            .push_bind(contains_pattern(value))
            .push(" ESCAPE '\\'");
    }
}

/// 1ページ分の取得クエリを組み立てる
///
/// タイトルはバイト順（`COLLATE "C"`）で並べ、同じタイトルはIDで並べる。
/// データベースの照合順序に依存せず、インメモリ実装と同じ順序になる。
fn build_page_query<'a>(filter: &'a BookFilter, page: PageRequest) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT id, title, author, isbn FROM books");
    push_filter(&mut builder, filter);
    builder
        .push(" ORDER BY title COLLATE \"C\", id LIMIT ")
        .push_bind(page.limit() as i64)
        .push(" OFFSET ")
        .push_bind(page.offset() as i64);
    builder
}

/// BookRepositoryのPostgreSQL実装
///
/// isbnの一意性は`books_isbn_key`制約が保証する。
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// PostgreSQLコネクションプールから新しいBookRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    /// 書籍を保存（upsert）
    ///
    /// IDが未設定ならデータベースが採番する。
    async fn save(&self, book: Book) -> Result<Book> {
        let row = sqlx::query(
            r#"
            INSERT INTO books (id, title, author, isbn)
            VALUES (COALESCE($1, gen_random_uuid()), $2, $3, $4)
            ON CONFLICT (id)
            DO UPDATE SET
                title = EXCLUDED.title,
                author = EXCLUDED.author,
                isbn = EXCLUDED.isbn
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(book.id.map(|id| id.value()))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_row_to_book(&row))
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, isbn
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, isbn
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn exists_by_isbn(&self, isbn: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// 例示検索（ページ分割）
    ///
    /// 件数取得とページ取得は同じ条件で並行に実行する。
    async fn find_all(&self, filter: &BookFilter, page: PageRequest) -> Result<Page<Book>> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        push_filter(&mut count_query, filter);

        let mut page_query = build_page_query(filter, page);

        let (total, rows) = futures::try_join!(
            count_query
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool),
            page_query.build().fetch_all(&self.pool),
        )?;

        let content = rows.iter().map(map_row_to_book).collect();

        Ok(Page::new(content, page, total.max(0) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_with_wildcards() {
        assert_eq!(contains_pattern("aven"), "%aven%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn test_contains_pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_page_query_orders_by_title_bytes_then_id() {
        let filter = BookFilter::default();

        let builder = build_page_query(&filter, PageRequest::new(2, 10));

        assert_eq!(
            builder.sql(),
            "SELECT id, title, author, isbn FROM books WHERE 1=1 ORDER BY title COLLATE \"C\", id LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_push_filter_builds_ilike_clauses_in_field_order() {
        let filter = BookFilter::from_example(&Book::new("aven", "", "12"));
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");

        push_filter(&mut builder, &filter);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM books WHERE 1=1 AND title ILIKE $1 ESCAPE '\\' AND isbn ILIKE $2 ESCAPE '\\'"
        );
    }
}
