use serde::{Deserialize, Serialize};

use super::BookId;

/// Book集約 - カタログに登録された1冊の書籍
///
/// 不変条件：isbnはカタログ内で一意（自然キー）。
/// `id`はストレージが採番するため、登録前の候補では`None`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl Book {
    /// 未登録の書籍候補を作成する
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }

    /// ストレージが採番したIDを付与する
    pub fn with_id(self, id: BookId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }
}

/// 例示検索（query-by-example）で照合するテキスト項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Isbn,
}

impl BookField {
    /// 永続化層でのカラム名
    pub fn column(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Isbn => "isbn",
        }
    }

    /// 書籍から該当項目の値を取り出す
    pub fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            BookField::Title => &book.title,
            BookField::Author => &book.author,
            BookField::Isbn => &book.isbn,
        }
    }
}

/// 書籍の検索条件（例示検索の述語）
///
/// 値が設定された項目だけが条件になる。空文字と`None`はワイルドカード。
/// テキスト項目は大文字小文字を区別しない部分一致、IDは完全一致で照合する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub id: Option<BookId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookFilter {
    /// 部分的に値の入った書籍（例示）から検索条件を組み立てる
    pub fn from_example(example: &Book) -> Self {
        Self {
            id: example.id,
            title: non_empty(&example.title),
            author: non_empty(&example.author),
            isbn: non_empty(&example.isbn),
        }
    }

    /// 値が設定されたテキスト条件を宣言順に列挙する
    pub fn text_criteria(&self) -> impl Iterator<Item = (BookField, &str)> {
        [
            (BookField::Title, self.title.as_deref()),
            (BookField::Author, self.author.as_deref()),
            (BookField::Isbn, self.isbn.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| match value {
            Some(v) if !v.is_empty() => Some((field, v)),
            _ => None,
        })
    }

    /// 条件が1つもない（全件に一致する）か
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.text_criteria().next().is_none()
    }

    /// 書籍がすべての条件を満たすか
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(id) = self.id {
            if book.id != Some(id) {
                return false;
            }
        }

        self.text_criteria()
            .all(|(field, needle)| contains_ignore_case(field.value_of(book), needle))
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(title: &str, author: &str, isbn: &str) -> Book {
        Book::new(title, author, isbn).with_id(BookId::new())
    }

    #[test]
    fn test_book_new_has_no_id() {
        let book = Book::new("as aventuras", "renato", "123");
        assert!(book.id.is_none());
        assert_eq!(book.isbn, "123");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = BookFilter::from_example(&Book::default());
        assert!(filter.is_empty());
        assert!(filter.matches(&stored("as aventuras", "renato", "123")));
        assert!(filter.matches(&stored("", "", "")));
    }

    #[test]
    fn test_title_filter_is_case_insensitive_substring() {
        let filter = BookFilter {
            title: Some("aven".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&stored("as aventuras", "renato", "123")));
        assert!(filter.matches(&stored("AS AVENTURAS", "renato", "124")));
        assert!(filter.matches(&stored("Havens", "someone", "125")));
        assert!(!filter.matches(&stored("o cortiço", "aluísio", "126")));
    }

    #[test]
    fn test_all_populated_fields_must_match() {
        let filter = BookFilter::from_example(&Book::new("aven", "ren", ""));
        let book = stored("as aventuras", "renato", "123");
        let other_author = stored("as aventuras", "machado", "124");

        assert!(filter.matches(&book));
        assert!(!filter.matches(&other_author));
    }

    #[test]
    fn test_from_example_skips_empty_fields() {
        let filter = BookFilter::from_example(&Book::new("", "renato", ""));
        let criteria: Vec<_> = filter.text_criteria().collect();
        assert_eq!(criteria, vec![(BookField::Author, "renato")]);
    }

    #[test]
    fn test_id_criterion_is_exact_match() {
        let book = stored("as aventuras", "renato", "123");
        let filter = BookFilter {
            id: book.id,
            ..Default::default()
        };
        let other = stored("as aventuras", "renato", "123");

        assert!(!filter.is_empty());
        assert!(filter.matches(&book));
        assert!(!filter.matches(&other));
    }

    #[test]
    fn test_explicit_empty_string_is_wildcard() {
        let filter = BookFilter {
            isbn: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert!(filter.matches(&stored("x", "y", "z")));
    }
}
