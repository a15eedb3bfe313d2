use thiserror::Error;

/// 貸出作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LendBookError {
    /// 未登録（IDなし）の書籍は貸し出せない
    #[error("book has no identifier; only catalogued books can be lent")]
    BookNotPersisted,
}
