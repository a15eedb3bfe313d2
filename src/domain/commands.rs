use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterLoan {
    pub isbn: String,
    pub customer: String,
    pub loan_date: NaiveDate,
}

impl RegisterLoan {
    /// 今日（UTC）を貸出日としたコマンドを作成する
    pub fn today(isbn: impl Into<String>, customer: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            customer: customer.into(),
            loan_date: Utc::now().date_naive(),
        }
    }
}
