//! 境界へ伝える失敗の分類
//!
//! 業務上の失敗は3種類に限られ、すべて同じエラーエンベロープ
//! （`{ "messages": [...] }`）で表現される。
//! 前提条件違反やストレージ障害はここに含めない（不透明な内部エラー）。

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

/// 境界へ伝える業務上の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// 入力項目の検証エラー（不正な項目ごとに1メッセージ、項目名順）
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// 業務ルール違反（メッセージは常に1つ）
    #[error("{0}")]
    BusinessRule(String),

    /// 要求されたエンティティが存在しない（本文なし）
    #[error("not found")]
    NotFound,
}

impl Failure {
    pub fn business_rule(message: impl Into<String>) -> Self {
        Failure::BusinessRule(message.into())
    }

    /// エンベロープに載せるメッセージ一覧
    pub fn messages(&self) -> Vec<String> {
        match self {
            Failure::Validation(messages) => messages.clone(),
            Failure::BusinessRule(message) => vec![message.clone()],
            Failure::NotFound => Vec::new(),
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            messages: self.messages(),
        }
    }
}

impl From<ValidationErrors> for Failure {
    fn from(errors: ValidationErrors) -> Self {
        let mut per_field: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let field = field.to_string();
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field, message)
            })
            .collect();

        // HashMapの順序は不定なので項目名で並べる
        per_field.sort();

        Failure::Validation(per_field.into_iter().map(|(_, message)| message).collect())
    }
}

/// エラーレスポンスの共通形
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub messages: Vec<String>,
}
