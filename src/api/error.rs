use crate::application::{
    ErrorEnvelope, Failure, catalog::CatalogError, loan::LoanApplicationError,
};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API層のエラー型
///
/// 業務上の失敗（`Failure`）と、それ以外の内部エラーを区別する。
/// HTTPステータスへの対応はすべて`into_response`に集約する。
#[derive(Debug)]
pub enum ApiError {
    Failure(Failure),
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        ApiError::Failure(failure)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err.failure() {
            Some(failure) => ApiError::Failure(failure),
            None => ApiError::Internal(Box::new(err)),
        }
    }
}

impl From<LoanApplicationError> for ApiError {
    fn from(err: LoanApplicationError) -> Self {
        match err.failure() {
            Some(failure) => ApiError::Failure(failure),
            None => ApiError::Internal(Box::new(err)),
        }
    }
}

/// 不正なJSON本文も検証エラーとして同じエンベロープで返す
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Failure(Failure::Validation(vec![rejection.body_text()]))
    }
}

/// 不正なパスパラメータ（UUIDでないIDなど）
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Failure(Failure::Validation(vec![rejection.body_text()]))
    }
}

/// 不正なクエリ文字列（数値でないページ番号など）
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Failure(Failure::Validation(vec![rejection.body_text()]))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // 400 Bad Request - 入力検証エラー・ビジネスルール違反
            ApiError::Failure(
                ref failure @ (Failure::Validation(_) | Failure::BusinessRule(_)),
            ) => (StatusCode::BAD_REQUEST, Json(failure.envelope())).into_response(),

            // 404 Not Found - 本文なし
            ApiError::Failure(Failure::NotFound) => StatusCode::NOT_FOUND.into_response(),

            // 500 Internal Server Error - 前提条件違反・ストレージ障害
            // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "Internal error: {}", e);
                let body = ErrorEnvelope {
                    messages: vec!["An unexpected error occurred".to_string()],
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
