//! 設定モジュール
//!
//! 環境変数（と`.env`ファイル）から読み込む。すべての項目に既定値がある。
//!
//! | 環境変数 | 項目 | 既定値 |
//! |---|---|---|
//! | `DATABASE_URL` | PostgreSQLの接続URL | `postgres://localhost/library` |
//! | `DATABASE_MAX_CONNECTIONS` | コネクションプールの最大数 | `5` |
//! | `PORT` | HTTPの待ち受けポート | `3000` |
//! | `STORAGE` | `postgres` または `memory` | `postgres` |

use serde::Deserialize;
use thiserror::Error;

/// `RUST_LOG`が未設定のときのtracingフィルタ
pub const DEFAULT_LOG_FILTER: &str = "lending_library=debug,tower_http=debug";

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/library";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORAGE: &str = "postgres";

/// ストレージの選択
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// sqlxによるPostgreSQL（既定）
    #[serde(alias = "postgresql")]
    Postgres,
    /// プロセス内のマップ。再起動でデータは消える
    Memory,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// アプリケーション設定
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(rename = "database_max_connections")]
    pub max_connections: u32,
    pub port: u16,
    pub storage: StorageBackend,
}

impl AppConfig {
    /// プロセスの環境変数から読み込む
    ///
    /// カレントディレクトリに`.env`があれば先に読み込む。
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load(::config::Environment::default())
    }

    /// 与えられた変数の組から読み込む（プロセスの環境変数は見ない）
    pub fn from_source<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source: ::config::Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::load(::config::Environment::default().source(Some(source)))
    }

    fn load(environment: ::config::Environment) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("database_max_connections", DEFAULT_MAX_CONNECTIONS)?
            .set_default("port", DEFAULT_PORT)?
            .set_default("storage", DEFAULT_STORAGE)?
            // 環境変数名は小文字にしてそのままキーになる（DATABASE_URL → database_url）
            .add_source(environment.try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_source(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/library");
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_values_are_read_from_environment_names() {
        let config = AppConfig::from_source([
            ("DATABASE_URL", "postgres://db/catalog"),
            ("PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("STORAGE", "memory"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "postgres://db/catalog");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn test_postgresql_is_accepted_as_storage_alias() {
        let config = AppConfig::from_source([("STORAGE", "postgresql")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Postgres);
    }

    #[test]
    fn test_unrelated_variables_are_ignored() {
        let config = AppConfig::from_source([("HOME", "/root"), ("PORT", "4000")]).unwrap();
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = AppConfig::from_source([("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_unknown_storage_backend_is_rejected() {
        let err = AppConfig::from_source([("STORAGE", "redis")]).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
