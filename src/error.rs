//! エラー型

/// 入力チェックのエラー（通信もキャッシュも触らない）
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("You must type something!")]
    EmptyQuery,

    /// 検索中の再送信
    #[error("a search is already in progress")]
    InFlight,
}

/// 1回のAPIリクエストの失敗
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// HTTP 429。Retry-Afterヘッダー（秒）があれば保持
    #[error("rate limited (retry-after: {retry_after_secs:?})")]
    RateLimited { retry_after_secs: Option<u32> },

    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("window is not available")]
    NoWindow,
}

/// リトライを含めた検索全体の失敗
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("still rate limited after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// キャッシュ（LocalStorage）操作のエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CacheError {
    #[error("storage is not available")]
    Unavailable,

    #[error("serialize failed: {0}")]
    Serialize(String),

    #[error("storage error: {0}")]
    Storage(String),
}
