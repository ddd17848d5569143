//! レート制限（HTTP 429）時のリトライ
//!
//! 待ち時間はRetry-Afterヘッダーを優先し、なければ現在のバックオフ値を使う。
//! 次のバックオフは実際に待った時間の2倍。回数は `max_attempts` で打ち切る。

use gloo::timers::future::TimeoutFuture;

use crate::error::{FetchError, SearchError};
use crate::models::VolumesResponse;
use crate::utils::api::CatalogApi;
use crate::utils::log_trace::{log_info_with_data, log_warn};

/// 待機処理（ブラウザではglooタイマー）
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, ms: u32);
}

pub struct TimerSleeper;

impl Sleeper for TimerSleeper {
    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// 初回を含めた試行回数
    pub max_attempts: u32,
    pub initial_backoff_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1000,
        }
    }
}

/// 検索APIを呼び、429の間だけ待ってやり直す
pub async fn fetch_with_retry<A, S>(
    api: &A,
    sleeper: &S,
    policy: &RetryPolicy,
    query: &str,
) -> Result<VolumesResponse, SearchError>
where
    A: CatalogApi,
    S: Sleeper,
{
    let mut backoff_ms = policy.initial_backoff_ms;
    let mut attempt = 1;

    loop {
        match api.get_volumes(query).await {
            Ok(resp) => return Ok(resp),
            Err(FetchError::RateLimited { retry_after_secs }) => {
                if attempt >= policy.max_attempts {
                    log_warn("search", &format!("429が続いたため中止: {}回", attempt));
                    return Err(SearchError::RateLimitExhausted { attempts: attempt });
                }

                let wait_ms = retry_after_secs
                    .map(|secs| secs.saturating_mul(1000))
                    .unwrap_or(backoff_ms);
                log_info_with_data(
                    "search",
                    "429のため再試行待ち",
                    serde_json::json!({ "attempt": attempt, "wait_ms": wait_ms }),
                );

                sleeper.sleep(wait_ms).await;
                backoff_ms = wait_ms.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
