//! 書籍検索API連携

use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::FetchError;
use crate::models::VolumesResponse;

/// 書籍検索APIのクライアント
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// `GET <api-base>/volumes?q=<query>` を1回だけ実行
    async fn get_volumes(&self, query: &str) -> Result<VolumesResponse, FetchError>;
}

/// リクエストURLを組み立て（クエリはURLエンコード）
pub fn volumes_url(api_base: &str, query: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(&format!("{}/volumes", api_base.trim_end_matches('/')))
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    url.query_pairs_mut().append_pair("q", query);
    Ok(url)
}

/// Retry-Afterヘッダー（秒）を解釈。HTTP-date形式などは None
pub fn parse_retry_after(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse::<u32>().ok())
}

/// Google Books API
pub struct GoogleBooksApi {
    api_base: String,
}

impl GoogleBooksApi {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self { api_base: api_base.into() }
    }
}

impl CatalogApi for GoogleBooksApi {
    async fn get_volumes(&self, query: &str) -> Result<VolumesResponse, FetchError> {
        let url = volumes_url(&self.api_base, query)?;

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(url.as_str(), &opts)
            .map_err(|e| FetchError::Network(format!("Request作成失敗: {:?}", e)))?;

        let window = web_sys::window().ok_or(FetchError::NoWindow)?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| FetchError::Network(format!("fetch失敗: {:?}", e)))?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| FetchError::Network("Responseへの変換失敗".to_string()))?;

        if resp.status() == 429 {
            // クロスオリジンではAccess-Control-Expose-Headersがないと読めない
            let retry_after = resp.headers().get("retry-after").ok().flatten();
            return Err(FetchError::RateLimited {
                retry_after_secs: parse_retry_after(retry_after.as_deref()),
            });
        }

        if !resp.ok() {
            return Err(FetchError::Http { status: resp.status() });
        }

        let json = JsFuture::from(
            resp.json()
                .map_err(|e| FetchError::Parse(format!("json()失敗: {:?}", e)))?,
        )
        .await
        .map_err(|e| FetchError::Parse(format!("JSON取得失敗: {:?}", e)))?;

        serde_wasm_bindgen::from_value(json).map_err(|e| FetchError::Parse(e.to_string()))
    }
}
