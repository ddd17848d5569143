//! アプリ設定
//!
//! 検索APIのベースURLは `?api=xxx` で上書きでき、LocalStorageに保存される。
//! リトライ回数と通知の表示時間は固定値。

use wasm_bindgen::JsValue;

use crate::search::retry::RetryPolicy;
use crate::utils::cache::KeyValueStore;
use crate::utils::log_trace::{log_info, log_warn};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/books/v1";
const API_BASE_KEY: &str = "book_xplorer_api_base";

/// 通知・バリデーションメッセージの表示時間
pub const NOTICE_DISPLAY_MS: u32 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub retry: RetryPolicy,
    pub notice_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            retry: RetryPolicy::default(),
            notice_ms: NOTICE_DISPLAY_MS,
        }
    }
}

impl AppConfig {
    /// 設定を読み込む。URLパラメータ > 保存済みの値 > 既定値
    ///
    /// `?api=` （空）で保存済みの値を消して既定値に戻す
    pub fn load(store: &impl KeyValueStore, url_search: Option<&str>) -> Self {
        match url_search.and_then(api_param) {
            Some(value) if value.is_empty() => {
                let _ = store.remove(API_BASE_KEY);
                log_info("config", "API URLを既定値に戻しました");
            }
            Some(value) if is_http_url(&value) => {
                if let Err(e) = store.set(API_BASE_KEY, &value) {
                    log_warn("config", &format!("API URLの保存に失敗: {}", e));
                }
                log_info("config", &format!("API URLを上書き: {}", value));
            }
            Some(value) => log_warn("config", &format!("API URLを無視: {}", value)),
            None => {}
        }

        let api_base = store
            .get(API_BASE_KEY)
            .filter(|url| is_http_url(url))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self { api_base, ..Default::default() }
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

/// `?api=xxx` の値を取り出す
pub fn api_param(search: &str) -> Option<String> {
    url::form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "api")
        .map(|(_, value)| value.trim().to_string())
}

/// 現在のURLのクエリ文字列
pub fn current_url_search() -> Option<String> {
    web_sys::window()?.location().search().ok()
}

/// 読み込み済みの `?api=` をアドレスバーから取り除く
pub fn strip_api_param_from_location() -> Option<()> {
    let window = web_sys::window()?;
    let search = window.location().search().ok()?;
    api_param(&search)?;
    let pathname = window.location().pathname().ok()?;
    let hash = window.location().hash().ok().unwrap_or_default();
    window
        .history()
        .ok()?
        .replace_state_with_url(&JsValue::NULL, "", Some(&format!("{}{}", pathname, hash)))
        .ok()
}
