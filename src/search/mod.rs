//! 書籍検索の状態管理
//!
//! 画面の状態（`SearchState`）と、API・待機・キャッシュを束ねる `SearchController`。
//! 検索中フラグは `SearchController::complete` で必ず下ろす。

pub mod retry;

use crate::error::{SearchError, ValidationError};
use crate::models::{BookResult, Notice, Toast, ToastKind};
use crate::utils::api::CatalogApi;
use crate::utils::cache::{KeyValueStore, SearchCache};
use crate::utils::log_trace::{log_error_with_data, log_info, log_info_with_data, log_warn};
use retry::{fetch_with_retry, RetryPolicy, Sleeper};

pub const NO_RESULTS_MESSAGE: &str = "No books found with this query";
pub const FETCH_ERROR_MESSAGE: &str = "An error occurred while fetching books";

// ============================================
// 検索結果
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<BookResult>),
    NoResults,
    Failed(SearchError),
}

/// 送信ごとに発行。clearや再送信の後に届いた結果を見分ける
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    generation: u64,
    pub query: String,
}

// ============================================
// 画面状態
// ============================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub books: Vec<BookResult>,
    pub loading: bool,
    pub error: Option<Notice>,
    pub toast: Option<Toast>,
    generation: u64,
    notice_seq: u64,
}

impl SearchState {
    pub fn update_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// 送信開始。空文字ならメッセージを出してErr
    pub fn begin_submit(&mut self) -> Result<SearchTicket, ValidationError> {
        if self.query.trim().is_empty() {
            let id = self.next_notice_id();
            self.error = Some(Notice {
                id,
                message: ValidationError::EmptyQuery.to_string(),
            });
            return Err(ValidationError::EmptyQuery);
        }
        if self.loading {
            return Err(ValidationError::InFlight);
        }

        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.toast = None;
        Ok(SearchTicket {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// 表示中の通知と同じidのときだけ消す
    pub fn dismiss_toast(&mut self, id: u64) {
        if self.toast.as_ref().is_some_and(|t| t.id == id) {
            self.toast = None;
        }
    }

    pub fn dismiss_error(&mut self, id: u64) {
        if self.error.as_ref().is_some_and(|n| n.id == id) {
            self.error = None;
        }
    }

    fn show_toast(&mut self, kind: ToastKind, message: &str) {
        let id = self.next_notice_id();
        self.toast = Some(Toast {
            id,
            kind,
            message: message.to_string(),
        });
    }

    fn next_notice_id(&mut self) -> u64 {
        self.notice_seq += 1;
        self.notice_seq
    }
}

// ============================================
// コントローラ
// ============================================

pub struct SearchController<A, S, K> {
    api: A,
    sleeper: S,
    cache: SearchCache<K>,
    policy: RetryPolicy,
}

impl<A, S, K> SearchController<A, S, K>
where
    A: CatalogApi,
    S: Sleeper,
    K: KeyValueStore,
{
    pub fn new(api: A, sleeper: S, store: K, policy: RetryPolicy) -> Self {
        Self {
            api,
            sleeper,
            cache: SearchCache::new(store),
            policy,
        }
    }

    /// 初期状態（前回の検索があれば復元）
    pub fn hydrate(&self) -> SearchState {
        match self.cache.load() {
            Some(cached) => {
                log_info("cache", &format!("前回の検索を復元: {} ({}件)", cached.query, cached.books.len()));
                SearchState {
                    query: cached.query,
                    books: cached.books,
                    ..Default::default()
                }
            }
            None => SearchState::default(),
        }
    }

    /// 検索を実行（状態とキャッシュには触らない）
    pub async fn search(&self, ticket: &SearchTicket) -> SearchOutcome {
        let query = ticket.query.trim();
        log_info("search", &format!("検索開始: {}", query));

        match fetch_with_retry(&self.api, &self.sleeper, &self.policy, query).await {
            Ok(resp) if resp.is_empty() => SearchOutcome::NoResults,
            Ok(resp) => SearchOutcome::Found(resp.into_books()),
            Err(e) => SearchOutcome::Failed(e),
        }
    }

    /// 結果を状態とキャッシュに反映。古いチケットの結果は捨てる
    pub fn complete(&self, state: &mut SearchState, ticket: &SearchTicket, outcome: SearchOutcome) -> bool {
        if !state.is_current(ticket) {
            log_info("search", &format!("古い検索結果を破棄: {}", ticket.query));
            return false;
        }

        state.loading = false;
        match outcome {
            SearchOutcome::Found(books) => {
                log_info_with_data(
                    "search",
                    "検索成功",
                    serde_json::json!({ "query": ticket.query, "count": books.len() }),
                );
                if let Err(e) = self.cache.save(&ticket.query, &books) {
                    log_warn("cache", &format!("キャッシュ保存失敗: {}", e));
                }
                state.books = books;
            }
            SearchOutcome::NoResults => {
                log_info("search", &format!("該当なし: {}", ticket.query));
                state.show_toast(ToastKind::Info, NO_RESULTS_MESSAGE);
            }
            SearchOutcome::Failed(e) => {
                log_error_with_data(
                    "search",
                    "検索失敗",
                    serde_json::json!({ "query": ticket.query, "error": e.to_string() }),
                );
                state.show_toast(ToastKind::Error, FETCH_ERROR_MESSAGE);
            }
        }
        true
    }

    /// 入力・結果・キャッシュをすべてクリア。実行中の検索は無効になる
    pub fn clear(&self, state: &mut SearchState) {
        state.query.clear();
        state.books.clear();
        state.loading = false;
        state.generation += 1;
        if let Err(e) = self.cache.clear() {
            log_warn("cache", &format!("キャッシュ削除失敗: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::retry::tests::{found, rate_limited, RecordingSleeper, ScriptedApi};
    use super::*;
    use crate::error::FetchError;
    use crate::models::VolumesResponse;
    use crate::utils::cache::MemoryStore;
    use futures::executor::block_on;
    use std::rc::Rc;

    type TestController<'a> = SearchController<&'a ScriptedApi, &'a RecordingSleeper, Rc<MemoryStore>>;

    fn controller<'a>(api: &'a ScriptedApi, sleeper: &'a RecordingSleeper, store: &Rc<MemoryStore>) -> TestController<'a> {
        SearchController::new(api, sleeper, store.clone(), RetryPolicy::default())
    }

    /// 画面の送信処理と同じ流れ
    fn submit(ctrl: &TestController<'_>, state: &mut SearchState) -> Result<(), ValidationError> {
        let ticket = state.begin_submit()?;
        assert!(state.loading);
        let outcome = block_on(ctrl.search(&ticket));
        ctrl.complete(state, &ticket, outcome);
        Ok(())
    }

    fn state_with_query(query: &str) -> SearchState {
        let mut state = SearchState::default();
        state.update_query(query);
        state
    }

    #[test]
    fn test_empty_query_issues_no_request() {
        let api = ScriptedApi::new(vec![]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        for query in ["", "   ", "\t\n"] {
            let mut state = state_with_query(query);
            assert_eq!(submit(&ctrl, &mut state), Err(ValidationError::EmptyQuery));
            assert_eq!(state.error.as_ref().map(|n| n.message.as_str()), Some("You must type something!"));
            assert!(!state.loading);
        }
        assert_eq!(api.calls.get(), 0);
    }

    #[test]
    fn test_validation_message_dismissed_by_id() {
        let mut state = SearchState::default();
        let _ = state.begin_submit();
        let first = state.error.clone().unwrap();
        let _ = state.begin_submit();
        let second = state.error.clone().unwrap();

        // 古いタイマーでは新しいメッセージを消さない
        state.dismiss_error(first.id);
        assert_eq!(state.error, Some(second.clone()));
        state.dismiss_error(second.id);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_success_displays_and_caches() {
        let api = ScriptedApi::new(vec![found(&["a", "b"])]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        let mut state = state_with_query("  dune ");
        submit(&ctrl, &mut state).unwrap();

        assert_eq!(api.calls.get(), 1);
        assert_eq!(*api.queries.borrow(), vec!["dune".to_string()]);
        assert!(!state.loading);
        assert_eq!(state.books.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(state.toast, None);

        // 再読み込みで同じ内容が復元される
        let reloaded = controller(&api, &sleeper, &store).hydrate();
        assert_eq!(reloaded.query, "  dune ");
        assert_eq!(reloaded.books, state.books);
        assert!(!reloaded.loading);
    }

    #[test]
    fn test_rate_limited_then_success() {
        let api = ScriptedApi::new(vec![rate_limited(Some(2)), found(&["a"])]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        let mut state = state_with_query("dune");
        submit(&ctrl, &mut state).unwrap();

        assert!(sleeper.waits.borrow().iter().all(|&w| w >= 2000));
        assert!(!state.loading);
        assert_eq!(state.books.len(), 1);
    }

    #[test]
    fn test_rate_limit_exhausted_keeps_previous_results() {
        let api = ScriptedApi::new(vec![
            found(&["old"]),
            rate_limited(None),
            rate_limited(None),
            rate_limited(None),
        ]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        let mut state = state_with_query("dune");
        submit(&ctrl, &mut state).unwrap();
        state.update_query("frank herbert");
        submit(&ctrl, &mut state).unwrap();

        assert_eq!(*sleeper.waits.borrow(), vec![1000, 2000]);
        assert!(!state.loading);
        assert_eq!(state.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
        assert_eq!(state.toast.as_ref().map(|t| t.message.as_str()), Some(FETCH_ERROR_MESSAGE));
        assert_eq!(state.books[0].id, "old");
        // キャッシュは前回成功した検索のまま
        assert_eq!(ctrl.hydrate().query, "dune");
    }

    #[test]
    fn test_no_results_preserves_list_and_cache() {
        let empty: Result<VolumesResponse, FetchError> = Ok(serde_json::from_str(r#"{"totalItems":0}"#).unwrap());
        let api = ScriptedApi::new(vec![found(&["a"]), empty]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        let mut state = state_with_query("dune");
        submit(&ctrl, &mut state).unwrap();
        state.update_query("zzzzqqq");
        submit(&ctrl, &mut state).unwrap();

        assert!(!state.loading);
        assert_eq!(state.books.len(), 1);
        assert_eq!(state.toast.as_ref().map(|t| t.kind), Some(ToastKind::Info));
        assert_eq!(state.toast.as_ref().map(|t| t.message.as_str()), Some(NO_RESULTS_MESSAGE));
        assert_eq!(ctrl.hydrate().query, "dune");
    }

    #[test]
    fn test_no_results_on_empty_state() {
        let empty: Result<VolumesResponse, FetchError> = Ok(serde_json::from_str(r#"{"totalItems":0}"#).unwrap());
        let api = ScriptedApi::new(vec![empty]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        let mut state = state_with_query("zzzzqqq");
        submit(&ctrl, &mut state).unwrap();
        assert!(state.books.is_empty());
        assert!(!state.loading);
        assert_eq!(ctrl.hydrate(), SearchState::default());
    }

    #[test]
    fn test_transport_error_clears_loading() {
        let api = ScriptedApi::new(vec![Err(FetchError::Network("offline".to_string()))]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        let mut state = state_with_query("dune");
        submit(&ctrl, &mut state).unwrap();
        assert!(!state.loading);
        assert_eq!(state.toast.as_ref().map(|t| t.kind), Some(ToastKind::Error));
        assert!(sleeper.waits.borrow().is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let api = ScriptedApi::new(vec![found(&["a"])]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        let mut state = state_with_query("dune");
        submit(&ctrl, &mut state).unwrap();
        ctrl.clear(&mut state);

        assert_eq!(state.query, "");
        assert!(state.books.is_empty());
        assert!(!store.contains("query"));
        assert!(!store.contains("books"));

        // 何度呼んでも同じ
        ctrl.clear(&mut state);
        assert_eq!(state.query, "");
        assert_eq!(ctrl.hydrate(), SearchState::default());
    }

    #[test]
    fn test_outcome_after_clear_is_discarded() {
        let api = ScriptedApi::new(vec![found(&["late"])]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        let mut state = state_with_query("dune");
        let ticket = state.begin_submit().unwrap();
        ctrl.clear(&mut state);
        let outcome = block_on(ctrl.search(&ticket));

        assert!(!ctrl.complete(&mut state, &ticket, outcome));
        assert!(state.books.is_empty());
        assert!(!store.contains("query"));
        assert!(!store.contains("books"));
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut state = state_with_query("dune");
        let ticket = state.begin_submit().unwrap();
        assert_eq!(state.begin_submit(), Err(ValidationError::InFlight));
        assert!(state.is_current(&ticket));
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_toast_dismissed_by_id() {
        let api = ScriptedApi::new(vec![Err(FetchError::Http { status: 500 })]);
        let sleeper = RecordingSleeper::default();
        let store = Rc::new(MemoryStore::new());
        let ctrl = controller(&api, &sleeper, &store);

        let mut state = state_with_query("dune");
        submit(&ctrl, &mut state).unwrap();
        let id = state.toast.as_ref().map(|t| t.id).unwrap();
        state.dismiss_toast(id + 1);
        assert!(state.toast.is_some());
        state.dismiss_toast(id);
        assert!(state.toast.is_none());
    }
}
