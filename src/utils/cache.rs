//! LocalStorageキャッシュ管理
//!
//! 最後に成功した検索の `query` と `books` を保存する。
//! 2つのキーは常にペアで扱い、片方だけ残った状態は読み込み時に無視する。

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::CacheError;
use crate::models::BookResult;
use crate::utils::log_trace::{log_info, log_warn};

const QUERY_KEY: &str = "query";
const BOOKS_KEY: &str = "books";

/// 文字列キーの永続ストア
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        (**self).remove(key)
    }
}

// ============================================
// ブラウザのLocalStorage
// ============================================

pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let storage = Self::storage().ok_or(CacheError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| CacheError::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let storage = Self::storage().ok_or(CacheError::Unavailable)?;
        storage
            .remove_item(key)
            .map_err(|e| CacheError::Storage(format!("{:?}", e)))
    }
}

// ============================================
// メモリ上のストア（テスト用）
// ============================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

// ============================================
// 検索キャッシュ
// ============================================

/// キャッシュから復元した前回の検索
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSearch {
    pub query: String,
    pub books: Vec<BookResult>,
}

pub struct SearchCache<K> {
    store: K,
}

impl<K: KeyValueStore> SearchCache<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// 前回の検索を読み込み（両方のキーが揃っている場合のみ）
    pub fn load(&self) -> Option<CachedSearch> {
        let query = self.store.get(QUERY_KEY).filter(|q| !q.is_empty())?;
        let json = self.store.get(BOOKS_KEY)?;
        match serde_json::from_str::<Vec<BookResult>>(&json) {
            Ok(books) => Some(CachedSearch { query, books }),
            Err(e) => {
                log_warn("cache", &format!("booksの読み込みに失敗: {}", e));
                None
            }
        }
    }

    /// 検索結果を保存
    ///
    /// "query" を最後に書くことで、途中で失敗してもペアが揃わない
    pub fn save(&self, query: &str, books: &[BookResult]) -> Result<(), CacheError> {
        let json = serde_json::to_string(books).map_err(|e| CacheError::Serialize(e.to_string()))?;
        self.store.remove(QUERY_KEY)?;
        self.store.set(BOOKS_KEY, &json)?;
        self.store.set(QUERY_KEY, query)?;
        log_info("cache", &format!("{}件を保存: {}", books.len(), query));
        Ok(())
    }

    /// キャッシュをクリア（"query" から先に消す）
    pub fn clear(&self) -> Result<(), CacheError> {
        let query_result = self.store.remove(QUERY_KEY);
        let books_result = self.store.remove(BOOKS_KEY);
        query_result.and(books_result)
    }
}
