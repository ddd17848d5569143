//! 時系列トレースログ
//! 検索・キャッシュ・UI操作のイベントを記録し、後から確認できるようにする

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const MAX_LOG_ENTRIES: usize = 200;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const STORAGE_KEY: &str = "book_xplorer_log_trace";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String, // "info", "warn", "error"
    pub category: String, // "search", "cache", "config", "ui-action"
    pub message: String,
    pub data: Option<serde_json::Value>,
}

pub struct LogTrace {
    logs: VecDeque<LogEntry>,
}

impl LogTrace {
    pub fn new() -> Self {
        let mut trace = LogTrace {
            logs: VecDeque::with_capacity(MAX_LOG_ENTRIES),
        };
        trace.load_from_storage();
        trace
    }

    pub fn log(&mut self, level: &str, category: &str, message: &str, data: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: now_iso(),
            level: level.to_string(),
            category: category.to_string(),
            message: message.to_string(),
            data,
        };

        write_console(level, category, message);

        if self.logs.len() >= MAX_LOG_ENTRIES {
            self.logs.pop_front();
        }
        self.logs.push_back(entry);

        self.save_to_storage();
    }

    #[cfg(test)]
    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.logs.iter().cloned().collect()
    }

    #[cfg(test)]
    pub fn clear(&mut self) {
        self.logs.clear();
        self.save_to_storage();
    }

    #[cfg(target_arch = "wasm32")]
    fn load_from_storage(&mut self) {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                if let Ok(Some(json_str)) = storage.get_item(STORAGE_KEY) {
                    if let Ok(logs) = serde_json::from_str::<Vec<LogEntry>>(&json_str) {
                        self.logs = logs.into_iter().collect();
                    }
                }
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_from_storage(&mut self) {}

    #[cfg(target_arch = "wasm32")]
    fn save_to_storage(&self) {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                let json_str = serde_json::to_string(&self.logs).unwrap_or_else(|_| "[]".to_string());
                let _ = storage.set_item(STORAGE_KEY, &json_str);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_to_storage(&self) {}
}

impl Default for LogTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().as_string().unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_iso() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}", secs)
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: &str, category: &str, message: &str) {
    let line = format!("[{}] {}", category, message);
    match level {
        "error" => web_sys::console::error_1(&line.into()),
        "warn" => web_sys::console::warn_1(&line.into()),
        _ => web_sys::console::log_1(&line.into()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(level: &str, category: &str, message: &str) {
    eprintln!("{} [{}] {}", level, category, message);
}

// グローバルなログトレースインスタンス
thread_local! {
    static LOG_TRACE: std::cell::RefCell<LogTrace> = std::cell::RefCell::new(LogTrace::new());
}

pub fn log_info(category: &str, message: &str) {
    LOG_TRACE.with(|trace| trace.borrow_mut().log("info", category, message, None));
}

pub fn log_info_with_data(category: &str, message: &str, data: serde_json::Value) {
    LOG_TRACE.with(|trace| trace.borrow_mut().log("info", category, message, Some(data)));
}

pub fn log_warn(category: &str, message: &str) {
    LOG_TRACE.with(|trace| trace.borrow_mut().log("warn", category, message, None));
}

pub fn log_error_with_data(category: &str, message: &str, data: serde_json::Value) {
    LOG_TRACE.with(|trace| trace.borrow_mut().log("error", category, message, Some(data)));
}

#[cfg(test)]
pub fn get_logs() -> Vec<LogEntry> {
    LOG_TRACE.with(|trace| trace.borrow().get_logs())
}

#[cfg(test)]
pub fn clear_logs() {
    LOG_TRACE.with(|trace| trace.borrow_mut().clear());
}
