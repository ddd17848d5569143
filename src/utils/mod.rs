//! ユーティリティモジュール

pub mod api;
pub mod cache;
pub mod config;
pub mod log_trace;
