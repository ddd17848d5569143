//! データ構造体モジュール

use serde::{Deserialize, Serialize};

/// 表紙画像がない書籍に使うプレースホルダー
pub const PLACEHOLDER_THUMBNAIL: &str =
    "https://books.google.com.br/googlebooks/images/no_cover_thumb.gif";

// ============================================
// 検索結果（表示・キャッシュ用）
// ============================================

/// 画面に表示する1冊分の検索結果
///
/// LocalStorageの "books" にはこの構造体の配列がJSONで入る
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResult {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    pub thumbnail_url: String,
}

impl BookResult {
    /// 著者名をカンマ区切りで返す
    pub fn authors_label(&self) -> Option<String> {
        self.authors
            .as_ref()
            .filter(|a| !a.is_empty())
            .map(|a| a.join(", "))
    }
}

impl From<Volume> for BookResult {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        let thumbnail_url = info
            .image_links
            .and_then(|links| links.thumbnail)
            .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string());

        BookResult {
            id: volume.id,
            title: info.title,
            authors: info.authors,
            description: info.description,
            thumbnail_url,
        }
    }
}

// ============================================
// 書籍検索APIのレスポンス
// ============================================

/// `GET /volumes?q=...` のレスポンス
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items: Vec<Volume>,
}

impl VolumesResponse {
    /// ヒットなし判定（totalItemsが0、またはitemsが空）
    pub fn is_empty(&self) -> bool {
        self.total_items == 0 || self.items.is_empty()
    }

    /// 全アイテムを表示用に変換（APIの並び順を維持）
    pub fn into_books(self) -> Vec<BookResult> {
        self.items.into_iter().map(BookResult::from).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
}

// ============================================
// UI状態
// ============================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Info,
    Error,
}

/// トースト通知（一定時間で自動的に消える）
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// 入力欄下のバリデーションメッセージ
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
}
