//! 検索結果1件分のカード

use leptos::*;
use crate::models::BookResult;

#[component]
pub fn BookBlock(book: BookResult) -> impl IntoView {
    let title = book.title.clone();
    let authors = book.authors_label().unwrap_or_else(|| "Unknown author".to_string());
    let description = book
        .description
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "No description available.".to_string());

    view! {
        <article class="book-block">
            <img class="book-cover" src=book.thumbnail_url alt=title.clone() loading="lazy" />
            <div class="book-info">
                <h3 class="book-title">{title}</h3>
                <span class="book-authors">{authors}</span>
                <p class="book-description">{description}</p>
            </div>
        </article>
    }
}
