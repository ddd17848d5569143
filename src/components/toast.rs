//! トースト通知

use leptos::*;
use crate::models::{Toast, ToastKind};

#[component]
pub fn ToastView(
    toast: Signal<Option<Toast>>,
    on_close: Callback<u64>,
) -> impl IntoView {
    view! {
        {move || toast.get().map(|t| {
            let (class, icon) = match t.kind {
                ToastKind::Info => ("toast toast-info", "ℹ"),
                ToastKind::Error => ("toast toast-error", "✗"),
            };
            let id = t.id;
            view! {
                <div class=class role="status">
                    <span class="toast-icon">{icon}</span>
                    <span class="toast-message">{t.message}</span>
                    <button class="close-btn" on:click=move |_| on_close.call(id)>"×"</button>
                </div>
            }
        })}
    }
}
