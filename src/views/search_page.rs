//! 書籍検索ページ

use std::rc::Rc;

use leptos::*;

use crate::components::{BookBlock, ToastView};
use crate::error::ValidationError;
use crate::search::retry::TimerSleeper;
use crate::search::{SearchController, SearchState};
use crate::utils::api::GoogleBooksApi;
use crate::utils::cache::LocalStorage;
use crate::utils::config::AppConfig;
use crate::utils::log_trace::log_info;

type BrowserController = SearchController<GoogleBooksApi, TimerSleeper, LocalStorage>;

#[component]
pub fn SearchPage(config: AppConfig) -> impl IntoView {
    let notice_ms = config.notice_ms;
    let controller: Rc<BrowserController> = Rc::new(SearchController::new(
        GoogleBooksApi::new(config.api_base),
        TimerSleeper,
        LocalStorage,
        config.retry,
    ));

    // マウント時にLocalStorageから前回の検索を復元
    let state = create_rw_signal(controller.hydrate());

    let query = Signal::derive(move || state.with(|s| s.query.clone()));
    let loading = Signal::derive(move || state.with(|s| s.loading));
    let toast = Signal::derive(move || state.with(|s| s.toast.clone()));

    // 一定時間後に通知を消す
    let schedule_toast_dismiss = move |s: &SearchState| {
        if let Some(id) = s.toast.as_ref().map(|t| t.id) {
            spawn_local(async move {
                gloo::timers::future::TimeoutFuture::new(notice_ms).await;
                state.update(|s| s.dismiss_toast(id));
            });
        }
    };

    let on_submit = {
        let controller = controller.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();

            let mut begun = None;
            state.update(|s| begun = Some(s.begin_submit()));
            let ticket = match begun {
                Some(Ok(ticket)) => ticket,
                Some(Err(ValidationError::EmptyQuery)) => {
                    if let Some(id) = state.with_untracked(|s| s.error.as_ref().map(|n| n.id)) {
                        spawn_local(async move {
                            gloo::timers::future::TimeoutFuture::new(notice_ms).await;
                            state.update(|s| s.dismiss_error(id));
                        });
                    }
                    return;
                }
                Some(Err(ValidationError::InFlight)) | None => return,
            };

            let controller = controller.clone();
            spawn_local(async move {
                let outcome = controller.search(&ticket).await;
                state.update(|s| {
                    if controller.complete(s, &ticket, outcome) {
                        schedule_toast_dismiss(s);
                    }
                });
            });
        }
    };

    let on_clear = {
        let controller = controller.clone();
        move |_: ev::MouseEvent| {
            log_info("ui-action", "検索をクリア");
            state.update(|s| controller.clear(s));
        }
    };

    view! {
        <section class="input-section">
            <div class="container">
                <div class="logo">
                    <h1><span class="logo-blue">"Book"</span>"Xplorer"</h1>
                    <h2>"The "<span class="logo-blue">"right place"</span>" for you to find a book"</h2>
                </div>

                <form on:submit=on_submit>
                    <div class="label">
                        <label for="book">"Type an author or book name..."</label>
                    </div>

                    <div class="input">
                        <input
                            type="text"
                            id="book"
                            autocomplete="off"
                            placeholder="Author or book name"
                            class:narrow=move || !query.get().is_empty() && state.with(|s| !s.books.is_empty())
                            prop:value=move || query.get()
                            on:input=move |ev| state.update(|s| s.update_query(event_target_value(&ev)))
                        />

                        {move || (!query.get().is_empty()).then(|| {
                            let on_clear = on_clear.clone();
                            view! {
                                <button type="button" class="clear-btn" aria-label="Clear" on:click=on_clear>"✕"</button>
                            }
                        })}

                        <button
                            type="submit"
                            class=move || if loading.get() { "submit-btn loading" } else { "submit-btn" }
                            disabled=move || loading.get()
                        >
                            {move || if loading.get() { "⟳" } else { "🔍" }}
                        </button>
                    </div>

                    {move || state.with(|s| s.error.clone()).map(|n| view! {
                        <div class="error"><span>{n.message}</span></div>
                    })}
                </form>
            </div>
        </section>

        <ToastView toast=toast on_close=Callback::new(move |id| state.update(|s| s.dismiss_toast(id))) />

        <section class="books-section">
            <div class="container">
                {move || {
                    let books = state.with(|s| s.books.clone());
                    if books.is_empty() {
                        view! {
                            <div class="no-books">
                                <h1>"No books yet, you need to search for some book"</h1>
                            </div>
                        }.into_view()
                    } else {
                        books.into_iter().map(|book| view! {
                            <BookBlock book=book />
                        }).collect_view()
                    }
                }}
            </div>
        </section>
    }
}
