use leptos::*;

mod components;
mod error;
mod models;
mod search;
mod utils;
mod views;

use components::Navbar;
use utils::cache::LocalStorage;
use utils::config::{current_url_search, strip_api_param_from_location, AppConfig};
use utils::log_trace::log_info;
use views::SearchPage;

// ============================================
// メインアプリ
// ============================================

#[component]
fn App() -> impl IntoView {
    let search = current_url_search();
    let config = AppConfig::load(&LocalStorage, search.as_deref());
    strip_api_param_from_location();
    log_info("config", &format!("API: {}", config.api_base));

    view! {
        <div class="app">
            <header class="app-header">
                <Navbar />
            </header>

            <main>
                <SearchPage config=config />
            </main>
        </div>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
