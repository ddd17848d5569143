//! ナビゲーションバー
//!
//! 狭い画面ではメニューアイコンで開閉するオーバーレイにリンクを出す

use leptos::*;

/// (href, ラベル)
pub const MENU_LINKS: [(&str, &str); 3] = [
    ("/home", "Home"),
    ("/books", "View My Collection"),
    ("/main", "Search a Book"),
];

/// 開閉状態に応じたアイコン
pub fn toggle_icon(is_open: bool) -> &'static str {
    if is_open { "✕" } else { "☰" }
}

#[component]
fn Menu() -> impl IntoView {
    MENU_LINKS
        .iter()
        .map(|(href, label)| view! {
            <p><a href=*href>{*label}</a></p>
        })
        .collect_view()
}

#[component]
pub fn Navbar() -> impl IntoView {
    let (toggle_menu, set_toggle_menu) = create_signal(false);

    view! {
        <nav class="navbar">
            <div class="navbar-links">
                <div class="navbar-links_logo"></div>
                <div class="navbar-links_container">
                    <Menu />
                </div>
            </div>
            <div class="navbar-menu">
                <button
                    class="navbar-menu_toggle"
                    aria-label=move || if toggle_menu.get() { "Close menu" } else { "Open menu" }
                    on:click=move |_| set_toggle_menu.update(|open| *open = !*open)
                >
                    {move || toggle_icon(toggle_menu.get())}
                </button>
                {move || toggle_menu.get().then(|| view! {
                    <div class="navbar-menu_container scale-up-center">
                        <div class="navbar-menu_container-links">
                            <Menu />
                        </div>
                    </div>
                })}
            </div>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_icon() {
        assert_eq!(toggle_icon(false), "☰");
        assert_eq!(toggle_icon(true), "✕");
    }

    #[test]
    fn test_menu_links() {
        let hrefs: Vec<_> = MENU_LINKS.iter().map(|(href, _)| *href).collect();
        assert_eq!(hrefs, vec!["/home", "/books", "/main"]);
    }
}
