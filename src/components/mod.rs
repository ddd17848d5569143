//! UIコンポーネントモジュール

pub mod book_block;
pub mod navbar;
pub mod toast;

pub use book_block::BookBlock;
pub use navbar::Navbar;
pub use toast::ToastView;
