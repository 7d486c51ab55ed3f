pub mod bookmarks;
pub mod entry;
pub mod gui;
pub mod history;
pub mod loader;
pub mod logging;
pub mod navigator;
pub mod search_list;
pub mod settings;
