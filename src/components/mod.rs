pub mod dashboard_header;
pub mod delete_account;
pub mod footer;
pub mod generator;
pub mod history;
pub mod language;
pub mod profile;
pub mod style_selector;
pub mod toast;
