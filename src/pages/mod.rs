pub mod account;
pub mod dashboard;
pub mod history;
pub mod home;
pub mod settings;
