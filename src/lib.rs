#![recursion_limit = "256"]

pub mod app;
pub mod auth;
pub mod avatar;
#[cfg(feature = "ssr")]
pub mod cache;
pub mod components;
#[cfg(feature = "ssr")]
pub mod config;
pub mod generation;
pub mod i18n;
#[cfg(feature = "ssr")]
pub mod middleware;
pub mod models;
pub mod pages;
pub mod server_fn;
pub mod state;
#[cfg(feature = "ssr")]
pub mod supabase;
pub mod thumbnail;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
