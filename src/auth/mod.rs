pub mod api;
pub mod auth_components;
pub mod context;
#[cfg(feature = "ssr")]
pub mod oauth;
#[cfg(feature = "ssr")]
pub mod server;
mod types;

pub use api::*;
pub use auth_components::*;
pub use types::*;
