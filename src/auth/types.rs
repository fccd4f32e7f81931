use leptos::prelude::*;
use std::fmt;

pub const SESSION_COOKIE_NAME: &str = "sb_access_token";

#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    NotSignedIn,
    Supabase(String),
    CookieError(String),
    MissingState,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "Email and password are required"),
            AuthError::NotSignedIn => write!(f, "You must be logged in"),
            AuthError::Supabase(e) => write!(f, "{}", e),
            AuthError::CookieError(e) => write!(f, "Cookie error: {}", e),
            AuthError::MissingState => write!(f, "Application state not found"),
        }
    }
}

pub fn to_server_error(e: AuthError) -> ServerFnError {
    ServerFnError::ServerError(e.to_string())
}
