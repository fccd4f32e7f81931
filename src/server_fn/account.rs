use cfg_if::cfg_if;
use leptos::prelude::*;

/// What the user must type before the account is deleted.
pub const DELETE_CONFIRMATION: &str = "DELETE";

pub fn confirms_deletion(input: &str) -> bool {
    input.trim() == DELETE_CONFIRMATION
}

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use std::fmt;

        use async_trait::async_trait;

        use crate::supabase::{SupabaseClient, SupabaseError};

        #[derive(Debug)]
        enum AccountError {
            NotConfirmed,
            Supabase(SupabaseError),
        }

        impl fmt::Display for AccountError {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    AccountError::NotConfirmed => write!(f, "Please type {DELETE_CONFIRMATION} to confirm"),
                    AccountError::Supabase(e) => write!(f, "Failed to delete account: {e}"),
                }
            }
        }

        impl From<AccountError> for ServerFnError {
            fn from(error: AccountError) -> Self {
                ServerFnError::ServerError(error.to_string())
            }
        }

        /// The rows and identity that make up an account.
        #[async_trait]
        pub trait AccountRecords: Send + Sync {
            async fn delete_profile(&self) -> Result<(), SupabaseError>;
            async fn delete_user(&self) -> Result<(), SupabaseError>;
        }

        pub struct UserAccount<'a> {
            client: &'a SupabaseClient,
            access_token: &'a str,
            user_id: &'a str,
        }

        #[async_trait]
        impl AccountRecords for UserAccount<'_> {
            async fn delete_profile(&self) -> Result<(), SupabaseError> {
                self.client.delete_profile(self.access_token, self.user_id).await
            }

            async fn delete_user(&self) -> Result<(), SupabaseError> {
                self.client.delete_user(self.user_id).await
            }
        }

        /// Profile first, then the auth user. A profile that cannot be
        /// removed does not block deleting the user.
        pub async fn remove_account<R: AccountRecords + ?Sized>(records: &R, user_id: &str) -> Result<(), SupabaseError> {
            if let Err(e) = records.delete_profile().await {
                log::error!("Failed to delete profile for {user_id}: {e}");
            }
            records.delete_user().await
        }
    }
}

#[server(DeleteAccount, "/api")]
pub async fn delete_account(confirmation: String) -> Result<(), ServerFnError> {
    use crate::auth::server::{app_state, expired_session_cookie, require_session, set_cookie};

    if !confirms_deletion(&confirmation) {
        return Err(AccountError::NotConfirmed.into());
    }

    let (token, user) = require_session().await?;
    let state = app_state()?;

    let account = UserAccount {
        client: &state.supabase,
        access_token: &token,
        user_id: &user.id,
    };
    remove_account(&account, &user.id)
        .await
        .map_err(AccountError::Supabase)?;

    if let Err(e) = state.supabase.sign_out(&token).await {
        log::debug!("Session revoke after deletion failed: {e}");
    }
    set_cookie(&expired_session_cookie())?;

    log::info!("User {} deleted their account", user.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_text() {
        assert!(confirms_deletion("DELETE"));
        assert!(confirms_deletion(" DELETE\n"));
        assert!(!confirms_deletion("delete"));
        assert!(!confirms_deletion(""));
    }

    #[cfg(feature = "ssr")]
    mod removal {
        use super::super::*;
        use std::sync::Mutex;

        #[derive(Default)]
        struct FakeRecords {
            calls: Mutex<Vec<&'static str>>,
            profile_fails: bool,
            user_fails: bool,
        }

        fn failure() -> SupabaseError {
            SupabaseError::Api { status: 500, message: "down".into() }
        }

        #[async_trait]
        impl AccountRecords for FakeRecords {
            async fn delete_profile(&self) -> Result<(), SupabaseError> {
                self.calls.lock().unwrap().push("profile");
                if self.profile_fails {
                    return Err(failure());
                }
                Ok(())
            }

            async fn delete_user(&self) -> Result<(), SupabaseError> {
                self.calls.lock().unwrap().push("user");
                if self.user_fails {
                    return Err(failure());
                }
                Ok(())
            }
        }

        #[tokio::test]
        async fn test_profile_then_user() {
            let records = FakeRecords::default();

            remove_account(&records, "u1").await.unwrap();

            assert_eq!(*records.calls.lock().unwrap(), vec!["profile", "user"]);
        }

        #[tokio::test]
        async fn test_profile_failure_does_not_stop_user_deletion() {
            let records = FakeRecords { profile_fails: true, ..FakeRecords::default() };

            remove_account(&records, "u1").await.unwrap();

            assert_eq!(*records.calls.lock().unwrap(), vec!["profile", "user"]);
        }

        #[tokio::test]
        async fn test_user_failure_is_reported() {
            let records = FakeRecords { user_fails: true, ..FakeRecords::default() };

            assert!(remove_account(&records, "u1").await.is_err());
        }
    }
}
