//! Password lookup for the configured cloud account.
//!
//! Passwords never go into the config file. They come from `OS_PASSWORD`
//! or from the system keychain:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! Keychain entries live under the service name `stackquota`, keyed by
//! `user@host` of the identity endpoint.

use keyring::Entry;
use tracing::debug;
use url::Url;

use crate::error::StoreError;

/// Keychain service name.
const SERVICE: &str = "stackquota";

/// Environment variable consulted before the keychain.
pub const PASSWORD_ENV: &str = "OS_PASSWORD";

/// Keychain account name for a user on an identity endpoint.
pub fn account_name(username: &str, auth_url: &Url) -> String {
    match auth_url.host_str() {
        Some(host) => format!("{username}@{host}"),
        None => username.to_string(),
    }
}

fn entry(account: &str) -> Result<Entry, StoreError> {
    Entry::new(SERVICE, account).map_err(|e| StoreError::Keychain(e.to_string()))
}

/// Stores a password in the keychain.
pub fn store_password(account: &str, password: &str) -> Result<(), StoreError> {
    entry(account)?
        .set_password(password)
        .map_err(|e| StoreError::Keychain(format!("Failed to store password: {e}")))?;

    debug!(account, "Password stored in keychain");
    Ok(())
}

/// Reads a password from the keychain. A missing entry is `Ok(None)`.
pub fn get_password(account: &str) -> Result<Option<String>, StoreError> {
    match entry(account)?.get_password() {
        Ok(password) if !password.is_empty() => {
            debug!(account, "Password retrieved from keychain");
            Ok(Some(password))
        }
        Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(StoreError::Keychain(e.to_string())),
    }
}

/// Deletes a password from the keychain. Deleting a missing entry succeeds.
pub fn delete_password(account: &str) -> Result<(), StoreError> {
    match entry(account)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => {
            debug!(account, "Password removed from keychain");
            Ok(())
        }
        Err(e) => Err(StoreError::Keychain(format!("Failed to delete password: {e}"))),
    }
}

/// Resolves the password for `account`: `env_password` first, then the
/// keychain.
pub fn resolve_password(
    account: &str,
    env_password: Option<String>,
) -> Result<String, StoreError> {
    if let Some(password) = env_password.filter(|p| !p.is_empty()) {
        debug!("Using password from environment");
        return Ok(password);
    }

    get_password(account)?.ok_or(StoreError::MissingSetting {
        setting: "password",
        env_var: PASSWORD_ENV,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_name_uses_host() {
        let url = Url::parse("https://keystone.example.com:5000/v3").unwrap();
        assert_eq!(account_name("admin", &url), "admin@keystone.example.com");
    }

    #[test]
    fn test_env_password_wins() {
        let password = resolve_password("admin@nowhere", Some("secret".to_string())).unwrap();
        assert_eq!(password, "secret");
    }

    // Keychain round-trips need a platform secret store and are left to
    // manual testing.
}
