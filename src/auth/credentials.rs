//! Credential store
//!
//! Accounts are keyed by username. Password checks go through bcrypt, and a
//! lookup for an unknown username still pays for one bcrypt comparison
//! against a dummy hash so both failure paths take about as long.

use std::collections::HashMap;
use std::str::FromStr;

use crate::auth::models::{Account, AccountId};
use crate::config::Config;
use crate::error::{Error, Result};

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Characters of bcrypt's base64 alphabet
fn is_bcrypt_base64(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '/'
}

/// Check a stored bcrypt hash and return its cost.
///
/// A hash that `bcrypt::verify` would reject outright never makes it into the
/// store, so every known-user check runs a full comparison.
pub fn stored_hash_cost(hash: &str) -> Result<u32> {
    let malformed = |reason: &str| Error::Config(format!("malformed password_hash: {}", reason));

    let parts = bcrypt::HashParts::from_str(hash).map_err(|e| malformed(&e.to_string()))?;
    let cost = parts.get_cost();
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(malformed(&format!("cost {} out of range", cost)));
    }
    if !hash.rsplit('$').next().is_some_and(|tail| tail.chars().all(is_bcrypt_base64)) {
        return Err(malformed("salt or digest is not bcrypt base64"));
    }
    Ok(cost)
}

/// Immutable set of accounts loaded at startup
#[derive(Debug, Clone)]
pub struct CredentialStore {
    by_username: HashMap<String, Account>,
    dummy_hash: String,
}

impl CredentialStore {
    /// Build a store from already-hashed accounts.
    ///
    /// The dummy hash used for unknown usernames takes the highest cost found
    /// among the accounts, or `cost` when there are none.
    pub fn new(accounts: Vec<Account>, cost: u32) -> Result<Self> {
        let mut by_username = HashMap::with_capacity(accounts.len());
        let mut dummy_cost = None;
        for account in accounts {
            if by_username.contains_key(&account.username) {
                return Err(Error::DuplicateAccount(account.username));
            }
            let account_cost = stored_hash_cost(&account.password_hash).map_err(|_| {
                Error::Config(format!(
                    "account '{}' has a malformed password_hash",
                    account.username
                ))
            })?;
            dummy_cost = dummy_cost.max(Some(account_cost));
            by_username.insert(account.username.clone(), account);
        }

        let dummy_hash = bcrypt::hash(dummy_password(), dummy_cost.unwrap_or(cost))?;

        Ok(Self {
            by_username,
            dummy_hash,
        })
    }

    /// Build a store from configuration, hashing plaintext passwords
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut accounts = Vec::with_capacity(config.accounts.len());
        for entry in &config.accounts {
            let hash = match (&entry.password_hash, &entry.password) {
                (Some(hash), _) => hash.clone(),
                (None, Some(plain)) => bcrypt::hash(plain, config.bcrypt_cost)?,
                (None, None) => {
                    return Err(Error::Config(format!(
                        "account '{}' has no password",
                        entry.username
                    )))
                }
            };
            accounts.push(Account::new(entry.id, entry.username.clone(), hash));
        }

        tracing::info!("Loaded {} account(s)", accounts.len());
        Self::new(accounts, config.bcrypt_cost)
    }

    /// Look up an account by username
    pub fn find_account_by_username(&self, username: &str) -> Option<&Account> {
        self.by_username.get(username)
    }

    /// Look up an account by id
    pub fn find_account_by_id(&self, id: AccountId) -> Option<&Account> {
        self.by_username.values().find(|a| a.id == id)
    }

    /// Check a plaintext password against an account's hash.
    /// Malformed stored hashes count as a mismatch.
    pub fn verify_password(&self, account: &Account, plaintext: &str) -> bool {
        bcrypt::verify(plaintext, &account.password_hash).unwrap_or(false)
    }

    /// Resolve a username/password pair to an account.
    ///
    /// Unknown usernames and wrong passwords both return `None` after one
    /// bcrypt comparison. This call is slow on purpose; run it off the async
    /// executor.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Account> {
        match self.find_account_by_username(username) {
            Some(account) => self
                .verify_password(account, password)
                .then(|| account.clone()),
            None => {
                let _ = bcrypt::verify(password, &self.dummy_hash);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_username.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_username.is_empty()
    }

    /// Accounts sorted by id
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.by_username.values().collect();
        accounts.sort_by_key(|a| a.id);
        accounts
    }
}

fn dummy_password() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}
