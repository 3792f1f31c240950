//! One-time login codes for the mobile client.
//!
//! A code is six random digits, valid for a short TTL and a bounded number
//! of wrong guesses, and is consumed by the first successful verification.
//! Only a SHA-256 digest of each code is held in memory. Pending codes live
//! in process memory only; a restart invalidates them.
//!
//! The guess budget belongs to the email, not to a single code: re-issuing
//! carries the wrong-guess count over, and once the budget is spent the
//! email stays locked until the pending entry expires.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use trialsite_core::types::Timestamp;

/// Default code lifetime: 10 minutes.
const DEFAULT_TTL_SECS: i64 = 600;
/// Default number of wrong guesses before a code is burned.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Login-code behaviour loaded from the environment.
#[derive(Debug, Clone)]
pub struct LoginCodeConfig {
    pub ttl_secs: i64,
    pub max_attempts: u32,
    /// Return the code in the API response (local development only).
    pub echo: bool,
}

impl Default for LoginCodeConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            echo: false,
        }
    }
}

impl LoginCodeConfig {
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `LOGIN_CODE_TTL_SECS`     | `600`   |
    /// | `LOGIN_CODE_MAX_ATTEMPTS` | `5`     |
    /// | `LOGIN_CODE_ECHO`         | `false` |
    pub fn from_env() -> Self {
        let ttl_secs: i64 = std::env::var("LOGIN_CODE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .expect("LOGIN_CODE_TTL_SECS must be a valid i64");

        let max_attempts: u32 = std::env::var("LOGIN_CODE_MAX_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()
            .expect("LOGIN_CODE_MAX_ATTEMPTS must be a valid u32");
        assert!(max_attempts > 0, "LOGIN_CODE_MAX_ATTEMPTS must be at least 1");

        let echo = std::env::var("LOGIN_CODE_ECHO")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            ttl_secs,
            max_attempts,
            echo,
        }
    }
}

/// Why a submitted code was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeRejection {
    /// No code is pending for this email.
    Missing,
    Expired,
    /// Wrong code; more guesses are allowed.
    Mismatch { remaining: u32 },
    /// The attempt budget is spent; the email is locked until expiry.
    Exhausted,
}

#[derive(Debug)]
struct PendingCode {
    /// `None` once the attempt budget is spent.
    code_hash: Option<String>,
    expires_at: Timestamp,
    attempts: u32,
}

/// In-memory map of pending codes keyed by normalized email.
#[derive(Debug)]
pub struct LoginCodeStore {
    config: LoginCodeConfig,
    codes: Mutex<HashMap<String, PendingCode>>,
}

impl LoginCodeStore {
    pub fn new(config: LoginCodeConfig) -> Self {
        Self {
            config,
            codes: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.config.ttl_secs
    }

    /// Create a fresh code for `email`, replacing any pending one.
    ///
    /// Wrong guesses against an unexpired pending code carry over. Returns
    /// `None` while the email is locked out.
    pub async fn issue(&self, email: &str) -> Option<String> {
        let now = Utc::now();
        let mut codes = self.codes.lock().await;

        let attempts = match codes.get(email) {
            Some(pending) if now < pending.expires_at => {
                if pending.code_hash.is_none() {
                    return None;
                }
                pending.attempts
            }
            _ => 0,
        };

        let code = format!("{:06}", rand::rng().random_range(0..1_000_000u32));
        let pending = PendingCode {
            code_hash: Some(hash_code(email, &code)),
            expires_at: now + Duration::seconds(self.config.ttl_secs),
            attempts,
        };
        codes.insert(email.to_string(), pending);
        Some(code)
    }

    /// Check `code` for `email`, consuming it on success.
    pub async fn verify(&self, email: &str, code: &str) -> Result<(), CodeRejection> {
        let mut codes = self.codes.lock().await;

        let Some(pending) = codes.get_mut(email) else {
            return Err(CodeRejection::Missing);
        };

        if Utc::now() >= pending.expires_at {
            codes.remove(email);
            return Err(CodeRejection::Expired);
        }

        let Some(code_hash) = pending.code_hash.as_deref() else {
            return Err(CodeRejection::Exhausted);
        };

        if code_hash == hash_code(email, code.trim()) {
            codes.remove(email);
            return Ok(());
        }

        pending.attempts += 1;
        if pending.attempts >= self.config.max_attempts {
            pending.code_hash = None;
            return Err(CodeRejection::Exhausted);
        }
        Err(CodeRejection::Mismatch {
            remaining: self.config.max_attempts - pending.attempts,
        })
    }

    /// Drop every expired code. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut codes = self.codes.lock().await;
        let before = codes.len();
        codes.retain(|_, pending| pending.expires_at > now);
        before - codes.len()
    }

    pub async fn pending_count(&self) -> usize {
        self.codes.lock().await.len()
    }
}

fn hash_code(email: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}
