//! In-memory store of pending email verification codes.
//!
//! One live code per email address; codes are single use and expire five
//! minutes after issuance. A background sweep clears abandoned entries so the
//! map does not grow without bound.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::Rng;

use crate::errors::DeliveryError;

const OTP_TTL_MINUTES: i64 = 5;

/// Outbound side of code delivery. The SMTP-backed `EmailService` implements
/// this in production; tests substitute a recording fake.
pub trait OtpMailer: Send + Sync {
    fn send_code(&self, to: &str, code: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone)]
struct OtpEntry {
    code: String,
    expires_at: DateTime<Utc>,
}

pub struct OtpRegistry {
    entries: DashMap<String, OtpEntry>,
    ttl: Duration,
    mailer: Arc<dyn OtpMailer>,
}

impl OtpRegistry {
    pub const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

    pub fn new(mailer: Arc<dyn OtpMailer>) -> Self {
        Self::with_ttl(mailer, Duration::minutes(OTP_TTL_MINUTES))
    }

    fn with_ttl(mailer: Arc<dyn OtpMailer>, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            mailer,
        }
    }

    /// Generates and stores a fresh code for `email`, replacing any code
    /// already outstanding, then hands it to the mailer. The map guard is
    /// released before delivery starts. A delivery failure leaves the stored
    /// entry in place; there is no automatic retry.
    pub fn issue(&self, email: &str) -> Result<(), DeliveryError> {
        let code = generate_code();
        let entry = OtpEntry {
            code: code.clone(),
            expires_at: Utc::now() + self.ttl,
        };
        self.entries.insert(email.to_owned(), entry);

        self.mailer.send_code(email, &code)
    }

    /// True only for an exact match against a live entry. A match consumes
    /// the entry; an expired entry is dropped no matter what was submitted;
    /// a mismatch leaves the entry untouched for another attempt.
    pub fn validate(&self, email: &str, submitted: &str) -> bool {
        self.validate_at(email, submitted, Utc::now())
    }

    fn validate_at(&self, email: &str, submitted: &str, now: DateTime<Utc>) -> bool {
        match self.entries.entry(email.to_owned()) {
            Entry::Occupied(entry) => {
                if now > entry.get().expires_at {
                    entry.remove();
                    return false;
                }
                if entry.get().code == submitted {
                    entry.remove();
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(_) => false,
        }
    }

    /// Drops every entry whose expiry has passed and returns how many were
    /// removed. Runs on a timer independent of validation traffic.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }
}

fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingMailer {
        fn last_code(&self) -> String {
            self.sent.lock().unwrap().last().unwrap().1.clone()
        }
    }

    impl OtpMailer for RecordingMailer {
        fn send_code(&self, to: &str, code: &str) -> Result<(), DeliveryError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_owned(), code.to_owned()));
            Ok(())
        }
    }

    struct FailingMailer;

    impl OtpMailer for FailingMailer {
        fn send_code(&self, _to: &str, _code: &str) -> Result<(), DeliveryError> {
            Err(DeliveryError::Template(io::Error::new(
                io::ErrorKind::NotFound,
                "template missing",
            )))
        }
    }

    fn registry() -> (Arc<RecordingMailer>, OtpRegistry) {
        let mailer = Arc::new(RecordingMailer::default());
        let registry = OtpRegistry::new(mailer.clone());
        (mailer, registry)
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn code_is_single_use() {
        let (mailer, registry) = registry();
        registry.issue("a@x.com").unwrap();
        let code = mailer.last_code();

        assert!(registry.validate("a@x.com", &code));
        assert!(!registry.validate("a@x.com", &code));
    }

    #[test]
    fn validate_without_issue_fails() {
        let (_, registry) = registry();
        assert!(!registry.validate("a@x.com", "123456"));
    }

    #[test]
    fn mismatch_leaves_entry_intact() {
        let (mailer, registry) = registry();
        let base = Utc::now();
        registry.issue("a@x.com").unwrap();
        let code = mailer.last_code();
        let wrong = if code == "654321" { "123456" } else { "654321" };

        assert!(!registry.validate_at("a@x.com", wrong, base + Duration::minutes(1)));
        assert!(registry.validate_at("a@x.com", &code, base + Duration::minutes(2)));
        assert!(!registry.validate_at("a@x.com", &code, base + Duration::minutes(3)));
    }

    #[test]
    fn expired_code_never_validates() {
        let (mailer, registry) = registry();
        let base = Utc::now();
        registry.issue("a@x.com").unwrap();
        let code = mailer.last_code();

        // one second past the five minute window, code itself is correct
        assert!(!registry.validate_at("a@x.com", &code, base + Duration::seconds(301)));
        // the failed attempt removed the entry
        assert!(!registry.validate_at("a@x.com", &code, base + Duration::seconds(1)));
    }

    #[test]
    fn reissue_replaces_previous_code() {
        let (mailer, registry) = registry();
        registry.entries.insert(
            "a@x.com".to_owned(),
            OtpEntry {
                code: "stale-code".to_owned(),
                expires_at: Utc::now() + Duration::minutes(5),
            },
        );
        registry.issue("a@x.com").unwrap();

        assert!(!registry.validate("a@x.com", "stale-code"));
        assert!(registry.validate("a@x.com", &mailer.last_code()));
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let (mailer, registry) = registry();
        let base = Utc::now();
        registry.issue("fresh@x.com").unwrap();
        let fresh_code = mailer.last_code();
        registry.entries.insert(
            "stale@x.com".to_owned(),
            OtpEntry {
                code: "000001".to_owned(),
                expires_at: base - Duration::seconds(1),
            },
        );

        assert_eq!(registry.sweep_at(base), 1);
        assert!(!registry.validate_at("stale@x.com", "000001", base));
        assert!(registry.validate_at("fresh@x.com", &fresh_code, base + Duration::minutes(1)));
    }

    #[test]
    fn delivery_failure_propagates() {
        let registry = OtpRegistry::new(Arc::new(FailingMailer));
        assert!(registry.issue("a@x.com").is_err());
        // the entry stays behind for the caller to retry delivery
        assert_eq!(registry.entries.len(), 1);
    }
}
