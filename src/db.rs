use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::models::{identitymodel::FarcasterIdentity, waitlistmodel::WaitlistEntry};

#[derive(Debug, Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }
}

/// Store operations the signup flow and leaderboard need. The `waitlist`
/// table's unique constraints on email and farcaster_id are the source of
/// truth for dedup; callers treat an insert conflict as authoritative over
/// any earlier existence check.
#[async_trait]
pub trait WaitlistExt {
    async fn save_entry(
        &self,
        email: &str,
        identity: &FarcasterIdentity,
        referral_source: Option<&str>,
    ) -> Result<WaitlistEntry, sqlx::Error>;

    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error>;

    async fn count_by_referrer(&self, farcaster_id: &str) -> Result<i64, sqlx::Error>;

    async fn get_entries(&self) -> Result<Vec<WaitlistEntry>, sqlx::Error>;

    async fn get_entry_count(&self) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl WaitlistExt for DBClient {
    async fn save_entry(
        &self,
        email: &str,
        identity: &FarcasterIdentity,
        referral_source: Option<&str>,
    ) -> Result<WaitlistEntry, sqlx::Error> {
        sqlx::query_as::<_, WaitlistEntry>(
            r#"
            INSERT INTO waitlist (email, farcaster_id, farcaster_username, farcaster_display_name, referral_source)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, farcaster_id, farcaster_username, farcaster_display_name, referral_source, created_at
            "#,
        )
        .bind(email)
        .bind(&identity.fid)
        .bind(&identity.username)
        .bind(identity.display_name.as_deref())
        .bind(referral_source)
        .fetch_one(&self.pool)
        .await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM waitlist WHERE email = $1)"#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }

    async fn count_by_referrer(&self, farcaster_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM waitlist WHERE referral_source = $1"#,
        )
        .bind(farcaster_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_entries(&self) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
        sqlx::query_as::<_, WaitlistEntry>(
            r#"
            SELECT id, email, farcaster_id, farcaster_username, farcaster_display_name, referral_source, created_at
            FROM waitlist
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_entry_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM waitlist"#)
            .fetch_one(&self.pool)
            .await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::borrow::Cow;
    use std::fmt;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use super::WaitlistExt;
    use crate::models::{identitymodel::FarcasterIdentity, waitlistmodel::WaitlistEntry};

    #[derive(Debug)]
    struct FakeDbError {
        code: &'static str,
        message: &'static str,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            self.message
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.code {
                "23505" => sqlx::error::ErrorKind::UniqueViolation,
                _ => sqlx::error::ErrorKind::Other,
            }
        }
    }

    pub fn unique_violation() -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError {
            code: "23505",
            message: "duplicate key value violates unique constraint",
        }))
    }

    pub fn permission_denied() -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError {
            code: "42501",
            message: "new row violates row-level security policy",
        }))
    }

    /// In-memory stand-in for the waitlist table, enforcing the same unique
    /// constraints on email and farcaster_id.
    #[derive(Clone, Default)]
    pub struct InMemoryWaitlist {
        entries: Arc<Mutex<Vec<WaitlistEntry>>>,
        calls: Arc<AtomicUsize>,
        deny_writes: Arc<AtomicBool>,
        // Simulates a concurrent writer racing the exists-then-insert pattern:
        // the pre-check misses, the unique constraint still fires.
        hide_from_precheck: Arc<AtomicBool>,
    }

    impl InMemoryWaitlist {
        pub fn entries(&self) -> Vec<WaitlistEntry> {
            self.entries.lock().unwrap().clone()
        }

        pub fn store_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn deny_writes(&self) {
            self.deny_writes.store(true, Ordering::SeqCst);
        }

        pub fn hide_from_precheck(&self) {
            self.hide_from_precheck.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl WaitlistExt for InMemoryWaitlist {
        async fn save_entry(
            &self,
            email: &str,
            identity: &FarcasterIdentity,
            referral_source: Option<&str>,
        ) -> Result<WaitlistEntry, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.deny_writes.load(Ordering::SeqCst) {
                return Err(permission_denied());
            }

            let mut entries = self.entries.lock().unwrap();
            if entries
                .iter()
                .any(|entry| entry.email == email || entry.farcaster_id == identity.fid)
            {
                return Err(unique_violation());
            }

            let entry = WaitlistEntry {
                id: Uuid::new_v4(),
                email: email.to_string(),
                farcaster_id: identity.fid.clone(),
                farcaster_username: identity.username.clone(),
                farcaster_display_name: identity.display_name.clone(),
                referral_source: referral_source.map(|source| source.to_string()),
                created_at: Utc::now(),
            };
            entries.push(entry.clone());
            Ok(entry)
        }

        async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.hide_from_precheck.load(Ordering::SeqCst) {
                return Ok(false);
            }

            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .any(|entry| entry.email == email))
        }

        async fn count_by_referrer(&self, farcaster_id: &str) -> Result<i64, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|entry| entry.referral_source.as_deref() == Some(farcaster_id))
                .count() as i64)
        }

        async fn get_entries(&self) -> Result<Vec<WaitlistEntry>, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            Ok(self.entries.lock().unwrap().clone())
        }

        async fn get_entry_count(&self) -> Result<i64, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            Ok(self.entries.lock().unwrap().len() as i64)
        }
    }
}
