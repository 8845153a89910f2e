use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::watch;

use crate::db::WaitlistExt;
use crate::dtos::LeaderboardEntry;
use crate::models::waitlistmodel::WaitlistEntry;
use crate::service::changefeed::{ChangeFeed, Subscription};
use crate::service::error::ServiceError;

pub const POINTS_PER_REFERRAL: i64 = 100;

/// Full recomputation from the entry set. O(n) per call, which is the
/// accepted trade-off at waitlist scale; there are no incremental counters
/// to drift out of sync.
pub async fn compute<S>(store: &S) -> Result<Vec<LeaderboardEntry>, ServiceError>
where
    S: WaitlistExt + Sync,
{
    let entries = store
        .get_entries()
        .await
        .map_err(ServiceError::from_store_error)?;

    Ok(compute_from_entries(&entries))
}

pub fn compute_from_entries(entries: &[WaitlistEntry]) -> Vec<LeaderboardEntry> {
    let mut referral_counts: HashMap<&str, i64> = HashMap::new();
    for entry in entries {
        if let Some(source) = entry.referral_source.as_deref() {
            *referral_counts.entry(source).or_insert(0) += 1;
        }
    }

    // One row per signer. A referral_source pointing at a fid that never
    // signed up tallies above but surfaces nowhere below.
    let mut seen = HashSet::new();
    let mut board = Vec::new();
    for entry in entries {
        if !seen.insert(entry.farcaster_id.as_str()) {
            continue;
        }

        let referral_count = referral_counts
            .get(entry.farcaster_id.as_str())
            .copied()
            .unwrap_or(0);

        board.push(LeaderboardEntry {
            fid: entry.farcaster_id.clone(),
            username: entry.farcaster_username.clone(),
            display_name: entry.farcaster_display_name.clone(),
            referral_count,
            points: referral_count * POINTS_PER_REFERRAL,
        });
    }

    board.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| numeric_fid(&a.fid).cmp(&numeric_fid(&b.fid)))
            .then_with(|| a.fid.cmp(&b.fid))
    });

    board
}

// Ties break on ascending numeric fid so repeated computation over the same
// entries always yields the same ordering. Non-numeric fids sort last.
fn numeric_fid(fid: &str) -> u64 {
    fid.parse().unwrap_or(u64::MAX)
}

/// Latest leaderboard snapshot, refreshed whenever the change feed fires.
/// Readers get the cached snapshot; a burst of writes coalesces into however
/// many re-fetches the refresh task gets around to, last one wins.
#[derive(Clone)]
pub struct LiveLeaderboard {
    snapshot: watch::Receiver<Vec<LeaderboardEntry>>,
    _subscription: Arc<Subscription>,
}

impl LiveLeaderboard {
    pub async fn start<S>(store: S, feed: &ChangeFeed) -> Self
    where
        S: WaitlistExt + Send + Sync + 'static,
    {
        let initial = match compute(&store).await {
            Ok(board) => board,
            Err(err) => {
                tracing::error!("initial leaderboard computation failed: {}", err);
                Vec::new()
            }
        };

        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let (refresh_tx, mut refresh_rx) = watch::channel(());

        let subscription = feed.subscribe(move || {
            let _ = refresh_tx.send(());
        });

        tokio::spawn(async move {
            while refresh_rx.changed().await.is_ok() {
                match compute(&store).await {
                    Ok(board) => {
                        if snapshot_tx.send(board).is_err() {
                            break;
                        }
                    }
                    Err(err) => tracing::error!("leaderboard refresh failed: {}", err),
                }
            }
        });

        LiveLeaderboard {
            snapshot: snapshot_rx,
            _subscription: Arc::new(subscription),
        }
    }

    pub fn current(&self) -> Vec<LeaderboardEntry> {
        self.snapshot.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<Vec<LeaderboardEntry>> {
        self.snapshot.clone()
    }
}
