use serde::{Deserialize, Serialize};

/// Verified identity attributes handed over by the Farcaster sign-in flow.
/// The verification protocol itself lives upstream; by the time a value of
/// this type exists, the handle has been checked.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FarcasterIdentity {
    pub fid: String,
    pub username: String,
    pub display_name: Option<String>,
}
