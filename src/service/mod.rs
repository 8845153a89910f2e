pub mod changefeed;
pub mod error;
pub mod formspree;
pub mod leaderboard;
pub mod referral;
pub mod signup;
