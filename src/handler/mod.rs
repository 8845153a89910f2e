pub mod auth;
pub mod leaderboard;
pub mod waitlist;
