pub mod auth;
pub mod company;
pub mod enrollment;
pub mod hospital;
pub mod leaderboard;
pub mod news;
pub mod pdf;
pub mod protocol;
pub mod stats;
pub mod tenancy;
pub mod training;
pub mod user;
