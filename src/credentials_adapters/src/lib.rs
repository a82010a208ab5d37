pub mod clock;
pub mod config;
pub mod email;
pub mod hashing;
pub mod notification;
pub mod persistence;
pub mod telemetry;
pub mod tokens;
