pub mod config;
pub mod persistence;
pub mod realtime;
pub mod security;
pub mod telemetry;
