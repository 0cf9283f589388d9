// Data models for gesture detection, translation records, and sessions

pub mod auth;
pub mod gesture;
pub mod translation;
