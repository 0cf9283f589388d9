pub mod auth;
pub mod config;
pub mod dashboard;
pub mod database;

// Gesture recognition over live frames
pub mod capture_session;
pub mod gesture_detector;
pub mod gesture_estimator;

// Translation lifecycle
pub mod translation_pipeline;
pub mod translation_store;
