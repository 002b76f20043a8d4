//! Debounced control of a double solenoid valve driven by a pair of spike relays.

pub mod build;
pub mod clock;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod relay;
pub mod request;
pub mod requests_and_responses;
pub mod solenoid;
