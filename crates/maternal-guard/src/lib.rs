//! Maternal-Guard & Life-Link: maternal risk screening with SOS alerts, and a
//! blood donor registry with city/blood-group matching.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
