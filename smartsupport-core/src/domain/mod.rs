//! Core domain types
//!
//! This module contains the domain structures used across SmartSupport crates.
//! They mirror what the classification API reports and are shared between the
//! HTTP client (which decodes them) and the poller (which interprets them).

pub mod analysis;
pub mod dashboard;
pub mod health;
pub mod task;
