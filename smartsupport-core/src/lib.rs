//! SmartSupport Core
//!
//! Core types and abstractions shared by the SmartSupport crates.
//!
//! This crate contains:
//! - Domain types: tickets, classification tasks and their results
//! - DTOs: request/response bodies exchanged with the classification API
//! - The `StatusSource` seam the task poller drives

pub mod domain;
pub mod dto;
pub mod source;

pub use source::StatusSource;
