//! Data Transfer Objects for the classification API
//!
//! Request and acknowledgement bodies that only exist on the wire.

pub mod ticket;
