//! Keyword search entry points.
//!
//! # Responsibility
//! - Narrow memo collections by a user-supplied keyword.
//! - Keep match semantics (case-insensitive, title OR text) inside core.

pub mod keyword;
