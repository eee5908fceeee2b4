//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep HTTP delivery layers decoupled from storage details.

pub mod listing;
pub mod memo_service;
