//! Core module containing the serial bridge functionality
//!
//! This module provides:
//! - Link layer owning the physical serial handle (lazy open, settle delay, idempotent close)
//! - Frame model, parser and accumulator for the labeled telegram protocol
//! - Bridge guarding the link behind a mutex for concurrent callers
//! - CSV recorder for persisted readings

pub mod bridge;
pub mod frame;
pub mod link;
pub mod recorder;
