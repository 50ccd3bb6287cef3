//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Collections and handles
//! - Time management and the fixed-timestep accumulator
//! - Logging utilities

pub mod collections;
pub mod logging;
pub mod math;
pub mod time;
