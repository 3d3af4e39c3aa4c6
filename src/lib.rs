//! Swingalert: a notify-only swing-trading alert engine.
//!
//! Bars flow one way through the crate: market data → series store → indicators →
//! condition evaluation → alert state diff → notification channels.

pub mod alerts;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod services;
pub mod signals;
