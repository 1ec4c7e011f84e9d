//! poyobot - keyword-triggered Discord command bot.
//!
//! Inbound messages are matched against a registry of keyword rules;
//! every matching command runs (or is denied) independently, gated by a
//! per-user authorization level.

pub mod chat;
pub mod config;
pub mod discord;
pub mod dispatch;
pub mod error;
pub mod handlers;
