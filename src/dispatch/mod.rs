//! Command matching, authorization, and dispatch.
//!
//! The pipeline for one inbound message: resolve the author's level in
//! the [`AuthStore`], collect every [`Command`] in the
//! [`CommandRegistry`] whose [`MatchRule`] matches the text, then run
//! or deny each candidate independently. Membership-update events take
//! the simpler [`MemberEventRegistry`] path: no matching, no auth.

mod auth;
mod command;
mod engine;
mod member;
mod registry;
mod rule;

pub use auth::AuthStore;
pub use command::{ChatHandler, Command, CommandContext};
pub use engine::{DispatchEngine, DispatchSummary};
pub use member::{MemberEventRegistry, MemberHandler};
pub use registry::CommandRegistry;
pub use rule::{MatchMode, MatchRule};
