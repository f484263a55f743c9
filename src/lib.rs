//! Background engine for reclaiming developer disk space.
//!
//! A fixed [`catalog`] maps each [`model::Action`] to either a directory whose
//! children are purged or an external command. The [`engine::TaskEngine`]
//! runs actions one at a time on a single worker and publishes progress and
//! result events on an [`bus::EventBus`].

pub mod bus;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod engine;
pub mod events;
pub mod exit_codes;
pub mod fsops;
pub mod model;
pub mod process;
pub mod reporter;
