//! Rating reminders for plates that are still unrated.

pub mod job;
pub mod notifier;
mod repo;
pub mod schedule;
