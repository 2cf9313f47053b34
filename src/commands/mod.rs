//! Command implementations for the specgrade CLI

pub mod checkpoints;
pub mod compare;
pub mod dispatch;
pub mod explain;
pub mod fixes;
pub mod grade;
pub mod helpers;
pub mod history;
pub mod version;
