//! Specgrade Core Library
//!
//! Core grading pipeline for the specgrade API contract grader.

pub mod compare;
pub mod compliance;
pub mod contract;
pub mod db;
pub mod error;
pub mod format;
pub mod history;
pub mod identity;
pub mod logging;
pub mod pipeline;
pub mod rules;
pub mod scoring;
pub mod template;
