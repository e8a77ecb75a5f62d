//! SkillPort client library
//!
//! The review cache, the backend client and the flows built on them, plus
//! the terminal UI state used by the `skillport` binary.

pub mod api;
pub mod app;
pub mod cache;
pub mod categories;
pub mod checkout;
pub mod cli;
pub mod clock;
pub mod config;
pub mod data;
pub mod logging;
pub mod notify;
pub mod reviews;
pub mod storage;
pub mod ui;
