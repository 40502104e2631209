//! Convoy CLI library — exposes modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod autonomy;
pub mod cli;
pub mod command_runner;
pub mod commands;
pub mod config;
pub mod keys;
pub mod output;
pub mod participants;
pub mod pipeline;
