//! Terminal front-ends for the speedmath arithmetic drill.
//!
//! Provides a ratatui-based drill screen and a line-oriented mode that
//! reads answers from standard input.

pub mod app;
pub mod commands;
pub mod terminal;
pub mod ui;
