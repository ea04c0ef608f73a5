//! `networth` command-line front end: configuration and commands over JSON
//! asset and history files.

pub mod commands;
pub mod config;

pub use config::Settings;
