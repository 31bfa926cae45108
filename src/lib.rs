//! VCS Update - Force CI change checks over HTTP
//!
//! This crate exposes one endpoint that lowers the polling interval of the
//! requested VCS roots, asks the CI server to check their build
//! configurations for changes right away, and restores the interval.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
