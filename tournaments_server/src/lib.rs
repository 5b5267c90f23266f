//! HTTP server for the tournament registry.
//!
//! Exposes [`api::create_router`] so the router can be driven in tests
//! without binding a socket.

pub mod api;
pub mod config;
pub mod logging;
