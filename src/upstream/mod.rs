//! Upstream (target) communication.
//!
//! # Design Decisions
//! - One client per process, cloned into the relay handler
//! - Redirects and environment proxies follow `reqwest` defaults
//! - No retries: a failed call is reported once and mapped to 502

pub mod client;

pub use client::UpstreamClient;
