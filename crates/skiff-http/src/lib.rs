// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Blocking HTTP transport for Skiff.
//!
//! This crate provides:
//! - A [`Transport`] trait describing a single request/response exchange,
//!   so higher layers can swap the real client for a mock in tests
//! - [`HttpTransport`], the reqwest-backed implementation with a consistent
//!   User-Agent header, per-request timeouts, and session-cookie injection
//! - Redirect capture: when a request disables redirect following, a 3xx
//!   response is returned as [`SendOutcome::Redirect`] carrying the status
//!   and headers instead of being followed or treated as an error
//! - [`MockTransport`], a FIFO mock for exercising callers without a network

mod client;
mod error;
mod mock;
mod transport;

pub use client::{builder, user_agent, HttpTransport};
pub use error::TransportError;
pub use mock::MockTransport;
pub use transport::{
	HttpResponse, Request, SendOutcome, Transport, DEFAULT_TIMEOUT, SESSION_COOKIE,
};
