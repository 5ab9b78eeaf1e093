// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Transport-level error type.

/// Errors produced by the HTTP transport.
///
/// A blocked redirect is not an error: it is returned as
/// [`SendOutcome::Redirect`](crate::SendOutcome::Redirect) so callers can
/// inspect the status and headers of a 3xx response without following it.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
	/// The HTTP request failed at the network or protocol level
	/// (DNS resolution, connect, TLS, timeout expiry, invalid URL or header).
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),
}
