// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Client error taxonomy.

use skiff_http::TransportError;

/// Errors surfaced by control-plane operations.
///
/// Nothing is caught or retried internally; every failure propagates
/// unchanged to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
	/// The HTTP exchange itself failed (network fault, DNS, timeout expiry).
	#[error("transport error: {0}")]
	Transport(#[from] TransportError),

	/// Login completed at the transport level but produced no valid session
	/// cookie. The control plane provides no error body to interpret, so no
	/// further diagnostics are available.
	#[error("failed to authenticate")]
	Authentication,

	/// A response body did not match the expected JSON shape or was missing
	/// a required field.
	#[error("failed to parse response: {0}")]
	Parse(String),
}
