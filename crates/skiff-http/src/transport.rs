// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request/response types and the [`Transport`] trait.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::TransportError;

/// Name of the session cookie carried on authenticated requests.
pub const SESSION_COOKIE: &str = "JSESSIONID";

/// Default per-request timeout applied when the caller does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// Request
// =============================================================================

/// A single HTTP exchange to dispatch through a [`Transport`].
///
/// The method is implicit: a request without a body is sent as GET, a request
/// with a body as POST. When `session_token` is set, the transport injects a
/// `Cookie: JSESSIONID=<token>` header before dispatch.
///
/// # Example
///
/// ```
/// use skiff_http::Request;
///
/// let request = Request::get("https://example.com/workspaces")
///     .header("Content-Type", "application/json")
///     .session_token("abc123");
///
/// assert!(request.body.is_none());
/// assert!(request.follow_redirects);
/// ```
#[derive(Debug, Clone)]
pub struct Request {
	/// Absolute URL to dispatch to.
	pub url: String,
	/// Extra headers, applied in order.
	pub headers: Vec<(String, String)>,
	/// Optional request body; its presence selects POST over GET.
	pub body: Option<String>,
	/// Optional session token, sent as the `JSESSIONID` cookie.
	pub session_token: Option<String>,
	/// Per-request timeout budget.
	pub timeout: Duration,
	/// Whether the transport may transparently follow 3xx responses.
	pub follow_redirects: bool,
}

impl Request {
	/// Create a GET request (no body).
	pub fn get(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			headers: Vec::new(),
			body: None,
			session_token: None,
			timeout: DEFAULT_TIMEOUT,
			follow_redirects: true,
		}
	}

	/// Create a POST request carrying the given body.
	pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			body: Some(body.into()),
			..Self::get(url)
		}
	}

	/// Append a request header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Attach a session token, carried as the `JSESSIONID` cookie.
	pub fn session_token(mut self, token: impl Into<String>) -> Self {
		self.session_token = Some(token.into());
		self
	}

	/// Override the per-request timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Disable automatic redirect following for this request.
	///
	/// A 3xx response is then returned as [`SendOutcome::Redirect`] instead
	/// of being followed.
	pub fn no_redirects(mut self) -> Self {
		self.follow_redirects = false;
		self
	}
}

// =============================================================================
// Response
// =============================================================================

/// A fully-received HTTP response.
///
/// Header keys are lowercased and values trimmed so callers can do exact-key
/// lookups (e.g. `"set-cookie"`). Repeated headers are joined with `", "`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Normalized response headers.
	pub headers: HashMap<String, String>,
	/// Response body as text.
	pub body: String,
}

/// Outcome of dispatching a [`Request`].
///
/// The redirect variant only occurs for requests with redirect following
/// disabled; it carries the 3xx status and headers as if they were the final
/// response (the body of a redirect is irrelevant to callers).
#[derive(Debug, Clone)]
pub enum SendOutcome {
	/// The final response, after any transparent redirects.
	Response(HttpResponse),
	/// A 3xx response captured instead of followed.
	Redirect {
		/// The redirect's status code.
		status: u16,
		/// The redirect's normalized headers.
		headers: HashMap<String, String>,
	},
}

impl SendOutcome {
	/// Status code of the response or captured redirect.
	pub fn status(&self) -> u16 {
		match self {
			SendOutcome::Response(response) => response.status,
			SendOutcome::Redirect { status, .. } => *status,
		}
	}

	/// Normalized headers of the response or captured redirect.
	pub fn headers(&self) -> &HashMap<String, String> {
		match self {
			SendOutcome::Response(response) => &response.headers,
			SendOutcome::Redirect { headers, .. } => headers,
		}
	}
}

// =============================================================================
// Transport trait
// =============================================================================

/// A blocking, single-exchange HTTP transport.
///
/// The real implementation is [`HttpTransport`](crate::HttpTransport);
/// [`MockTransport`](crate::MockTransport) stands in for it in tests.
/// Implementations block the calling thread until the exchange completes,
/// fails, or times out; there is no cancellation.
pub trait Transport: Send + Sync {
	/// Dispatch one request and return its outcome.
	fn send(&self, request: Request) -> Result<SendOutcome, TransportError>;
}
