// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Reqwest-backed implementation of the [`Transport`] trait.

use std::collections::HashMap;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, COOKIE};
use reqwest::redirect;

use crate::error::TransportError;
use crate::transport::{HttpResponse, Request, SendOutcome, Transport, SESSION_COOKIE};

/// Returns the standard Skiff User-Agent string.
///
/// Format: `skiff/{version}`, e.g. `skiff/0.1.0`.
pub fn user_agent() -> String {
	format!("skiff/{}", env!("CARGO_PKG_VERSION"))
}

/// Creates a new blocking HTTP client builder with the standard User-Agent.
///
/// Use this when you need to customize the client beyond what
/// [`HttpTransport::new`] provides.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// The production [`Transport`]: a blocking reqwest client pair.
///
/// Redirect policy is a client-level setting in reqwest, so two pre-built
/// clients are held: one that follows redirects transparently and one that
/// never does. Each [`Request`] picks a client by its `follow_redirects`
/// flag. Both clients share the standard User-Agent; timeouts are applied
/// per request.
pub struct HttpTransport {
	following: Client,
	manual: Client,
}

impl HttpTransport {
	/// Create a transport with the standard User-Agent header.
	///
	/// # Panics
	///
	/// Panics if the HTTP client cannot be built (should never happen in
	/// practice).
	pub fn new() -> Self {
		Self {
			following: builder().build().expect("failed to build HTTP client"),
			manual: builder()
				.redirect(redirect::Policy::none())
				.build()
				.expect("failed to build HTTP client"),
		}
	}

	fn client(&self, follow_redirects: bool) -> &Client {
		if follow_redirects {
			&self.following
		} else {
			&self.manual
		}
	}

	/// Assemble the wire request: implicit method, caller headers, session
	/// cookie, per-request timeout.
	fn build_request(
		&self,
		request: &Request,
	) -> Result<reqwest::blocking::Request, TransportError> {
		let client = self.client(request.follow_redirects);

		let mut builder = match &request.body {
			Some(body) => client.post(&request.url).body(body.clone()),
			None => client.get(&request.url),
		};
		builder = builder.timeout(request.timeout);
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(token) = &request.session_token {
			builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={token}"));
		}

		Ok(builder.build()?)
	}
}

impl Default for HttpTransport {
	fn default() -> Self {
		Self::new()
	}
}

impl Transport for HttpTransport {
	#[tracing::instrument(skip(self, request), fields(url = %request.url))]
	fn send(&self, request: Request) -> Result<SendOutcome, TransportError> {
		let wire_request = self.build_request(&request)?;
		let response = self.client(request.follow_redirects).execute(wire_request)?;

		let status = response.status();
		let headers = normalize_headers(response.headers());

		if !request.follow_redirects && status.is_redirection() {
			tracing::debug!(status = status.as_u16(), "captured blocked redirect");
			return Ok(SendOutcome::Redirect {
				status: status.as_u16(),
				headers,
			});
		}

		let body = response.text()?;
		tracing::debug!(status = status.as_u16(), bytes = body.len(), "received response");
		Ok(SendOutcome::Response(HttpResponse {
			status: status.as_u16(),
			headers,
			body,
		}))
	}
}

/// Lowercase header keys and trim values so callers can do exact-key
/// lookups. Repeated headers are joined with `", "`.
fn normalize_headers(headers: &HeaderMap) -> HashMap<String, String> {
	let mut normalized = HashMap::new();
	for key in headers.keys() {
		let value = headers
			.get_all(key)
			.iter()
			.map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_string())
			.collect::<Vec<_>>()
			.join(", ");
		normalized.insert(key.as_str().to_ascii_lowercase(), value);
	}
	normalized
}
