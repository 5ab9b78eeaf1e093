// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Mock transport for testing callers without a network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::TransportError;
use crate::transport::{Request, SendOutcome, Transport};

/// A mock [`Transport`] that returns pre-queued outcomes and records every
/// request it receives.
///
/// Outcomes are returned in FIFO order, one per `send` call. Recorded
/// requests let tests assert on URLs, headers, and bodies; the call count
/// lets them verify caching behavior (e.g. that a memoized fetch hits the
/// network exactly once).
///
/// # Example
///
/// ```
/// use skiff_http::{MockTransport, Request, SendOutcome, Transport};
///
/// let mock = MockTransport::new();
/// mock.enqueue(SendOutcome::Redirect {
///     status: 303,
///     headers: Default::default(),
/// });
///
/// let outcome = mock.send(Request::get("https://example.com/")).unwrap();
/// assert_eq!(outcome.status(), 303);
/// assert_eq!(mock.calls(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
	outcomes: Arc<Mutex<VecDeque<SendOutcome>>>,
	requests: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
	/// Create an empty mock with no queued outcomes.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue an outcome to be returned by a subsequent `send` call.
	pub fn enqueue(&self, outcome: SendOutcome) {
		self.outcomes.lock().unwrap().push_back(outcome);
	}

	/// Number of `send` calls received so far.
	pub fn calls(&self) -> usize {
		self.requests.lock().unwrap().len()
	}

	/// Snapshot of every request received so far, in order.
	pub fn requests(&self) -> Vec<Request> {
		self.requests.lock().unwrap().clone()
	}
}

impl Transport for MockTransport {
	/// Record the request and return the next queued outcome.
	///
	/// # Panics
	///
	/// Panics if no outcome is queued; a test reaching that state has made
	/// more network calls than it expected.
	fn send(&self, request: Request) -> Result<SendOutcome, TransportError> {
		self.requests.lock().unwrap().push(request);
		let outcome = self
			.outcomes
			.lock()
			.unwrap()
			.pop_front()
			.expect("MockTransport received a send with no queued outcome");
		Ok(outcome)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transport::HttpResponse;

	#[test]
	fn outcomes_are_returned_in_fifo_order() {
		let mock = MockTransport::new();
		mock.enqueue(SendOutcome::Response(HttpResponse {
			status: 200,
			headers: Default::default(),
			body: "first".to_string(),
		}));
		mock.enqueue(SendOutcome::Response(HttpResponse {
			status: 201,
			headers: Default::default(),
			body: "second".to_string(),
		}));

		let first = mock.send(Request::get("https://example.com/a")).unwrap();
		let second = mock.send(Request::get("https://example.com/b")).unwrap();
		assert_eq!(first.status(), 200);
		assert_eq!(second.status(), 201);
	}

	#[test]
	fn requests_are_recorded() {
		let mock = MockTransport::new();
		mock.enqueue(SendOutcome::Response(HttpResponse {
			status: 200,
			headers: Default::default(),
			body: String::new(),
		}));

		mock
			.send(Request::get("https://example.com/workspaces").session_token("tok"))
			.unwrap();

		assert_eq!(mock.calls(), 1);
		let recorded = mock.requests();
		assert_eq!(recorded[0].url, "https://example.com/workspaces");
		assert_eq!(recorded[0].session_token.as_deref(), Some("tok"));
	}
}
