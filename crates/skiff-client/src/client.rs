// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Login handshake and authenticated session.

use std::fmt;
use std::sync::Arc;

use skiff_http::{HttpTransport, Request, SendOutcome, Transport, SESSION_COOKIE};
use url::form_urlencoded;

use crate::error::ClientError;
use crate::workspace::{WorkspaceDescriptor, WorkspaceSession};
use crate::{CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE};

const SECURITY_CHECK_PATH: &str = "/j_security_check";
const WORKSPACES_PATH: &str = "/workspaces";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
const SET_COOKIE_HEADER: &str = "set-cookie";

const USERNAME_FIELD: &str = "j_username";
const PASSWORD_FIELD: &str = "j_password";

// =============================================================================
// SessionHandle
// =============================================================================

/// The deployment URI and session token behind an authenticated [`Session`].
///
/// Owned by the `Session` that login produced; workspace sessions hold a
/// shared read-only reference to it, never a second owner of its lifetime.
/// There is no logout operation; the handle is simply dropped.
pub(crate) struct SessionHandle {
	pub(crate) deployment_uri: String,
	pub(crate) session_token: String,
}

impl fmt::Debug for SessionHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SessionHandle")
			.field("deployment_uri", &self.deployment_uri)
			.field("session_token", &"[REDACTED]")
			.finish()
	}
}

// =============================================================================
// DeploymentClient
// =============================================================================

/// Entry point for one control-plane deployment.
///
/// Binds a deployment URI (e.g. `https://dbc-123.cloud.databricks.com`) to a
/// transport and performs the login handshake.
///
/// # Example
///
/// ```rust,no_run
/// use skiff_client::DeploymentClient;
///
/// # fn example() -> Result<(), skiff_client::ClientError> {
/// let client = DeploymentClient::new("https://dbc-123.cloud.databricks.com");
/// let session = client.login("user@example.com", "password")?;
/// # Ok(())
/// # }
/// ```
pub struct DeploymentClient {
	deployment_uri: String,
	transport: Arc<dyn Transport>,
}

impl DeploymentClient {
	/// Create a client for the given deployment URI with the default
	/// HTTP transport.
	pub fn new(deployment_uri: impl Into<String>) -> Self {
		Self::with_transport(deployment_uri, Arc::new(HttpTransport::new()))
	}

	/// Create a client with a caller-supplied transport.
	///
	/// This is the seam tests use to inject a
	/// [`MockTransport`](skiff_http::MockTransport).
	pub fn with_transport(deployment_uri: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
		Self {
			deployment_uri: deployment_uri.into(),
			transport,
		}
	}

	/// The deployment URI this client is bound to.
	pub fn deployment_uri(&self) -> &str {
		&self.deployment_uri
	}

	/// Authenticate with username and password and return an active session.
	///
	/// Posts the form-encoded credentials to the security-check path with
	/// redirect following disabled. On success the control plane answers
	/// with a 303 redirect carrying `Set-Cookie: JSESSIONID=<token>`; the
	/// token is extracted from the captured redirect's headers. Credentials
	/// are used once and never stored.
	///
	/// # Errors
	///
	/// - [`ClientError::Transport`]: the request itself failed.
	/// - [`ClientError::Authentication`]: the response carried no
	///   `set-cookie` header or no `JSESSIONID` fragment. The response body
	///   is never interpreted; the control plane does not provide an error
	///   message.
	#[tracing::instrument(skip_all, name = "DeploymentClient::login", fields(deployment_uri = %self.deployment_uri))]
	pub fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
		tracing::debug!("posting credentials to security check");

		let payload = form_urlencoded::Serializer::new(String::new())
			.append_pair(USERNAME_FIELD, username)
			.append_pair(PASSWORD_FIELD, password)
			.finish();

		let request = Request::post(
			format!("{}{}", self.deployment_uri, SECURITY_CHECK_PATH),
			payload,
		)
		.header(CONTENT_TYPE_HEADER, FORM_CONTENT_TYPE)
		.no_redirects();

		let outcome = self.transport.send(request)?;
		let token = outcome
			.headers()
			.get(SET_COOKIE_HEADER)
			.and_then(|value| extract_session_token(value))
			.ok_or(ClientError::Authentication)?;

		tracing::debug!("session cookie harvested");
		Ok(Session {
			handle: Arc::new(SessionHandle {
				deployment_uri: self.deployment_uri.clone(),
				session_token: token,
			}),
			transport: Arc::clone(&self.transport),
		})
	}
}

/// Extract the `JSESSIONID` token from a `set-cookie` header value.
///
/// The value is split into fragments on `;` and `,` (the latter separates
/// joined repeated headers); the last fragment named `JSESSIONID` wins, and
/// the token is everything after the `=`, trimmed.
fn extract_session_token(set_cookie: &str) -> Option<String> {
	let prefix = format!("{SESSION_COOKIE}=");
	set_cookie
		.split([';', ','])
		.filter_map(|fragment| fragment.trim().strip_prefix(prefix.as_str()))
		.next_back()
		.map(|token| token.trim().to_string())
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated session against one deployment.
///
/// Cheap to clone; clones share the same session handle and transport.
#[derive(Clone)]
pub struct Session {
	pub(crate) handle: Arc<SessionHandle>,
	pub(crate) transport: Arc<dyn Transport>,
}

impl Session {
	/// The deployment URI this session is bound to.
	pub fn deployment_uri(&self) -> &str {
		&self.handle.deployment_uri
	}

	/// List the workspaces reachable by this session.
	///
	/// # Errors
	///
	/// - [`ClientError::Transport`]: the request failed.
	/// - [`ClientError::Parse`]: the body was not a JSON array of workspace
	///   descriptors.
	#[tracing::instrument(skip(self), name = "Session::list_workspaces", fields(deployment_uri = %self.handle.deployment_uri))]
	pub fn list_workspaces(&self) -> Result<Vec<WorkspaceSession>, ClientError> {
		tracing::debug!("listing workspaces");

		let request = Request::get(format!(
			"{}{}",
			self.handle.deployment_uri, WORKSPACES_PATH
		))
		.header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
		.session_token(&self.handle.session_token);

		let response = expect_response(self.transport.send(request)?)?;
		let descriptors: Vec<WorkspaceDescriptor> = serde_json::from_str(&response.body)
			.map_err(|e| ClientError::Parse(format!("failed to parse workspace list: {e}")))?;

		Ok(
			descriptors
				.into_iter()
				.map(|descriptor| {
					WorkspaceSession::new(
						descriptor,
						Arc::clone(&self.handle),
						Arc::clone(&self.transport),
					)
				})
				.collect(),
		)
	}
}

/// Unwrap a final response from an outcome.
///
/// Only login disables redirect following, so every other call site expects
/// [`SendOutcome::Response`]; a captured redirect here means the server did
/// something the protocol does not account for.
pub(crate) fn expect_response(
	outcome: SendOutcome,
) -> Result<skiff_http::HttpResponse, ClientError> {
	match outcome {
		SendOutcome::Response(response) => Ok(response),
		SendOutcome::Redirect { status, .. } => Err(ClientError::Parse(format!(
			"unexpected redirect response (status {status})"
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use skiff_http::MockTransport;
	use std::collections::HashMap;
	use std::time::Duration;

	fn redirect_with_headers(headers: &[(&str, &str)]) -> SendOutcome {
		SendOutcome::Redirect {
			status: 303,
			headers: headers
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
		}
	}

	fn client_with(mock: &MockTransport) -> DeploymentClient {
		DeploymentClient::with_transport("https://dbc-123.example.com", Arc::new(mock.clone()))
	}

	#[test]
	fn login_extracts_exact_session_token() {
		let mock = MockTransport::new();
		mock.enqueue(redirect_with_headers(&[(
			"set-cookie",
			"JSESSIONID=node0abc123; Path=/; Secure; HttpOnly",
		)]));

		let session = client_with(&mock).login("user", "password").unwrap();
		assert_eq!(session.handle.session_token, "node0abc123");
		assert_eq!(session.deployment_uri(), "https://dbc-123.example.com");
	}

	#[test]
	fn login_posts_form_encoded_credentials_without_following_redirects() {
		let mock = MockTransport::new();
		mock.enqueue(redirect_with_headers(&[("set-cookie", "JSESSIONID=t")]));

		client_with(&mock).login("alice", "s3cret").unwrap();

		let requests = mock.requests();
		assert_eq!(requests.len(), 1);
		let request = &requests[0];
		assert_eq!(request.url, "https://dbc-123.example.com/j_security_check");
		assert_eq!(
			request.body.as_deref(),
			Some("j_username=alice&j_password=s3cret")
		);
		assert!(!request.follow_redirects);
		assert!(request.session_token.is_none());
		assert!(request
			.headers
			.contains(&("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())));
		assert_eq!(request.timeout, Duration::from_secs(60));
	}

	#[test]
	fn login_without_set_cookie_fails_with_authentication_error() {
		let mock = MockTransport::new();
		mock.enqueue(redirect_with_headers(&[("location", "/login-failed")]));

		let result = client_with(&mock).login("user", "wrong");
		assert!(matches!(result, Err(ClientError::Authentication)));
	}

	#[test]
	fn login_without_session_fragment_fails_with_authentication_error() {
		let mock = MockTransport::new();
		mock.enqueue(redirect_with_headers(&[(
			"set-cookie",
			"theme=dark; Path=/",
		)]));

		let result = client_with(&mock).login("user", "password");
		assert!(matches!(result, Err(ClientError::Authentication)));
	}

	#[test]
	fn login_accepts_cookie_on_final_response() {
		// Some deployments answer 200 instead of redirecting; the cookie is
		// read from whichever outcome the transport produced.
		let mock = MockTransport::new();
		mock.enqueue(SendOutcome::Response(skiff_http::HttpResponse {
			status: 200,
			headers: HashMap::from([(
				"set-cookie".to_string(),
				"JSESSIONID=direct; Path=/".to_string(),
			)]),
			body: String::new(),
		}));

		let session = client_with(&mock).login("user", "password").unwrap();
		assert_eq!(session.handle.session_token, "direct");
	}

	#[test]
	fn extract_takes_last_session_fragment() {
		// Joined repeated Set-Cookie headers: the last JSESSIONID wins,
		// matching cookie replacement semantics.
		let token = extract_session_token("JSESSIONID=stale; Path=/, JSESSIONID=fresh; Path=/");
		assert_eq!(token.as_deref(), Some("fresh"));
	}

	#[test]
	fn extract_trims_whitespace_around_token() {
		let token = extract_session_token("JSESSIONID= padded ; Path=/");
		assert_eq!(token.as_deref(), Some("padded"));
	}

	#[test]
	fn extract_ignores_cookie_attributes_and_other_cookies() {
		let value = "theme=dark; Path=/, JSESSIONID=tok123; Path=/; Secure; HttpOnly";
		assert_eq!(extract_session_token(value).as_deref(), Some("tok123"));
	}

	#[test]
	fn extract_requires_exact_cookie_name() {
		assert_eq!(extract_session_token("JSESSIONID2=evil; Path=/"), None);
		assert_eq!(extract_session_token("XJSESSIONID=evil; Path=/"), None);
	}

	#[test]
	fn session_handle_debug_redacts_token() {
		let handle = SessionHandle {
			deployment_uri: "https://dbc-123.example.com".to_string(),
			session_token: "supersecret".to_string(),
		};
		let debug = format!("{handle:?}");
		assert!(!debug.contains("supersecret"));
		assert!(debug.contains("[REDACTED]"));
	}

	#[test]
	fn list_workspaces_maps_descriptors() {
		let mock = MockTransport::new();
		mock.enqueue(redirect_with_headers(&[("set-cookie", "JSESSIONID=tok")]));
		mock.enqueue(SendOutcome::Response(skiff_http::HttpResponse {
			status: 200,
			headers: HashMap::new(),
			body: r#"[{"owner":"a","name":"w1","deploymentName":"d1","orgId":1,"needsConfirmation":false}]"#
				.to_string(),
		}));

		let session = client_with(&mock).login("user", "password").unwrap();
		let workspaces = session.list_workspaces().unwrap();

		assert_eq!(workspaces.len(), 1);
		assert_eq!(workspaces[0].name(), "w1");
		assert_eq!(workspaces[0].owner(), "a");
		assert_eq!(workspaces[0].deployment_name(), "d1");
		assert_eq!(*workspaces[0].org_id(), 1);
		assert!(!workspaces[0].needs_confirmation());
	}

	#[test]
	fn list_workspaces_attaches_session_cookie_and_json_headers() {
		let mock = MockTransport::new();
		mock.enqueue(redirect_with_headers(&[("set-cookie", "JSESSIONID=tok")]));
		mock.enqueue(SendOutcome::Response(skiff_http::HttpResponse {
			status: 200,
			headers: HashMap::new(),
			body: "[]".to_string(),
		}));

		let session = client_with(&mock).login("user", "password").unwrap();
		assert!(session.list_workspaces().unwrap().is_empty());

		let request = &mock.requests()[1];
		assert_eq!(request.url, "https://dbc-123.example.com/workspaces");
		assert_eq!(request.session_token.as_deref(), Some("tok"));
		assert!(request.follow_redirects);
		assert!(request
			.headers
			.contains(&("Content-Type".to_string(), "application/json".to_string())));
	}

	#[test]
	fn list_workspaces_rejects_malformed_json() {
		let mock = MockTransport::new();
		mock.enqueue(redirect_with_headers(&[("set-cookie", "JSESSIONID=tok")]));
		mock.enqueue(SendOutcome::Response(skiff_http::HttpResponse {
			status: 200,
			headers: HashMap::new(),
			body: "{\"not\": \"an array\"}".to_string(),
		}));

		let session = client_with(&mock).login("user", "password").unwrap();
		assert!(matches!(
			session.list_workspaces(),
			Err(ClientError::Parse(_))
		));
	}
}

#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;
	use std::sync::Arc;

	proptest! {
		/// Any token wrapped in standard cookie attributes is recovered
		/// exactly, with no surrounding whitespace or quoting artifacts.
		#[test]
		fn token_roundtrips_through_set_cookie(token in "[A-Za-z0-9_.-]{1,64}") {
			let value = format!("JSESSIONID={token}; Path=/; Secure; HttpOnly");
			let extracted = extract_session_token(&value);
			prop_assert_eq!(extracted.as_deref(), Some(token.as_str()));
		}

		/// Login always form-encodes credentials as j_username/j_password.
		#[test]
		fn login_body_is_form_encoded(
			username in "[a-zA-Z0-9]{1,20}",
			password in "[a-zA-Z0-9]{1,20}",
		) {
			let mock = skiff_http::MockTransport::new();
			mock.enqueue(SendOutcome::Redirect {
				status: 303,
				headers: [("set-cookie".to_string(), "JSESSIONID=t".to_string())]
					.into_iter()
					.collect(),
			});

			let client = DeploymentClient::with_transport(
				"https://dbc-123.example.com",
				Arc::new(mock.clone()),
			);
			client.login(&username, &password).unwrap();

			let body = mock.requests()[0].body.clone().unwrap();
			prop_assert_eq!(body, format!("j_username={username}&j_password={password}"));
		}

		/// set-cookie values without a JSESSIONID fragment never yield a token.
		#[test]
		fn unrelated_cookies_never_yield_token(name in "[a-z]{1,12}", value in "[a-zA-Z0-9]{1,24}") {
			let header = format!("{name}={value}; Path=/");
			prop_assert_eq!(extract_session_token(&header), None);
		}
	}
}
