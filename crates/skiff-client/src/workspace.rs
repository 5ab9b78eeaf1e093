// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Per-workspace session with lazily-cached configuration.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use skiff_http::{Request, Transport};

use crate::client::{expect_response, SessionHandle};
use crate::cluster::{ClusterListResponse, ClusterRecord};
use crate::error::ClientError;
use crate::{CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE};

const CONFIG_PATH: &str = "/config";
const CLUSTERS_LIST_PATH: &str = "/ajax-api/2.0/clusters/list";

/// Tenant-scoping header carried on workspace-level calls.
const ORG_ID_HEADER: &str = "X-Databricks-Org-Id";
/// Anti-forgery header required by the cluster endpoints.
const CSRF_TOKEN_HEADER: &str = "X-CSRF-Token";
/// Key under which the workspace config carries its CSRF token.
const CSRF_TOKEN_KEY: &str = "csrfToken";

// =============================================================================
// OrgId
// =============================================================================

/// Organization (workspace tenant) identifier.
///
/// The workspace-list endpoint reports this as either a JSON number or a
/// string depending on deployment vintage; both forms are accepted and the
/// `Display` rendering is what goes on the wire as the org-id header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrgId {
	/// Numeric form, e.g. `1234567890`.
	Number(i64),
	/// String form, e.g. `"1234567890"`.
	Text(String),
}

impl fmt::Display for OrgId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrgId::Number(n) => write!(f, "{n}"),
			OrgId::Text(s) => write!(f, "{s}"),
		}
	}
}

impl From<i64> for OrgId {
	fn from(n: i64) -> Self {
		OrgId::Number(n)
	}
}

impl From<&str> for OrgId {
	fn from(s: &str) -> Self {
		OrgId::Text(s.to_string())
	}
}

impl PartialEq<i64> for OrgId {
	fn eq(&self, other: &i64) -> bool {
		matches!(self, OrgId::Number(n) if n == other)
	}
}

impl PartialEq<&str> for OrgId {
	fn eq(&self, other: &&str) -> bool {
		matches!(self, OrgId::Text(s) if s == other)
	}
}

// =============================================================================
// WorkspaceDescriptor
// =============================================================================

/// One element of the workspace-list response. Immutable after construction.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceDescriptor {
	/// Workspace owner.
	pub owner: String,
	/// Workspace display name.
	pub name: String,
	/// Deployment name the workspace lives under.
	#[serde(rename = "deploymentName")]
	pub deployment_name: String,
	/// Organization id scoping the workspace.
	#[serde(rename = "orgId")]
	pub org_id: OrgId,
	/// Whether the workspace still requires owner confirmation.
	#[serde(rename = "needsConfirmation")]
	pub needs_confirmation: bool,
}

// =============================================================================
// WorkspaceConfig
// =============================================================================

/// Opaque workspace configuration mapping.
///
/// The control plane returns a large, undocumented JSON object here; the only
/// key this client depends on is the CSRF token. Everything else is exposed
/// for callers to inspect via [`get`](WorkspaceConfig::get).
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceConfig(serde_json::Map<String, Value>);

impl WorkspaceConfig {
	/// Look up a raw configuration value by key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// The per-workspace anti-forgery token, if the config carries one.
	pub fn csrf_token(&self) -> Option<&str> {
		self.0.get(CSRF_TOKEN_KEY).and_then(Value::as_str)
	}
}

// =============================================================================
// WorkspaceSession
// =============================================================================

/// Authenticated access to one workspace.
///
/// Holds the workspace descriptor, a shared read-only reference to the
/// session that produced it, and a one-shot configuration cache. The config
/// (which carries the CSRF token the cluster endpoints require) is fetched
/// on first access and kept for the lifetime of this instance; there is no
/// invalidation and no refetch.
pub struct WorkspaceSession {
	descriptor: WorkspaceDescriptor,
	session: Arc<SessionHandle>,
	transport: Arc<dyn Transport>,
	config: Mutex<Option<WorkspaceConfig>>,
}

impl WorkspaceSession {
	pub(crate) fn new(
		descriptor: WorkspaceDescriptor,
		session: Arc<SessionHandle>,
		transport: Arc<dyn Transport>,
	) -> Self {
		Self {
			descriptor,
			session,
			transport,
			config: Mutex::new(None),
		}
	}

	/// Workspace owner.
	pub fn owner(&self) -> &str {
		&self.descriptor.owner
	}

	/// Workspace display name.
	pub fn name(&self) -> &str {
		&self.descriptor.name
	}

	/// Deployment name the workspace lives under.
	pub fn deployment_name(&self) -> &str {
		&self.descriptor.deployment_name
	}

	/// Organization id scoping this workspace.
	pub fn org_id(&self) -> &OrgId {
		&self.descriptor.org_id
	}

	/// Whether the workspace still requires owner confirmation.
	pub fn needs_confirmation(&self) -> bool {
		self.descriptor.needs_confirmation
	}

	/// The workspace configuration, fetched lazily and cached.
	///
	/// The first call GETs the config endpoint with the session cookie and
	/// org-id header; every later call returns the cached value without a
	/// network round trip. The lock is held across the fetch so concurrent
	/// first reads do not issue duplicate requests.
	///
	/// A config without a CSRF token is not an error here; the token is only
	/// required (and checked) when a cluster call needs it.
	///
	/// # Errors
	///
	/// - [`ClientError::Transport`]: the request failed.
	/// - [`ClientError::Parse`]: the body was not a JSON object.
	#[tracing::instrument(skip(self), name = "WorkspaceSession::config", fields(workspace = %self.descriptor.name))]
	pub fn config(&self) -> Result<WorkspaceConfig, ClientError> {
		let mut cached = self.config.lock().expect("workspace config lock poisoned");
		if let Some(config) = cached.as_ref() {
			return Ok(config.clone());
		}

		tracing::debug!(org_id = %self.descriptor.org_id, "fetching workspace configuration");
		let request = Request::get(format!("{}{}", self.session.deployment_uri, CONFIG_PATH))
			.header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
			.header(ORG_ID_HEADER, self.descriptor.org_id.to_string())
			.session_token(&self.session.session_token);

		let response = expect_response(self.transport.send(request)?)?;
		let config: WorkspaceConfig = serde_json::from_str(&response.body)
			.map_err(|e| ClientError::Parse(format!("failed to parse workspace config: {e}")))?;

		*cached = Some(config.clone());
		Ok(config)
	}

	/// List the compute clusters in this workspace.
	///
	/// Reads the CSRF token from the (lazily fetched) workspace config and
	/// sends it alongside the session cookie and org-id header.
	///
	/// # Errors
	///
	/// - [`ClientError::Transport`]: a request failed.
	/// - [`ClientError::Parse`]: the cached config has no `csrfToken` field,
	///   or the response body did not match the expected
	///   `{ "clusters": [...] }` shape.
	#[tracing::instrument(skip(self), name = "WorkspaceSession::list_clusters", fields(workspace = %self.descriptor.name))]
	pub fn list_clusters(&self) -> Result<Vec<ClusterRecord>, ClientError> {
		let config = self.config()?;
		let csrf_token = config
			.csrf_token()
			.ok_or_else(|| {
				ClientError::Parse(format!(
					"workspace config has no {CSRF_TOKEN_KEY} field"
				))
			})?
			.to_string();

		tracing::debug!("listing clusters");
		let request = Request::get(format!(
			"{}{}",
			self.session.deployment_uri, CLUSTERS_LIST_PATH
		))
		.header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
		.header(ORG_ID_HEADER, self.descriptor.org_id.to_string())
		.header(CSRF_TOKEN_HEADER, csrf_token)
		.session_token(&self.session.session_token);

		let response = expect_response(self.transport.send(request)?)?;
		let listing: ClusterListResponse = serde_json::from_str(&response.body)
			.map_err(|e| ClientError::Parse(format!("failed to parse cluster list: {e}")))?;

		Ok(listing.clusters)
	}
}
