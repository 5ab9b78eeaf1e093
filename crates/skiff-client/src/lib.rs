// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Session-cookie client for the Databricks workspace control plane.
//!
//! The control plane exposes no documented API; this client drives the same
//! form-login and JSON endpoints the web UI uses. Authentication is a
//! two-step handshake: POST credentials to the security-check path with
//! redirect following disabled, then harvest the `JSESSIONID` session cookie
//! from the captured 303 redirect. Every subsequent call replays that cookie.
//!
//! # The Flow
//!
//! ```text
//! DeploymentClient::login(user, password)
//!     │  POST /j_security_check (redirects disabled)
//!     │  <- 303 + Set-Cookie: JSESSIONID=<token>
//!     ▼
//! Session ── list_workspaces() ──> Vec<WorkspaceSession>
//!                                      │  config()        GET /config (lazy, cached)
//!                                      │  list_clusters() GET /ajax-api/2.0/clusters/list
//!                                      ▼
//!                                  Vec<ClusterRecord>
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use skiff_client::DeploymentClient;
//!
//! # fn example() -> Result<(), skiff_client::ClientError> {
//! let client = DeploymentClient::new("https://dbc-123.cloud.databricks.com");
//! let session = client.login("user@example.com", "password")?;
//!
//! for workspace in session.list_workspaces()? {
//!     for cluster in workspace.list_clusters()? {
//!         println!("{} is {}", cluster.name(), cluster.state());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Caching
//!
//! Per-workspace configuration (which carries the CSRF token needed by the
//! cluster endpoints) is fetched lazily on first access and cached for the
//! lifetime of the [`WorkspaceSession`]. There is no invalidation path;
//! staleness is accepted by design.
//!
//! # Errors
//!
//! Every operation either fully succeeds or fails with a [`ClientError`]:
//! transport faults propagate unchanged, a login that produces no session
//! cookie fails with [`ClientError::Authentication`], and responses that do
//! not match the expected JSON shape fail with [`ClientError::Parse`].
//! Nothing is retried.

mod client;
mod cluster;
mod error;
mod workspace;

pub use client::{DeploymentClient, Session};
pub use cluster::ClusterRecord;
pub use error::ClientError;
pub use workspace::{OrgId, WorkspaceConfig, WorkspaceDescriptor, WorkspaceSession};

pub(crate) const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";
