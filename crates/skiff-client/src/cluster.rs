// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Immutable cluster snapshot.

use std::collections::HashMap;

use serde::Deserialize;

/// Shape of the cluster-list endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct ClusterListResponse {
	pub(crate) clusters: Vec<ClusterRecord>,
}

/// Immutable snapshot of one compute cluster.
///
/// Deserialized from one element of the cluster-list response; every field is
/// required, so a response missing any of them fails parsing. Mapping-valued
/// fields are only exposed as fresh copies so callers can never mutate the
/// record's internal state.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterRecord {
	#[serde(rename = "cluster_id")]
	id: String,
	#[serde(rename = "cluster_name")]
	name: String,
	spark_version: String,
	spark_context_id: String,
	spark_conf: HashMap<String, String>,
	spark_env_vars: HashMap<String, String>,
	aws_attributes: HashMap<String, String>,
	#[serde(rename = "driver_node_type_id")]
	driver_node_type: String,
	#[serde(rename = "node_type_id")]
	worker_node_type: String,
	num_workers: u32,
	#[serde(rename = "creator_user_name")]
	creator: String,
	state: String,
}

impl ClusterRecord {
	/// Cluster identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Cluster display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Spark runtime version.
	pub fn spark_version(&self) -> &str {
		&self.spark_version
	}

	/// Spark context identifier.
	pub fn spark_context_id(&self) -> &str {
		&self.spark_context_id
	}

	/// Spark configuration; returns a fresh copy on every call.
	pub fn spark_conf(&self) -> HashMap<String, String> {
		self.spark_conf.clone()
	}

	/// Spark environment variables; returns a fresh copy on every call.
	pub fn spark_env_vars(&self) -> HashMap<String, String> {
		self.spark_env_vars.clone()
	}

	/// AWS attributes; returns a fresh copy on every call.
	pub fn aws_attributes(&self) -> HashMap<String, String> {
		self.aws_attributes.clone()
	}

	/// Node type of the driver.
	pub fn driver_node_type(&self) -> &str {
		&self.driver_node_type
	}

	/// Node type of the workers.
	pub fn worker_node_type(&self) -> &str {
		&self.worker_node_type
	}

	/// Number of worker nodes.
	pub fn num_workers(&self) -> u32 {
		self.num_workers
	}

	/// User who created the cluster.
	pub fn creator(&self) -> &str {
		&self.creator
	}

	/// Current runtime state, e.g. `RUNNING` or `TERMINATED`.
	pub fn state(&self) -> &str {
		&self.state
	}
}
