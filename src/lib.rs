//! Remote-account authentication and profile sync - verify credentials against a
//! Moodle-compatible site over HTTP and mirror standard plus custom profile fields into the
//! local user record.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

#[cfg(test)]
use accountsync as _;

pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod http;
pub mod obs;
pub mod policy;
pub mod profile;
pub mod validate;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Authenticator, config::ConnectionConfig, event::CaptureSink, http::ReqwestHttpClient,
	};

	/// Authenticator type alias used by reqwest-backed integration tests.
	pub type ReqwestTestAuthenticator = Authenticator<ReqwestHttpClient>;

	/// Builds a connection config pointed at a mock remote site.
	pub fn test_config(base_url: &str) -> ConnectionConfig {
		ConnectionConfig::new(base_url, "1x2x3").with_service_name("service_name")
	}

	/// Constructs an [`Authenticator`] wired to a [`CaptureSink`] and the default reqwest
	/// transport, returning both so tests can inspect the emitted audit trail.
	pub fn build_test_authenticator(
		config: ConnectionConfig,
	) -> (ReqwestTestAuthenticator, Arc<CaptureSink>) {
		let sink = Arc::new(CaptureSink::default());
		let authenticator = Authenticator::new(config, sink.clone());

		(authenticator, sink)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
