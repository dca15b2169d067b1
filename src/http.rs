//! Transport primitives for remote web-service calls.
//!
//! The module exposes [`WsHttpClient`] as the crate's only dependency on an HTTP stack. A
//! transport POSTs one url-encoded form body and hands back whatever bytes the remote
//! returned; the body is trusted regardless of HTTP status because the remote encodes failure
//! inside the JSON payload. Only connection-level problems surface as
//! [`TransportError`](crate::error::TransportError). There is no built-in retry, and no
//! timeout unless one is configured at this boundary.

pub mod form;

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
#[cfg(feature = "reqwest")] use std::time::Duration;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::CONTENT_TYPE;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`WsHttpClient::post_form`].
pub type PostFormFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>>;

/// Abstraction over HTTP transports capable of POSTing url-encoded form bodies to the remote
/// site.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared across
/// concurrent authentication attempts behind an `Arc` without additional wrappers.
pub trait WsHttpClient
where
	Self: 'static + Send + Sync,
{
	/// POSTs an `application/x-www-form-urlencoded` body and returns the raw response bytes.
	fn post_form(&self, url: Url, body: String) -> PostFormFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The default client carries no request timeout, matching the remote protocol; a hung remote
/// call therefore hangs the login attempt unless the host bounds it with
/// [`ReqwestHttpClient::with_timeout`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests abort after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().timeout(timeout).build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl WsHttpClient for ReqwestHttpClient {
	fn post_form(&self, url: Url, body: String) -> PostFormFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.post(url)
				.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
				.body(body)
				.send()
				.await
				.map_err(TransportError::from)?;

			Ok(response.bytes().await.map_err(TransportError::from)?.to_vec())
		})
	}
}
