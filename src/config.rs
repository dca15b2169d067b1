//! Connection settings for the remote site and the configuration gate evaluated before any
//! remote call is attempted.

// self
use crate::{_prelude::*, error::ConfigError};

/// Web service function invoked on the remote site to look up a user's profile.
pub const WS_FUNCTION: &str = "core_user_get_users_by_field";
/// Remote field the profile lookup matches on unless the host overrides it.
pub const DEFAULT_LOOKUP_FIELD: &str = "username";

const REST_SERVER_PATH: &str = "/webservice/rest/server.php";

/// Remote platform variants with distinct token endpoint conventions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerVariant {
	#[default]
	/// Stock Moodle site issuing tokens from `/login/token.php`.
	Moodle,
	/// Totara site issuing tokens from the connect plugin's script.
	Totara,
}
impl ServerVariant {
	/// Returns the token script path used by this variant.
	pub const fn token_path(self) -> &'static str {
		match self {
			ServerVariant::Moodle => "/login/token.php",
			ServerVariant::Totara => "/local/moodle_connect/token.php",
		}
	}
}

/// Immutable connection settings consumed by one authentication attempt.
///
/// The host's settings storage owns the persisted values; a config is rebuilt per attempt and
/// never mutated afterwards, so concurrent attempts can share it freely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
	/// Base URL of the remote site, with or without an explicit scheme.
	pub base_url: String,
	/// Web service token authorizing profile-lookup gateway calls.
	pub access_token: String,
	/// Name of the external service the token exchange authenticates against.
	pub service_name: String,
	/// Whether custom profile fields are mirrored into the local record.
	pub sync_custom_fields: bool,
	/// Token endpoint convention used by the remote platform.
	pub server_variant: ServerVariant,
	/// Remote field the profile lookup matches on; defaults to the username.
	pub lookup_field: String,
}
impl ConnectionConfig {
	/// Creates a config with the provided base URL and access token; custom-field sync is
	/// enabled and the lookup field is [`DEFAULT_LOOKUP_FIELD`].
	pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			access_token: access_token.into(),
			service_name: String::new(),
			sync_custom_fields: true,
			server_variant: ServerVariant::default(),
			lookup_field: DEFAULT_LOOKUP_FIELD.into(),
		}
	}

	/// Sets the external service name sent with token requests.
	pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
		self.service_name = service_name.into();

		self
	}

	/// Enables or disables mirroring of custom profile fields.
	pub fn with_sync_custom_fields(mut self, sync_custom_fields: bool) -> Self {
		self.sync_custom_fields = sync_custom_fields;

		self
	}

	/// Overrides the remote platform variant.
	pub fn with_server_variant(mut self, server_variant: ServerVariant) -> Self {
		self.server_variant = server_variant;

		self
	}

	/// Overrides the remote field the profile lookup matches on.
	pub fn with_lookup_field(mut self, lookup_field: impl Into<String>) -> Self {
		self.lookup_field = lookup_field.into();

		self
	}

	/// Checks that the minimum settings required for remote calls are present.
	pub fn is_configured(&self) -> bool {
		!self.access_token.is_empty() && !self.base_url.is_empty()
	}

	/// Checks that the external service name setting is present.
	pub fn is_service_configured(&self) -> bool {
		!self.service_name.is_empty()
	}

	/// Builds the token endpoint URL for the configured server variant.
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		if self.base_url.is_empty() {
			return Err(ConfigError::MissingBaseUrl);
		}

		let raw =
			format!("{}{}", normalize_base_url(&self.base_url), self.server_variant.token_path());

		Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { url: raw, source })
	}

	/// Builds the profile-lookup gateway URL, including the access token and the REST format
	/// query parameters.
	pub fn profile_endpoint(&self) -> Result<Url, ConfigError> {
		if self.access_token.is_empty() {
			return Err(ConfigError::MissingAccessToken);
		}
		if self.base_url.is_empty() {
			return Err(ConfigError::MissingBaseUrl);
		}

		let raw = format!("{}{REST_SERVER_PATH}", normalize_base_url(&self.base_url));
		let mut url =
			Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { url: raw, source })?;

		url.query_pairs_mut()
			.append_pair("wstoken", &self.access_token)
			.append_pair("wsfunction", WS_FUNCTION)
			.append_pair("moodlewsrestformat", "json");

		Ok(url)
	}
}

/// Prefixes plain `http://` when the configured URL carries no `http` scheme prefix and strips
/// exactly one trailing slash. Normalizing an already-normalized URL is a no-op.
pub fn normalize_base_url(url: &str) -> String {
	let prefixed =
		if url.starts_with("http") { url.to_owned() } else { format!("http://{url}") };

	match prefixed.strip_suffix('/') {
		Some(stripped) => stripped.to_owned(),
		None => prefixed,
	}
}
