//! Authentication orchestrator sequencing the token exchange and the profile lookup.
//!
//! One login attempt walks a fixed state machine: verify credentials at the remote token
//! endpoint, then confirm the canonical profile exists through the web-service gateway, and
//! only then report authentication granted. A failed token exchange never issues the profile
//! call, and a failed profile lookup after a successful exchange denies the whole attempt.
//! Profile refreshes after an already-granted login degrade gracefully instead: their
//! failures emit an audit event but never flip the login back to denied.

// self
use crate::{
	_prelude::*,
	config::ConnectionConfig,
	event::{AuditEvent, AuditKind, AuditSink},
	http::{
		WsHttpClient,
		form::{self, FormValue},
	},
	obs::{self, StageKind, StageOutcome, StageSpan},
	profile::{NormalizedProfile, normalize_profile},
	validate::{self, ProfileQueryResult, TokenResult},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Authentication method identifier recorded on local user records managed by this crate.
pub const AUTH_METHOD: &str = "accountsync";

/// Minimal view of the local user record needed by the post-authentication sync hook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
	/// Host-side user record identifier.
	pub id: i64,
	/// Authentication method recorded on the local record.
	pub auth_method: String,
}

#[cfg(feature = "reqwest")]
/// Authenticator specialized for the crate's default reqwest transport.
pub type ReqwestAuthenticator = Authenticator<ReqwestHttpClient>;

/// Coordinates one login attempt against the remote site.
///
/// The authenticator owns the connection settings, the HTTP transport, and the audit sink so
/// the host-facing operations can focus on the decision sequence, emitting one audit event at
/// each decision point. Errors never cross this boundary: every failure collapses into a
/// denial or an empty profile plus a recorded event, and the host surfaces nothing more than
/// an invalid-credentials message to end users.
#[derive(Clone)]
pub struct Authenticator<C>
where
	C: ?Sized + WsHttpClient,
{
	/// Immutable connection settings shared by every call of the attempt.
	pub config: ConnectionConfig,
	/// HTTP transport used for every outbound call.
	pub http_client: Arc<C>,
	/// Audit sink receiving the decision trail.
	pub audit: Arc<dyn AuditSink>,
}
impl<C> Authenticator<C>
where
	C: ?Sized + WsHttpClient,
{
	/// Creates an authenticator that reuses the caller-provided transport.
	pub fn with_http_client(
		config: ConnectionConfig,
		http_client: impl Into<Arc<C>>,
		audit: Arc<dyn AuditSink>,
	) -> Self {
		Self { config, http_client: http_client.into(), audit }
	}

	/// Verifies the credentials against the remote token endpoint and, on success, confirms
	/// the remote profile exists.
	///
	/// Returns `true` only when the remote issued a token and the profile lookup matched; the
	/// reason for any denial is recorded in the audit trail, never returned to the caller.
	pub async fn verify_credentials(&self, username: &str, password: &str) -> bool {
		const KIND: StageKind = StageKind::Login;

		let span = StageSpan::new(KIND, "verify_credentials");

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);

		let granted = span.instrument(self.verify_credentials_inner(username, password)).await;

		obs::record_stage_outcome(
			KIND,
			if granted { StageOutcome::Success } else { StageOutcome::Failure },
		);

		granted
	}

	async fn verify_credentials_inner(&self, username: &str, password: &str) -> bool {
		if !self.config.is_configured() {
			self.audit.emit(AuditEvent::new(
				AuditKind::LoginFailed,
				format!(
					"Failed login attempt for username: {username}. The connection settings are incomplete",
				),
			));

			return false;
		}

		obs::record_stage_outcome(StageKind::TokenExchange, StageOutcome::Attempt);

		let response = match self.request_token(username, password).await {
			Ok(response) => response,
			Err(_) => {
				obs::record_stage_outcome(StageKind::TokenExchange, StageOutcome::Failure);
				self.audit.emit(AuditEvent::new(
					AuditKind::LoginFailed,
					format!(
						"Failed login attempt for username: {username}. Remote did not return with an array data structure",
					),
				));

				return false;
			},
		};
		let token = match validate::validate_token_response(&response) {
			TokenResult::Failure { error_code, debug_info } => {
				obs::record_stage_outcome(StageKind::TokenExchange, StageOutcome::Failure);
				self.audit.emit(AuditEvent::new(
					AuditKind::LoginFailed,
					format!(
						"Failed login attempt for username: {username}. Error title: {error_code}. Debug info: {debug_info}",
					),
				));

				return false;
			},
			TokenResult::Success { token } => token,
		};

		obs::record_stage_outcome(StageKind::TokenExchange, StageOutcome::Success);

		// The token endpoint already issued the token, so recording it here only mirrors what
		// the remote handed out.
		self.audit.emit(AuditEvent::new(
			AuditKind::RemoteTokenReturned,
			format!("Login attempt for username: {username}. Token returned from remote: {token}"),
		));

		// A token alone is not enough: the canonical profile must exist before the host can
		// create or refresh the local record, so a failed lookup denies the whole attempt.
		match self.lookup_remote_profile(username).await {
			ProfileQueryResult::Found(_) => true,
			other => {
				let reason = other.failure_message(&self.config.lookup_field).unwrap_or_default();

				self.audit.emit(AuditEvent::new(
					AuditKind::LoginFailed,
					format!("Failed login attempt for username: {username}. Reason: {reason}"),
				));

				false
			},
		}
	}

	/// Fetches and normalizes the remote profile without a credential check, for the host's
	/// create-account-from-external-source flow.
	///
	/// Lookup failures degrade gracefully: a [`ProfileSyncError`](AuditKind::ProfileSyncError)
	/// event is emitted and an empty profile is returned so the host's fallback applies.
	pub async fn get_userinfo(&self, username: &str) -> NormalizedProfile {
		const KIND: StageKind = StageKind::ProfileSync;

		let span = StageSpan::new(KIND, "get_userinfo");

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);

		match span.instrument(self.lookup_remote_profile(username)).await {
			ProfileQueryResult::Found(raw) => {
				obs::record_stage_outcome(KIND, StageOutcome::Success);

				normalize_profile(&raw, self.config.sync_custom_fields)
			},
			_ => {
				obs::record_stage_outcome(KIND, StageOutcome::Failure);
				self.audit.emit(AuditEvent::new(
					AuditKind::ProfileSyncError,
					"Response object of web service call contained an error. Unable to sync profile fields from remote.",
				));

				NormalizedProfile::default()
			},
		}
	}

	/// Refreshes profile fields after a successful authentication, covering multi-plugin
	/// chains where verification happened elsewhere.
	///
	/// Only acts on users whose recorded authentication method is [`AUTH_METHOD`]. Lookup
	/// failures emit a [`ProfileSyncError`](AuditKind::ProfileSyncError) event and return
	/// `None` without affecting the already-granted login; on success the fresh profile is
	/// returned for the host to persist.
	pub async fn sync_profile_after_login(
		&self,
		user: &LocalUser,
		username: &str,
	) -> Option<NormalizedProfile> {
		if user.auth_method != AUTH_METHOD {
			return None;
		}

		const KIND: StageKind = StageKind::ProfileSync;

		let span = StageSpan::new(KIND, "sync_profile_after_login");

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);

		match span.instrument(self.lookup_remote_profile(username)).await {
			ProfileQueryResult::Found(raw) => {
				obs::record_stage_outcome(KIND, StageOutcome::Success);

				Some(normalize_profile(&raw, self.config.sync_custom_fields))
			},
			_ => {
				obs::record_stage_outcome(KIND, StageOutcome::Failure);
				self.audit.emit(AuditEvent::new(
					AuditKind::ProfileSyncError,
					"Response object of web service call contained an error. Unable to sync profile fields from remote. (2)",
				));

				None
			},
		}
	}

	/// Queries the remote gateway for the user's profile and classifies the response.
	///
	/// Every non-match outcome emits a [`WebServiceError`](AuditKind::WebServiceError) event
	/// before returning. Transport and decode failures classify as malformed, matching a
	/// garbled response body.
	pub async fn lookup_remote_profile(&self, username: &str) -> ProfileQueryResult {
		const KIND: StageKind = StageKind::ProfileLookup;

		let span = StageSpan::new(KIND, "lookup_remote_profile");

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);

		let result = match span.instrument(self.lookup_remote_profile_inner(username)).await {
			Ok(result) => result,
			Err(Error::Config(e)) => {
				obs::record_stage_outcome(KIND, StageOutcome::Failure);
				self.audit.emit(AuditEvent::new(AuditKind::WebServiceError, e.to_string()));

				return ProfileQueryResult::Malformed;
			},
			Err(_) => ProfileQueryResult::Malformed,
		};

		obs::record_stage_outcome(
			KIND,
			if result.is_found() { StageOutcome::Success } else { StageOutcome::Failure },
		);

		if let Some(message) = result.failure_message(&self.config.lookup_field) {
			self.audit.emit(AuditEvent::new(AuditKind::WebServiceError, message));
		}

		result
	}

	async fn lookup_remote_profile_inner(&self, username: &str) -> Result<ProfileQueryResult> {
		let url = self.config.profile_endpoint()?;
		let body = form::encode_form(&[
			("field".into(), FormValue::from(self.config.lookup_field.as_str())),
			("values".into(), FormValue::Seq(vec![FormValue::from(username)])),
		]);
		let bytes = self.http_client.post_form(url, body).await?;
		let value = validate::decode_json(&bytes)?;

		Ok(validate::validate_profile_response(value))
	}

	async fn request_token(&self, username: &str, password: &str) -> Result<Value> {
		let url = self.config.token_endpoint()?;
		// The password travels only inside the POST body; it never reaches a log line or an
		// audit message.
		let body = form::encode_form(&[
			("username".into(), FormValue::from(username)),
			("password".into(), FormValue::from(password)),
			("service".into(), FormValue::from(self.config.service_name.as_str())),
		]);
		let bytes = self.http_client.post_form(url, body).await?;

		Ok(validate::decode_json(&bytes)?)
	}

	/// Accounts verified here are managed by the remote site; local password maintenance is
	/// never permitted.
	pub const fn is_remote_managed_account(&self) -> bool {
		true
	}

	/// The credential store is external, not the host's internal one.
	pub const fn is_internal(&self) -> bool {
		false
	}

	/// Local password changes are not permitted.
	pub const fn can_change_password(&self) -> bool {
		false
	}

	/// There is no external password-change URL to hand users to.
	pub const fn change_password_url(&self) -> Option<Url> {
		None
	}

	/// Local password resets are not permitted.
	pub const fn can_reset_password(&self) -> bool {
		false
	}

	/// Administrators may assign this method to accounts manually.
	pub const fn can_be_manually_set(&self) -> bool {
		true
	}

	/// Whether the host should automatically refresh local records with
	/// [`get_userinfo`](Self::get_userinfo) data.
	pub fn is_synchronised_with_external(&self) -> bool {
		self.config.sync_custom_fields
	}
}
#[cfg(feature = "reqwest")]
impl Authenticator<ReqwestHttpClient> {
	/// Creates an authenticator with the crate's default reqwest transport.
	///
	/// The default transport carries no request timeout; use
	/// [`Authenticator::with_http_client`] together with
	/// [`ReqwestHttpClient::with_timeout`] to bound hung remote calls.
	pub fn new(config: ConnectionConfig, audit: Arc<dyn AuditSink>) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default(), audit)
	}
}
impl<C> Debug for Authenticator<C>
where
	C: ?Sized + WsHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("base_url", &self.config.base_url)
			.field("server_variant", &self.config.server_variant)
			.field("lookup_field", &self.config.lookup_field)
			.finish()
	}
}
