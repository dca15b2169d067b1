//! Response-shape validation for the two remote endpoints.
//!
//! The remote's form of failure reporting varies by endpoint and by failure mode, so every
//! decoded response is classified into an explicit tagged variant by shape predicates
//! evaluated in a fixed priority order; an ambiguous response can only ever match one outcome.

// self
use crate::{_prelude::*, error::DecodeError};

/// Error title and debug text reported when the token response has an unexpected shape.
pub const INCORRECT_DATA_STRUCTURE: &str = "Incorrect data structure";

/// Decodes a raw response body into JSON, keeping the failing path for diagnostics.
pub fn decode_json(bytes: &[u8]) -> Result<Value, DecodeError> {
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| DecodeError { source })
}

/// Outcome of validating the token endpoint's response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenResult {
	/// The remote issued a token; the credentials are valid.
	Success {
		/// Token string returned by the remote.
		token: String,
	},
	/// The remote rejected the exchange or answered with an unexpected shape.
	Failure {
		/// Error title reported by the remote, or [`INCORRECT_DATA_STRUCTURE`].
		error_code: String,
		/// Debugging detail reported by the remote, when present.
		debug_info: String,
	},
}

/// Classifies the token endpoint's decoded response.
///
/// Success is defined solely by the presence of a `token` entry; an `error` entry wins over
/// it, and everything else counts as a structural failure.
pub fn validate_token_response(response: &Value) -> TokenResult {
	let Some(object) = response.as_object() else {
		return incorrect_data_structure();
	};

	if let Some(error) = object.get("error") {
		return TokenResult::Failure {
			error_code: stringify(error),
			debug_info: object.get("debuginfo").map(stringify).unwrap_or_default(),
		};
	}
	if let Some(token) = object.get("token").and_then(Value::as_str) {
		return TokenResult::Success { token: token.to_owned() };
	}

	incorrect_data_structure()
}

fn incorrect_data_structure() -> TokenResult {
	TokenResult::Failure {
		error_code: INCORRECT_DATA_STRUCTURE.into(),
		debug_info: INCORRECT_DATA_STRUCTURE.into(),
	}
}

/// Outcome of validating the profile-lookup endpoint's response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileQueryResult {
	/// Lookup matched; carries the first (only) profile object of the result list.
	Found(JsonMap<String, Value>),
	/// Lookup matched nothing; a valid but negative outcome.
	Empty,
	/// Response was not the expected shape at all.
	Malformed,
	/// The remote explicitly reported an error.
	RemoteError {
		/// Remote error code.
		code: String,
		/// Remote human-readable message.
		message: String,
	},
}
impl ProfileQueryResult {
	/// Returns `true` for the [`Found`](Self::Found) variant.
	pub fn is_found(&self) -> bool {
		matches!(self, Self::Found(_))
	}

	/// Maps every non-`Found` outcome to the human-readable message recorded in the audit
	/// trail; `lookup_field` names the remote field the empty-result hint refers to.
	pub fn failure_message(&self, lookup_field: &str) -> Option<String> {
		match self {
			Self::Found(_) => None,
			Self::Empty => Some(format!(
				"There was an error retrieving the remote user's profile. Check that the {lookup_field} on the remote site is the same as the local username.",
			)),
			Self::Malformed => Some("Response is not an array".into()),
			Self::RemoteError { code, message } => Some(format!("{code}: {message}")),
		}
	}
}

/// Classifies the profile-lookup endpoint's decoded response.
///
/// Predicates run in fixed priority order: a sequence with at least one element is a match
/// (lookups are by unique field, so the remote returns a single-item list), an empty sequence
/// or empty mapping means the user does not exist remotely, a mapping carrying `errorcode` is
/// a remote-side error, and anything else is structurally malformed.
pub fn validate_profile_response(response: Value) -> ProfileQueryResult {
	match response {
		Value::Array(items) => match items.into_iter().next() {
			Some(Value::Object(profile)) => ProfileQueryResult::Found(profile),
			Some(_) => ProfileQueryResult::Malformed,
			None => ProfileQueryResult::Empty,
		},
		Value::Object(object) if object.is_empty() => ProfileQueryResult::Empty,
		Value::Object(object) => match object.get("errorcode") {
			Some(code) => ProfileQueryResult::RemoteError {
				code: stringify(code),
				message: object.get("message").map(stringify).unwrap_or_default(),
			},
			None => ProfileQueryResult::Malformed,
		},
		_ => ProfileQueryResult::Malformed,
	}
}

fn stringify(value: &Value) -> String {
	match value.as_str() {
		Some(text) => text.to_owned(),
		None => value.to_string(),
	}
}
