//! Field lock and sync policy handed to the host's user-record updater.
//!
//! The host enforces the lock/update-on-login semantics when it persists remote data; this
//! module only builds the policy record. Given the full set of known field names (standard
//! plus custom, supplied by the host), [`FieldPolicySet::lock_all`] returns one immutable
//! record with every field locked and synced on login, constructed once and never mutated
//! afterwards.

// self
use crate::_prelude::*;

/// Profile fields outside the host's standard set that still follow the lock policy.
pub const OTHER_FIELDS: [&str; 8] =
	["icq", "skype", "yahoo", "aim", "msn", "firstaccess", "lastaccess", "descriptionformat"];

/// Lock state controlling whether the host lets users edit a field locally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldLock {
	/// Users may edit the field locally.
	Unlocked,
	/// Users may fill the field only while it is empty.
	#[serde(rename = "unlockedifempty")]
	UnlockedIfEmpty,
	#[default]
	/// The remote value always wins; local edits are rejected.
	Locked,
}
impl FieldLock {
	/// Returns the host-side setting label for the lock state.
	pub const fn as_str(self) -> &'static str {
		match self {
			FieldLock::Unlocked => "unlocked",
			FieldLock::UnlockedIfEmpty => "unlockedifempty",
			FieldLock::Locked => "locked",
		}
	}
}

/// When the host refreshes the local copy of a field from remote data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateRule {
	/// Never overwrite the local value.
	Never,
	#[default]
	/// Refresh the local value on every login.
	#[serde(rename = "onlogin")]
	OnLogin,
}
impl UpdateRule {
	/// Returns the host-side setting label for the update rule.
	pub const fn as_str(self) -> &'static str {
		match self {
			UpdateRule::Never => "never",
			UpdateRule::OnLogin => "onlogin",
		}
	}
}

/// Lock and refresh policy for a single profile field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPolicy {
	/// Lock state enforced by the host.
	pub lock: FieldLock,
	/// Refresh rule applied by the host on login.
	pub update_local: UpdateRule,
}

/// Immutable mapping from field name to its [`FieldPolicy`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPolicySet(BTreeMap<String, FieldPolicy>);
impl FieldPolicySet {
	/// Builds a policy set defaulting every supplied field to locked and synced on login.
	///
	/// Callers pass the host's standard fields, the custom-field names, and [`OTHER_FIELDS`]
	/// in one iterator; the result is never mutated afterwards.
	pub fn lock_all<I>(fields: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		Self(fields.into_iter().map(|field| (field.into(), FieldPolicy::default())).collect())
	}

	/// Returns the policy recorded for a field.
	pub fn get(&self, field: &str) -> Option<&FieldPolicy> {
		self.0.get(field)
	}

	/// Returns `true` when a policy exists for the field.
	pub fn contains(&self, field: &str) -> bool {
		self.0.contains_key(field)
	}

	/// Returns the number of governed fields.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no fields are governed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates the governed fields and their policies.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldPolicy)> {
		self.0.iter()
	}
}
