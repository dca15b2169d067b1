//! Normalization of the remote profile payload into a flat local representation.

// self
use crate::_prelude::*;

/// Prefix applied to custom profile fields when renaming them to local field names.
pub const PROFILE_FIELD_PREFIX: &str = "profile_field";
/// Key under which the remote nests the typed custom-field list.
pub const CUSTOM_FIELDS_KEY: &str = "customfields";

/// Flat mapping from local field name to value, handed to the host for persistence.
///
/// Built fresh per attempt and never mutated after construction. Standard fields keep their
/// remote names; custom fields are keyed `profile_field_<shortname>`. Value shapes are left
/// untouched, the host interprets them by field type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProfile(JsonMap<String, Value>);
impl NormalizedProfile {
	/// Returns the value stored under a local field name.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.0.get(field)
	}

	/// Returns `true` when no fields were mirrored.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the number of mirrored fields.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Iterates the mirrored fields in insertion order.
	pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.0.iter()
	}

	/// Consumes the profile, yielding the underlying mapping.
	pub fn into_fields(self) -> JsonMap<String, Value> {
		self.0
	}
}

/// Flattens a matched profile payload into a [`NormalizedProfile`].
///
/// Every field except the custom-field list is copied verbatim. When `sync_custom_fields` is
/// enabled, the custom-field sequence is appended in its given order under prefixed names with
/// values untouched; no custom fields is an allowed steady state, not an error. Duplicate
/// shortnames overwrite in iteration order, last wins. Entries without a string shortname are
/// skipped.
pub fn normalize_profile(
	raw: &JsonMap<String, Value>,
	sync_custom_fields: bool,
) -> NormalizedProfile {
	let mut fields = JsonMap::new();

	for (name, value) in raw {
		if name != CUSTOM_FIELDS_KEY {
			fields.insert(name.clone(), value.clone());
		}
	}

	if !sync_custom_fields {
		return NormalizedProfile(fields);
	}
	if let Some(custom) = raw.get(CUSTOM_FIELDS_KEY).and_then(Value::as_array) {
		for entry in custom {
			let Some(shortname) = entry.get("shortname").and_then(Value::as_str) else {
				continue;
			};
			let value = entry.get("value").cloned().unwrap_or(Value::Null);

			fields.insert(format!("{PROFILE_FIELD_PREFIX}_{shortname}"), value);
		}
	}

	NormalizedProfile(fields)
}
