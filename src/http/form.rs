//! PHP-compatible nested form encoding for web-service POST bodies.
//!
//! The remote gateway expects `application/x-www-form-urlencoded` bodies where nested
//! structures use bracketed key notation (`name[key][0]=value`), one pair per leaf scalar in
//! encounter order, recursing depth-first. Keys and scalar values are url-encoded; the
//! brackets themselves stay literal, matching what the remote's form parser accepts.

// crates.io
use url::form_urlencoded;

/// One form parameter value: a scalar leaf, an indexed sequence, or a nested mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormValue {
	/// Leaf scalar, emitted as a single `key=value` pair.
	Scalar(String),
	/// Indexed sequence; entries are keyed by their zero-based position.
	Seq(Vec<FormValue>),
	/// Nested mapping with explicit keys, kept in encounter order.
	Map(Vec<(String, FormValue)>),
}
impl From<&str> for FormValue {
	fn from(value: &str) -> Self {
		Self::Scalar(value.into())
	}
}
impl From<String> for FormValue {
	fn from(value: String) -> Self {
		Self::Scalar(value)
	}
}
impl<V> From<Vec<V>> for FormValue
where
	V: Into<FormValue>,
{
	fn from(values: Vec<V>) -> Self {
		Self::Seq(values.into_iter().map(Into::into).collect())
	}
}

/// Serializes the parameters into a single POST body, one pair per leaf scalar.
pub fn encode_form(params: &[(String, FormValue)]) -> String {
	let mut pairs = Vec::new();

	for (name, value) in params {
		encode_value(&urlencode(name), value, &mut pairs);
	}

	pairs.join("&")
}

fn encode_value(prefix: &str, value: &FormValue, pairs: &mut Vec<String>) {
	match value {
		FormValue::Scalar(scalar) => pairs.push(format!("{prefix}={}", urlencode(scalar))),
		FormValue::Seq(items) =>
			for (index, item) in items.iter().enumerate() {
				encode_value(&format!("{prefix}[{index}]"), item, pairs);
			},
		FormValue::Map(entries) =>
			for (key, entry) in entries {
				encode_value(&format!("{prefix}[{}]", urlencode(key)), entry, pairs);
			},
	}
}

fn urlencode(raw: &str) -> String {
	form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn params(entries: Vec<(&str, FormValue)>) -> Vec<(String, FormValue)> {
		entries.into_iter().map(|(name, value)| (name.to_owned(), value)).collect()
	}

	#[test]
	fn scalars_encode_in_encounter_order() {
		let body = encode_form(&params(vec![
			("username", "alice".into()),
			("password", "pa ss&word".into()),
			("service", "service_name".into()),
		]));

		assert_eq!(body, "username=alice&password=pa+ss%26word&service=service_name");
	}

	#[test]
	fn sequences_use_indexed_brackets() {
		let body = encode_form(&params(vec![
			("field", "username".into()),
			("values", vec!["alice"].into()),
		]));

		assert_eq!(body, "field=username&values[0]=alice");
	}

	#[test]
	fn nested_maps_recurse_depth_first() {
		let inner = FormValue::Map(vec![
			("first".to_owned(), "1".into()),
			("rest".to_owned(), vec!["2", "3"].into()),
		]);
		let body = encode_form(&params(vec![("criteria", inner)]));

		assert_eq!(body, "criteria[first]=1&criteria[rest][0]=2&criteria[rest][1]=3");
	}

	#[test]
	fn keys_are_url_encoded_but_brackets_stay_literal() {
		let body = encode_form(&params(vec![(
			"outer key",
			FormValue::Map(vec![("inner/key".to_owned(), "v".into())]),
		)]));

		assert_eq!(body, "outer+key[inner%2Fkey]=v");
	}

	#[test]
	fn empty_sequences_emit_no_pairs() {
		let body = encode_form(&params(vec![
			("values", FormValue::Seq(Vec::new())),
			("field", "username".into()),
		]));

		assert_eq!(body, "field=username");
	}
}
