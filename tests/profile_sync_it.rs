// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use accountsync::{
	_preludet::*,
	auth::{AUTH_METHOD, LocalUser},
	event::AuditKind,
};

const PROFILE_BODY: &str = r#"[{
	"username": "alice",
	"firstname": "testuser firstname",
	"lastname": "testuser lastname",
	"customfields": [
		{ "type": "checkbox", "value": 1, "name": "Test Checkbox", "shortname": "testcheckbox" },
		{ "type": "menu", "value": "menu choice 2", "name": "Test Menu", "shortname": "testmenu" }
	]
}]"#;

#[tokio::test]
async fn userinfo_mirrors_standard_and_custom_fields() {
	let server = MockServer::start_async().await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/webservice/rest/server.php");
			then.status(200).header("content-type", "application/json").body(PROFILE_BODY);
		})
		.await;
	let (authenticator, sink) = build_test_authenticator(test_config(&server.base_url()));
	let profile = authenticator.get_userinfo("alice").await;

	profile_mock.assert_calls_async(1).await;

	assert_eq!(profile.get("firstname"), Some(&json!("testuser firstname")));
	assert_eq!(profile.get("lastname"), Some(&json!("testuser lastname")));
	assert_eq!(profile.get("profile_field_testcheckbox"), Some(&json!(1)));
	assert_eq!(profile.get("profile_field_testmenu"), Some(&json!("menu choice 2")));
	assert_eq!(profile.get("customfields"), None);
	assert!(sink.events().is_empty());
}

#[tokio::test]
async fn userinfo_skips_custom_fields_when_sync_is_disabled() {
	let server = MockServer::start_async().await;
	let _profile_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/webservice/rest/server.php");
			then.status(200).header("content-type", "application/json").body(PROFILE_BODY);
		})
		.await;
	let (authenticator, _sink) =
		build_test_authenticator(test_config(&server.base_url()).with_sync_custom_fields(false));
	let profile = authenticator.get_userinfo("alice").await;

	assert_eq!(profile.get("firstname"), Some(&json!("testuser firstname")));
	assert_eq!(profile.get("profile_field_testcheckbox"), None);
	assert_eq!(profile.get("customfields"), None);
}

#[tokio::test]
async fn userinfo_falls_back_when_the_remote_has_no_match() {
	let server = MockServer::start_async().await;
	let _profile_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/webservice/rest/server.php");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let (authenticator, sink) = build_test_authenticator(test_config(&server.base_url()));
	let profile = authenticator.get_userinfo("alice").await;

	assert!(profile.is_empty());
	assert_eq!(sink.messages_of(AuditKind::ProfileSyncError).len(), 1);
	assert_eq!(sink.messages_of(AuditKind::WebServiceError).len(), 1);
}

#[tokio::test]
async fn post_login_sync_refreshes_managed_accounts_only() {
	let server = MockServer::start_async().await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/webservice/rest/server.php");
			then.status(200).header("content-type", "application/json").body(PROFILE_BODY);
		})
		.await;
	let (authenticator, sink) = build_test_authenticator(test_config(&server.base_url()));
	let foreign = LocalUser { id: 7, auth_method: "manual".into() };

	assert_eq!(authenticator.sync_profile_after_login(&foreign, "alice").await, None);

	profile_mock.assert_calls_async(0).await;
	assert!(sink.events().is_empty());

	let managed = LocalUser { id: 7, auth_method: AUTH_METHOD.into() };
	let profile = authenticator
		.sync_profile_after_login(&managed, "alice")
		.await
		.expect("Managed users should receive a fresh profile.");

	profile_mock.assert_calls_async(1).await;

	assert_eq!(profile.get("profile_field_testmenu"), Some(&json!("menu choice 2")));
}

#[tokio::test]
async fn post_login_sync_failure_emits_without_denying() {
	let server = MockServer::start_async().await;
	let _profile_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/webservice/rest/server.php");
			then.status(200).header("content-type", "text/html").body("<html>oops</html>");
		})
		.await;
	let (authenticator, sink) = build_test_authenticator(test_config(&server.base_url()));
	let managed = LocalUser { id: 7, auth_method: AUTH_METHOD.into() };

	assert_eq!(authenticator.sync_profile_after_login(&managed, "alice").await, None);
	assert_eq!(sink.messages_of(AuditKind::WebServiceError), ["Response is not an array"]);
	assert_eq!(sink.messages_of(AuditKind::ProfileSyncError).len(), 1);
}

#[tokio::test]
async fn lookup_field_is_configurable() {
	let server = MockServer::start_async().await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/webservice/rest/server.php")
				.body("field=idnumber&values[0]=alice");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let (authenticator, sink) =
		build_test_authenticator(test_config(&server.base_url()).with_lookup_field("idnumber"));
	let profile = authenticator.get_userinfo("alice").await;

	profile_mock.assert_calls_async(1).await;

	assert!(profile.is_empty());
	assert!(
		sink.messages_of(AuditKind::WebServiceError)[0]
			.contains("Check that the idnumber on the remote site"),
	);
}
