// crates.io
use httpmock::prelude::*;
// self
use accountsync::{_preludet::*, config::ServerVariant, event::AuditKind};

#[tokio::test]
async fn grant_path_issues_both_calls_in_order() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/login/token.php")
				.body("username=alice&password=p%40ss&service=service_name");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"token":"remote-token"}"#);
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/webservice/rest/server.php")
				.query_param("wstoken", "1x2x3")
				.query_param("wsfunction", "core_user_get_users_by_field")
				.query_param("moodlewsrestformat", "json")
				.body("field=username&values[0]=alice");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"[{"username":"alice","firstname":"Alice"}]"#);
		})
		.await;
	let (authenticator, sink) = build_test_authenticator(test_config(&server.base_url()));

	assert!(authenticator.verify_credentials("alice", "p@ss").await);

	token_mock.assert_calls_async(1).await;
	profile_mock.assert_calls_async(1).await;

	let token_messages = sink.messages_of(AuditKind::RemoteTokenReturned);

	assert_eq!(token_messages.len(), 1);
	assert!(token_messages[0].contains("Token returned from remote: remote-token"));
	assert!(sink.messages_of(AuditKind::LoginFailed).is_empty());
}

#[tokio::test]
async fn token_rejection_denies_without_a_profile_call() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/login/token.php");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"error":"invalidlogin","debuginfo":"Wrong password"}"#);
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/webservice/rest/server.php");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let (authenticator, sink) = build_test_authenticator(test_config(&server.base_url()));

	assert!(!authenticator.verify_credentials("alice", "wrong").await);

	token_mock.assert_calls_async(1).await;
	profile_mock.assert_calls_async(0).await;

	let failures = sink.messages_of(AuditKind::LoginFailed);

	assert_eq!(failures.len(), 1);
	assert!(failures[0].contains("Error title: invalidlogin. Debug info: Wrong password"));
}

#[tokio::test]
async fn non_json_token_body_denies() {
	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/login/token.php");
			then.status(503).header("content-type", "text/html").body("<html>offline</html>");
		})
		.await;
	let (authenticator, sink) = build_test_authenticator(test_config(&server.base_url()));

	assert!(!authenticator.verify_credentials("alice", "p@ss").await);
	assert!(
		sink.messages_of(AuditKind::LoginFailed)[0]
			.contains("Remote did not return with an array data structure"),
	);
}

#[tokio::test]
async fn remote_profile_error_denies_after_token_success() {
	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/login/token.php");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"token":"remote-token"}"#);
		})
		.await;
	let _profile_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/webservice/rest/server.php");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"errorcode":"invalidtoken","message":"Invalid token - token not found"}"#);
		})
		.await;
	let (authenticator, sink) = build_test_authenticator(test_config(&server.base_url()));

	assert!(!authenticator.verify_credentials("alice", "p@ss").await);
	assert_eq!(
		sink.messages_of(AuditKind::WebServiceError),
		["invalidtoken: Invalid token - token not found"],
	);
	assert_eq!(sink.messages_of(AuditKind::LoginFailed).len(), 1);
}

#[tokio::test]
async fn totara_variant_calls_the_connect_token_script() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/local/moodle_connect/token.php");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"token":"remote-token"}"#);
		})
		.await;
	let _profile_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/webservice/rest/server.php");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"[{"username":"alice"}]"#);
		})
		.await;
	let (authenticator, _sink) = build_test_authenticator(
		test_config(&server.base_url()).with_server_variant(ServerVariant::Totara),
	);

	assert!(authenticator.verify_credentials("alice", "p@ss").await);

	token_mock.assert_calls_async(1).await;
}
