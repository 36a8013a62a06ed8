#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use token_steward::{
	_preludet::*,
	auth::TokenKind,
	fetch::{FetchError, FetchRequest, TokenFetcher},
	http::{AuthorityEndpoints, HttpTokenFetcher},
	steward::Steward,
	store::LocalStore,
};

fn endpoints(server: &MockServer) -> AuthorityEndpoints {
	AuthorityEndpoints::new(
		Url::parse(&server.url("/cgi-bin/token")).expect("Token endpoint should parse."),
		Url::parse(&server.url("/cgi-bin/ticket/getticket"))
			.expect("Ticket endpoint should parse."),
	)
}

#[tokio::test]
async fn fetcher_performs_the_client_credential_exchange() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/token")
				.query_param("grant_type", "client_credential")
				.query_param("appid", "wx-test-app")
				.query_param("secret", "test-secret");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"AT-http\",\"expires_in\":7200}");
		})
		.await;
	let fetcher = HttpTokenFetcher::new(endpoints(&server));
	let credential = test_credential();
	let fetched = fetcher
		.fetch(FetchRequest {
			credential: &credential,
			kind: TokenKind::AccessToken,
			access_token: None,
		})
		.await
		.expect("Access-token fetch should succeed.");

	assert_eq!(fetched.value, "AT-http");
	assert_eq!(fetched.expires_in, Duration::seconds(7_200));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn authority_error_body_maps_to_denied() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":40001,\"errmsg\":\"invalid credential\"}");
		})
		.await;

	let fetcher = HttpTokenFetcher::new(endpoints(&server));
	let credential = test_credential();
	let error = fetcher
		.fetch(FetchRequest {
			credential: &credential,
			kind: TokenKind::AccessToken,
			access_token: None,
		})
		.await
		.expect_err("Authority error body should map to a fetch failure.");

	assert!(matches!(error, FetchError::Denied { code: 40001, .. }));
}

#[tokio::test]
async fn non_success_status_maps_to_denied() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(503);
		})
		.await;

	let fetcher = HttpTokenFetcher::new(endpoints(&server));
	let credential = test_credential();
	let error = fetcher
		.fetch(FetchRequest {
			credential: &credential,
			kind: TokenKind::AccessToken,
			access_token: None,
		})
		.await
		.expect_err("HTTP 503 should map to a fetch failure.");

	assert!(matches!(error, FetchError::Denied { code: 503, .. }));
}

#[tokio::test]
async fn steward_over_http_refreshes_token_then_ticket() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"AT-live\",\"expires_in\":7200}");
		})
		.await;
	let ticket_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/ticket/getticket")
				.query_param("access_token", "AT-live")
				.query_param("type", "jsapi");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"ticket\":\"TK-live\",\"expires_in\":7200,\"errcode\":0,\"errmsg\":\"ok\"}");
		})
		.await;
	let fetcher = Arc::new(HttpTokenFetcher::new(endpoints(&server)));
	let steward =
		Steward::new(test_credential(), Arc::new(LocalStore::new()), fetcher).enable_ticket();
	let ticket = steward.ticket().await.expect("Ticket refresh over HTTP should succeed.");

	assert_eq!(ticket.expose(), "TK-live");

	// A fresh pair serves from the store afterwards.
	let token = steward.access_token().await.expect("Access token should be served.");

	assert_eq!(token.expose(), "AT-live");

	token_mock.assert_calls_async(1).await;
	ticket_mock.assert_calls_async(1).await;
}
