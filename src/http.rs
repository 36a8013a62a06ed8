//! Reqwest-backed [`TokenFetcher`] for authorities speaking the
//! `errcode`/`errmsg`/`expires_in` response dialect.
//!
//! This is deliberately a thin I/O wrapper: it builds the two GET requests, reduces the
//! JSON body to the fields the steward needs, and maps every authority error indicator
//! into [`FetchError`] so failures never panic across the collaborator boundary. The
//! request timeout policy belongs to the [`ReqwestClient`] the fetcher is built with.

// self
use crate::{
	_prelude::*,
	auth::TokenKind,
	fetch::{FetchError, FetchFuture, FetchRequest, FetchedToken, TokenFetcher},
};

// Authority error code for a missing/expired access token.
const CODE_ACCESS_TOKEN_MISSING: i64 = 41001;

/// Endpoint pair the authority exposes for the two token kinds.
#[derive(Clone, Debug)]
pub struct AuthorityEndpoints {
	/// Access-token issuance endpoint (`grant_type=client_credential`).
	pub token_url: Url,
	/// Ticket issuance endpoint; a privileged call requiring a live access token.
	pub ticket_url: Url,
}
impl AuthorityEndpoints {
	/// Creates an endpoint pair.
	pub fn new(token_url: Url, ticket_url: Url) -> Self {
		Self { token_url, ticket_url }
	}
}

/// Thin wrapper around [`ReqwestClient`] implementing the remote fetch collaborator.
#[derive(Clone, Debug)]
pub struct HttpTokenFetcher {
	client: ReqwestClient,
	endpoints: AuthorityEndpoints,
}
impl HttpTokenFetcher {
	/// Creates a fetcher with a default client.
	pub fn new(endpoints: AuthorityEndpoints) -> Self {
		Self::with_client(ReqwestClient::default(), endpoints)
	}

	/// Wraps an existing [`ReqwestClient`], keeping its timeout and TLS policy.
	pub fn with_client(client: ReqwestClient, endpoints: AuthorityEndpoints) -> Self {
		Self { client, endpoints }
	}

	fn request_url(&self, request: &FetchRequest) -> Result<Url, FetchError> {
		match request.kind {
			TokenKind::AccessToken => {
				let mut url = self.endpoints.token_url.clone();

				url.query_pairs_mut()
					.append_pair("grant_type", "client_credential")
					.append_pair("appid", request.credential.app_id())
					.append_pair("secret", request.credential.secret());

				Ok(url)
			},
			TokenKind::JsTicket => {
				let access_token =
					request.access_token.ok_or(FetchError::Denied {
						code: CODE_ACCESS_TOKEN_MISSING,
						message: "ticket fetch requires a live access token".into(),
					})?;
				let mut url = self.endpoints.ticket_url.clone();

				url.query_pairs_mut()
					.append_pair("access_token", access_token)
					.append_pair("type", "jsapi");

				Ok(url)
			},
		}
	}
}
impl TokenFetcher for HttpTokenFetcher {
	fn fetch(&self, request: FetchRequest) -> FetchFuture<'_> {
		let kind = request.kind;
		let url = self.request_url(&request);
		let client = self.client.clone();

		Box::pin(async move {
			let response = client.get(url?).send().await.map_err(FetchError::from)?;
			let status = response.status();

			if !status.is_success() {
				return Err(FetchError::Denied {
					code: i64::from(status.as_u16()),
					message: "authority returned a non-success HTTP status".into(),
				});
			}

			let body = response.bytes().await.map_err(FetchError::from)?;

			parse_response(kind, &body)
		})
	}
}

/// Authority response reduced to the fields the steward cares about.
#[derive(Debug, Deserialize)]
struct RawResponse {
	access_token: Option<String>,
	ticket: Option<String>,
	expires_in: Option<i64>,
	errcode: Option<i64>,
	errmsg: Option<String>,
}

fn parse_response(kind: TokenKind, body: &[u8]) -> Result<FetchedToken, FetchError> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let raw: RawResponse = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| FetchError::Malformed { message: e.to_string() })?;

	if let Some(code) = raw.errcode.filter(|&code| code != 0) {
		return Err(FetchError::Denied { code, message: raw.errmsg.unwrap_or_default() });
	}

	let value = match kind {
		TokenKind::AccessToken => raw.access_token,
		TokenKind::JsTicket => raw.ticket,
	};
	let value = value.filter(|value| !value.is_empty()).ok_or(FetchError::EmptyToken)?;
	let expires_in = raw.expires_in.ok_or_else(|| FetchError::Malformed {
		message: "response is missing expires_in".into(),
	})?;

	Ok(FetchedToken { value, expires_in: Duration::seconds(expires_in) })
}
