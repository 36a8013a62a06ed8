//! Strongly typed principal identity consumed by every remote fetch.

// std
use std::{borrow::Borrow, ops::Deref, str::FromStr};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("App identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("App identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("App identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Unique identifier the remote authority assigned to the application.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);
impl AppId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for AppId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for AppId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for AppId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<AppId> for String {
	fn from(value: AppId) -> Self {
		value.0
	}
}
impl TryFrom<String> for AppId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for AppId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "AppId({})", self.0)
	}
}
impl Display for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

/// Immutable `(app_id, secret)` pair identifying the remote principal.
///
/// Created at configuration time and never mutated afterwards; the secret is redacted from
/// Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	app_id: AppId,
	secret: String,
}
impl Credential {
	/// Creates a credential for the provided application identity.
	pub fn new(app_id: AppId, secret: impl Into<String>) -> Self {
		Self { app_id, secret: secret.into() }
	}

	/// Returns the application identifier.
	pub fn app_id(&self) -> &AppId {
		&self.app_id
	}

	/// Returns the shared secret. Callers must avoid logging this string.
	pub fn secret(&self) -> &str {
		&self.secret
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("app_id", &self.app_id)
			.field("secret", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn app_id_validates_shape() {
		assert!(AppId::new("").is_err());
		assert!(AppId::new("with space").is_err());
		assert!(AppId::new(" wx-leading").is_err());

		let app_id = AppId::new("wx1234567890").expect("App identifier fixture should be valid.");

		assert_eq!(app_id.as_ref(), "wx1234567890");
	}

	#[test]
	fn app_id_length_limits() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		AppId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(AppId::new(&too_long).is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let app_id: AppId =
			serde_json::from_str("\"wx-42\"").expect("App identifier should deserialize.");

		assert_eq!(app_id.as_ref(), "wx-42");
		assert!(serde_json::from_str::<AppId>("\"with space\"").is_err());
	}

	#[test]
	fn credential_debug_redacts_secret() {
		let app_id = AppId::new("wx-debug").expect("App identifier fixture should be valid.");
		let credential = Credential::new(app_id, "super-secret");
		let rendered = format!("{credential:?}");

		assert!(rendered.contains("wx-debug"));
		assert!(!rendered.contains("super-secret"));
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<AppId, u8> = HashMap::from_iter([(
			AppId::new("wx-lookup").expect("App identifier used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("wx-lookup"), Some(&7));
	}
}
