//! Stable subject identifier forwarded to services that key state by user.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Subject identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Subject identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier contains characters that cannot travel in a header.
	#[error("Subject identifier contains non-visible characters.")]
	NotVisible,
	/// The identifier exceeded the allowed character count.
	#[error("Subject identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identity-provider subject (user id) attached to persistence calls.
///
/// Validation guarantees the value is always a legal header value.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);
impl SubjectId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for SubjectId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for SubjectId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for SubjectId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<SubjectId> for String {
	fn from(value: SubjectId) -> Self {
		value.0
	}
}
impl TryFrom<String> for SubjectId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for SubjectId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for SubjectId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Subject({})", self.0)
	}
}
impl Display for SubjectId {
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
	if !view.bytes().all(|b| b.is_ascii_graphic()) {
		return Err(IdentifierError::NotVisible);
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn subjects_reject_whitespace_and_empty() {
		assert_eq!(SubjectId::new(""), Err(IdentifierError::Empty));
		assert_eq!(SubjectId::new(" user-1"), Err(IdentifierError::ContainsWhitespace));
		assert_eq!(SubjectId::new("user\u{7}"), Err(IdentifierError::NotVisible));

		let subject = SubjectId::new("user-1").expect("Subject fixture should be valid.");

		assert_eq!(subject.as_ref(), "user-1");
	}

	#[test]
	fn subjects_enforce_length_and_ascii() {
		SubjectId::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert!(SubjectId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
		assert!(SubjectId::new("usér").is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let subject: SubjectId =
			serde_json::from_str("\"uid-42\"").expect("Subject should deserialize successfully.");

		assert_eq!(&*subject, "uid-42");
		assert!(serde_json::from_str::<SubjectId>("\"with space\"").is_err());
	}
}
