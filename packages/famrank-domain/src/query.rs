use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRejection {
	/// Blank input. Callers treat this as a request to clear results.
	Empty,
	TooShort { min_len: u32 },
}
impl fmt::Display for QueryRejection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => write!(f, "Search query is empty"),
			Self::TooShort { min_len } =>
				write!(f, "Search query must be at least {min_len} characters"),
		}
	}
}

/// A trimmed query that passed the minimum-length check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
	text: String,
}
impl SearchQuery {
	pub fn parse(raw: &str, min_len: u32) -> Result<Self, QueryRejection> {
		let trimmed = raw.trim();

		if trimmed.is_empty() {
			return Err(QueryRejection::Empty);
		}
		if trimmed.chars().count() < min_len as usize {
			return Err(QueryRejection::TooShort { min_len });
		}

		Ok(Self { text: trimmed.to_string() })
	}

	pub fn as_str(&self) -> &str {
		&self.text
	}

	pub fn normalized(&self) -> String {
		self.text.to_lowercase()
	}
}
impl fmt::Display for SearchQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}
