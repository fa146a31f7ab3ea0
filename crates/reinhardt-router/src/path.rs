//! Path normalization.
//!
//! Route paths and navigation targets are compared without their leading
//! separator: `"/users"` and `"users"` are the same path.

use crate::error::Result;
use url::Url;

/// Path separator.
pub const SEPARATOR: char = '/';

/// Strips exactly one leading separator, if present.
///
/// ```
/// use reinhardt_router::path::normalize;
///
/// assert_eq!(normalize("/users"), "users");
/// assert_eq!(normalize("users"), "users");
/// assert_eq!(normalize("//users"), "/users");
/// ```
pub fn normalize(path: &str) -> &str {
	path.strip_prefix(SEPARATOR).unwrap_or(path)
}

/// Joins navigation segments with the separator.
///
/// ```
/// use reinhardt_router::path::join_segments;
///
/// assert_eq!(join_segments(&["a", "b"]), "a/b");
/// ```
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
	segments
		.iter()
		.map(AsRef::as_ref)
		.collect::<Vec<_>>()
		.join("/")
}

/// Absolute form of a path, as written into browser history.
///
/// A normalized path has no leading separator, which the browser would
/// resolve relative to the current document.
pub fn to_history_url(path: &str) -> String {
	format!("{}{}", SEPARATOR, normalize(path))
}

/// Normalized path component of an absolute URL.
pub fn pathname(href: &str) -> Result<String> {
	let url = Url::parse(href)?;
	Ok(normalize(url.path()).to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("/users", "users")]
	#[case("users", "users")]
	#[case("/", "")]
	#[case("", "")]
	#[case("//double", "/double")]
	#[case("users/", "users/")]
	fn test_normalize(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(normalize(input), expected);
	}

	#[rstest]
	#[case(&["a", "b"], "a/b")]
	#[case(&["a"], "a")]
	#[case(&["", "x"], "/x")]
	fn test_join_segments(#[case] segments: &[&str], #[case] expected: &str) {
		assert_eq!(join_segments(segments), expected);
	}

	#[rstest]
	fn test_join_segments_empty() {
		let segments: [&str; 0] = [];
		assert_eq!(join_segments(&segments), "");
	}

	#[rstest]
	#[case("a/b", "/a/b")]
	#[case("/a/b", "/a/b")]
	#[case("", "/")]
	fn test_to_history_url(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(to_history_url(input), expected);
	}

	#[rstest]
	#[case("http://localhost/users/42", "users/42")]
	#[case("https://example.com/", "")]
	#[case("https://example.com/a/b?q=1#top", "a/b")]
	fn test_pathname(#[case] href: &str, #[case] expected: &str) {
		assert_eq!(pathname(href).unwrap(), expected);
	}

	#[rstest]
	fn test_pathname_rejects_relative() {
		assert!(pathname("/relative").is_err());
	}

	proptest! {
		#[test]
		fn prop_normalize_is_idempotent(path in "/?([a-z0-9][a-z0-9/]{0,15})?") {
			let once = normalize(&path);
			prop_assert_eq!(normalize(once), once);
		}

		#[test]
		fn prop_normalize_strips_at_most_one(path in "/{0,3}[a-z0-9/]{0,16}") {
			let normalized = normalize(&path);
			prop_assert!(path.len() - normalized.len() <= 1);
			prop_assert!(path.ends_with(normalized));
		}
	}
}
