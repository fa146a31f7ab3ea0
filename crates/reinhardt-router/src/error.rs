//! Error types for client-side routing.

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Error type for router operations.
///
/// A path that matches no route is not an error: it resolves to the error
/// template. Only misconfigured route tables and failing browser APIs end up
/// here.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// A matched leaf route declares neither a redirect nor a renderable.
	#[error("The provided route `{path}` does not have a registered component.")]
	MissingRenderable {
		/// Declared path of the offending route.
		path: String,
	},

	/// The redirect chain did not terminate within the hop limit.
	#[error("Too many redirects encountered for {path} (after {hops} hops).")]
	TooManyRedirects {
		/// The path resolution started from.
		path: String,
		/// Number of redirects followed before giving up.
		hops: usize,
	},

	/// The history backend rejected an operation.
	#[error("Navigation failed: {0}")]
	NavigationFailed(String),

	/// A location or link could not be parsed as a URL.
	#[error("Invalid URL: {0}")]
	InvalidUrl(#[from] url::ParseError),
}

impl RouterError {
	/// Whether the error comes from the route configuration rather than from
	/// the environment.
	///
	/// Configuration errors are deterministic; retrying the same navigation
	/// fails the same way.
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			Self::MissingRenderable { .. } | Self::TooManyRedirects { .. }
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_missing_renderable_display() {
		let err = RouterError::MissingRenderable {
			path: "users".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"The provided route `users` does not have a registered component."
		);
	}

	#[rstest]
	fn test_too_many_redirects_display() {
		let err = RouterError::TooManyRedirects {
			path: "a".to_string(),
			hops: 10,
		};
		assert!(err.to_string().contains("Too many redirects"));
		assert!(err.to_string().contains("for a"));
		assert!(err.to_string().contains("10 hops"));
	}

	#[rstest]
	#[case(RouterError::MissingRenderable { path: "x".into() }, true)]
	#[case(RouterError::TooManyRedirects { path: "x".into(), hops: 10 }, true)]
	#[case(RouterError::NavigationFailed("denied".into()), false)]
	fn test_is_configuration_error(#[case] err: RouterError, #[case] expected: bool) {
		assert_eq!(err.is_configuration_error(), expected);
	}

	#[rstest]
	fn test_from_url_parse_error() {
		let err: RouterError = url::Url::parse("not a url").unwrap_err().into();
		assert!(matches!(err, RouterError::InvalidUrl(_)));
	}
}
