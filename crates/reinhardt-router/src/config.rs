//! Declarative route configuration.
//!
//! Routes can be declared as data (TOML or JSON) naming their components, and
//! bound to renderable handles through a [`ComponentRegistry`]:
//!
//! ```toml
//! error_component = "NotFound"
//!
//! [[routes]]
//! path = ""
//! component = "Home"
//!
//! [[routes]]
//! path = "old"
//! redirect_to = "users"
//!
//! [[routes]]
//! path = "users"
//! component = "Users"
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::renderable::Renderable;
use crate::route::Route;

/// Error raised while loading or binding a route configuration.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// TOML parsing error.
	#[error("TOML parsing error: {0}")]
	Toml(#[from] toml::de::Error),

	/// JSON parsing error.
	#[error("JSON parsing error: {0}")]
	Json(#[from] serde_json::Error),

	/// A route names a component the registry does not know.
	#[error("Unknown component `{component}` for route `{path}`")]
	UnknownComponent {
		/// The component name.
		component: String,
		/// Declared path of the route naming it (empty for the error component).
		path: String,
	},
}

/// A route as declared in a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
	/// The route path.
	pub path: String,
	/// Nested routes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub children: Option<Vec<RouteConfig>>,
	/// Path to resolve instead of rendering.
	#[serde(default, alias = "redirectTo", skip_serializing_if = "Option::is_none")]
	pub redirect_to: Option<String>,
	/// Name of the component to render.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub component: Option<String>,
}

/// A whole route configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutesConfig {
	/// Top-level routes, in matching order.
	#[serde(default)]
	pub routes: Vec<RouteConfig>,
	/// Name of the component rendered when nothing matches.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_component: Option<String>,
}

impl RoutesConfig {
	/// Parses a TOML configuration.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Parses a JSON configuration.
	pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(input)?)
	}

	/// Binds every route to its renderable.
	///
	/// A route without `component` becomes a route without a renderable; it
	/// is only an error if it is ever matched as a leaf.
	pub fn build<R: Renderable>(
		&self,
		registry: &ComponentRegistry<R>,
	) -> Result<Vec<Route<R>>, ConfigError> {
		self.routes
			.iter()
			.map(|route| bind(route, registry))
			.collect()
	}

	/// The configured error template, or the default one.
	pub fn error_template<R: Renderable>(
		&self,
		registry: &ComponentRegistry<R>,
	) -> Result<R, ConfigError> {
		match &self.error_component {
			Some(name) => registry.lookup(name, ""),
			None => Ok(R::not_found()),
		}
	}
}

fn bind<R: Renderable>(
	config: &RouteConfig,
	registry: &ComponentRegistry<R>,
) -> Result<Route<R>, ConfigError> {
	let mut route = Route::new(config.path.clone());

	if let Some(to) = &config.redirect_to {
		route = route.redirect_to(to.clone());
	}
	if let Some(name) = &config.component {
		route = route.renderable(registry.lookup(name, &config.path)?);
	}
	if let Some(children) = &config.children {
		let children = children
			.iter()
			.map(|child| bind(child, registry))
			.collect::<Result<Vec<_>, _>>()?;
		route = route.children(children);
	}
	Ok(route)
}

/// Maps component names to renderable handles.
#[derive(Clone)]
pub struct ComponentRegistry<R> {
	components: HashMap<String, R>,
}

impl<R> Default for ComponentRegistry<R> {
	fn default() -> Self {
		Self {
			components: HashMap::new(),
		}
	}
}

impl<R: Clone> ComponentRegistry<R> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `renderable` under `name`, replacing any previous one.
	pub fn register(&mut self, name: impl Into<String>, renderable: R) -> &mut Self {
		self.components.insert(name.into(), renderable);
		self
	}

	/// Builder-style [`register`](Self::register).
	pub fn with(mut self, name: impl Into<String>, renderable: R) -> Self {
		self.register(name, renderable);
		self
	}

	/// The handle registered under `name`.
	pub fn get(&self, name: &str) -> Option<&R> {
		self.components.get(name)
	}

	/// Whether `name` is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.components.contains_key(name)
	}

	/// Number of registered components.
	pub fn len(&self) -> usize {
		self.components.len()
	}

	/// Whether the registry is empty.
	pub fn is_empty(&self) -> bool {
		self.components.is_empty()
	}

	fn lookup(&self, name: &str, path: &str) -> Result<R, ConfigError> {
		self.components
			.get(name)
			.cloned()
			.ok_or_else(|| ConfigError::UnknownComponent {
				component: name.to_string(),
				path: path.to_string(),
			})
	}
}

impl<R> fmt::Debug for ComponentRegistry<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
		names.sort_unstable();
		f.debug_struct("ComponentRegistry")
			.field("components", &names)
			.finish()
	}
}
