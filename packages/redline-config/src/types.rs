use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub limits: Limits,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Grapheme clusters of display context kept on each side of a match.
	pub context_window: usize,
}
impl Default for Search {
	fn default() -> Self {
		Self { context_window: 40 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Limits {
	pub max_query_chars: usize,
}
impl Default for Limits {
	fn default() -> Self {
		Self { max_query_chars: 256 }
	}
}
