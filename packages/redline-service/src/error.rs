pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Call-level failures only. Per-entity replace problems (a stale field path,
/// a failed write) are reported as entity outcomes on the response instead,
/// and stale match ids are silently dropped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid query: {message}")]
	InvalidQuery { message: String },
	#[error("Content fetch failed: {message}")]
	ContentFetch { message: String },
}
