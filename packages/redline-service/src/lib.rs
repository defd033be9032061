pub mod replace;
pub mod scope;
pub mod search;
pub mod selection;

mod error;

pub use error::{Error, Result};
pub use replace::{EntityOutcome, EntityStatus, ReplaceRequest, ReplaceResponse};
pub use scope::FilterScope;
pub use search::{AssetMatches, FindReplaceResults, Match, MatchCategory, SearchRequest};
pub use selection::SelectionState;

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use redline_config::Config;
use redline_domain::content::{AssetContent, ConversationContent, SummaryContent, Transcript};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The external content store: the engine re-fetches fresh content for every
/// search and every apply, and writes back once per modified entity. Write
/// contention (last-write-wins or optimistic concurrency) is the store's
/// concern, not the engine's.
pub trait ContentStore
where
	Self: Send + Sync,
{
	fn fetch(&self, conversation_id: Uuid)
	-> BoxFuture<'_, color_eyre::Result<ConversationContent>>;

	fn write_summary<'a>(
		&'a self,
		conversation_id: Uuid,
		summary: &'a SummaryContent,
	) -> BoxFuture<'a, color_eyre::Result<()>>;

	fn write_transcript<'a>(
		&'a self,
		conversation_id: Uuid,
		transcript: &'a Transcript,
	) -> BoxFuture<'a, color_eyre::Result<()>>;

	fn write_asset<'a>(
		&'a self,
		conversation_id: Uuid,
		asset_id: Uuid,
		content: &'a AssetContent,
	) -> BoxFuture<'a, color_eyre::Result<()>>;
}

pub struct RedlineService {
	pub cfg: Config,
	pub store: Arc<dyn ContentStore>,
}

impl RedlineService {
	pub fn new(cfg: Config, store: Arc<dyn ContentStore>) -> Self {
		Self { cfg, store }
	}

	pub(crate) async fn fetch_content(&self, conversation_id: Uuid) -> Result<ConversationContent> {
		self.store
			.fetch(conversation_id)
			.await
			.map_err(|err| Error::ContentFetch { message: err.to_string() })
	}
}
