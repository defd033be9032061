use std::{
	collections::{HashMap, HashSet},
	sync::{
		Mutex,
		atomic::{AtomicBool, Ordering},
	},
};

use color_eyre::eyre::eyre;
use serde_json::json;
use uuid::Uuid;

use redline_config::{Config, Limits, Search, Service};
use redline_domain::{
	content::{
		AssetContent, ConversationContent, DetailSection, GeneratedAsset, KeyPoint,
		StructuredSummary, SummaryContent, Transcript, TranscriptSegment,
	},
	provenance::EntityRef,
};
use redline_service::{BoxFuture, ContentStore};

/// In-memory stand-in for the external content store, with per-entity write
/// failure and fetch failure injection for exercising partial-failure paths.
#[derive(Default)]
pub struct MemoryContentStore {
	conversations: Mutex<HashMap<Uuid, ConversationContent>>,
	fail_fetch: AtomicBool,
	fail_writes: Mutex<HashSet<EntityRef>>,
}

impl MemoryContentStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_conversation(conversation_id: Uuid, content: ConversationContent) -> Self {
		let store = Self::default();

		store.insert(conversation_id, content);

		store
	}

	pub fn insert(&self, conversation_id: Uuid, content: ConversationContent) {
		self.lock_conversations().insert(conversation_id, content);
	}

	/// Current stored state, as a later fetch would see it.
	pub fn content(&self, conversation_id: Uuid) -> Option<ConversationContent> {
		self.lock_conversations().get(&conversation_id).cloned()
	}

	pub fn set_fail_fetch(&self, fail: bool) {
		self.fail_fetch.store(fail, Ordering::SeqCst);
	}

	pub fn fail_writes_for(&self, entity: EntityRef) {
		self.lock_fail_writes().insert(entity);
	}

	fn lock_conversations(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, ConversationContent>> {
		self.conversations.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn lock_fail_writes(&self) -> std::sync::MutexGuard<'_, HashSet<EntityRef>> {
		self.fail_writes.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn write_entity(
		&self,
		conversation_id: Uuid,
		entity: EntityRef,
		apply: impl FnOnce(&mut ConversationContent) -> color_eyre::Result<()>,
	) -> color_eyre::Result<()> {
		if self.lock_fail_writes().contains(&entity) {
			return Err(eyre!("Injected write failure for {entity:?}."));
		}

		let mut conversations = self.lock_conversations();
		let content = conversations
			.get_mut(&conversation_id)
			.ok_or_else(|| eyre!("Conversation {conversation_id} not found."))?;

		apply(content)
	}
}

impl ContentStore for MemoryContentStore {
	fn fetch(
		&self,
		conversation_id: Uuid,
	) -> BoxFuture<'_, color_eyre::Result<ConversationContent>> {
		Box::pin(async move {
			if self.fail_fetch.load(Ordering::SeqCst) {
				return Err(eyre!("Injected fetch failure."));
			}

			self.content(conversation_id)
				.ok_or_else(|| eyre!("Conversation {conversation_id} not found."))
		})
	}

	fn write_summary<'a>(
		&'a self,
		conversation_id: Uuid,
		summary: &'a SummaryContent,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			self.write_entity(conversation_id, EntityRef::Summary, |content| {
				content.summary = Some(summary.clone());

				Ok(())
			})
		})
	}

	fn write_transcript<'a>(
		&'a self,
		conversation_id: Uuid,
		transcript: &'a Transcript,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			self.write_entity(conversation_id, EntityRef::Transcript, |content| {
				content.transcript = Some(transcript.clone());

				Ok(())
			})
		})
	}

	fn write_asset<'a>(
		&'a self,
		conversation_id: Uuid,
		asset_id: Uuid,
		new_content: &'a AssetContent,
	) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			self.write_entity(conversation_id, EntityRef::Asset(asset_id), |content| {
				let asset = content
					.assets
					.iter_mut()
					.find(|asset| asset.asset_id == asset_id)
					.ok_or_else(|| eyre!("Asset {asset_id} not found."))?;

				asset.content = new_content.clone();

				Ok(())
			})
		})
	}
}

pub fn config() -> Config {
	Config {
		service: Service { log_level: "info".to_string() },
		search: Search { context_window: 40 },
		limits: Limits { max_query_chars: 256 },
	}
}

/// A conversation touching every content shape: structured summary, segmented
/// transcript, one markdown asset, and one structured asset.
pub fn sample_conversation(markdown_asset_id: Uuid, blog_asset_id: Uuid) -> ConversationContent {
	ConversationContent {
		summary: Some(SummaryContent::Structured(StructuredSummary {
			title: "Kickoff call".to_string(),
			overview: "Scoping the rollout plan.".to_string(),
			key_points: vec![KeyPoint {
				topic: "Timeline".to_string(),
				description: "Rollout starts next month.".to_string(),
			}],
			sections: vec![DetailSection {
				topic: "Risks".to_string(),
				content: "Vendor contract still unsigned.".to_string(),
			}],
			decisions: Some(vec!["Proceed with the rollout.".to_string()]),
			next_steps: Some(vec!["Send the contract.".to_string()]),
		})),
		transcript: Some(Transcript::Segments(vec![
			TranscriptSegment {
				start_secs: 0.0,
				speaker: "Ada".to_string(),
				text: "Let's talk about the rollout.".to_string(),
			},
			TranscriptSegment {
				start_secs: 12.5,
				speaker: "Ben".to_string(),
				text: "The rollout needs a contract first.".to_string(),
			},
		])),
		assets: vec![
			GeneratedAsset {
				asset_id: markdown_asset_id,
				name: "Follow-up email".to_string(),
				content: AssetContent::Markdown(
					"Hi team, the rollout is on track.".to_string(),
				),
			},
			GeneratedAsset {
				asset_id: blog_asset_id,
				name: "Blog post".to_string(),
				content: AssetContent::Structured(json!({
					"headline": "Old Title",
					"sections": [{ "heading": "Intro", "paragraphs": ["Old text here"] }],
				})),
			},
		],
	}
}
