use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search::FindReplaceResults;

/// Caller-supplied restriction of results to one category or one asset.
/// Absent scope means no restriction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterScope {
	Summary,
	Transcript,
	AiAsset { asset_id: Uuid },
}

/// Pure projection: buckets outside the scope are emptied and the total is
/// recomputed. The input is untouched so the caller can switch scopes without
/// re-searching.
pub fn scoped_view(
	results: &FindReplaceResults,
	scope: Option<&FilterScope>,
) -> FindReplaceResults {
	let Some(scope) = scope else {
		return results.clone();
	};
	let mut view = FindReplaceResults::default();

	match scope {
		FilterScope::Summary => view.summary = results.summary.clone(),
		FilterScope::Transcript => view.transcript = results.transcript.clone(),
		FilterScope::AiAsset { asset_id } =>
			view.ai_assets = results
				.ai_assets
				.iter()
				.filter(|bucket| bucket.asset_id == *asset_id)
				.cloned()
				.collect(),
	}

	view.recompute_total();

	view
}
