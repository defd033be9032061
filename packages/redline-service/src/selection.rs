use std::collections::HashSet;

use crate::search::{FindReplaceResults, MatchCategory};

/// The set of match ids the user has ticked between a search round trip and
/// the apply call. Bulk toggles are all-or-nothing: if every match in the
/// group is already selected the toggle clears the group, otherwise it
/// selects the whole group — never a surprising partial state.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
	selected: HashSet<String>,
}

impl SelectionState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.contains(id)
	}

	pub fn len(&self) -> usize {
		self.selected.len()
	}

	pub fn is_empty(&self) -> bool {
		self.selected.is_empty()
	}

	pub fn toggle_match(&mut self, id: &str) {
		if !self.selected.remove(id) {
			self.selected.insert(id.to_string());
		}
	}

	pub fn toggle_category(&mut self, results: &FindReplaceResults, category: MatchCategory) {
		let ids: Vec<&str> = results
			.iter_matches()
			.filter(|found| found.category == category)
			.map(|found| found.id.as_str())
			.collect();

		self.toggle_ids(&ids);
	}

	pub fn toggle_all(&mut self, results: &FindReplaceResults) {
		let ids: Vec<&str> = results.iter_matches().map(|found| found.id.as_str()).collect();

		self.toggle_ids(&ids);
	}

	/// Sorted for deterministic request payloads.
	pub fn selected_ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.selected.iter().cloned().collect();

		ids.sort();

		ids
	}

	fn toggle_ids(&mut self, ids: &[&str]) {
		if ids.is_empty() {
			return;
		}

		if ids.iter().all(|id| self.selected.contains(*id)) {
			for id in ids {
				self.selected.remove(*id);
			}
		} else {
			for id in ids {
				self.selected.insert((*id).to_string());
			}
		}
	}
}
