//! The live, scrollable view that diffs are applied to.
//!
//! This crate never renders anything itself. A [`LiveView`] is whatever owns the on-screen sections and cells
//! (a collection view, a table view, a terminal list widget…) and exposes its structure plus a handful of primitive edits.

use crate::error::EditError;
use core::fmt::{self, Display, Formatter};

/// Address of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexPath {
	pub section: usize,
	pub item: usize,
}

impl IndexPath {
	#[must_use]
	pub const fn new(section: usize, item: usize) -> Self {
		Self { section, item }
	}
}

impl Display for IndexPath {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "[{}, {}]", self.section, self.item)
	}
}

/// Runs exactly once, with the view and whether the preceding commit finished.
pub type Completion<V> = Box<dyn FnOnce(&mut V, bool)>;

/// The capability interface of a live view.
///
/// # Batch semantics
///
/// Edits issued inside [`perform_batch_updates`](`LiveView::perform_batch_updates`) are staged and committed together
/// once `updates` returns. Within one batch, deletions and reloads address positions **before** the update,
/// while insertions and move destinations address positions **after** it.
///
/// # Completion
///
/// Completions passed to [`perform_batch_updates`](`LiveView::perform_batch_updates`) and [`on_commit`](`LiveView::on_commit`)
/// must be called exactly once each. Implementations are free to (and usually do) defer them past the current run loop turn.
pub trait LiveView: Sized {
	fn section_count(&self) -> usize;
	fn item_count(&self, section: usize) -> usize;

	fn delete_sections(&mut self, sections: &[usize]) -> Result<(), EditError>;
	fn insert_sections(&mut self, sections: &[usize]) -> Result<(), EditError>;
	fn move_section(&mut self, from: usize, to: usize) -> Result<(), EditError>;
	fn reload_sections(&mut self, sections: &[usize]) -> Result<(), EditError>;

	fn delete_items(&mut self, items: &[IndexPath]) -> Result<(), EditError>;
	fn insert_items(&mut self, items: &[IndexPath]) -> Result<(), EditError>;
	fn move_item(&mut self, from: IndexPath, to: IndexPath) -> Result<(), EditError>;
	fn reload_items(&mut self, items: &[IndexPath]) -> Result<(), EditError>;

	/// Opens a batched update scope, runs `updates` inside it and commits.
	fn perform_batch_updates(&mut self, updates: &mut dyn FnMut(&mut Self), completion: Completion<Self>);

	/// Discards all on-screen structure and rebuilds it from the data source.
	fn reload_data(&mut self);

	/// Schedules `completion` after the next display commit, with `true` as argument.
	fn on_commit(&mut self, completion: Completion<Self>);
}
