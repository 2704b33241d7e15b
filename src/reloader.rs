//! [`DiffWorker`]s that turn section and cell changes into [`LiveView`] edits.

use crate::{
	diff::{logged_identity, Diff, DiffWorker, Reload},
	distinct::{Distinctable, Section},
	error::ReloadError,
	view::{IndexPath, LiveView},
};
use core::fmt::Debug;
use core::hash::Hash;
use std::error::Error as _;
use tracing::{error, trace, trace_span};

/// Applies section-level changes, recursing into a [`CellReloader`] for each reloaded section.
pub struct SectionReloader<'v, V> {
	view: &'v mut V,
	force_refresh: bool,
	canceled: bool,
}

impl<'v, V: LiveView> SectionReloader<'v, V> {
	pub fn new(view: &'v mut V, force_refresh: bool) -> Self {
		Self {
			view,
			force_refresh,
			canceled: false,
		}
	}

	/// Whether any edit failed. The view may then be partially updated.
	#[must_use]
	pub fn canceled(&self) -> bool {
		self.canceled
	}
}

impl<'a, 'v, V, K, C> DiffWorker<'a, Section<K, C>> for SectionReloader<'v, V>
where
	V: LiveView,
	K: Hash + Eq + Clone + Debug,
	C: Distinctable,
{
	fn on_remove(&mut self, removals: &[(usize, &'a Section<K, C>)]) -> Result<(), ReloadError> {
		let sections: Vec<usize> = removals.iter().map(|&(index, _)| index).collect();
		Ok(self.view.delete_sections(&sections)?)
	}

	fn on_insert(&mut self, index: usize, _: &'a Section<K, C>) -> Result<(), ReloadError> {
		Ok(self.view.insert_sections(&[index])?)
	}

	fn on_move(&mut self, from: usize, to: usize, _: &'a Section<K, C>) -> Result<(), ReloadError> {
		Ok(self.view.move_section(from, to)?)
	}

	fn on_reload(&mut self, reload: &Reload<'a, Section<K, C>>) -> Result<(), ReloadError> {
		let span = trace_span!("Diffing cells", old_section = reload.from, new_section = reload.to, identity = ?logged_identity(reload.new));
		let _enter = span.enter();

		if reload.moved {
			self.view.move_section(reload.from, reload.to)?;
		}

		let mut cells = CellReloader::new(&mut *self.view, reload.from, reload.to, self.force_refresh);
		Diff::compute(&reload.old.cells, &reload.new.cells).apply(&mut cells);
		match cells.into_failure() {
			None => Ok(()),
			Some(source) => Err(ReloadError::Section {
				section: reload.from,
				source: Box::new(source),
			}),
		}
	}

	fn on_failure(&mut self, error: ReloadError) {
		log_failure(&error);
		self.canceled = true;
	}
}

/// Applies cell-level changes within one section.
///
/// Removals and reloads address the section's old position, insertions and move destinations its new one.
pub struct CellReloader<'v, V> {
	view: &'v mut V,
	old_section: usize,
	new_section: usize,
	force_refresh: bool,
	failure: Option<ReloadError>,
}

impl<'v, V: LiveView> CellReloader<'v, V> {
	pub fn new(view: &'v mut V, old_section: usize, new_section: usize, force_refresh: bool) -> Self {
		Self {
			view,
			old_section,
			new_section,
			force_refresh,
			failure: None,
		}
	}

	/// The edit failure that canceled this section's cell changes, if any.
	#[must_use]
	pub fn into_failure(self) -> Option<ReloadError> {
		self.failure
	}
}

impl<'a, 'v, V: LiveView, C> DiffWorker<'a, C> for CellReloader<'v, V> {
	fn on_remove(&mut self, removals: &[(usize, &'a C)]) -> Result<(), ReloadError> {
		let items: Vec<IndexPath> = removals.iter().map(|&(item, _)| IndexPath::new(self.old_section, item)).collect();
		Ok(self.view.delete_items(&items)?)
	}

	fn on_insert(&mut self, index: usize, _: &'a C) -> Result<(), ReloadError> {
		Ok(self.view.insert_items(&[IndexPath::new(self.new_section, index)])?)
	}

	fn on_move(&mut self, from: usize, to: usize, _: &'a C) -> Result<(), ReloadError> {
		Ok(self.view.move_item(IndexPath::new(self.old_section, from), IndexPath::new(self.new_section, to))?)
	}

	/// A moved cell can't also be reloaded in the same batch (its old path would be both deleted and moved),
	/// so a refresh of one is a deletion plus an insertion instead.
	fn on_reload(&mut self, reload: &Reload<'a, C>) -> Result<(), ReloadError> {
		let (old, new) = (IndexPath::new(self.old_section, reload.from), IndexPath::new(self.new_section, reload.to));
		match (reload.moved, self.force_refresh) {
			(true, true) => {
				self.view.delete_items(&[old])?;
				Ok(self.view.insert_items(&[new])?)
			}
			(true, false) => Ok(self.view.move_item(old, new)?),
			(false, true) => Ok(self.view.reload_items(&[old])?),
			(false, false) => {
				trace!(item = reload.from, "Leaving changed cell to the view's binding.");
				Ok(())
			}
		}
	}

	// Reported once, wrapped, by the section level.
	fn on_failure(&mut self, error: ReloadError) {
		trace!(old_section = self.old_section, "Canceling cell reload: {}", error);
		self.failure = Some(error);
	}
}

fn log_failure(error: &ReloadError) {
	let mut source = error.source();
	error!("Canceling reload: {}", error);
	while let Some(cause) = source {
		error!("Caused by: {}", cause);
		source = cause.source();
	}
}
