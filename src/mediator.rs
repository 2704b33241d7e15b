//! Deciding between a full reload and a batched diff, and recovering when the latter goes wrong.

use crate::{
	diff::Diff,
	distinct::{Distinctable, Section},
	error::UpdateError,
	reloader::SectionReloader,
	strategy::ReloadStrategy,
	view::{IndexPath, LiveView},
};
use core::{cell::Cell, fmt::Debug, hash::Hash, mem};
use std::rc::Rc;
use tracing::{info, instrument, trace, warn};

/// Brings `view` from `old` to `new`.
///
/// `old` must describe what `view` currently shows. If the view's section or cell counts disagree with it,
/// positional edits can't be trusted and the whole view is reloaded instead, regardless of `strategy`.
///
/// `completion` runs exactly once, once the view has caught up with `new`:
///
/// - with `true` if that happened the planned way (a configured full reload, or a diff batch that committed cleanly),
/// - with `false` if a compensating full reload was necessary or the view reported the batch as unfinished.
///
/// Calls for the same view must not overlap. [`Mediator::update`] enforces this.
#[instrument(skip(view, old, new, completion), fields(old.len = old.len(), new.len = new.len()))]
pub fn reload<V, K, C>(view: &mut V, strategy: ReloadStrategy, old: &[Section<K, C>], new: &[Section<K, C>], completion: impl FnOnce(&mut V, bool) + 'static)
where
	V: LiveView,
	K: Hash + Eq + Clone + Debug,
	C: Distinctable,
{
	if !structure_matches(view, old) {
		warn!("The view's structure doesn't match the old snapshot. Reloading all data instead of diffing.");
		return reload_all(view, false, completion);
	}

	if !strategy.uses_diff() {
		info!("Reloading all data.");
		return reload_all(view, true, completion);
	}

	let canceled = Rc::new(Cell::new(false));
	let completion = {
		let canceled = Rc::clone(&canceled);
		move |view: &mut V, finished: bool| {
			if canceled.get() {
				warn!("Batch update was canceled. Reloading all data to compensate for partially applied edits.");
				view.reload_data();
			}
			completion(view, finished && !canceled.get());
		}
	};
	view.perform_batch_updates(
		&mut |view: &mut V| {
			let diff = Diff::compute(old, new);
			info!(changes = diff.len(), refresh = strategy.should_refresh(), "Applying section diff.");
			let mut sections = SectionReloader::new(view, strategy.should_refresh());
			diff.apply(&mut sections);
			canceled.set(sections.canceled());
		},
		Box::new(completion),
	);
}

fn reload_all<V: LiveView>(view: &mut V, clean: bool, completion: impl FnOnce(&mut V, bool) + 'static) {
	view.reload_data();
	view.on_commit(Box::new(move |view: &mut V, _: bool| completion(view, clean)));
}

fn structure_matches<V: LiveView, K, C>(view: &V, old: &[Section<K, C>]) -> bool {
	let section_count = view.section_count();
	if section_count != old.len() {
		trace!(expected = old.len(), found = section_count, "Section count mismatch.");
		return false;
	}
	for (section, expected) in old.iter().enumerate() {
		let found = view.item_count(section);
		if found != expected.cell_count() {
			trace!(section, expected = expected.cell_count(), found, "Cell count mismatch.");
			return false;
		}
	}
	true
}

/// Owns the sections a view currently shows and serializes updates to it.
///
/// The snapshot doubles as the view's data source: after [`update`](`Mediator::update`) it already reflects the new sections,
/// which is what a view needs to read while committing insertions and reloads.
#[derive(Debug)]
pub struct Mediator<K, C> {
	sections: Vec<Section<K, C>>,
	strategy: ReloadStrategy,
	in_flight: Rc<Cell<bool>>,
}

impl<K, C> Default for Mediator<K, C> {
	fn default() -> Self {
		Self::new(ReloadStrategy::default())
	}
}

impl<K, C> Mediator<K, C> {
	#[must_use]
	pub fn new(strategy: ReloadStrategy) -> Self {
		Self::with_sections(strategy, Vec::new())
	}

	/// `sections` must match what the view shows already.
	#[must_use]
	pub fn with_sections(strategy: ReloadStrategy, sections: Vec<Section<K, C>>) -> Self {
		Self {
			sections,
			strategy,
			in_flight: Rc::new(Cell::new(false)),
		}
	}

	#[must_use]
	pub fn sections(&self) -> &[Section<K, C>] {
		&self.sections
	}

	#[must_use]
	pub fn strategy(&self) -> ReloadStrategy {
		self.strategy
	}

	/// Takes effect with the next [`update`](`Mediator::update`).
	pub fn set_strategy(&mut self, strategy: ReloadStrategy) {
		self.strategy = strategy;
	}

	/// Whether an update's completion is still pending.
	#[must_use]
	pub fn is_updating(&self) -> bool {
		self.in_flight.get()
	}

	#[must_use]
	pub fn section_count(&self) -> usize {
		self.sections.len()
	}

	#[must_use]
	pub fn cell_count(&self, section: usize) -> Option<usize> {
		self.sections.get(section).map(Section::cell_count)
	}

	#[must_use]
	pub fn cell(&self, path: IndexPath) -> Option<&C> {
		self.sections.get(path.section)?.cells.get(path.item)
	}
}

impl<K, C> Mediator<K, C>
where
	K: Hash + Eq + Clone + Debug,
	C: Distinctable,
{
	/// Replaces the snapshot with `sections` and [`reload`]s `view` accordingly.
	///
	/// # Errors
	///
	/// [`UpdateError::InFlight`] if the previous update hasn't completed yet.
	/// Nothing is changed in that case and `completion` is dropped without being called.
	#[instrument(skip(self, view, sections, completion), fields(strategy = ?self.strategy))]
	pub fn update<V: LiveView>(&mut self, view: &mut V, sections: Vec<Section<K, C>>, completion: impl FnOnce(&mut V, bool) + 'static) -> Result<(), UpdateError> {
		if self.in_flight.replace(true) {
			warn!("Rejected overlapping update.");
			return Err(UpdateError::InFlight);
		}

		let old = mem::replace(&mut self.sections, sections);
		let in_flight = Rc::clone(&self.in_flight);
		reload(view, self.strategy, &old, &self.sections, move |view, clean| {
			in_flight.set(false);
			completion(view, clean);
		});
		Ok(())
	}
}
