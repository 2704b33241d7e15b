//! The diff engine: from two ordered sequences of [`Distinctable`]s to a minimal list of [`Change`]s.

use crate::{distinct::Distinctable, error::ReloadError};
use hashbrown::{hash_map::Entry, HashMap, HashSet};
use tracing::{instrument, trace, warn};

/// Same identity, changed content.
#[derive(Debug)]
pub struct Reload<'a, T> {
	/// Position in the old sequence.
	pub from: usize,
	/// Position in the new sequence.
	pub to: usize,
	pub old: &'a T,
	pub new: &'a T,
	/// Whether the entity also changed its position relative to the other retained entities.
	pub moved: bool,
}

/// A single edit. `Remove` and move sources are old positions, `Insert` and move destinations new ones.
#[derive(Debug)]
pub enum Change<'a, T> {
	Remove { index: usize, old: &'a T },
	Insert { index: usize, new: &'a T },
	Move { from: usize, to: usize, item: &'a T },
	Reload(Reload<'a, T>),
}

impl<'a, T> Change<'a, T> {
	/// The old and new positions this change accounts for.
	#[must_use]
	pub fn positions(&self) -> (Option<usize>, Option<usize>) {
		match *self {
			Change::Remove { index, .. } => (Some(index), None),
			Change::Insert { index, .. } => (None, Some(index)),
			Change::Move { from, to, .. } | Change::Reload(Reload { from, to, .. }) => (Some(from), Some(to)),
		}
	}
}

/// Receives the changes of a [`Diff`] through [`Diff::apply`].
///
/// Any callback may fail. [`Diff::apply`] then stops issuing further changes and reports the error to
/// [`on_failure`](`DiffWorker::on_failure`) instead.
pub trait DiffWorker<'a, T> {
	/// All removals at once, in descending order of `index`.
	fn on_remove(&mut self, removals: &[(usize, &'a T)]) -> Result<(), ReloadError>;
	fn on_insert(&mut self, index: usize, new: &'a T) -> Result<(), ReloadError>;
	fn on_move(&mut self, from: usize, to: usize, item: &'a T) -> Result<(), ReloadError>;
	fn on_reload(&mut self, reload: &Reload<'a, T>) -> Result<(), ReloadError>;
	fn on_failure(&mut self, error: ReloadError);
}

/// The difference between two ordered sequences.
///
/// Changes are ordered as follows:
///
/// 1. removals, descending by old position,
/// 2. moves and reloads, in the order of the new sequence,
/// 3. insertions, ascending by new position.
///
/// Entities that are retained with the same content and the same relative position appear in
/// [`unchanged`](`Diff::unchanged`) instead, so that each entity of either sequence is accounted for exactly once.
#[derive(Debug)]
pub struct Diff<'a, T> {
	changes: Vec<Change<'a, T>>,
	unchanged: Vec<(usize, usize)>,
}

impl<'a, T: Distinctable> Diff<'a, T> {
	#[must_use]
	#[instrument(skip(old, new), fields(old.len = old.len(), new.len = new.len()))]
	pub fn compute(old: &'a [T], new: &'a [T]) -> Self {
		let mut old_positions = HashMap::<T::Identity, usize>::with_capacity(old.len());
		for (i, item) in old.iter().enumerate() {
			match old_positions.entry(item.identity()) {
				Entry::Vacant(vacant) => {
					vacant.insert(i);
				}
				Entry::Occupied(occupied) => {
					warn!(first = *occupied.get(), duplicate = i, identity = ?logged_identity(item), "Duplicate identity in old sequence. The duplicate will be removed.");
				}
			}
		}

		if cfg!(debug_assertions) {
			let mut seen = HashSet::with_capacity(new.len());
			for (j, item) in new.iter().enumerate() {
				if !seen.insert(item.identity()) {
					warn!(duplicate = j, identity = ?logged_identity(item), "Duplicate identity in new sequence. The duplicate will be inserted.");
				}
			}
		}

		let mut claimed = vec![false; old.len()];
		let mut retained = Vec::new();
		let mut insertions = Vec::new();
		for (j, item) in new.iter().enumerate() {
			match old_positions.remove(&item.identity()) {
				Some(i) => {
					claimed[i] = true;
					retained.push((i, j));
				}
				None => insertions.push(j),
			}
		}

		let in_order = longest_increasing_run(&retained.iter().map(|&(i, _)| i).collect::<Vec<_>>());

		let mut changes = Vec::with_capacity(old.len() - retained.len() + new.len());
		changes.extend(claimed.iter().enumerate().rev().filter(|&(_, &is_claimed)| !is_claimed).map(|(index, _)| Change::Remove { index, old: &old[index] }));

		let mut unchanged = Vec::new();
		for (&(from, to), &keeps_order) in retained.iter().zip(&in_order) {
			let (old_item, new_item) = (&old[from], &new[to]);
			if !old_item.is_same_content(new_item) {
				changes.push(Change::Reload(Reload {
					from,
					to,
					old: old_item,
					new: new_item,
					moved: !keeps_order,
				}));
			} else if keeps_order {
				unchanged.push((from, to));
			} else {
				changes.push(Change::Move { from, to, item: new_item });
			}
		}

		changes.extend(insertions.into_iter().map(|index| Change::Insert { index, new: &new[index] }));

		trace!(changes = changes.len(), unchanged = unchanged.len(), "Computed diff.");
		Self { changes, unchanged }
	}

	/// Pushes all changes to `worker`, in order.
	///
	/// Returns `false` if a callback failed. The error has then been handed to [`DiffWorker::on_failure`]
	/// and no further changes were issued.
	pub fn apply<W: DiffWorker<'a, T> + ?Sized>(&self, worker: &mut W) -> bool {
		match self.try_apply(worker) {
			Ok(()) => true,
			Err(error) => {
				trace!("Diff application stopped early.");
				worker.on_failure(error);
				false
			}
		}
	}

	fn try_apply<W: DiffWorker<'a, T> + ?Sized>(&self, worker: &mut W) -> Result<(), ReloadError> {
		let removals: Vec<_> = self
			.removals()
			.map(|change| match *change {
				Change::Remove { index, old } => (index, old),
				_ => unreachable!(),
			})
			.collect();
		if !removals.is_empty() {
			trace!(count = removals.len(), "Removing.");
			worker.on_remove(&removals)?;
		}

		for change in &self.changes[removals.len()..] {
			match change {
				Change::Remove { .. } => unreachable!("removals are sorted first"),
				&Change::Insert { index, new } => {
					trace!(index, identity = ?logged_identity(new), "Inserting.");
					worker.on_insert(index, new)?;
				}
				&Change::Move { from, to, item } => {
					trace!(from, to, identity = ?logged_identity(item), "Moving.");
					worker.on_move(from, to, item)?;
				}
				Change::Reload(reload) => {
					trace!(from = reload.from, to = reload.to, moved = reload.moved, identity = ?logged_identity(reload.new), "Reloading.");
					worker.on_reload(reload)?;
				}
			}
		}
		Ok(())
	}
}

impl<'a, T> Diff<'a, T> {
	#[must_use]
	pub fn changes(&self) -> &[Change<'a, T>] {
		&self.changes
	}

	/// Retained pairs of (old position, new position) that need no edit at all.
	#[must_use]
	pub fn unchanged(&self) -> &[(usize, usize)] {
		&self.unchanged
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.changes.is_empty()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.changes.len()
	}

	pub fn removals(&self) -> impl Iterator<Item = &Change<'a, T>> {
		self.changes.iter().take_while(|change| matches!(change, Change::Remove { .. }))
	}

	pub fn insertions(&self) -> impl Iterator<Item = &Change<'a, T>> {
		self.changes.iter().filter(|change| matches!(change, Change::Insert { .. }))
	}

	pub fn moves(&self) -> impl Iterator<Item = &Change<'a, T>> {
		self.changes.iter().filter(|change| matches!(change, Change::Move { .. }))
	}

	pub fn reloads(&self) -> impl Iterator<Item = &Reload<'a, T>> {
		self.changes.iter().filter_map(|change| match change {
			Change::Reload(reload) => Some(reload),
			_ => None,
		})
	}
}

/// Only with `dangerous-logging`, since identities may well be user data.
pub(crate) fn logged_identity<T: Distinctable>(item: &T) -> Option<T::Identity> {
	if cfg!(feature = "dangerous-logging") {
		Some(item.identity())
	} else {
		None
	}
}

/// Marks one longest strictly increasing subsequence of `values`.
fn longest_increasing_run(values: &[usize]) -> Vec<bool> {
	let mut tails: Vec<usize> = Vec::new();
	let mut predecessors = vec![None; values.len()];
	for (k, &value) in values.iter().enumerate() {
		let position = tails.partition_point(|&t| values[t] < value);
		if position > 0 {
			predecessors[k] = Some(tails[position - 1]);
		}
		if position == tails.len() {
			tails.push(k);
		} else {
			tails[position] = k;
		}
	}

	let mut keep = vec![false; values.len()];
	let mut cursor = tails.last().copied();
	while let Some(k) = cursor {
		keep[k] = true;
		cursor = predecessors[k];
	}
	keep
}

#[cfg(test)]
mod tests {
	use super::{logged_identity, longest_increasing_run};

	#[test]
	fn increasing_run() {
		assert_eq!(longest_increasing_run(&[]), Vec::<bool>::new());
		assert_eq!(longest_increasing_run(&[0, 1, 2]), [true, true, true]);
		assert_eq!(longest_increasing_run(&[3, 0, 1, 2]), [false, true, true, true]);
		assert_eq!(longest_increasing_run(&[1, 2, 3, 0]), [true, true, true, false]);
		assert_eq!(longest_increasing_run(&[2, 1, 0]).iter().filter(|&&k| k).count(), 1);
	}

	#[cfg(feature = "dangerous-logging")]
	#[test]
	fn identities_are_logged() {
		assert_eq!(logged_identity(&"a"), Some("a"));
		assert_eq!(logged_identity(&7_u8), Some(7));
	}

	#[cfg(not(feature = "dangerous-logging"))]
	#[test]
	fn identities_are_withheld() {
		assert_eq!(logged_identity(&"a"), None);
	}
}
