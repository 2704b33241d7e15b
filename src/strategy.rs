/// How a view is brought up to date with a new snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadStrategy {
	/// Always rebuild the whole view.
	FullReload,
	/// Diff the snapshots and only fix up structure (insertions, removals, moves).
	/// Cells whose content changed are left to the view's regular binding path.
	DiffArrangementOnly,
	/// Like [`DiffArrangementOnly`](`ReloadStrategy::DiffArrangementOnly`), but changed cells are reloaded in place too.
	DiffArrangementAndRefresh,
}

impl Default for ReloadStrategy {
	fn default() -> Self {
		Self::DiffArrangementOnly
	}
}

impl ReloadStrategy {
	#[must_use]
	pub fn uses_diff(self) -> bool {
		!matches!(self, Self::FullReload)
	}

	#[must_use]
	pub fn should_refresh(self) -> bool {
		matches!(self, Self::DiffArrangementAndRefresh)
	}
}
