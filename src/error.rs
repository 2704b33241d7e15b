use crate::view::IndexPath;
use thiserror::Error;

/// A [`LiveView`](`crate::view::LiveView`) refused a structural edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
	#[error("section {section} is out of bounds (section count: {count})")]
	SectionOutOfBounds { section: usize, count: usize },

	#[error("item {path} is out of bounds (item count: {count})")]
	ItemOutOfBounds { path: IndexPath, count: usize },

	#[error("edit rejected by the view: {0}")]
	Rejected(String),
}

/// Handed to [`DiffWorker::on_failure`](`crate::diff::DiffWorker::on_failure`) when a change could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReloadError {
	#[error(transparent)]
	Edit(#[from] EditError),

	#[error("failed to reload the cells of section {section}")]
	Section {
		section: usize,
		#[source]
		source: Box<ReloadError>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpdateError {
	#[error("an update is already in flight for this view; wait for its completion before updating again")]
	InFlight,
}
