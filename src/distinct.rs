//! The identity model that old and new entries are matched by.

use core::{fmt::Debug, hash::Hash};

/// An entity that can be told apart from its siblings across rebuilds.
///
/// [`identity`](`Distinctable::identity`) must stay stable for "the same logical item",
/// while [`is_same_content`](`Distinctable::is_same_content`) decides whether such an item needs to be refreshed.
///
/// Identities are expected to be unique within one sequence.
/// Duplicates are tolerated (the first occurrence wins), but the resulting edits are unlikely to be what you want.
pub trait Distinctable {
	type Identity: Hash + Eq + Clone + Debug;

	fn identity(&self) -> Self::Identity;

	/// Only called for pairs with equal [`identity`](`Distinctable::identity`).
	fn is_same_content(&self, other: &Self) -> bool;

	/// Same identity **and** same content.
	fn is_distinct_equal(&self, other: &Self) -> bool {
		self.identity() == other.identity() && self.is_same_content(other)
	}
}

macro_rules! value_distinctable {
	($($ty:ty),*$(,)?) => {$(
		impl Distinctable for $ty {
			type Identity = Self;

			#[allow(clippy::clone_on_copy)]
			fn identity(&self) -> Self::Identity {
				self.clone()
			}

			fn is_same_content(&self, _: &Self) -> bool {
				true
			}
		}
	)*};
}

value_distinctable!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool, &'static str, String);

/// An ordered group of cells, itself [`Distinctable`].
///
/// Two sections have the same content only if their cells are pairwise [distinct-equal](`Distinctable::is_distinct_equal`),
/// in order. Any cell change therefore turns the whole section into a reload candidate, which is where cell-level diffing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<K, C> {
	pub identity: K,
	pub cells: Vec<C>,
}

impl<K, C> Section<K, C> {
	#[must_use]
	pub fn new(identity: K, cells: impl IntoIterator<Item = C>) -> Self {
		Self {
			identity,
			cells: cells.into_iter().collect(),
		}
	}

	#[must_use]
	pub fn cell_count(&self) -> usize {
		self.cells.len()
	}
}

impl<K, C> Distinctable for Section<K, C>
where
	K: Hash + Eq + Clone + Debug,
	C: Distinctable,
{
	type Identity = K;

	fn identity(&self) -> Self::Identity {
		self.identity.clone()
	}

	fn is_same_content(&self, other: &Self) -> bool {
		self.cells.len() == other.cells.len() && self.cells.iter().zip(&other.cells).all(|(a, b)| a.is_distinct_equal(b))
	}
}
