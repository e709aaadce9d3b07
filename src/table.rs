//! Client-side search, sort, and pagination for staff listings.

// std
use std::cmp::Ordering;
// self
use crate::api::{Donee, Donor, Institution, Story};

/// Rows shown per page.
pub const PAGE_SIZE: usize = 10;

/// Record that can be listed in a [`TableView`].
pub trait TableRow {
	/// Login name.
	fn username(&self) -> &str;

	/// Display name.
	fn name(&self) -> &str;
}
macro_rules! impl_table_row {
	($($ty:ty),+) => {
		$(
			impl TableRow for $ty {
				fn username(&self) -> &str {
					&self.username
				}

				fn name(&self) -> &str {
					&self.name
				}
			}
		)+
	};
}
impl_table_row!(Donee, Donor, Institution, Story);

/// Sortable column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
	/// Sort by login name.
	#[default]
	Username,
	/// Sort by display name.
	Name,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
	/// A to Z.
	#[default]
	Ascending,
	/// Z to A.
	Descending,
}
impl SortDirection {
	fn flip(self) -> Self {
		match self {
			Self::Ascending => Self::Descending,
			Self::Descending => Self::Ascending,
		}
	}
}

/// Search, sort, and page state over a fetched listing.
#[derive(Clone, Debug)]
pub struct TableView<R> {
	rows: Vec<R>,
	query: String,
	sort_key: SortKey,
	direction: SortDirection,
	page: usize,
}
impl<R> TableView<R>
where
	R: TableRow,
{
	/// Wraps rows with an empty search, `username` ascending, on page 1.
	pub fn new(rows: Vec<R>) -> Self {
		Self {
			rows,
			query: String::new(),
			sort_key: SortKey::default(),
			direction: SortDirection::default(),
			page: 1,
		}
	}

	/// Sets the search text and returns to page 1.
	pub fn search(&mut self, query: impl Into<String>) {
		self.query = query.into();
		self.page = 1;
	}

	/// Selects a sort column; re-selecting the active column flips the direction.
	pub fn sort_by(&mut self, key: SortKey) {
		if self.sort_key == key {
			self.direction = self.direction.flip();
		} else {
			self.sort_key = key;
			self.direction = SortDirection::Ascending;
		}
	}

	/// Active sort column and direction.
	pub fn sort(&self) -> (SortKey, SortDirection) {
		(self.sort_key, self.direction)
	}

	/// Moves to `page`, clamped to the available range.
	pub fn go_to(&mut self, page: usize) {
		self.page = page.clamp(1, self.total_pages().max(1));
	}

	/// Current page number, starting at 1.
	pub fn page(&self) -> usize {
		self.page.clamp(1, self.total_pages().max(1))
	}

	/// Number of pages over the filtered rows.
	pub fn total_pages(&self) -> usize {
		self.filtered().len().div_ceil(PAGE_SIZE)
	}

	/// Rows matching the search, in sort order.
	pub fn filtered(&self) -> Vec<&R> {
		let needle = self.query.trim().to_lowercase();
		let mut rows: Vec<&R> = self
			.rows
			.iter()
			.filter(|row| {
				needle.is_empty()
					|| row.username().to_lowercase().contains(&needle)
					|| row.name().to_lowercase().contains(&needle)
			})
			.collect();

		rows.sort_by(|a, b| {
			let ordering = self.compare(a, b);

			match self.direction {
				SortDirection::Ascending => ordering,
				SortDirection::Descending => ordering.reverse(),
			}
		});

		rows
	}

	/// Rows on the current page.
	pub fn current_page(&self) -> Vec<&R> {
		let start = (self.page() - 1) * PAGE_SIZE;

		self.filtered().into_iter().skip(start).take(PAGE_SIZE).collect()
	}

	fn compare(&self, a: &R, b: &R) -> Ordering {
		match self.sort_key {
			SortKey::Username => a.username().cmp(b.username()),
			SortKey::Name => a.name().cmp(b.name()),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn donee(username: &str, name: &str) -> Donee {
		Donee { id: username.into(), username: username.into(), name: name.into() }
	}

	fn usernames(rows: &[&Donee]) -> Vec<String> {
		rows.iter().map(|row| row.username.clone()).collect()
	}

	#[test]
	fn search_matches_username_or_name_ignoring_case() {
		let mut view = TableView::new(vec![
			donee("amina", "Amina Otieno"),
			donee("brian", "Brian Kamau"),
			donee("cate", "Cate Wanjiru"),
		]);

		view.search("KAMAU");

		assert_eq!(usernames(&view.filtered()), ["brian"]);

		view.search("a");

		assert_eq!(usernames(&view.filtered()), ["amina", "brian", "cate"]);
	}

	#[test]
	fn reselecting_a_column_flips_direction() {
		let mut view =
			TableView::new(vec![donee("b", "Zed"), donee("a", "Yan"), donee("c", "Xia")]);

		assert_eq!(usernames(&view.filtered()), ["a", "b", "c"]);

		view.sort_by(SortKey::Username);

		assert_eq!(view.sort(), (SortKey::Username, SortDirection::Descending));
		assert_eq!(usernames(&view.filtered()), ["c", "b", "a"]);

		view.sort_by(SortKey::Name);

		assert_eq!(view.sort(), (SortKey::Name, SortDirection::Ascending));
		assert_eq!(usernames(&view.filtered()), ["c", "a", "b"]);
	}

	#[test]
	fn pages_hold_ten_rows_and_clamp() {
		let rows: Vec<Donee> = (0..23).map(|i| donee(&format!("user{i:02}"), "Donee")).collect();
		let mut view = TableView::new(rows);

		assert_eq!(view.total_pages(), 3);
		assert_eq!(view.current_page().len(), 10);

		view.go_to(9);

		assert_eq!(view.page(), 3);
		assert_eq!(usernames(&view.current_page()), ["user20", "user21", "user22"]);

		view.go_to(0);

		assert_eq!(view.page(), 1);
	}

	#[test]
	fn empty_listing_stays_on_page_one() {
		let mut view = TableView::<Donee>::new(Vec::new());

		view.go_to(4);

		assert_eq!(view.total_pages(), 0);
		assert_eq!(view.page(), 1);
		assert!(view.current_page().is_empty());
	}
}
