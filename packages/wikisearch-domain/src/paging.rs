//! Page windows for result navigation.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
	pub first_page: u64,
	pub last_page: u64,
	pub max_page: u64,
	pub has_prev: bool,
	pub has_next: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PagingError {
	#[error("Page size must be greater than zero.")]
	ZeroPerPage,
	/// The requested page does not exist. The edge layer is expected to
	/// redirect to `last_page` rather than silently clamping.
	#[error("Page {requested} is out of range; the last valid page is {last_page}.")]
	PageOutOfRange { requested: u64, last_page: u64 },
}

/// Computes the window of page links to display, centered on the current
/// page and clamped to `[1, ceil(total_hits / per_page)]`.
pub fn page_window(
	per_page: u64,
	current_page: u64,
	total_hits: u64,
	display_pages: u64,
) -> Result<PageWindow, PagingError> {
	if per_page == 0 {
		return Err(PagingError::ZeroPerPage);
	}

	let max_page = total_hits.div_ceil(per_page).max(1);

	if current_page == 0 || current_page > max_page {
		return Err(PagingError::PageOutOfRange { requested: current_page, last_page: max_page });
	}

	let half = (display_pages / 2).max(1);
	let first_page = current_page.saturating_sub(half).max(1);
	let last_page = (first_page + half).min(max_page);

	Ok(PageWindow {
		first_page,
		last_page,
		max_page,
		has_prev: first_page > 1,
		has_next: last_page < max_page,
	})
}
