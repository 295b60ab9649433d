//! Synthetic category keywords.
//!
//! Category membership is filtered through the full-text engine by indexing
//! one synthetic keyword per category into a dedicated field. The token is a
//! lowercased slug plus a short content hash, so two names differing only in
//! punctuation never collapse to the same keyword.

use std::collections::HashSet;

/// Token indexed for documents without any category, and selectable as a
/// filter value via the empty category name.
pub const NO_CATEGORY_TOKEN: &str = "__nocat__";

const TOKEN_HASH_LEN: usize = 8;

/// Encodes one category name into its synthetic keyword. Deterministic;
/// an empty (or blank) name maps to [`NO_CATEGORY_TOKEN`].
pub fn category_token(name: &str) -> String {
	let trimmed = name.trim();

	if trimmed.is_empty() {
		return NO_CATEGORY_TOKEN.to_string();
	}

	let mut slug = String::with_capacity(trimmed.len());

	for c in trimmed.to_lowercase().chars() {
		if c.is_alphanumeric() {
			slug.push(c);
		} else if !slug.ends_with('_') && !slug.is_empty() {
			slug.push('_');
		}
	}

	let slug = slug.trim_end_matches('_');
	let hash = blake3::hash(trimmed.as_bytes()).to_hex();

	format!("__cat_{slug}_{}__", &hash[..TOKEN_HASH_LEN])
}

/// The full-text field value for a document's category list: one token per
/// category, or the sentinel when the document has none.
pub fn field_tokens(categories: &[String]) -> String {
	if categories.is_empty() {
		return NO_CATEGORY_TOKEN.to_string();
	}

	categories.iter().map(|name| category_token(name)).collect::<Vec<_>>().join(" ")
}

/// The display-attribute value for a document's category list.
pub fn display_list(categories: &[String]) -> String {
	categories.join(", ")
}

/// Boolean-OR keyword group appended to the predicate when categories are
/// selected. Returns `None` when the filter set is empty (unrestricted).
pub fn match_group(selected: &[String]) -> Option<String> {
	if selected.is_empty() {
		return None;
	}

	let tokens = selected.iter().map(|name| category_token(name)).collect::<Vec<_>>();

	Some(format!("@category ({})", tokens.join("|")))
}

/// Splits grouped `category_list` attribute values and deduplicates the names
/// across all of them, preserving first appearance order.
pub fn dedupe_category_lists<'a, I>(lists: I) -> Vec<String>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for list in lists {
		for name in list.split(',') {
			let name = name.trim();

			if name.is_empty() {
				continue;
			}
			if seen.insert(name.to_string()) {
				out.push(name.to_string());
			}
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::{
		NO_CATEGORY_TOKEN, category_token, dedupe_category_lists, field_tokens, match_group,
	};

	#[test]
	fn tokens_are_deterministic() {
		assert_eq!(category_token("Ancient History"), category_token("Ancient History"));
	}

	#[test]
	fn punctuation_variants_stay_distinct() {
		let a = category_token("C++");
		let b = category_token("C--");
		let c = category_token("C");

		assert_ne!(a, b);
		assert_ne!(a, c);
		assert_ne!(b, c);
	}

	#[test]
	fn tokens_are_single_keywords() {
		let token = category_token("Ancient History (Rome)");

		assert!(token.starts_with("__cat_ancient_history_rome_"));
		assert!(token.ends_with("__"));
		assert!(!token.contains(' '));
	}

	#[test]
	fn blank_name_maps_to_sentinel() {
		assert_eq!(category_token(""), NO_CATEGORY_TOKEN);
		assert_eq!(category_token("   "), NO_CATEGORY_TOKEN);
	}

	#[test]
	fn empty_category_list_indexes_the_sentinel() {
		assert_eq!(field_tokens(&[]), NO_CATEGORY_TOKEN);
	}

	#[test]
	fn match_group_ors_selected_tokens() {
		let group = match_group(&["Alpha".to_string(), String::new()])
			.expect("Non-empty selection must produce a group.");

		assert!(group.starts_with("@category ("));
		assert!(group.contains('|'));
		assert!(group.contains(NO_CATEGORY_TOKEN));
		assert_eq!(match_group(&[]), None);
	}

	#[test]
	fn facet_lists_are_deduplicated_in_order() {
		let lists = ["Rome, Greece", "Greece, Egypt", "", "Rome"];

		assert_eq!(dedupe_category_lists(lists), vec!["Rome", "Greece", "Egypt"]);
	}
}
