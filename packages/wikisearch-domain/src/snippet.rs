//! Snippet post-processing.
//!
//! The daemon returns excerpts as plain text with match boundaries marked by
//! a control-byte pair that cannot occur in indexed content. Everything else
//! in the snippet is untrusted and is escaped before the markers are
//! substituted for the configured markup, so only match boundaries are ever
//! structural.

use regex::Regex;
use wikisearch_config::Excerpts;

/// Wire-level marker emitted by the daemon before each match.
pub const BEFORE_MATCH_MARKER: &str = "\u{1}";
/// Wire-level marker emitted by the daemon after each match.
pub const AFTER_MATCH_MARKER: &str = "\u{2}";

/// Renders one raw snippet into final highlight markup.
pub fn render(raw: &str, excerpts: &Excerpts) -> String {
	let flattened = flatten_wiki_markup(raw);
	let escaped = escape_html(&flattened);

	escaped
		.replace(BEFORE_MATCH_MARKER, &excerpts.before_match)
		.replace(AFTER_MATCH_MARKER, &excerpts.after_match)
		.replace('\n', "<br />")
}

/// Visible placeholder substituted when a snippet request fails; the row
/// itself is kept.
pub fn render_error(detail: &str) -> String {
	format!("ERROR: {}", escape_html(detail))
}

/// Flattens leftover wiki control characters (link/table/list/heading
/// syntax) into spaces so fragments of markup do not leak into excerpts.
fn flatten_wiki_markup(text: &str) -> String {
	match Regex::new(r"[\[\]{}*#|!]+|={2,}") {
		Ok(re) => re.replace_all(text, " ").into_owned(),
		Err(_) => text.to_string(),
	}
}

fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use wikisearch_config::Excerpts;

	use super::{AFTER_MATCH_MARKER, BEFORE_MATCH_MARKER, render, render_error};

	fn excerpts() -> Excerpts {
		Excerpts::default()
	}

	#[test]
	fn markers_become_markup() {
		let raw = format!("found {BEFORE_MATCH_MARKER}term{AFTER_MATCH_MARKER} here");

		assert_eq!(
			render(&raw, &excerpts()),
			"found <span class=\"searchmatch\">term</span> here"
		);
	}

	#[test]
	fn daemon_supplied_html_is_escaped() {
		let raw = format!("<b>bold</b> {BEFORE_MATCH_MARKER}x{AFTER_MATCH_MARKER}");
		let rendered = render(&raw, &excerpts());

		assert!(rendered.starts_with("&lt;b&gt;bold&lt;/b&gt;"));
		assert!(rendered.contains("<span class=\"searchmatch\">x</span>"));
	}

	#[test]
	fn wiki_markup_is_flattened() {
		let rendered = render("== Heading == [[Link|label]] * item", &excerpts());

		assert!(!rendered.contains("=="));
		assert!(!rendered.contains("[["));
		assert!(!rendered.contains('*'));
		assert!(rendered.contains("Heading"));
		assert!(rendered.contains("label"));
	}

	#[test]
	fn newlines_become_paragraph_breaks() {
		assert_eq!(render("one\ntwo", &excerpts()), "one<br />two");
	}

	#[test]
	fn error_placeholder_is_escaped() {
		assert_eq!(render_error("bad <query>"), "ERROR: bad &lt;query&gt;");
	}
}
