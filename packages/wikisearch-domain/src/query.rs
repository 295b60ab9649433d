//! Free-text term filtering for SphinxQL `MATCH()` predicates.
//!
//! The daemon's query syntax assigns meaning to a number of punctuation
//! characters. User input must stay expressive (balanced phrase quotes and
//! grouping survive) while dangling syntax is neutralized, and filtering an
//! already-filtered term must change nothing.

/// Operators that are escaped whenever they appear unescaped.
const ALWAYS_ESCAPE: &[char] = &[':', '!', '@', '~', '&', '/', '^', '$'];
/// Operators that are meaningless dangling at either end of a term.
const TRIM_OPERATORS: &[char] = &['!', '~', '&', '/', '^', '$', ':', '@', '-', '|'];

/// True when the term contains at least one word character. Terms without
/// any short-circuit to an empty result before query construction.
pub fn has_word_chars(term: &str) -> bool {
	term.chars().any(is_word_char)
}

/// Splits a term into its word-character runs.
pub fn keywords(term: &str) -> Vec<&str> {
	term.split(|c: char| !is_word_char(c)).filter(|token| !token.is_empty()).collect()
}

pub fn keyword_count(term: &str) -> usize {
	keywords(term).len()
}

/// Renders a raw user term search-safe. The transform is a fixed point:
/// applying it to its own output returns the output unchanged.
pub fn filter_term(raw: &str) -> String {
	if !has_word_chars(raw) {
		return String::new();
	}

	let trimmed = trim_operators(raw);
	let escaped = escape_unbalanced(trimmed);

	escape_lone_hyphens(escaped)
}

fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

fn trim_operators(raw: &str) -> &str {
	let mut term = raw.trim();

	loop {
		match term.chars().next() {
			Some(c) if TRIM_OPERATORS.contains(&c) || c.is_whitespace() => {
				term = &term[c.len_utf8()..];
			},
			_ => break,
		}
	}
	loop {
		let Some((idx, c)) = term.char_indices().next_back() else {
			break;
		};

		if (TRIM_OPERATORS.contains(&c) || c.is_whitespace()) && !is_escaped_at(term, idx) {
			term = &term[..idx];
		} else {
			break;
		}
	}

	term
}

fn is_escaped_at(term: &str, idx: usize) -> bool {
	let mut backslashes = 0;

	for c in term[..idx].chars().rev() {
		if c == '\\' {
			backslashes += 1;
		} else {
			break;
		}
	}

	backslashes % 2 == 1
}

fn escape_unbalanced(term: &str) -> String {
	let escape_quotes = unescaped_count(term, '"') % 2 == 1;
	let escape_parens = unescaped_count(term, '(') != unescaped_count(term, ')');
	let escape_brackets = unescaped_count(term, '[') != unescaped_count(term, ']');
	let mut out = String::with_capacity(term.len() + 8);
	let mut escaped = false;

	for c in term.chars() {
		if escaped {
			out.push(c);
			escaped = false;

			continue;
		}
		if c == '\\' {
			out.push(c);
			escaped = true;

			continue;
		}

		let needs_escape = match c {
			'"' => escape_quotes,
			'(' | ')' => escape_parens,
			'[' | ']' => escape_brackets,
			_ => ALWAYS_ESCAPE.contains(&c),
		};

		if needs_escape {
			out.push('\\');
		}

		out.push(c);
	}

	out
}

fn unescaped_count(term: &str, target: char) -> usize {
	let mut count = 0;
	let mut escaped = false;

	for c in term.chars() {
		if escaped {
			escaped = false;

			continue;
		}
		if c == '\\' {
			escaped = true;

			continue;
		}
		if c == target {
			count += 1;
		}
	}

	count
}

/// A lone `-` between spaces would act as an exclusion operator with no
/// operand; keep it as a literal instead.
fn escape_lone_hyphens(mut term: String) -> String {
	while term.contains(" - ") {
		term = term.replace(" - ", " \\- ");
	}

	term
}
