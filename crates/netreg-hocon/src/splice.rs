//! Span-preserving field replacement
//!
//! Editing is deliberately text-splice rather than parse-and-regenerate:
//! the format's substitution syntax (`${...}`) cannot be round-tripped
//! by a naive parser, so the only safe edit is to locate one
//! triple-quoted literal and replace its interior, leaving every byte
//! outside that span untouched. Any value shape other than a
//! triple-quoted literal aborts with no partial edit.

use crate::error::{HoconError, HoconResult};
use crate::scan::{ident_end, is_ident_start, skip_string, skip_triple, skip_ws, starts_triple};
use crate::TRIPLE_QUOTE;

/// Replace the interior of the triple-quoted `field` belonging to the
/// block whose `name` field is bound to `agent`.
///
/// The block is located by the first `name = "<agent>"` (or bare /
/// colon-separated variants) binding outside string literals; the field
/// is the first `field =` assignment after that point. The new interior
/// is `\n<value>\n`, with any literal `"""` in the value escaped so the
/// result stays well-formed.
///
/// # Errors
/// - [`HoconError::TargetNotFound`] when no `name` binding matches
/// - [`HoconError::FieldNotFound`] when the field is absent after it
/// - [`HoconError::UnsupportedValueShape`] when the current value is
///   not a triple-quoted literal
/// - [`HoconError::Malformed`] when the literal never closes
pub fn replace_triple_quoted(
    text: &str,
    agent: &str,
    field: &str,
    new_value: &str,
) -> HoconResult<String> {
    let anchor = find_name_binding(text, agent).ok_or_else(|| HoconError::TargetNotFound {
        name: agent.to_string(),
    })?;

    let value_start =
        find_field_assignment(text, anchor, field).ok_or_else(|| HoconError::FieldNotFound {
            name: agent.to_string(),
            field: field.to_string(),
        })?;

    let b = text.as_bytes();
    if !starts_triple(b, value_start) {
        return Err(HoconError::UnsupportedValueShape {
            name: agent.to_string(),
            field: field.to_string(),
        });
    }

    let interior = value_start + TRIPLE_QUOTE.len();
    let close = text[interior..].find(TRIPLE_QUOTE).map(|p| interior + p).ok_or_else(|| {
        HoconError::Malformed(format!("closing \"\"\" not found for field '{field}'"))
    })?;

    let escaped = new_value.replace(TRIPLE_QUOTE, "\\\"\\\"\\\"");
    let mut out = String::with_capacity(text.len() + escaped.len() + 2);
    out.push_str(&text[..interior]);
    out.push('\n');
    out.push_str(&escaped);
    out.push('\n');
    out.push_str(&text[close..]);
    Ok(out)
}

/// Offset just past the value of the first `name` binding whose value
/// equals `agent`, quoted or bare. Bindings inside string literals are
/// never matched.
fn find_name_binding(text: &str, agent: &str) -> Option<usize> {
    let b = text.as_bytes();
    let mut i = 0;

    while i < b.len() {
        if starts_triple(b, i) {
            i = skip_triple(b, i)?;
        } else if b[i] == b'"' {
            let end = skip_string(b, i)?;
            let key = &text[i + 1..end - 1];
            i = match check_name_value(text, end, key, agent) {
                NameCheck::Match(after) => return Some(after),
                NameCheck::Continue(next) => next,
            };
        } else if is_ident_start(b[i]) {
            let end = ident_end(b, i);
            let key = &text[i..end];
            i = match check_name_value(text, end, key, agent) {
                NameCheck::Match(after) => return Some(after),
                NameCheck::Continue(next) => next,
            };
        } else {
            i += 1;
        }
    }

    None
}

enum NameCheck {
    Match(usize),
    Continue(usize),
}

fn check_name_value(text: &str, after_key: usize, key: &str, agent: &str) -> NameCheck {
    let b = text.as_bytes();
    if key != "name" {
        return NameCheck::Continue(after_key);
    }
    let j = skip_ws(b, after_key);
    if j >= b.len() || (b[j] != b':' && b[j] != b'=') {
        return NameCheck::Continue(after_key);
    }
    let k = skip_ws(b, j + 1);
    if k < b.len() && b[k] == b'"' {
        match skip_string(b, k) {
            Some(end) if &text[k + 1..end - 1] == agent => NameCheck::Match(end),
            Some(end) => NameCheck::Continue(end),
            None => NameCheck::Continue(k + 1),
        }
    } else if k < b.len() && is_ident_start(b[k]) {
        let end = ident_end(b, k);
        if &text[k..end] == agent {
            NameCheck::Match(end)
        } else {
            NameCheck::Continue(end)
        }
    } else {
        NameCheck::Continue(j + 1)
    }
}

/// Offset of the first byte of the value bound to `field` at or after
/// `from`. The search is a forward scan, so a field belonging to a
/// later sibling block can match when the target block lacks it; the
/// value-shape check downstream is what keeps that from corrupting
/// anything.
fn find_field_assignment(text: &str, from: usize, field: &str) -> Option<usize> {
    let b = text.as_bytes();
    let mut i = from;

    while i < b.len() {
        if starts_triple(b, i) {
            i = skip_triple(b, i)?;
        } else if b[i] == b'"' {
            let end = skip_string(b, i)?;
            if &text[i + 1..end - 1] == field {
                if let Some(start) = value_start_after(b, end) {
                    return Some(start);
                }
            }
            i = end;
        } else if is_ident_start(b[i]) {
            let end = ident_end(b, i);
            if &text[i..end] == field {
                if let Some(start) = value_start_after(b, end) {
                    return Some(start);
                }
            }
            i = end;
        } else {
            i += 1;
        }
    }

    None
}

fn value_start_after(b: &[u8], after_key: usize) -> Option<usize> {
    let j = skip_ws(b, after_key);
    if j >= b.len() || (b[j] != b':' && b[j] != b'=') {
        return None;
    }
    Some(skip_ws(b, j + 1))
}
