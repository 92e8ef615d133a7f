//! Attribute string encoding.
//!
//! Attributes are flattened into a single CSV field as a sequence of
//! `name<value>` pairs. Values escape `<`, `>`, `"` and `&` as XML entities
//! and control characters as `&xHH;`.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::model::Attributes;

/// Encode attributes into an attribute string.
pub fn encode_attributes(attributes: &Attributes) -> String {
    let mut out = String::new();
    for (name, value) in attributes.iter() {
        if name.is_empty() || name.contains(['<', '>']) {
            log::warn!("Skipping attribute with unencodable name '{}'", name);
            continue;
        }
        out.push_str(name);
        out.push('<');
        escape_into(&mut out, value);
        out.push('>');
    }
    out
}

/// Decode an attribute string.
pub fn decode_attributes(encoded: &str) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    let mut rest = encoded.trim();

    while !rest.is_empty() {
        let open = rest
            .find('<')
            .ok_or_else(|| Error::Format(format!("attribute without value in '{}'", encoded)))?;
        let (name, tail) = (&rest[..open], &rest[open + 1..]);
        let close = tail
            .find('>')
            .ok_or_else(|| Error::Format(format!("unterminated attribute '{}'", name)))?;

        attributes.set(name, unescape(&tail[..close]));
        rest = &tail[close + 1..];
    }

    Ok(attributes)
}

fn escape_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            c if (c as u32) < 32 || c as u32 == 127 => {
                let _ = write!(out, "&x{:02X};", c as u32);
            }
            c => out.push(c),
        }
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let entity = tail
            .find(';')
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));
        match entity {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            // unknown entity, keep literally
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "amp" => Some('&'),
        _ => entity
            .strip_prefix('x')
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32),
    }
}
