//! Upgrades documents written by older releases to the current schema.
//!
//! Works on the raw YAML mapping, before it is bound to [`Settings`](crate::models::Settings),
//! so that loosely typed values can be fixed up before serde sees them.

use serde_yaml_ng::{Mapping, Number, Value};

/// Top-level keys older releases stamped onto the document at load time.
const RUNTIME_KEYS: [&str; 3] = ["path", "config_path", "application_path"];

/// `listing_setting` keys that belong in the side files, not the document.
const LIST_KEYS: [&str; 2] = ["whitelist", "blacklist"];

/// Fill in fields missing from older schemas and coerce numeric strings.
///
/// Steps, in order:
/// 1. drop stale runtime keys (`path`, `config_path`, `application_path`)
/// 2. insert `listing_setting` with both activation flags off if absent, and
///    drop in-document `whitelist` / `blacklist` entries
/// 3. insert `telegram_setting.session = "anon"` if absent
/// 4. insert `order_setting.make_short = false` if absent
/// 5. turn scalar `order_setting` keys into strings
/// 6. replace every `order_setting` string that parses as a float with the number
///
/// Idempotent: normalizing a normalized document changes nothing.
pub fn normalize(mut doc: Mapping) -> Mapping {
    for name in RUNTIME_KEYS {
        doc.remove(name);
    }

    if !doc.contains_key("listing_setting") {
        let mut listing = Mapping::new();
        listing.insert(key("whitelist_activate"), Value::Bool(false));
        listing.insert(key("blacklist_activate"), Value::Bool(false));
        doc.insert(key("listing_setting"), Value::Mapping(listing));
    } else if let Some(listing) = doc
        .get_mut("listing_setting")
        .and_then(Value::as_mapping_mut)
    {
        for name in LIST_KEYS {
            listing.remove(name);
        }
    }

    if let Some(telegram) = group_mut(&mut doc, "telegram_setting") {
        if !telegram.contains_key("session") {
            telegram.insert(key("session"), Value::String("anon".to_string()));
        }
    }

    if let Some(order) = group_mut(&mut doc, "order_setting") {
        if !order.contains_key("make_short") {
            order.insert(key("make_short"), Value::Bool(false));
        }
        stringify_keys(order);
        coerce_numeric_strings(order);
    }

    doc
}

/// Parse a string the way a float literal is read.
///
/// Surrounding whitespace is ignored and single underscores between digits
/// are accepted as digit separators (`1_000`).
pub fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    let parsed = if text.contains('_') {
        strip_digit_separators(text)?.parse::<f64>()
    } else {
        text.parse::<f64>()
    };
    parsed.ok().map(Number::from)
}

/// Remove `_` separators, rejecting any that is not between two digits.
fn strip_digit_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut stripped = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        if c != '_' {
            stripped.push(c);
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(stripped)
}

/// Rewrite number and bool keys as strings; the schema keys this group by name.
fn stringify_keys(group: &mut Mapping) {
    let needs_rewrite = group
        .keys()
        .any(|k| matches!(k, Value::Number(_) | Value::Bool(_)));
    if !needs_rewrite {
        return;
    }

    *group = std::mem::take(group)
        .into_iter()
        .map(|(k, v)| match k {
            Value::Number(n) => (Value::String(n.to_string()), v),
            Value::Bool(b) => (Value::String(b.to_string()), v),
            other => (other, v),
        })
        .collect();
}

fn coerce_numeric_strings(group: &mut Mapping) {
    for value in group.values_mut() {
        let coerced = match value {
            Value::String(text) => parse_number(text),
            _ => None,
        };
        if let Some(number) = coerced {
            *value = Value::Number(number);
        }
    }
}

/// Returns the named group, creating it when absent or null.
///
/// A group holding a scalar or sequence is left alone and `None` is returned;
/// binding the document to the schema reports it.
fn group_mut<'a>(doc: &'a mut Mapping, name: &str) -> Option<&'a mut Mapping> {
    let group = doc
        .entry(key(name))
        .or_insert(Value::Mapping(Mapping::new()));
    if group.is_null() {
        *group = Value::Mapping(Mapping::new());
    }
    group.as_mapping_mut()
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}
