//! Canonical text rendering of [`Value`]s.
//!
//! [`canonicalize`] turns a value into the lines that are diffed. Collections
//! put one element or pair per line so that a change to a single element
//! shows up as a single changed line. Mapping pairs are sorted by key, which
//! makes the output independent of insertion order.

use std::fmt::Write as _;

use crate::value::{Inspect, Value};

/// Generic object dumps wider than this are broken one field per line.
const DUMP_WIDTH: usize = 80;

/// Render `value` as the ordered lines used for line-based diffing.
pub fn canonicalize(value: &Value) -> Vec<String> {
    match value {
        Value::Str(s) if s.contains('\n') => split_lines(s),
        Value::List(items) => list_lines(items),
        Value::Map(pairs) => map_lines(pairs),
        Value::Object(object) => split_lines(&describe(object.as_ref(), true)),
        other => split_lines(&inspect(other)),
    }
}

/// The single-line representation of a value.
///
/// Strings are quoted and escaped, symbols get a leading colon, and
/// collections nest their elements' representations. Only a custom
/// [`Inspect::describe_self`] may introduce newlines.
pub fn inspect(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format!("{f:?}"),
        Value::Str(s) => quote(s),
        Value::Symbol(name) => symbol(name),
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(inspect).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Map(pairs) => {
            let inner: Vec<String> = sorted_pairs(pairs)
                .into_iter()
                .map(|(k, v)| format!("{} => {}", inspect(k), inspect(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        Value::Object(object) => describe(object.as_ref(), false),
    }
}

/// Split text into lines.
///
/// Splits on `\n`, drops a trailing `\r` from each line and discards
/// trailing empty lines, so `"a\nb\n"` and `"a\nb"` both yield two lines.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// The text a mapping key is sorted by: strings and symbols sort by their
/// bare text, everything else by its representation.
fn sort_text(key: &Value) -> String {
    match key {
        Value::Str(s) | Value::Symbol(s) => s.clone(),
        other => inspect(other),
    }
}

fn sorted_pairs(pairs: &[(Value, Value)]) -> Vec<(&Value, &Value)> {
    let mut sorted: Vec<(&Value, &Value)> = pairs.iter().map(|(k, v)| (k, v)).collect();
    sorted.sort_by_cached_key(|(k, _)| (sort_text(k), inspect(k)));
    sorted
}

fn list_lines(items: &[Value]) -> Vec<String> {
    if items.is_empty() {
        return vec!["[]".to_string()];
    }
    let last = items.len() - 1;
    let text = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let prefix = if i == 0 { "[" } else { " " };
            let suffix = if i == last { "]" } else { "," };
            format!("{prefix}{}{suffix}", inspect(item))
        })
        .collect::<Vec<_>>()
        .join("\n");
    split_lines(&text)
}

// Every pair keeps its trailing comma, the last one included.
fn map_lines(pairs: &[(Value, Value)]) -> Vec<String> {
    if pairs.is_empty() {
        return vec!["{}".to_string()];
    }
    let text = sorted_pairs(pairs)
        .into_iter()
        .map(|(k, v)| format!("{} => {},", inspect(k), inspect(v)))
        .collect::<Vec<_>>()
        .join("\n");
    split_lines(&text)
}

fn describe(object: &dyn Inspect, allow_multiline: bool) -> String {
    if let Some(description) = object.describe_self() {
        return description;
    }
    let fields: Vec<String> = object
        .fields()
        .iter()
        .map(|(name, value)| format!("{name}={}", inspect(value)))
        .collect();
    if fields.is_empty() {
        return format!("#<{}>", object.type_name());
    }
    let single = format!("#<{} {}>", object.type_name(), fields.join(", "));
    if !allow_multiline || single.chars().count() <= DUMP_WIDTH {
        return single;
    }
    format!("#<{}\n {}>", object.type_name(), fields.join(",\n "))
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{1b}' => out.push_str("\\e"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn symbol(name: &str) -> String {
    if is_plain_identifier(name) {
        format!(":{name}")
    } else {
        format!(":{}", quote(name))
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let body = name
        .strip_suffix(['?', '!', '='])
        .unwrap_or(name);
    let mut chars = body.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Animal {
        name: &'static str,
        species: &'static str,
    }

    impl Inspect for Animal {
        fn type_name(&self) -> &str {
            "Animal"
        }

        fn describe_self(&self) -> Option<String> {
            Some(format!(
                "<Animal\n  name={},\n  species={}\n>\n",
                self.name, self.species
            ))
        }
    }

    #[derive(Debug)]
    struct Record {
        fields: Vec<(String, Value)>,
    }

    impl Inspect for Record {
        fn type_name(&self) -> &str {
            "Record"
        }

        fn fields(&self) -> Vec<(String, Value)> {
            self.fields.clone()
        }
    }

    #[test]
    fn single_line_string_is_quoted() {
        assert_eq!(
            canonicalize(&Value::from("this is one string")),
            vec!["\"this is one string\""]
        );
    }

    #[test]
    fn multi_line_string_is_split_as_is() {
        assert_eq!(
            canonicalize(&Value::from("this is:\n  one string")),
            vec!["this is:", "  one string"]
        );
        assert_eq!(canonicalize(&Value::from("a\r\nb\n\n")), vec!["a", "b"]);
    }

    #[test]
    fn list_puts_one_element_per_line() {
        let value = Value::List(vec![
            Value::symbol("foo"),
            Value::from("bar"),
            Value::symbol("width"),
            Value::from("very wide"),
        ]);
        assert_eq!(
            canonicalize(&value),
            vec!["[:foo,", " \"bar\",", " :width,", " \"very wide\"]"]
        );
    }

    #[test]
    fn single_and_empty_lists() {
        assert_eq!(canonicalize(&Value::list([1])), vec!["[1]"]);
        assert_eq!(canonicalize(&Value::List(Vec::new())), vec!["[]"]);
    }

    #[test]
    fn map_pairs_are_sorted_and_all_keep_commas() {
        let value = Value::Map(vec![
            (Value::symbol("foo"), Value::from("bar")),
            (Value::symbol("baz"), Value::from("quux")),
            (Value::symbol("delta"), Value::from("charlie")),
        ]);
        assert_eq!(
            canonicalize(&value),
            vec![
                ":baz => \"quux\",",
                ":delta => \"charlie\",",
                ":foo => \"bar\",",
            ]
        );
        assert_eq!(canonicalize(&Value::Map(Vec::new())), vec!["{}"]);
    }

    #[test]
    fn map_with_collection_keys() {
        let value = Value::map([(Value::list(["a", "c"]), "b")]);
        assert_eq!(canonicalize(&value), vec!["[\"a\", \"c\"] => \"b\","]);
    }

    #[test]
    fn map_key_ties_are_broken_by_representation() {
        let forward = Value::Map(vec![
            (Value::from("a"), Value::Int(1)),
            (Value::symbol("a"), Value::Int(2)),
        ]);
        let backward = Value::Map(vec![
            (Value::symbol("a"), Value::Int(2)),
            (Value::from("a"), Value::Int(1)),
        ]);
        assert_eq!(canonicalize(&forward), canonicalize(&backward));
        assert_eq!(canonicalize(&forward), vec!["\"a\" => 1,", ":a => 2,"]);
    }

    #[test]
    fn custom_description_is_used_verbatim() {
        let value = Value::object(Animal {
            name: "bob",
            species: "giraffe",
        });
        assert_eq!(
            canonicalize(&value),
            vec!["<Animal", "  name=bob,", "  species=giraffe", ">"]
        );
    }

    #[test]
    fn generic_dump_without_description() {
        let value = Value::object(Record {
            fields: vec![("id".into(), Value::Int(7)), ("tag".into(), Value::from("x"))],
        });
        assert_eq!(canonicalize(&value), vec!["#<Record id=7, tag=\"x\">"]);

        let empty = Value::object(Record { fields: Vec::new() });
        assert_eq!(inspect(&empty), "#<Record>");
    }

    #[test]
    fn wide_dump_breaks_fields_onto_lines() {
        let long = "x".repeat(60);
        let value = Value::object(Record {
            fields: vec![
                ("first".into(), Value::from(long.as_str())),
                ("second".into(), Value::Int(2)),
            ],
        });
        let lines = canonicalize(&value);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "#<Record");
        assert_eq!(lines[2], " second=2>");
        // Nested inside a collection the dump stays on one line.
        assert!(!inspect(&value).contains('\n'));
    }

    #[test]
    fn scalar_representations() {
        assert_eq!(inspect(&Value::Nil), "nil");
        assert_eq!(inspect(&Value::Bool(false)), "false");
        assert_eq!(inspect(&Value::Int(-3)), "-3");
        assert_eq!(inspect(&Value::Float(1.0)), "1.0");
        assert_eq!(inspect(&Value::symbol("ok?")), ":ok?");
        assert_eq!(inspect(&Value::symbol("two words")), ":\"two words\"");
        assert_eq!(canonicalize(&Value::Int(42)), vec!["42"]);
    }

    #[test]
    fn string_escapes() {
        assert_eq!(inspect(&Value::from("a\"b\\c")), r#""a\"b\\c""#);
        assert_eq!(inspect(&Value::from("tab\there")), r#""tab\there""#);
        assert_eq!(inspect(&Value::from("\u{1b}[0m")), r#""\e[0m""#);
        assert_eq!(inspect(&Value::from("\u{1}")), r#""\u0001""#);
        assert_eq!(inspect(&Value::from("한글")), "\"한글\"");
    }

    #[test]
    fn nested_maps_are_sorted() {
        let value = Value::list([Value::map([("b", 1), ("a", 2)])]);
        assert_eq!(canonicalize(&value), vec!["[{\"a\" => 2, \"b\" => 1}]"]);
    }

    #[test]
    fn split_lines_edge_cases() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("\n\n").is_empty());
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
    }
}
