//! Query-string decoding into a nested structure.
//!
//! `a=1&a=2` and `a[]=1&a[]=2` both decode to a list, `a[b]=1` to a nested
//! map. Key order follows first appearance.

use std::borrow::Cow;

/// A decoded but not yet validated query value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Str(String),
    List(Vec<RawValue>),
    Map(Vec<(String, RawValue)>),
}

impl RawValue {
    /// Type name used in type-mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Str(_) => "string",
            RawValue::List(_) => "array",
            RawValue::Map(_) => "object",
        }
    }

    fn append(&mut self, value: RawValue) {
        match self {
            RawValue::List(items) => items.push(value),
            other => {
                let previous = std::mem::replace(other, RawValue::List(Vec::new()));
                *other = RawValue::List(vec![previous, value]);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Push,
    Key(String),
}

/// Top-level decoded query: parameter name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuery {
    entries: Vec<(String, RawValue)>,
}

impl RawQuery {
    /// Decode a raw query string (without the leading `?`).
    pub fn decode(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut query = RawQuery::default();
        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = percent_decode(key);
            if key.is_empty() {
                continue;
            }
            let (base, segments) = split_key(&key);
            insert(&mut query.entries, base, &segments, percent_decode(value));
        }
        query
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn percent_decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(Cow::Borrowed(b)) => b.to_string(),
        Ok(Cow::Owned(o)) => o,
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned(),
    }
}

/// Split `a[b][]` into `("a", [Key("b"), Push])`. Malformed brackets keep the
/// whole key as a plain name.
fn split_key(key: &str) -> (&str, Vec<Segment>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };
    if open == 0 {
        return (key, Vec::new());
    }
    let (base, mut rest) = key.split_at(open);
    let mut segments = Vec::new();
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            return (key, Vec::new());
        };
        let name = &inner[..close];
        if name.is_empty() || name.chars().all(|c| c.is_ascii_digit()) {
            segments.push(Segment::Push);
        } else {
            segments.push(Segment::Key(name.to_string()));
        }
        rest = &inner[close + 1..];
    }
    if !rest.is_empty() {
        return (key, Vec::new());
    }
    (base, segments)
}

fn insert(entries: &mut Vec<(String, RawValue)>, key: &str, rest: &[Segment], value: String) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some((_, existing)) if rest.is_empty() => existing.append(RawValue::Str(value)),
        Some((_, existing)) => assign(existing, rest, value),
        None => {
            let fresh = match rest.first() {
                None => RawValue::Str(value),
                Some(head) => {
                    let mut fresh = match head {
                        Segment::Push => RawValue::List(Vec::new()),
                        Segment::Key(_) => RawValue::Map(Vec::new()),
                    };
                    assign(&mut fresh, rest, value);
                    fresh
                }
            };
            entries.push((key.to_string(), fresh));
        }
    }
}

fn assign(target: &mut RawValue, segments: &[Segment], value: String) {
    let Some((head, tail)) = segments.split_first() else {
        target.append(RawValue::Str(value));
        return;
    };
    match head {
        Segment::Push => {
            if !matches!(target, RawValue::List(_)) {
                let previous = std::mem::replace(target, RawValue::List(Vec::new()));
                *target = RawValue::List(vec![previous]);
            }
            if let RawValue::List(items) = target {
                if tail.is_empty() {
                    items.push(RawValue::Str(value));
                } else {
                    let mut nested = RawValue::Map(Vec::new());
                    assign(&mut nested, tail, value);
                    items.push(nested);
                }
            }
        }
        Segment::Key(name) => {
            if !matches!(target, RawValue::Map(_)) {
                *target = RawValue::Map(Vec::new());
            }
            if let RawValue::Map(entries) = target {
                insert(entries, name, tail, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> RawValue {
        RawValue::Str(v.to_string())
    }

    #[test]
    fn decodes_plain_pairs_in_order() {
        let q = RawQuery::decode("limit=5&sort=name&order=desc");
        assert_eq!(q.keys().collect::<Vec<_>>(), vec!["limit", "sort", "order"]);
        assert_eq!(q.get("limit"), Some(&s("5")));
    }

    #[test]
    fn repeated_keys_become_lists() {
        let q = RawQuery::decode("fields=name&fields=image&fields=stackSize");
        assert_eq!(
            q.get("fields"),
            Some(&RawValue::List(vec![s("name"), s("image"), s("stackSize")]))
        );
    }

    #[test]
    fn bracket_suffix_builds_list() {
        let q = RawQuery::decode("fields[]=name&fields%5B%5D=image");
        assert_eq!(q.get("fields"), Some(&RawValue::List(vec![s("name"), s("image")])));

        let single = RawQuery::decode("fields[]=name");
        assert_eq!(single.get("fields"), Some(&RawValue::List(vec![s("name")])));
    }

    #[test]
    fn nested_keys_build_maps() {
        let q = RawQuery::decode("limit[max]=5");
        let v = q.get("limit").unwrap();
        assert_eq!(v.type_name(), "object");
        assert_eq!(v, &RawValue::Map(vec![("max".to_string(), s("5"))]));
    }

    #[test]
    fn percent_and_plus_decoding() {
        let q = RawQuery::decode("color=%23fafafa&name=Oak+Planks&empty=");
        assert_eq!(q.get("color"), Some(&s("#fafafa")));
        assert_eq!(q.get("name"), Some(&s("Oak Planks")));
        assert_eq!(q.get("empty"), Some(&s("")));
    }

    #[test]
    fn empty_and_leading_question_mark() {
        assert!(RawQuery::decode("").is_empty());
        assert!(RawQuery::decode("&&").is_empty());
        assert!(RawQuery::decode("?limit=1").contains("limit"));
        assert_eq!(RawQuery::decode("flag").get("flag"), Some(&s("")));
    }

    #[test]
    fn malformed_brackets_keep_key() {
        let q = RawQuery::decode("a[b=1");
        assert_eq!(q.get("a[b"), Some(&s("1")));
    }
}
