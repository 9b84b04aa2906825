use std::collections::BTreeMap;

use serde::Serialize;

/// Decoded property-list data.
///
/// Scalars keep their plist type, so `<integer>1</integer>` and
/// `<string>1</string>` are different leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i128),
    Boolean(bool),
    /// Shortest text form of the float.
    Real(String),
    /// ISO 8601, as written in XML plists.
    Date(String),
    Data(Vec<u8>),
    Mapping(BTreeMap<String, Value>),
    Sequence(Vec<Value>),
}

impl Value {
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<plist::Value> for Value {
    fn from(v: plist::Value) -> Self {
        match v {
            plist::Value::String(s) => Value::String(s),
            plist::Value::Dictionary(d) => {
                Value::Mapping(d.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
            plist::Value::Array(a) => Value::Sequence(a.into_iter().map(Value::from).collect()),
            plist::Value::Boolean(b) => Value::Boolean(b),
            plist::Value::Integer(i) => Value::Integer(
                i.as_signed()
                    .map(i128::from)
                    .or_else(|| i.as_unsigned().map(i128::from))
                    .unwrap_or_default(),
            ),
            plist::Value::Real(r) => Value::Real(r.to_string()),
            plist::Value::Date(d) => Value::Date(d.to_xml_format()),
            plist::Value::Data(bytes) => Value::Data(bytes),
            other => Value::String(format!("{other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_dictionary_converts_recursively() {
        let mut inner = plist::Dictionary::new();
        inner.insert("one".into(), plist::Value::String("%d item".into()));
        inner.insert("other".into(), plist::Value::String("%d items".into()));
        let mut outer = plist::Dictionary::new();
        outer.insert("items".into(), plist::Value::Dictionary(inner));

        let v = Value::from(plist::Value::Dictionary(outer));
        let items = v.as_mapping().and_then(|m| m.get("items")).and_then(Value::as_mapping);
        assert_eq!(items.and_then(|m| m.get("one")).and_then(Value::as_str), Some("%d item"));
    }

    #[test]
    fn test_scalars_keep_their_type() {
        assert_eq!(Value::from(plist::Value::Integer(3i64.into())), Value::Integer(3));
        assert_eq!(Value::from(plist::Value::Boolean(true)), Value::Boolean(true));
        assert_eq!(Value::from(plist::Value::Real(1.5)), Value::Real("1.5".into()));
        assert_ne!(
            Value::from(plist::Value::Integer(1i64.into())),
            Value::from(plist::Value::String("1".into()))
        );
    }

    #[test]
    fn test_leaf_change_breaks_equality() {
        let a = Value::Mapping(BTreeMap::from([("one".into(), Value::String("a".into()))]));
        let b = Value::Mapping(BTreeMap::from([("one".into(), Value::String("b".into()))]));
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }
}
