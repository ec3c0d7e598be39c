//! Typed views over string attribute maps.
//!
//! Every value in a graph, subgraph or edge attribute map is a string. The
//! helpers here read and write those strings as numbers or enums using a
//! locale-independent format. Reads never fail: a missing or malformed value
//! degrades to `None` or to a default.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

pub type Attributes = IndexMap<String, String>;

/// Parses a real number written with a decimal point, ignoring surrounding
/// whitespace. `None` and unparseable input yield `None`.
pub fn parse_invariant_f64(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

pub fn format_invariant_f64(value: f64) -> String {
    format!("{value}")
}

pub fn get_or<'a>(attributes: &'a Attributes, key: &str, default: &'a str) -> &'a str {
    attributes.get(key).map(String::as_str).unwrap_or(default)
}

pub fn get_f64(attributes: &Attributes, key: &str) -> Option<f64> {
    parse_invariant_f64(attributes.get(key).map(String::as_str))
}

/// Writes `value` under `key`; `None` removes the key.
pub fn set_f64(attributes: &mut Attributes, key: &str, value: Option<f64>) {
    match value {
        Some(v) => {
            attributes.insert(key.to_string(), format_invariant_f64(v));
        }
        None => {
            attributes.shift_remove(key);
        }
    }
}

pub fn get_enum<T: FromStr>(attributes: &Attributes, key: &str, default: T) -> T {
    attributes
        .get(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `k=v, k=v` in map order, used by the `Display` impls.
pub fn format_attributes(attributes: &Attributes) -> String {
    attributes
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Direction of rank flow (`rankdir`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RankDirection {
    TopToBottom,
    #[default]
    LeftToRight,
    BottomToTop,
    RightToLeft,
}

impl FromStr for RankDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" => Ok(RankDirection::TopToBottom),
            "LR" => Ok(RankDirection::LeftToRight),
            "BT" => Ok(RankDirection::BottomToTop),
            "RL" => Ok(RankDirection::RightToLeft),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RankDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RankDirection::TopToBottom => "TB",
            RankDirection::LeftToRight => "LR",
            RankDirection::BottomToTop => "BT",
            RankDirection::RightToLeft => "RL",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_plain_and_padded_numbers() {
        assert_eq!(parse_invariant_f64(Some("2.5")), Some(2.5));
        assert_eq!(parse_invariant_f64(Some(" -3 ")), Some(-3.0));
        assert_eq!(parse_invariant_f64(Some("1e3")), Some(1000.0));
    }

    #[test]
    fn parse_rejects_comma_decimal_and_garbage() {
        assert_eq!(parse_invariant_f64(Some("1,5")), None);
        assert_eq!(parse_invariant_f64(Some("abc")), None);
        assert_eq!(parse_invariant_f64(Some("")), None);
        assert_eq!(parse_invariant_f64(None), None);
    }

    #[test]
    fn format_uses_decimal_point_and_drops_trailing_zero() {
        assert_eq!(format_invariant_f64(100.0), "100");
        assert_eq!(format_invariant_f64(0.25), "0.25");
        assert_eq!(format_invariant_f64(-1.5), "-1.5");
    }

    #[test]
    fn set_f64_none_removes_key() {
        let mut a = attrs(&[("weight", "3")]);
        set_f64(&mut a, "weight", None);
        assert!(!a.contains_key("weight"));
        set_f64(&mut a, "weight", Some(4.5));
        assert_eq!(a["weight"], "4.5");
    }

    #[test]
    fn get_or_distinguishes_missing_from_empty() {
        let a = attrs(&[("label", "")]);
        assert_eq!(get_or(&a, "label", "fallback"), "");
        assert_eq!(get_or(&a, "other", "fallback"), "fallback");
    }

    #[test]
    fn rank_direction_defaults_when_absent_or_unknown() {
        let a = attrs(&[("rankdir", "sideways")]);
        assert_eq!(
            get_enum(&a, "rankdir", RankDirection::default()),
            RankDirection::LeftToRight
        );
        let a = attrs(&[("rankdir", "tb")]);
        assert_eq!(
            get_enum(&a, "rankdir", RankDirection::default()),
            RankDirection::TopToBottom
        );
        assert_eq!(
            get_enum(&Attributes::new(), "rankdir", RankDirection::default()),
            RankDirection::LeftToRight
        );
    }

    #[test]
    fn rank_direction_display_round_trips() {
        for dir in [
            RankDirection::TopToBottom,
            RankDirection::LeftToRight,
            RankDirection::BottomToTop,
            RankDirection::RightToLeft,
        ] {
            assert_eq!(dir.to_string().parse::<RankDirection>(), Ok(dir));
        }
    }

    #[test]
    fn format_attributes_keeps_insertion_order() {
        let a = attrs(&[("b", "1"), ("a", "2")]);
        assert_eq!(format_attributes(&a), "b=1, a=2");
    }
}
