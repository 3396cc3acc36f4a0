//! Key-path navigation over parsed JSON
//!
//! Each metric stores its value of interest at a fixed location inside the
//! daily document, written as a dotted template with optional integer
//! indices: `summary.totalTimeInBed`, `activities-steps[0].value`,
//! `activities-heart-intraday.dataset[1]`.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::FitpulseError;

/// One step of a key path: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{k}"),
            Segment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Parsed key path into a JSON document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    raw: String,
    segments: Vec<Segment>,
}

impl KeyPath {
    /// The original template string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walk the path against `root`.
    ///
    /// Returns the value at the end of the path, or the first segment that
    /// does not resolve (for error reporting against the offending date).
    pub fn navigate<'a>(&self, root: &'a Value) -> Result<&'a Value, &Segment> {
        let mut current = root;
        for segment in &self.segments {
            current = match segment {
                Segment::Key(k) => current.get(k.as_str()).ok_or(segment)?,
                Segment::Index(i) => current.get(*i).ok_or(segment)?,
            };
        }
        Ok(current)
    }
}

impl FromStr for KeyPath {
    type Err = FitpulseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| FitpulseError::InvalidKeyPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("empty path"));
        }

        let mut segments = Vec::new();
        for part in raw.split('.') {
            // Split a part like `dataset[1]` into a key and trailing indices.
            let (key, mut rest) = match part.find('[') {
                Some(pos) => (&part[..pos], &part[pos..]),
                None => (part, ""),
            };
            if key.is_empty() && rest.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            while !rest.is_empty() {
                let Some(end) = rest.find(']') else {
                    return Err(invalid("unterminated index"));
                };
                let digits = &rest[1..end];
                let index: usize = digits
                    .parse()
                    .map_err(|_| invalid("index is not an unsigned integer"))?;
                segments.push(Segment::Index(index));
                rest = &rest[end + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(invalid("unexpected text after index"));
                }
            }
        }

        Ok(KeyPath {
            raw: raw.to_string(),
            segments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_dotted_path() {
        let path: KeyPath = "summary.totalTimeInBed".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("summary".to_string()),
                Segment::Key("totalTimeInBed".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_indexed_path() {
        let path: KeyPath = "activities-steps[0].value".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("activities-steps".to_string()),
                Segment::Index(0),
                Segment::Key("value".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("".parse::<KeyPath>().is_err());
        assert!("a..b".parse::<KeyPath>().is_err());
        assert!("a[1".parse::<KeyPath>().is_err());
        assert!("a[x]".parse::<KeyPath>().is_err());
        assert!("a[1]b".parse::<KeyPath>().is_err());
    }

    #[test]
    fn test_navigate_nested() {
        let doc = json!({
            "activities-heart-intraday": {
                "dataset": [
                    {"time": "00:00:00", "bpm": 62},
                    {"time": "00:00:10", "bpm": 63}
                ]
            }
        });
        let path: KeyPath = "activities-heart-intraday.dataset[1]".parse().unwrap();
        let value = path.navigate(&doc).unwrap();
        assert_eq!(value, &json!({"time": "00:00:10", "bpm": 63}));
    }

    #[test]
    fn test_navigate_reports_missing_segment() {
        let doc = json!({"summary": {"totalMinutesAsleep": 400}});
        let path: KeyPath = "summary.totalTimeInBed".parse().unwrap();
        let missing = path.navigate(&doc).unwrap_err();
        assert_eq!(missing, &Segment::Key("totalTimeInBed".to_string()));
    }

    #[test]
    fn test_navigate_index_out_of_bounds() {
        let doc = json!({"activities-steps": []});
        let path: KeyPath = "activities-steps[0].value".parse().unwrap();
        assert!(path.navigate(&doc).is_err());
    }
}
