//! Front-matter parsing and serialization
//!
//! An article file starts with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Getting Started with Next.js
//! date: 2024-01-10
//! excerpt: A first look at the framework.
//! ---
//!
//! Body text...
//! ```
//!
//! `title`, `date` and `excerpt` are required. Everything else is optional.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Delimiter line before and after the metadata block
const DELIMITER: &str = "---";

/// Why a front-matter block was rejected
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("missing opening `---` delimiter")]
    MissingOpening,

    #[error("missing closing `---` delimiter")]
    MissingClosing,

    #[error("invalid metadata block: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` is blank")]
    BlankField(&'static str),

    #[error("field `{field}` is not an unambiguous date: {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

/// Handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

fn default_published() -> bool {
    true
}

/// The metadata block as written, before validation
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawFrontMatter {
    title: Option<String>,
    date: Option<String>,
    excerpt: Option<String>,
    updated: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    tags: Vec<String>,
    #[serde(default = "default_published")]
    published: bool,
    #[serde(flatten)]
    extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for RawFrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            excerpt: None,
            updated: None,
            tags: Vec::new(),
            published: true,
            extra: IndexMap::new(),
        }
    }
}

/// Validated front-matter of an article
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub date: DateTime<Utc>,
    pub excerpt: String,
    pub updated: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    /// Drafts set `published: false`
    pub published: bool,
    /// Additional custom fields, in source order
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Serialized shape of [`FrontMatter`]
#[derive(Serialize)]
struct FrontMatterOut<'a> {
    title: &'a str,
    date: String,
    excerpt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated: Option<String>,
    #[serde(skip_serializing_if = "no_tags")]
    tags: &'a [String],
    #[serde(skip_serializing_if = "is_true")]
    published: bool,
    #[serde(flatten)]
    extra: &'a IndexMap<String, serde_yaml::Value>,
}

fn is_true(value: &bool) -> bool {
    *value
}

fn no_tags(tags: &&[String]) -> bool {
    tags.is_empty()
}

impl FrontMatter {
    /// Create front-matter with the required fields only
    pub fn new(title: impl Into<String>, date: DateTime<Utc>, excerpt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date,
            excerpt: excerpt.into(),
            updated: None,
            tags: Vec::new(),
            published: true,
            extra: IndexMap::new(),
        }
    }

    /// Parse front-matter from file content.
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let (yaml, body) = split(content)?;

        let raw = if yaml.trim().is_empty() {
            RawFrontMatter::default()
        } else {
            serde_yaml::from_str::<RawFrontMatter>(yaml)?
        };

        Ok((Self::validate(raw)?, body))
    }

    fn validate(raw: RawFrontMatter) -> Result<Self, FrontMatterError> {
        let title = required("title", raw.title)?;
        let excerpt = required("excerpt", raw.excerpt)?;
        let date = required("date", raw.date)?;
        let date = parse_date_string(&date).ok_or(FrontMatterError::InvalidDate {
            field: "date",
            value: date,
        })?;

        let updated = match raw.updated {
            Some(value) if !value.trim().is_empty() => Some(parse_date_string(&value).ok_or(
                FrontMatterError::InvalidDate {
                    field: "updated",
                    value,
                },
            )?),
            _ => None,
        };

        let tags = raw
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Self {
            title,
            date,
            excerpt,
            updated,
            tags,
            published: raw.published,
            extra: raw.extra,
        })
    }

    /// Serialize back into a `---` fenced YAML block
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        let out = FrontMatterOut {
            title: &self.title,
            date: format_date(&self.date),
            excerpt: &self.excerpt,
            updated: self.updated.as_ref().map(format_date),
            tags: &self.tags,
            published: self.published,
            extra: &self.extra,
        };
        let yaml = serde_yaml::to_string(&out)?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
    }

    /// Serialize as a complete article file with the given body
    pub fn to_document(&self, body: &str) -> Result<String, serde_yaml::Error> {
        Ok(format!("{}\n{}", self.to_yaml()?, body))
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, FrontMatterError> {
    match value {
        None => Err(FrontMatterError::MissingField(field)),
        Some(v) if v.trim().is_empty() => Err(FrontMatterError::BlankField(field)),
        Some(v) => Ok(v.trim().to_string()),
    }
}

/// Split content into the metadata block and the body
fn split(content: &str) -> Result<(&str, &str), FrontMatterError> {
    let mut content = content.trim_start_matches('\u{feff}');
    // Skip blank lines only; an indented `---` is not a delimiter
    while let Some((line, rest)) = content.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        content = rest;
    }

    let rest = content
        .strip_prefix(DELIMITER)
        .ok_or(FrontMatterError::MissingOpening)?;
    let (opening, rest) = rest.split_once('\n').unwrap_or((rest, ""));
    // `----` or `--- title` is not a delimiter line
    if !opening.trim().is_empty() {
        return Err(FrontMatterError::MissingOpening);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let yaml = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(FrontMatterError::MissingClosing)
}

/// Parse a date string. Only year-first forms are accepted; naive times are UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"---
title: "Next.js: Getting Started"
date: 2024-01-15 10:30:00
excerpt: A first look at the App Router.
tags:
  - react
  - nextjs
series: basics
---

This is the content.
"#;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let (fm, body) = FrontMatter::parse(SAMPLE).unwrap();
        assert_eq!(fm.title, "Next.js: Getting Started");
        assert_eq!(fm.excerpt, "A first look at the App Router.");
        assert_eq!(
            fm.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-01-15 10:30:00"
        );
        assert_eq!(fm.tags, vec!["react", "nextjs"]);
        assert!(fm.published);
        assert_eq!(
            fm.extra.get("series"),
            Some(&serde_yaml::Value::String("basics".to_string()))
        );
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_round_trip() {
        let (fm, body) = FrontMatter::parse(SAMPLE).unwrap();
        let document = fm.to_document(body).unwrap();
        let (again, body_again) = FrontMatter::parse(&document).unwrap();

        assert_eq!(again.title, fm.title);
        assert_eq!(again.date, fm.date);
        assert_eq!(again.excerpt, fm.excerpt);
        assert_eq!(again, fm);
        assert_eq!(body_again, body);
    }

    #[test]
    fn test_round_trip_draft_with_updated() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut fm = FrontMatter::new("Draft: 'quotes' & #hashes", date, "Not yet.");
        fm.updated = Some(Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap());
        fm.published = false;

        let yaml = fm.to_yaml().unwrap();
        assert!(yaml.starts_with("---\n"));
        assert!(yaml.ends_with("---\n"));

        let (again, body) = FrontMatter::parse(&yaml).unwrap();
        assert_eq!(again, fm);
        assert_eq!(body, "");
    }

    #[test]
    fn test_single_string_tags() {
        let content = "---\ntitle: T\ndate: 2024-01-15\nexcerpt: E\ntags: Notes\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_missing_title() {
        let content = "---\ndate: 2024-01-15\nexcerpt: E\n---\nBody\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingField("title")));
    }

    #[test]
    fn test_blank_excerpt() {
        let content = "---\ntitle: T\ndate: 2024-01-15\nexcerpt: \"  \"\n---\nBody\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, FrontMatterError::BlankField("excerpt")));
    }

    #[test]
    fn test_empty_block_reports_missing_field() {
        let err = FrontMatter::parse("---\n---\nBody\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingField(_)));
    }

    #[test]
    fn test_missing_delimiters() {
        let err = FrontMatter::parse("# Just markdown\n\nNo metadata here.\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingOpening));

        let err = FrontMatter::parse("---\ntitle: T\ndate: 2024-01-15\n\nBody\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingClosing));

        let err = FrontMatter::parse("---- not a fence\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingOpening));
    }

    #[test]
    fn test_indented_delimiter_rejected() {
        let content = "   ---\ntitle: T\ndate: 2024-01-15\nexcerpt: E\n---\nBody\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingOpening));

        let content = "\n  \t\n---\ntitle: T\ndate: 2024-01-15\nexcerpt: E\n---\nBody\n";
        assert!(FrontMatter::parse(content).is_ok());
    }

    #[test]
    fn test_not_a_mapping() {
        let err = FrontMatter::parse("---\njust some prose\n---\nBody\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));

        let err = FrontMatter::parse("---\ntitle: [a, b]\n---\nBody\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_ambiguous_date_rejected() {
        let content = "---\ntitle: T\ndate: 03/04/2024\nexcerpt: E\n---\nBody\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(
            err,
            FrontMatterError::InvalidDate { field: "date", .. }
        ));
    }

    #[test]
    fn test_leading_blank_lines_and_bom() {
        let content = "\u{feff}\n\n---\ntitle: T\ndate: 2024-01-15\nexcerpt: E\n---\n\nBody\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "T");
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_body_horizontal_rule_is_kept() {
        let content = "---\ntitle: T\ndate: 2024-01-15\nexcerpt: E\n---\nAbove\n\n---\n\nBelow\n";
        let (_, body) = FrontMatter::parse(content).unwrap();
        assert!(body.contains("Above"));
        assert!(body.contains("---"));
        assert!(body.contains("Below"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(parse_date_string("2024-03-05T10:00:00Z"), Some(expected));
        assert_eq!(parse_date_string("2024-03-05T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_date_string("2024-03-05 10:00:00"), Some(expected));
        assert_eq!(parse_date_string("2024-03-05 10:00"), Some(expected));
        assert_eq!(parse_date_string("2024-03-05T10:00:00"), Some(expected));
        assert_eq!(
            parse_date_string("2024-03-05"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date_string("2024/03/05"), None);
        assert_eq!(parse_date_string("05-03-2024"), None);
        assert_eq!(parse_date_string("yesterday"), None);
    }
}
