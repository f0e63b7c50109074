//! A model of the human-readable release changelog.
//!
//! The changelog is a Markdown document using a fixed heading convention:
//!
//! ```markdown
//! # Changelog
//!
//! ## [Unreleased]
//!
//! ## [1.0.4] - 2023-01-04
//! ### Added
//! - Support for key rotation
//! ### Fixed
//! - Validator set parsing
//! ```
//!
//! Prose paragraphs inside an entry are kept as [`ReleaseEntry::notes`] and
//! link reference definitions like `[1.0.4]: https://...`, usually found at
//! the end of the document, as [`Changelog::link_references`].
//!
//! Entries are append-only by convention and are expected to have unique
//! versions. Uniqueness is not enforced, see
//! [`Changelog::duplicate_versions`].
use std::{collections::BTreeMap, fmt::Display};

use jiff::civil::Date;
use semver::Version;
use strum::{EnumString, IntoStaticStr};

mod parse;

pub use parse::ParseChangelogError;

/// Date formats accepted by [`ReleaseEntry::parsed_date`].
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// A parsed changelog document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Changelog {
    /// Free text before the first release entry, usually the title and an
    /// introduction. Blank lines are kept.
    pub preamble: Vec<String>,

    /// Release entries in document order, which is newest first.
    pub entries: Vec<ReleaseEntry>,

    /// Link reference definitions in document order, wherever they appear.
    pub link_references: Vec<LinkReference>,
}

impl Changelog {
    /// Returns the entry of `version`. `Unreleased` matches case-insensitively.
    pub fn entry(&self, version: &str) -> Option<&ReleaseEntry> {
        self.entries
            .iter()
            .find(|entry| entry.version.matches(version))
    }

    /// Returns the URL of the link reference `label`, which usually is a
    /// version. Labels match case-insensitively, like Markdown link labels.
    pub fn link(&self, label: &str) -> Option<&str> {
        self.link_references
            .iter()
            .find(|link| link.label.eq_ignore_ascii_case(label))
            .map(|link| link.url.as_str())
    }

    /// Returns the first entry which is not [`ReleaseVersion::Unreleased`].
    pub fn latest_release(&self) -> Option<&ReleaseEntry> {
        self.entries
            .iter()
            .find(|entry| entry.version != ReleaseVersion::Unreleased)
    }

    /// Returns every version which has more than one entry, in ascending
    /// lexical order.
    pub fn duplicate_versions(&self) -> Vec<String> {
        let mut counts = BTreeMap::<String, usize>::new();
        for entry in &self.entries {
            *counts.entry(entry.version.to_string()).or_default() += 1;
        }

        counts
            .into_iter()
            .filter_map(|(version, count)| (count > 1).then_some(version))
            .collect()
    }
}

/// A single `## [version] - date` block of the changelog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseEntry {
    pub version: ReleaseVersion,

    /// The raw release date as written. Unreleased entries usually have none.
    pub date: Option<String>,

    pub sections: Vec<Section>,

    /// Free text lines of the entry which are neither headings nor bullets.
    pub notes: Vec<String>,
}

impl ReleaseEntry {
    /// Interprets the raw date as `YYYY-MM-DD` or `YYYY/MM/DD`.
    pub fn parsed_date(&self) -> Option<Date> {
        let date = self.date.as_deref()?;
        DATE_FORMATS
            .iter()
            .find_map(|format| Date::strptime(format, date).ok())
    }

    /// Returns the section of `category`, if any.
    pub fn section(&self, category: &Category) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.category.as_ref() == Some(category))
    }

    /// Iterates over the bullets of all sections.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|section| section.items.iter().map(String::as_str))
    }
}

/// The version heading of a [`ReleaseEntry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseVersion {
    /// Changes which are not part of a release yet.
    Unreleased,

    /// The raw version string, like `1.0.4`.
    Released(String),
}

impl ReleaseVersion {
    /// Returns the version as semantic version, if it is one. A leading `v` is
    /// ignored.
    pub fn semver(&self) -> Option<Version> {
        match self {
            Self::Unreleased => None,
            Self::Released(version) => Version::parse(version.trim_start_matches('v')).ok(),
        }
    }

    fn matches(&self, version: &str) -> bool {
        match self {
            Self::Unreleased => version.eq_ignore_ascii_case("unreleased"),
            Self::Released(released) => released == version,
        }
    }
}

impl From<&str> for ReleaseVersion {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("unreleased") {
            Self::Unreleased
        } else {
            Self::Released(value.to_owned())
        }
    }
}

impl Display for ReleaseVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreleased => f.write_str("Unreleased"),
            Self::Released(version) => f.write_str(version),
        }
    }
}

/// A `[label]: url` line, which Markdown renders as the target of `[label]`
/// links elsewhere in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkReference {
    pub label: String,
    pub url: String,
}

/// A `### Category` block of a [`ReleaseEntry`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    /// [`None`] for bullets written directly below the version heading.
    pub category: Option<Category>,
    pub items: Vec<String>,
}

/// The categories of <https://keepachangelog.com>. Other labels are kept
/// verbatim.
#[derive(Clone, Debug, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,

    #[strum(default)]
    Other(String),
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Other(label) => f.write_str(label),
            known => f.write_str(known.into()),
        }
    }
}
