use std::{str::FromStr, sync::LazyLock};

use regex::Regex;
use snafu::Snafu;
use tracing::{trace, warn};

use crate::changelog::{Category, Changelog, LinkReference, ReleaseEntry, Section};

static VERSION_HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##\s+\[(?P<version>[^\]]+)\](?:\s+-\s+(?P<date>.+?))?\s*$")
        .expect("failed to compile version heading regex")
});

static LINK_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{0,3}\[(?P<label>[^\]]+)\]:\s+(?P<url>\S+)\s*$")
        .expect("failed to compile link reference regex")
});

/// The error type for changelog parsing. Line numbers are 1-based.
#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum ParseChangelogError {
    #[snafu(display(
        "line {line}: malformed version heading {heading:?}, expected \"## [version] - date\""
    ))]
    MalformedVersionHeading { line: usize, heading: String },

    #[snafu(display("line {line}: category heading {heading:?} outside of a release entry"))]
    OrphanCategory { line: usize, heading: String },

    #[snafu(display("line {line}: indented line without a preceding bullet"))]
    DanglingContinuation { line: usize },
}

impl FromStr for Changelog {
    type Err = ParseChangelogError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut changelog = Self::default();

        for (index, line) in input.lines().enumerate() {
            parse_line(&mut changelog, index + 1, line.trim_end())?;
        }

        for version in changelog.duplicate_versions() {
            warn!(%version, "changelog contains multiple entries for the same version");
        }

        Ok(changelog)
    }
}

fn parse_line(
    changelog: &mut Changelog,
    line: usize,
    text: &str,
) -> Result<(), ParseChangelogError> {
    if let Some(heading) = text.strip_prefix("### ") {
        let Some(entry) = changelog.entries.last_mut() else {
            return OrphanCategorySnafu { line, heading }.fail();
        };

        let heading = heading.trim();
        let category = Category::from_str(heading)
            .unwrap_or_else(|_| Category::Other(heading.to_owned()));

        entry.sections.push(Section {
            category: Some(category),
            items: Vec::new(),
        });
        return Ok(());
    }

    if let Some(captures) = LINK_REFERENCE_REGEX.captures(text) {
        changelog.link_references.push(LinkReference {
            label: captures["label"].to_owned(),
            url: captures["url"].to_owned(),
        });
        return Ok(());
    }

    if text.starts_with("## ") {
        let entry = parse_version_heading(line, text)?;
        trace!(version = %entry.version, line, "found release entry");
        changelog.entries.push(entry);
        return Ok(());
    }

    let Some(entry) = changelog.entries.last_mut() else {
        changelog.preamble.push(text.to_owned());
        return Ok(());
    };

    if text.is_empty() {
        return Ok(());
    }

    if let Some(item) = text.strip_prefix("- ").or_else(|| text.strip_prefix("* ")) {
        if entry.sections.is_empty() {
            entry.sections.push(Section::default());
        }

        if let Some(section) = entry.sections.last_mut() {
            section.items.push(item.trim().to_owned());
        }
        return Ok(());
    }

    if text.starts_with(char::is_whitespace) {
        let Some(item) = entry
            .sections
            .last_mut()
            .and_then(|section| section.items.last_mut())
        else {
            return DanglingContinuationSnafu { line }.fail();
        };

        item.push('\n');
        item.push_str(text.trim());
        return Ok(());
    }

    entry.notes.push(text.to_owned());
    Ok(())
}

fn parse_version_heading(line: usize, heading: &str) -> Result<ReleaseEntry, ParseChangelogError> {
    let Some(captures) = VERSION_HEADING_REGEX.captures(heading) else {
        return MalformedVersionHeadingSnafu { line, heading }.fail();
    };

    let version = captures
        .name("version")
        .map_or("", |version| version.as_str().trim());

    if version.is_empty() {
        return MalformedVersionHeadingSnafu { line, heading }.fail();
    }

    Ok(ReleaseEntry {
        version: version.into(),
        date: captures
            .name("date")
            .map(|date| date.as_str().to_owned()),
        sections: Vec::new(),
        notes: Vec::new(),
    })
}
