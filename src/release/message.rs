//! Release body text
//!
//! A release body looks like this (with self-promotion enabled):
//!
//! ```text
//! ### Changelog
//! <changelog>
//!
//! Automatically copied from [PyPI](https://pypi.org/project/<name>/<version>).
//!
//! ---
//!
//! Powered by OctoCheese\
//! [📝 docs](...) | [:octocat: repo](...) | [🙋 issues](...) | [🏪 marketplace](...)
//!
//! <!-- Octocheese: Last Updated YYYY-MM-DD -->
//! ```

use crate::release::staleness::marker;
use chrono::{Datelike, NaiveDate};

const FOOTER_OWNER: &str = "domdfcoding";
const FOOTER_REPO: &str = "octocheese";

/// Where the "marketplace" footer link points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterKind {
    Marketplace,
    App,
}

impl FooterKind {
    fn path(self) -> &'static str {
        match self {
            FooterKind::Marketplace => "marketplace",
            FooterKind::App => "app",
        }
    }
}

/// Icons in front of the footer links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterGlyphs {
    pub docs: &'static str,
    pub repo: &'static str,
    pub issues: &'static str,
    pub marketplace: &'static str,
}

impl FooterGlyphs {
    pub const STANDARD: FooterGlyphs = FooterGlyphs {
        docs: "📝",
        repo: ":octocat:",
        issues: "🙋",
        marketplace: "🏪",
    };

    pub const FESTIVE: FooterGlyphs = FooterGlyphs {
        docs: "🎄",
        repo: "☃",
        issues: "🎅",
        marketplace: "🎁",
    };

    /// The festive set in December, the standard set otherwise
    pub fn for_date(date: NaiveDate) -> Self {
        if date.month() == 12 {
            Self::FESTIVE
        } else {
            Self::STANDARD
        }
    }
}

/// The pipe-separated footer links. Link targets never depend on the date.
pub fn footer_links(owner: &str, name: &str, kind: FooterKind, glyphs: FooterGlyphs) -> String {
    [
        format!("[{} docs](https://{}.readthedocs.io)", glyphs.docs, name),
        format!("[{} repo](https://github.com/{}/{})", glyphs.repo, owner, name),
        format!(
            "[{} issues](https://github.com/{}/{}/issues)",
            glyphs.issues, owner, name
        ),
        format!(
            "[{} marketplace](https://github.com/{}/{})",
            glyphs.marketplace,
            kind.path(),
            name
        ),
    ]
    .join(" | ")
}

/// Build the release body.
///
/// `release_date` is written into the trailing last-updated marker and picks
/// the footer glyphs.
pub fn compose(
    name: &str,
    version: &str,
    release_date: NaiveDate,
    changelog: &str,
    self_promotion: bool,
) -> String {
    let mut buf = Lines::default();

    if !changelog.trim().is_empty() {
        buf.push("### Changelog");
        for line in changelog.lines() {
            buf.push(line);
        }
        buf.blank_line();
    }

    buf.push(format!(
        "Automatically copied from [PyPI](https://pypi.org/project/{}/{}).",
        name, version
    ));
    buf.blank_line();

    if self_promotion {
        buf.push("---");
        buf.blank_line();
        buf.push("Powered by OctoCheese\\");
        buf.push(footer_links(
            FOOTER_OWNER,
            FOOTER_REPO,
            FooterKind::Marketplace,
            FooterGlyphs::for_date(release_date),
        ));
        buf.blank_line();
    }

    buf.push(marker(release_date));
    buf.blank_line();

    buf.0.join("\n")
}

/// Line buffer that never emits two blank lines in a row
#[derive(Default)]
struct Lines(Vec<String>);

impl Lines {
    fn push(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    fn blank_line(&mut self) {
        while self.0.last().is_some_and(|l| l.trim().is_empty()) {
            self.0.pop();
        }
        self.0.push(String::new());
    }
}
