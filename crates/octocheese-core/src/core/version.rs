use crate::core::error::{OctoError, OctoResult};
use regex::Regex;

/// PEP 440 version pattern, as used by PyPI.
const PEP440_PATTERN: &str = r"(?ix)
    ^\s*
    v?
    (?:(?P<epoch>[0-9]+)!)?
    (?P<release>[0-9]+(?:\.[0-9]+)*)
    (?P<pre>
        [-_.]?
        (?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)
        [-_.]?
        (?P<pre_n>[0-9]+)?
    )?
    (?P<post>
        (?:-(?P<post_n1>[0-9]+))
        |
        (?:[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n2>[0-9]+)?)
    )?
    (?P<dev>
        [-_.]?
        (?P<dev_l>dev)
        [-_.]?
        (?P<dev_n>[0-9]+)?
    )?
    (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
    \s*$";

/// Version string a tag refers to on the package index.
///
/// A single leading `v` is stripped: `v1.2.3` -> `1.2.3`, `1.2.3` -> `1.2.3`,
/// `vv1` -> `v1`.
pub fn release_version(tag_name: &str) -> &str {
    tag_name.strip_prefix('v').unwrap_or(tag_name)
}

/// Whether a tag names a pre-release (or development) version.
///
/// Tags that are not valid PEP 440 versions are never pre-releases.
pub fn is_prerelease(tag_name: &str) -> bool {
    Pep440Version::parse(tag_name)
        .map(|v| v.is_prerelease())
        .unwrap_or(false)
}

/// Pre-release phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreRelease {
    Alpha,
    Beta,
    ReleaseCandidate,
}

/// A parsed PEP 440 version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pep440Version {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreRelease, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<String>,
}

impl Pep440Version {
    /// Parse a version string such as `1.2.3`, `v2.0.0rc1`, `1!3.0.post2` or
    /// `0.1.dev4+g1234`.
    pub fn parse(s: &str) -> OctoResult<Self> {
        let re = Regex::new(PEP440_PATTERN)
            .map_err(|e| OctoError::Version(format!("Invalid regex: {}", e)))?;

        let caps = re
            .captures(s)
            .ok_or_else(|| OctoError::Version(format!("Invalid version: {}", s)))?;

        let number = |name: &str| -> OctoResult<Option<u64>> {
            caps.name(name)
                .map(|m| {
                    m.as_str()
                        .parse::<u64>()
                        .map_err(|_| OctoError::Version(format!("Invalid number in {}", s)))
                })
                .transpose()
        };

        let epoch = number("epoch")?.unwrap_or(0);

        let release = caps["release"]
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| OctoError::Version(format!("Invalid release segment in {}", s)))
            })
            .collect::<OctoResult<Vec<_>>>()?;

        let pre = match caps.name("pre_l") {
            Some(label) => {
                let phase = match label.as_str().to_ascii_lowercase().as_str() {
                    "a" | "alpha" => PreRelease::Alpha,
                    "b" | "beta" => PreRelease::Beta,
                    _ => PreRelease::ReleaseCandidate,
                };
                Some((phase, number("pre_n")?.unwrap_or(0)))
            }
            None => None,
        };

        let post = if caps.name("post").is_some() {
            Some(number("post_n1")?.or(number("post_n2")?).unwrap_or(0))
        } else {
            None
        };

        let dev = if caps.name("dev").is_some() {
            Some(number("dev_n")?.unwrap_or(0))
        } else {
            None
        };

        Ok(Self {
            epoch,
            release,
            pre,
            post,
            dev,
            local: caps.name("local").map(|m| m.as_str().to_lowercase()),
        })
    }

    /// `true` for alpha/beta/rc and `.devN` versions.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }
}
