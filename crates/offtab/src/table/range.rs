use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Version applicability of one offset entry.
///
/// `since` is inclusive, `until` exclusive. `until = None` means the entry
/// covers every version from `since` onward, so a single entry can declare
/// an offset stable across many consecutive releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    pub since: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<Version>,
}

impl VersionRange {
    pub fn new(since: Version, until: Option<Version>) -> Self {
        Self { since, until }
    }

    /// Range covering `since` and everything after it.
    pub fn open(since: Version) -> Self {
        Self { since, until: None }
    }

    pub fn contains(&self, version: &Version) -> bool {
        if *version < self.since {
            return false;
        }
        match &self.until {
            Some(until) => version < until,
            None => true,
        }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        // Half-open ranges: the earlier range must end at or before the
        // later one starts.
        let (a, b) = if self.since <= other.since {
            (self, other)
        } else {
            (other, self)
        };
        match &a.until {
            Some(until) => b.since < *until,
            None => true,
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.until {
            Some(until) => write!(f, "{}..{}", self.since, until),
            None => write!(f, "{}..", self.since),
        }
    }
}

/// Parse a semantic version, tolerating the `v` prefix Go-style module
/// versions carry (`v1.21.3`).
pub fn parse_version(s: &str) -> Result<Version> {
    let s = s.trim();
    let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
    Ok(Version::parse(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ver(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn range(since: &str, until: Option<&str>) -> VersionRange {
        VersionRange::new(ver(since), until.map(ver))
    }

    #[test]
    fn test_contains_inclusive_lower_exclusive_upper() {
        let r = range("1.0.0", Some("2.0.0"));
        assert!(r.contains(&ver("1.0.0")));
        assert!(r.contains(&ver("1.5.0")));
        assert!(!r.contains(&ver("2.0.0")));
        assert!(!r.contains(&ver("0.9.9")));
    }

    #[test]
    fn test_contains_open_ended() {
        let r = VersionRange::open(ver("1.40.0"));
        assert!(r.contains(&ver("1.40.0")));
        assert!(r.contains(&ver("99.0.0")));
        assert!(!r.contains(&ver("1.39.9")));
    }

    #[test]
    fn test_contains_prerelease_ordering() {
        // semver: 1.0.0-alpha < 1.0.0
        let r = range("1.0.0", Some("2.0.0"));
        assert!(!r.contains(&ver("1.0.0-alpha")));

        let pre = range("1.0.0-alpha", Some("1.0.0"));
        assert!(pre.contains(&ver("1.0.0-beta")));
        assert!(!pre.contains(&ver("1.0.0")));
    }

    #[test]
    fn test_overlaps() {
        assert!(!range("1.0.0", Some("2.0.0")).overlaps(&range("2.0.0", Some("3.0.0"))));
        assert!(range("1.0.0", Some("3.0.0")).overlaps(&range("2.0.0", Some("4.0.0"))));
        assert!(range("2.0.0", Some("4.0.0")).overlaps(&range("1.0.0", Some("3.0.0"))));
        assert!(VersionRange::open(ver("1.0.0")).overlaps(&range("5.0.0", Some("6.0.0"))));
        let r = range("1.0.0", Some("2.0.0"));
        assert!(r.overlaps(&r.clone()));
    }

    #[test]
    fn test_display() {
        assert_eq!(range("1.0.0", Some("2.0.0")).to_string(), "1.0.0..2.0.0");
        assert_eq!(VersionRange::open(ver("1.40.0")).to_string(), "1.40.0..");
    }

    #[test]
    fn test_parse_version_accepts_v_prefix() {
        assert_eq!(parse_version("v1.21.3").unwrap(), ver("1.21.3"));
        assert_eq!(parse_version("1.21.3").unwrap(), ver("1.21.3"));
        assert_eq!(parse_version(" V2.0.0 ").unwrap(), ver("2.0.0"));
        assert!(parse_version("not-a-version").is_err());
    }
}
