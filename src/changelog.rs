use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Changelog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default)]
    pub unreleased: Vec<Change>,
    /// Newest first.
    #[serde(default)]
    pub releases: Vec<Release>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Release {
    pub version: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Change {
    pub kind: ChangeKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Changed,
    Fixed,
    Removed,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 4] = [
        ChangeKind::Added,
        ChangeKind::Changed,
        ChangeKind::Fixed,
        ChangeKind::Removed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Changed => "changed",
            ChangeKind::Fixed => "fixed",
            ChangeKind::Removed => "removed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_lowercase();
        ChangeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| {
                anyhow::anyhow!("unknown change kind '{s}' (expected added, changed, fixed or removed)")
            })
    }
}

impl Changelog {
    /// A missing file is an empty changelog.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs_err::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&data).with_context(|| format!("parsing changelog {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_yaml::to_string(self).with_context(|| "serializing changelog")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(path, serialized)?;
        Ok(())
    }

    pub fn note(
        &mut self,
        kind: ChangeKind,
        message: impl Into<String>,
        author: Option<String>,
    ) -> Result<()> {
        let message = message.into();
        if message.trim().is_empty() {
            anyhow::bail!("change message must not be empty");
        }
        self.unreleased.push(Change {
            kind,
            message,
            author,
        });
        Ok(())
    }

    pub fn latest(&self) -> Option<&Release> {
        self.releases.first()
    }

    pub fn release(&self, version: &str) -> Option<&Release> {
        let wanted = version.trim_start_matches('v');
        self.releases.iter().find(|r| r.version == wanted)
    }

    /// Move unreleased changes into a new release. `version` must be valid
    /// semver and newer than the latest release.
    pub fn cut(&mut self, version: &str, date: NaiveDate) -> Result<&Release> {
        let clean = version.trim().trim_start_matches('v');
        let parsed = semver::Version::parse(clean)
            .with_context(|| format!("'{version}' is not a valid semantic version"))?;
        if let Some(latest) = self.latest() {
            let previous = semver::Version::parse(&latest.version).with_context(|| {
                format!("latest release '{}' is not a valid semantic version", latest.version)
            })?;
            if parsed <= previous {
                anyhow::bail!("version {parsed} must be newer than latest release {previous}");
            }
        }
        if self.unreleased.is_empty() {
            anyhow::bail!("nothing to release: no unreleased changes");
        }
        let changes = std::mem::take(&mut self.unreleased);
        self.releases.insert(
            0,
            Release {
                version: parsed.to_string(),
                date,
                changes,
            },
        );
        Ok(&self.releases[0])
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.version, self.date)?;
        for change in &self.changes {
            writeln!(f, "  - [{}] {}", change.kind, change.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = Changelog::load(&dir.path().join("CHANGELOG.yml")).unwrap();
        assert_eq!(log, Changelog::default());
    }

    #[test]
    fn cut_moves_unreleased_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("CHANGELOG.yml");
        let mut log = Changelog::default();
        log.note(ChangeKind::Added, "git clone", Some("dev".into())).unwrap();
        log.note("FIXED".parse().unwrap(), "tie-break", None).unwrap();
        let rel = log.cut("v0.1.0", day(1)).unwrap();
        assert_eq!(rel.version, "0.1.0");
        assert_eq!(rel.changes.len(), 2);
        assert!(log.unreleased.is_empty());
        log.save(&path).unwrap();

        let reloaded = Changelog::load(&path).unwrap();
        assert_eq!(reloaded, log);
        assert_eq!(reloaded.release("v0.1.0").unwrap().date, day(1));
    }

    #[test]
    fn cut_requires_newer_version_and_changes() {
        let mut log = Changelog::default();
        assert!(log.cut("1.0.0", day(1)).is_err());
        log.note(ChangeKind::Changed, "x", None).unwrap();
        log.cut("1.0.0", day(1)).unwrap();
        log.note(ChangeKind::Changed, "y", None).unwrap();
        assert!(log.cut("1.0.0", day(2)).is_err());
        assert!(log.cut("0.9.0", day(2)).is_err());
        assert!(log.cut("banana", day(2)).is_err());
        log.cut("1.1.0", day(2)).unwrap();
        assert_eq!(log.latest().unwrap().version, "1.1.0");
    }

    #[test]
    fn rejects_empty_message_and_unknown_kind() {
        let mut log = Changelog::default();
        assert!(log.note(ChangeKind::Added, "  ", None).is_err());
        assert!("improved".parse::<ChangeKind>().is_err());
    }

    #[test]
    fn release_display() {
        let rel = Release {
            version: "1.2.3".into(),
            date: day(16),
            changes: vec![Change {
                kind: ChangeKind::Removed,
                message: "old flag".into(),
                author: Some("dev".into()),
            }],
        };
        assert_eq!(rel.to_string(), "1.2.3 (2026-10-16)\n  - [removed] old flag\n");
    }
}
