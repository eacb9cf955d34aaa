use crate::changelog::{ChangeKind, Changelog};
use crate::command::{args_of, Command};
use crate::config::AppConfig;
use crate::container::ContainerBuilder;
use crate::env::{Environment, SharedEnvironment};
use crate::event::CliEvent;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

pub const MODULE: &str = "release";
pub const COMMAND_IDS: &[&str] = &["release.note", "release.cut", "release.show"];
pub const ENV_AUTHOR: &str = "MODCLI_AUTHOR";

fn note_author(env: &dyn Environment) -> Option<String> {
    env.non_empty(ENV_AUTHOR).or_else(|| env.non_empty("USER"))
}

pub fn register(builder: ContainerBuilder) -> ContainerBuilder {
    builder
        .command("release.note", |c| {
            let cfg = c.service::<AppConfig>()?;
            let env = c.service::<SharedEnvironment>()?;
            Ok(Arc::new(ReleaseNote {
                changelog: cfg.project.changelog,
                project: cfg.project.name,
                author: note_author(env.as_ref()),
            }) as Arc<dyn Command>)
        })
        .command("release.cut", |c| {
            let cfg = c.service::<AppConfig>()?;
            Ok(Arc::new(ReleaseCut {
                changelog: cfg.project.changelog,
                today: chrono::Local::now().date_naive(),
            }) as Arc<dyn Command>)
        })
        .command("release.show", |c| {
            let cfg = c.service::<AppConfig>()?;
            Ok(Arc::new(ReleaseShow {
                changelog: cfg.project.changelog,
            }) as Arc<dyn Command>)
        })
}

/// Appends an unreleased entry: `release note <kind> <message...>`.
/// A changelog without a project name gets the configured one.
pub struct ReleaseNote {
    pub changelog: PathBuf,
    pub project: Option<String>,
    pub author: Option<String>,
}

impl Command for ReleaseNote {
    fn name(&self) -> &str {
        "release note"
    }

    fn summary(&self) -> &str {
        "Record an unreleased change: release note <added|changed|fixed|removed> <message>"
    }

    fn invoke(&self, event: &CliEvent) -> Result<()> {
        let args = args_of(event, self.name())?;
        let [kind, message @ ..] = args else {
            anyhow::bail!("usage: release note <kind> <message>");
        };
        if message.is_empty() {
            anyhow::bail!("usage: release note <kind> <message>");
        }
        let kind: ChangeKind = kind.parse()?;
        let mut log = Changelog::load(&self.changelog)?;
        if log.project.is_none() {
            log.project = self.project.clone();
        }
        log.note(kind, message.join(" "), self.author.clone())?;
        log.save(&self.changelog)?;
        println!("Noted [{kind}] ({} unreleased)", log.unreleased.len());
        Ok(())
    }
}

pub struct ReleaseCut {
    pub changelog: PathBuf,
    pub today: NaiveDate,
}

impl Command for ReleaseCut {
    fn name(&self) -> &str {
        "release cut"
    }

    fn summary(&self) -> &str {
        "Turn unreleased changes into a release: release cut <version>"
    }

    fn invoke(&self, event: &CliEvent) -> Result<()> {
        let args = args_of(event, self.name())?;
        let [version] = args else {
            anyhow::bail!("usage: release cut <version>");
        };
        let mut log = Changelog::load(&self.changelog)?;
        let release = log.cut(version, self.today)?.clone();
        log.save(&self.changelog)?;
        tracing::info!(version = %release.version, changes = release.changes.len(), "release cut");
        print!("{release}");
        Ok(())
    }
}

pub struct ReleaseShow {
    pub changelog: PathBuf,
}

impl ReleaseShow {
    fn render(&self, args: &[String]) -> Result<String> {
        let log = Changelog::load(&self.changelog)?;
        match args {
            [] => {
                let mut out = String::new();
                if let Some(project) = &log.project {
                    out.push_str(&format!("{project}\n\n"));
                }
                if !log.unreleased.is_empty() {
                    out.push_str("Unreleased\n");
                    for change in &log.unreleased {
                        out.push_str(&format!("  - [{}] {}\n", change.kind, change.message));
                    }
                }
                match log.latest() {
                    Some(latest) => out.push_str(&latest.to_string()),
                    None if log.unreleased.is_empty() => out.push_str("No changes recorded\n"),
                    None => {}
                }
                Ok(out)
            }
            [version] => log
                .release(version)
                .map(ToString::to_string)
                .ok_or_else(|| anyhow::anyhow!("release {version} not found")),
            _ => anyhow::bail!("usage: release show [version]"),
        }
    }
}

impl Command for ReleaseShow {
    fn name(&self) -> &str {
        "release show"
    }

    fn summary(&self) -> &str {
        "Print unreleased changes and the latest release, or one release"
    }

    fn invoke(&self, event: &CliEvent) -> Result<()> {
        let args = args_of(event, self.name())?;
        print!("{}", self.render(args)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DispatchedArgv;

    fn event(tokens: &[&str]) -> CliEvent {
        let mut argv = DispatchedArgv::new(tokens.iter().copied());
        argv.set_consumed_prefix_len(2);
        argv.into()
    }

    #[test]
    fn note_then_cut_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.yml");
        let note = ReleaseNote {
            changelog: path.clone(),
            project: None,
            author: Some("dev".into()),
        };
        note.invoke(&event(&["release", "note", "added", "git", "clone", "support"]))
            .unwrap();
        note.invoke(&event(&["release", "note", "Fixed", "tie-break"])).unwrap();

        let show = ReleaseShow {
            changelog: path.clone(),
        };
        let pending = show.render(&[]).unwrap();
        assert!(pending.starts_with("Unreleased\n"));
        assert!(pending.contains("[added] git clone support"));

        let cut = ReleaseCut {
            changelog: path.clone(),
            today: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        };
        cut.invoke(&event(&["release", "cut", "0.3.0"])).unwrap();

        let log = Changelog::load(&path).unwrap();
        assert!(log.unreleased.is_empty());
        assert_eq!(log.latest().unwrap().changes.len(), 2);
        assert_eq!(log.latest().unwrap().changes[0].author.as_deref(), Some("dev"));
        assert_eq!(
            show.render(&["0.3.0".to_string()]).unwrap(),
            "0.3.0 (2026-10-16)\n  - [added] git clone support\n  - [fixed] tie-break\n"
        );
    }

    #[test]
    fn note_validates_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.yml");
        let note = ReleaseNote {
            changelog: path.clone(),
            project: None,
            author: None,
        };
        assert!(note.invoke(&event(&["release", "note"])).is_err());
        assert!(note.invoke(&event(&["release", "note", "added"])).is_err());
        assert!(note.invoke(&event(&["release", "note", "tweaked", "x"])).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn cut_rejects_extra_args_and_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let cut = ReleaseCut {
            changelog: dir.path().join("CHANGELOG.yml"),
            today: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        };
        assert!(cut.invoke(&event(&["release", "cut"])).is_err());
        assert!(cut.invoke(&event(&["release", "cut", "1.0.0", "extra"])).is_err());
        assert!(cut.invoke(&event(&["release", "cut", "1.0.0"])).is_err());
    }

    #[test]
    fn author_prefers_explicit_variable() {
        use crate::env::MapEnv;
        let env = MapEnv::new([(ENV_AUTHOR, "alex"), ("USER", "root")]);
        assert_eq!(note_author(&env).as_deref(), Some("alex"));
        let env = MapEnv::new([("USER", "root")]);
        assert_eq!(note_author(&env).as_deref(), Some("root"));
        assert_eq!(note_author(&MapEnv::default()), None);
    }

    #[test]
    fn note_stamps_configured_project_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.yml");
        let note = |project: &str| ReleaseNote {
            changelog: path.clone(),
            project: Some(project.to_string()),
            author: None,
        };
        note("demo")
            .invoke(&event(&["release", "note", "added", "first"]))
            .unwrap();
        assert_eq!(Changelog::load(&path).unwrap().project.as_deref(), Some("demo"));

        note("renamed")
            .invoke(&event(&["release", "note", "fixed", "second"]))
            .unwrap();
        assert_eq!(Changelog::load(&path).unwrap().project.as_deref(), Some("demo"));

        let show = ReleaseShow {
            changelog: path.clone(),
        };
        assert_eq!(
            show.render(&[]).unwrap(),
            "demo\n\nUnreleased\n  - [added] first\n  - [fixed] second\n"
        );
    }

    #[test]
    fn show_names_project_of_empty_changelog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.yml");
        std::fs::write(&path, "project: demo\n").unwrap();
        let show = ReleaseShow { changelog: path };
        assert_eq!(show.render(&[]).unwrap(), "demo\n\nNo changes recorded\n");
    }

    #[test]
    fn show_empty_and_missing_release() {
        let dir = tempfile::tempdir().unwrap();
        let show = ReleaseShow {
            changelog: dir.path().join("CHANGELOG.yml"),
        };
        assert_eq!(show.render(&[]).unwrap(), "No changes recorded\n");
        assert!(show.render(&["1.0.0".to_string()]).is_err());
    }
}
