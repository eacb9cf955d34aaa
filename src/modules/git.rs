use crate::changelog::Changelog;
use crate::command::{args_of, Command};
use crate::config::AppConfig;
use crate::container::ContainerBuilder;
use crate::event::CliEvent;
use crate::process::{run_checked, SharedRunner};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

pub const MODULE: &str = "git";
pub const COMMAND_IDS: &[&str] = &["git.clone", "git.status", "git.tag"];

pub fn register(builder: ContainerBuilder) -> ContainerBuilder {
    builder
        .command("git.clone", |c| {
            let cfg = c.service::<AppConfig>()?;
            Ok(Arc::new(GitClone {
                git: cfg.git.program,
                runner: c.service::<SharedRunner>()?,
            }) as Arc<dyn Command>)
        })
        .command("git.status", |c| {
            let cfg = c.service::<AppConfig>()?;
            Ok(Arc::new(GitStatus {
                git: cfg.git.program,
                runner: c.service::<SharedRunner>()?,
            }) as Arc<dyn Command>)
        })
        .command("git.tag", |c| {
            let cfg = c.service::<AppConfig>()?;
            Ok(Arc::new(GitTag {
                git: cfg.git.program,
                prefix: cfg.git.tag_prefix,
                changelog: cfg.project.changelog,
                runner: c.service::<SharedRunner>()?,
            }) as Arc<dyn Command>)
        })
}

pub struct GitClone {
    pub git: String,
    pub runner: SharedRunner,
}

impl Command for GitClone {
    fn name(&self) -> &str {
        "git clone"
    }

    fn summary(&self) -> &str {
        "Clone a repository: git clone <url> [dir]"
    }

    fn invoke(&self, event: &CliEvent) -> Result<()> {
        let args = args_of(event, self.name())?;
        if args.is_empty() || args.len() > 2 {
            anyhow::bail!("usage: git clone <url> [dir]");
        }
        let mut git_args = vec!["clone".to_string()];
        git_args.extend(args.iter().cloned());
        tracing::info!(url = %args[0], "cloning");
        run_checked(self.runner.as_ref(), &self.git, &git_args, None)
    }
}

pub struct GitStatus {
    pub git: String,
    pub runner: SharedRunner,
}

impl Command for GitStatus {
    fn name(&self) -> &str {
        "git status"
    }

    fn summary(&self) -> &str {
        "Show the working tree status (extra arguments go to git)"
    }

    fn invoke(&self, event: &CliEvent) -> Result<()> {
        let args = args_of(event, self.name())?;
        let mut git_args = vec!["status".to_string()];
        if args.is_empty() {
            git_args.push("--short".to_string());
        } else {
            git_args.extend(args.iter().cloned());
        }
        run_checked(self.runner.as_ref(), &self.git, &git_args, None)
    }
}

/// Tags HEAD with a release recorded in the changelog (latest by default).
pub struct GitTag {
    pub git: String,
    pub prefix: String,
    pub changelog: PathBuf,
    pub runner: SharedRunner,
}

impl Command for GitTag {
    fn name(&self) -> &str {
        "git tag"
    }

    fn summary(&self) -> &str {
        "Tag HEAD with a changelog release: git tag [version]"
    }

    fn invoke(&self, event: &CliEvent) -> Result<()> {
        let args = args_of(event, self.name())?;
        let log = Changelog::load(&self.changelog)?;
        let release = match args {
            [] => log.latest().ok_or_else(|| {
                anyhow::anyhow!("no releases in {}", self.changelog.display())
            })?,
            [version] => log.release(version).ok_or_else(|| {
                anyhow::anyhow!("release {version} not found in {}", self.changelog.display())
            })?,
            _ => anyhow::bail!("usage: git tag [version]"),
        };
        let tag = format!("{}{}", self.prefix, release.version);
        let git_args = vec![
            "tag".to_string(),
            "-a".to_string(),
            tag.clone(),
            "-m".to_string(),
            format!("Release {}", release.version),
        ];
        run_checked(self.runner.as_ref(), &self.git, &git_args, None)?;
        println!("Tagged {tag}");
        Ok(())
    }
}
