use crate::command_handlers::dispatch::CommandInfo;

/// Commands grouped by module, names padded to a common width.
pub fn render(rows: &[CommandInfo]) -> String {
    if rows.is_empty() {
        return "No commands available (all modules disabled?)\n".to_string();
    }
    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    let mut current: Option<&str> = None;
    for row in rows {
        if current != Some(row.module.as_str()) {
            if current.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("{}:\n", row.module));
            current = Some(row.module.as_str());
        }
        if row.summary.is_empty() {
            out.push_str(&format!("  {}\n", row.name));
        } else {
            out.push_str(&format!("  {:<width$}  {}\n", row.name, row.summary));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(module: &str, name: &str, summary: &str) -> CommandInfo {
        CommandInfo {
            module: module.into(),
            name: name.into(),
            summary: summary.into(),
        }
    }

    #[test]
    fn groups_by_module() {
        let out = render(&[
            row("git", "git clone", "Clone"),
            row("git", "git status", ""),
            row("release", "release cut", "Cut"),
        ]);
        assert_eq!(
            out,
            "git:\n  git clone    Clone\n  git status\n\nrelease:\n  release cut  Cut\n"
        );
    }

    #[test]
    fn empty_listing() {
        assert!(render(&[]).starts_with("No commands"));
    }
}
