//! Markdown changelog rendering and file updates.
//!
//! A changelog starts with a `# <Module>` title; every versioning run inserts a
//! new `## <version>` section directly below it, above all earlier sections.

use crate::domain::ModuleChangelog;
use crate::error::Result;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Render the section for a changelog's new version
pub fn render(changelog: &ModuleChangelog) -> String {
    let mut block = format!("## {}\n", changelog.new_version());

    for (level, descriptions) in changelog.changes_by_level() {
        block.push_str(&format!("\n### {} Changes\n\n", level));
        for description in descriptions {
            block.push_str(&render_bullet(description));
        }
    }

    block
}

fn render_bullet(description: &str) -> String {
    let text = description.trim_matches(|c| c == '\n' || c == '\r');
    let mut bullet = String::new();

    for (i, line) in text.lines().enumerate() {
        if i == 0 {
            bullet.push_str("- ");
            bullet.push_str(line);
        } else if !line.trim().is_empty() {
            bullet.push_str("  ");
            bullet.push_str(line);
        }
        bullet.push('\n');
    }

    if bullet.is_empty() {
        bullet.push_str("-\n");
    }
    bullet
}

/// Insert `block` below the top-level heading of an existing document.
///
/// Content above and including the heading is kept byte for byte, as is
/// everything after the blank lines that follow it.
pub fn insert_section(document: &str, module_name: &str, block: &str) -> String {
    let lines: Vec<&str> = document.split_inclusive('\n').collect();
    let heading = lines
        .iter()
        .position(|line| line.trim_end() == "#" || line.starts_with("# "));

    let Some(heading) = heading else {
        return format!("# {}\n\n{}\n{}", module_name, block, document);
    };

    let mut head: String = lines[..=heading].concat();
    if !head.ends_with('\n') {
        head.push('\n');
    }

    let rest_start = lines[heading + 1..]
        .iter()
        .position(|line| !line.trim().is_empty())
        .map(|offset| heading + 1 + offset)
        .unwrap_or(lines.len());
    let rest = lines[rest_start..].concat();

    if rest.is_empty() {
        format!("{}\n{}", head, block)
    } else {
        format!("{}\n{}\n{}", head, block, rest)
    }
}

/// Create or update the changelog file next to each module manifest.
///
/// Returns the paths of the files written.
pub fn write_changelogs(changelogs: &[ModuleChangelog], file_name: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(changelogs.len());

    for changelog in changelogs {
        let path = changelog.module_directory().join(file_name);
        let block = render(changelog);

        let content = if path.exists() {
            let existing = fs::read_to_string(&path)?;
            insert_section(&existing, &changelog.module_name, &block)
        } else {
            format!("# {}\n\n{}", changelog.module_name, block)
        };

        fs::write(&path, content)?;
        info!(
            module = %changelog.module_name,
            version = %changelog.new_version(),
            file = %path.display(),
            "Wrote changelog"
        );
        written.push(path);
    }

    Ok(written)
}
