use crate::domain::BumpLevel;
use crate::error::{ChangesetError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Line that opens and closes the changeset header block
pub const HEADER_MARKER: &str = "---";

fn header_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*"([^"]+)"\s*:\s*(\S+)\s*$"#).expect("header regex is valid")
    })
}

/// A pending, unreleased change scoped to one or more modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset {
    /// Changed module names in authored order, without duplicates
    pub modules: Vec<String>,
    pub bump: BumpLevel,
    pub description: String,
}

impl Changeset {
    pub fn new(
        modules: impl IntoIterator<Item = impl Into<String>>,
        bump: BumpLevel,
        description: impl Into<String>,
    ) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for module in modules {
            let module = module.into();
            if !unique.contains(&module) {
                unique.push(module);
            }
        }

        Changeset {
            modules: unique,
            bump,
            description: description.into(),
        }
    }

    /// Parse the text of a changeset file.
    ///
    /// ```text
    /// ---
    /// "ProjectA": minor
    /// "ProjectB": patch
    /// ---
    ///
    /// Free-text description
    /// ```
    ///
    /// When header lines carry different levels the highest one applies.
    /// A leading byte order mark is ignored. `path` is only used to attribute errors.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.lines();

        match lines.next() {
            Some(first) if first.trim_end() == HEADER_MARKER => {}
            _ => {
                return Err(ChangesetError::malformed(
                    path,
                    format!("expected opening '{}' marker", HEADER_MARKER),
                ))
            }
        }

        let mut modules = Vec::new();
        let mut bump = BumpLevel::None;
        let mut closed = false;

        for line in lines.by_ref() {
            if line.trim_end() == HEADER_MARKER {
                closed = true;
                break;
            }

            let captures = header_line_regex().captures(line).ok_or_else(|| {
                ChangesetError::malformed(path, format!("invalid header line '{}'", line))
            })?;
            let token = &captures[2];
            let level = BumpLevel::parse_authored(token).ok_or_else(|| {
                ChangesetError::malformed(path, format!("invalid bump type '{}'", token))
            })?;

            modules.push(captures[1].to_string());
            bump = bump.max(level);
        }

        if !closed {
            return Err(ChangesetError::malformed(
                path,
                format!("header block is not closed with '{}'", HEADER_MARKER),
            ));
        }
        if modules.is_empty() {
            return Err(ChangesetError::malformed(path, "header lists no modules"));
        }

        let mut body = lines.peekable();
        if body.peek().is_some_and(|line| line.trim().is_empty()) {
            body.next();
        }
        let description = body.collect::<Vec<_>>().join("\n");

        Ok(Changeset::new(modules, bump, description))
    }

    /// Serialize to the on-disk format read by [`Changeset::parse`]
    pub fn to_file_content(&self) -> String {
        let mut content = String::new();
        content.push_str(HEADER_MARKER);
        content.push('\n');
        for module in &self.modules {
            content.push_str(&format!(
                "\"{}\": {}\n",
                module,
                self.bump.name().to_lowercase()
            ));
        }
        content.push_str(HEADER_MARKER);
        content.push_str("\n\n");
        content.push_str(&self.description);
        content.push('\n');
        content
    }
}
