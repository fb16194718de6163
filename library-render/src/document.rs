//! Markdown rendering of prompt records.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use library_config::LibraryConfig;
use library_primitives::{CategoryTable, Complexity, IndexEntry, PromptRecord, Variant};
use tracing::debug;

use crate::template::Template;

const DOCUMENT_TEMPLATE: &str = "\
# {{id}}: {{name}}

{{metadata}}

---

## Purpose

{{description}}

## When to Use

{{when_to_use}}

## Prompt

{{fence}}
{{body}}
{{fence}}
";

const PLACEHOLDER_BODY: &str = "\
[PROMPT CONTENT TO BE FILLED IN]

This prompt requires manual completion based on the source material.
Refer to: {{source}}";

const PLACEHOLDER_EXPECTED_OUTPUT: &str = "\
- Detailed analysis or implementation
- Compliance with governance standards
- Clear documentation of changes";

const PLACEHOLDER_NOTES: &str = "\
This prompt was auto-generated from PROMPT_INDEX.json.
Please update with actual prompt content from the source material.";

const DEFAULT_SOURCE: &str = "original documentation";

/// Renders records into their Markdown artifact.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    categories: CategoryTable,
    template: Template,
}

/// Fields shared by full and placeholder renders.
struct DocumentView<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    complexity: String,
    tags: &'a [String],
    source: Option<&'a str>,
    created: NaiveDate,
    updated: NaiveDate,
    description: &'a str,
    when_to_use: Option<&'a str>,
    body: Option<&'a str>,
    expected_output: Option<&'a str>,
    variants: &'a [Variant],
    placeholder: bool,
}

impl DocumentRenderer {
    /// Creates a renderer resolving category labels from `categories`.
    #[must_use]
    pub fn new(categories: CategoryTable) -> Self {
        Self {
            categories,
            template: Template::new(DOCUMENT_TEMPLATE),
        }
    }

    /// Creates a renderer using the configured category table.
    #[must_use]
    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(config.categories().clone())
    }

    /// Renders a validated record. Missing dates fall back to `today`.
    #[must_use]
    pub fn render(&self, record: &PromptRecord, today: NaiveDate) -> String {
        self.render_view(&DocumentView {
            id: record.id.as_str(),
            name: &record.name,
            category: &record.category,
            complexity: record.complexity.label().to_owned(),
            tags: &record.tags,
            source: record.source.as_deref(),
            created: record.created.unwrap_or(today),
            updated: record.updated.unwrap_or(today),
            description: &record.description,
            when_to_use: record.when_to_use.as_deref(),
            body: Some(&record.body),
            expected_output: record.expected_output.as_deref(),
            variants: &record.variants,
            placeholder: false,
        })
    }

    /// Renders a stand-in document for an index entry whose artifact is
    /// missing. The prompt section asks the maintainer to fill in the body.
    #[must_use]
    pub fn render_placeholder(&self, entry: &IndexEntry, today: NaiveDate) -> String {
        self.render_view(&DocumentView {
            id: &entry.id,
            name: &entry.name,
            category: &entry.category,
            complexity: capitalize(&entry.complexity),
            tags: &entry.tags,
            source: entry.source.as_deref(),
            created: entry.created_date().unwrap_or(today),
            updated: entry.updated_date().unwrap_or(today),
            description: &entry.description,
            when_to_use: None,
            body: None,
            expected_output: None,
            variants: &[],
            placeholder: true,
        })
    }

    fn render_view(&self, view: &DocumentView<'_>) -> String {
        let body = match view.body {
            Some(body) => body.to_owned(),
            None => Template::new(PLACEHOLDER_BODY)
                .with("source", view.source.unwrap_or(DEFAULT_SOURCE))
                .render(),
        };
        let when_to_use = view.when_to_use.map_or_else(
            || {
                format!(
                    "Use this prompt when you need to {}.",
                    view.description.to_lowercase()
                )
            },
            str::to_owned,
        );

        let vars = HashMap::from([
            ("id".to_owned(), view.id.to_owned()),
            ("name".to_owned(), view.name.to_owned()),
            ("metadata".to_owned(), self.metadata_block(view)),
            ("description".to_owned(), view.description.to_owned()),
            ("when_to_use".to_owned(), when_to_use),
            ("fence".to_owned(), fence_for(&body)),
            ("body".to_owned(), body),
        ]);
        let mut doc = self.template.fill(&vars);

        if let Some(expected) = view.expected_output {
            let _ = write!(doc, "\n## Expected Output\n\n{expected}\n");
        } else if view.placeholder {
            let _ = write!(doc, "\n## Expected Output\n\n{PLACEHOLDER_EXPECTED_OUTPUT}\n");
        }

        if !view.variants.is_empty() {
            doc.push_str("\n## Variants\n");
            for variant in view.variants {
                let _ = write!(doc, "\n### {}\n\n", variant.name);
                if let Some(description) = &variant.description {
                    let _ = write!(doc, "{description}\n\n");
                }
                let fence = fence_for(&variant.body);
                let _ = writeln!(doc, "{fence}\n{}\n{fence}", variant.body);
            }
        }

        if view.placeholder {
            let _ = write!(doc, "\n## Notes\n\n{PLACEHOLDER_NOTES}\n");
        }

        debug!(id = view.id, placeholder = view.placeholder, "rendered prompt document");
        doc
    }

    fn metadata_block(&self, view: &DocumentView<'_>) -> String {
        let mut lines = vec![
            format!(
                "**Category:** {}",
                self.categories.display_label(view.category)
            ),
            format!("**Complexity:** {}", view.complexity),
            format!("**Tags:** {}", view.tags.join(", ")),
        ];
        if let Some(source) = view.source {
            lines.push(format!("**Source:** {source}"));
        }
        lines.push(format!("**Created:** {}", view.created));
        lines.push(format!("**Updated:** {}", view.updated));
        // Two trailing spaces are a Markdown hard line break.
        lines.join("  \n")
    }
}

/// Fields recovered from a rendered document's title and metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMetadata {
    /// Identifier from the title line.
    pub id: String,
    /// Name from the title line.
    pub name: String,
    /// Category key, resolved from the rendered label.
    pub category: String,
    /// Complexity parsed from its capitalised label.
    pub complexity: Option<Complexity>,
    /// Tags in rendered order.
    pub tags: Vec<String>,
    /// Source line, when rendered.
    pub source: Option<String>,
    /// Creation date.
    pub created: Option<NaiveDate>,
    /// Last update date.
    pub updated: Option<NaiveDate>,
}

/// Reads the title and metadata block back out of a rendered document.
///
/// Returns `None` when the first line is not a `# ID: Name` title. Labels
/// unknown to `categories` are returned as-is, mirroring the renderer's
/// fallback.
#[must_use]
pub fn parse_metadata(text: &str, categories: &CategoryTable) -> Option<RenderedMetadata> {
    let mut lines = text.lines();
    let (id, name) = lines.next()?.strip_prefix("# ")?.split_once(": ")?;

    let mut meta = RenderedMetadata {
        id: id.to_owned(),
        name: name.to_owned(),
        category: String::new(),
        complexity: None,
        tags: Vec::new(),
        source: None,
        created: None,
        updated: None,
    };

    for line in lines {
        let line = line.trim_end();
        if line == "---" {
            break;
        }
        let Some(rest) = line.strip_prefix("**") else {
            continue;
        };
        // An empty value leaves the bare `**Key:**` after trimming.
        let Some((key, value)) = rest
            .split_once(":** ")
            .or_else(|| rest.strip_suffix(":**").map(|key| (key, "")))
        else {
            continue;
        };
        match key {
            "Category" => {
                meta.category = categories.key_for_label(value).unwrap_or(value).to_owned();
            }
            "Complexity" => meta.complexity = value.to_lowercase().parse().ok(),
            "Tags" => {
                meta.tags = value
                    .split(", ")
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_owned)
                    .collect();
            }
            "Source" => meta.source = Some(value.to_owned()),
            "Created" => meta.created = value.parse().ok(),
            "Updated" => meta.updated = value.parse().ok(),
            _ => {}
        }
    }

    Some(meta)
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Picks a backtick fence longer than any backtick run inside `body`.
fn fence_for(body: &str) -> String {
    let longest = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use library_primitives::PromptId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record() -> PromptRecord {
        PromptRecord {
            id: PromptId::new("SYS-001").unwrap(),
            name: "Health Check".into(),
            category: "system".into(),
            description: "Check system health".into(),
            tags: vec!["health".into(), "ops".into()],
            complexity: Complexity::Medium,
            body: "Run a full diagnostic sweep across all subsystems and report status.".into(),
            source: None,
            when_to_use: None,
            expected_output: None,
            variants: Vec::new(),
            created: Some(date(2026, 1, 5)),
            updated: Some(date(2026, 2, 6)),
        }
    }

    fn renderer() -> DocumentRenderer {
        DocumentRenderer::new(CategoryTable::builtin())
    }

    #[test]
    fn renders_full_document() {
        let doc = renderer().render(&record(), date(2030, 1, 1));
        let expected = "\
# SYS-001: Health Check

**Category:** System & Infrastructure  \n\
**Complexity:** Medium  \n\
**Tags:** health, ops  \n\
**Created:** 2026-01-05  \n\
**Updated:** 2026-02-06

---

## Purpose

Check system health

## When to Use

Use this prompt when you need to check system health.

## Prompt

```
Run a full diagnostic sweep across all subsystems and report status.
```
";
        assert_eq!(doc, expected);
    }

    #[test]
    fn optional_sections_appear_only_when_present() {
        let mut rec = record();
        rec.when_to_use = Some("Before a release.".into());
        rec.expected_output = Some("A status table.".into());
        rec.source = Some("Ops handbook".into());
        rec.variants = vec![
            Variant {
                name: "Quick".into(),
                description: Some("Fast path".into()),
                body: "Check only the database.".into(),
            },
            Variant {
                name: "Bare".into(),
                description: None,
                body: "Ping.".into(),
            },
        ];

        let doc = renderer().render(&rec, date(2030, 1, 1));
        assert!(doc.contains("**Source:** Ops handbook  \n"));
        assert!(doc.contains("## When to Use\n\nBefore a release.\n"));
        assert!(doc.contains("\n## Expected Output\n\nA status table.\n"));
        assert!(doc.contains("\n## Variants\n\n### Quick\n\nFast path\n\n```\nCheck only the database.\n```\n"));
        assert!(doc.contains("\n### Bare\n\n```\nPing.\n```\n"));
        assert!(!doc.contains("## Notes"));
    }

    #[test]
    fn missing_dates_use_today() {
        let mut rec = record();
        rec.created = None;
        rec.updated = None;
        let doc = renderer().render(&rec, date(2030, 1, 1));
        assert!(doc.contains("**Created:** 2030-01-01  \n**Updated:** 2030-01-01\n"));
    }

    #[test]
    fn body_with_fences_and_placeholders_is_preserved() {
        let mut rec = record();
        rec.body = "Explain {{topic}} using:\n```rust\nfn main() {}\n```\nthen summarise.".into();
        let doc = renderer().render(&rec, date(2030, 1, 1));
        assert!(doc.contains("````\nExplain {{topic}} using:\n```rust\n"));
        assert!(doc.ends_with("then summarise.\n````\n"));
    }

    #[test]
    fn metadata_round_trips() {
        let rec = record();
        let doc = renderer().render(&rec, date(2030, 1, 1));
        let meta = parse_metadata(&doc, &CategoryTable::builtin()).unwrap();

        assert_eq!(meta.id, rec.id.as_str());
        assert_eq!(meta.name, rec.name);
        assert_eq!(meta.category, rec.category);
        assert_eq!(meta.tags, rec.tags);
        assert_eq!(meta.complexity, Some(rec.complexity));
        assert_eq!(meta.created, rec.created);
        assert_eq!(meta.updated, rec.updated);
        assert!(meta.source.is_none());
    }

    #[test]
    fn metadata_round_trips_without_tags() {
        let mut rec = record();
        rec.tags.clear();
        rec.source = Some("Notes".into());
        let doc = renderer().render(&rec, date(2030, 1, 1));
        let meta = parse_metadata(&doc, &CategoryTable::builtin()).unwrap();
        assert!(meta.tags.is_empty());
        assert_eq!(meta.source.as_deref(), Some("Notes"));
    }

    #[test]
    fn placeholder_cites_source() {
        let entry = IndexEntry {
            id: "DOCS-002".into(),
            name: "Changelog Writer".into(),
            category: "docs".into(),
            file: "prompts/docs/DOCS-002_changelog_writer.md".into(),
            description: "Draft Release Notes".into(),
            tags: vec!["release".into()],
            complexity: "low".into(),
            source: Some("Release guide".into()),
            ..IndexEntry::default()
        };

        let doc = renderer().render_placeholder(&entry, date(2031, 3, 3));
        assert!(doc.starts_with("# DOCS-002: Changelog Writer\n\n**Category:** Documentation  \n**Complexity:** Low  \n"));
        assert!(doc.contains("Use this prompt when you need to draft release notes."));
        assert!(doc.contains("[PROMPT CONTENT TO BE FILLED IN]"));
        assert!(doc.contains("Refer to: Release guide\n```"));
        assert!(doc.contains("## Expected Output\n\n- Detailed analysis"));
        assert!(doc.contains("## Notes\n\nThis prompt was auto-generated"));
        assert!(doc.contains("**Created:** 2031-03-03"));
    }

    #[test]
    fn placeholder_without_source_uses_default() {
        let entry = IndexEntry {
            id: "META-001".into(),
            name: "Planner".into(),
            category: "unknown".into(),
            ..IndexEntry::default()
        };
        let doc = renderer().render_placeholder(&entry, date(2031, 3, 3));
        assert!(doc.contains("Refer to: original documentation"));
        assert!(doc.contains("**Category:** unknown  \n"));
    }

    #[test]
    fn parse_metadata_rejects_untitled_text() {
        assert!(parse_metadata("no title here", &CategoryTable::builtin()).is_none());
    }
}
