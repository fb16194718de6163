//! Rule-based validation of prompt candidates and catalog indexes.

use std::fmt;

use library_config::LibraryConfig;
use library_primitives::{
    CategoryTable, Complexity, IndexEntry, PromptId, PromptRecord, Variant,
    is_valid_category_key, is_valid_prompt_id, is_valid_tag, parse_date,
};
use tracing::debug;

use crate::candidate::{PromptCandidate, VariantCandidate};
use crate::violation::{ValidationErrors, Violation};

/// A violation located at one entry of a persisted index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryViolation {
    /// Zero-based position in the `prompts` array, `None` for the
    /// `categories` table.
    pub position: Option<usize>,
    /// Entry identifier as written in the index (may be empty or malformed).
    pub id: String,
    /// What is wrong with it.
    pub violation: Violation,
}

impl fmt::Display for EntryViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) if self.id.is_empty() => {
                write!(f, "prompts[{position}]: {}", self.violation)
            }
            Some(position) => write!(f, "prompts[{position}] ({}): {}", self.id, self.violation),
            None => write!(f, "categories: {}", self.violation),
        }
    }
}

/// Checks candidates against structural rules and the category table.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    categories: CategoryTable,
    min_body_chars: usize,
    prompts_dir: String,
}

impl SchemaValidator {
    /// Creates a validator using the configured categories and limits.
    #[must_use]
    pub fn new(config: &LibraryConfig) -> Self {
        Self {
            categories: config.categories().clone(),
            min_body_chars: config.min_body_chars(),
            prompts_dir: config.prompts_dir().to_owned(),
        }
    }

    /// Returns the category table used for referential checks.
    #[must_use]
    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Collects every violation in `candidate`. An empty result means valid.
    ///
    /// Value rules run for each field that is present, independently of
    /// whether other fields are missing. A mistyped field is reported once,
    /// as [`Violation::WrongType`], and not as missing.
    #[must_use]
    pub fn check(&self, candidate: &PromptCandidate) -> Vec<Violation> {
        let mut violations: Vec<Violation> = required_fields(candidate)
            .into_iter()
            .filter(|(field, present)| !present && !candidate.is_mistyped(field))
            .map(|(field, _)| Violation::MissingField(field))
            .collect();
        violations.extend(candidate.mistyped.iter().map(|m| Violation::WrongType {
            field: m.field.clone(),
            expected: m.expected,
        }));

        if let Some(id) = &candidate.id {
            check_id(id, &mut violations);
        }
        check_single_line("name", candidate.name.as_deref(), &mut violations);
        check_single_line("source", candidate.source.as_deref(), &mut violations);
        if let Some(category) = &candidate.category {
            self.check_category(category, &mut violations);
        }
        if let Some(complexity) = &candidate.complexity {
            check_complexity(complexity, &mut violations);
        }
        if let Some(tags) = &candidate.tags {
            check_tags(tags, &mut violations);
        }
        if let Some(body) = &candidate.body {
            let length = body.chars().count();
            if length < self.min_body_chars {
                violations.push(Violation::BodyTooShort {
                    length,
                    minimum: self.min_body_chars,
                });
            }
        }
        if let Some(variants) = &candidate.variants {
            for (index, variant) in variants.iter().enumerate() {
                let fields = [
                    ("name", variant.name.is_some()),
                    ("prompt", variant.body.is_some()),
                ];
                for (field, present) in fields {
                    if !present && !candidate.is_mistyped(&format!("variants[{index}].{field}")) {
                        violations.push(Violation::VariantMissingField { index, field });
                    }
                }
            }
        }

        debug!(violations = violations.len(), "checked prompt candidate");
        violations
    }

    /// Validates `candidate` and converts it into a typed record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] holding every detected violation.
    pub fn validate(&self, candidate: PromptCandidate) -> Result<PromptRecord, ValidationErrors> {
        let violations = self.check(&candidate);
        if !violations.is_empty() {
            return Err(ValidationErrors::new(violations));
        }
        assemble(candidate)
    }

    /// Audits every entry of a persisted index plus its category table.
    ///
    /// Entries are checked against the configured categories; the index's
    /// own table is checked for well-formed keys and labels.
    #[must_use]
    pub fn check_index(
        &self,
        entries: &[IndexEntry],
        categories: &CategoryTable,
    ) -> Vec<EntryViolation> {
        let mut problems = Vec::new();

        for category in categories.iter() {
            if !is_valid_category_key(category.key()) || category.label().trim().is_empty() {
                problems.push(EntryViolation {
                    position: None,
                    id: String::new(),
                    violation: Violation::InvalidCategoryEntry(category.key().to_owned()),
                });
            }
        }

        for (position, entry) in entries.iter().enumerate() {
            let mut violations = Vec::new();
            for (field, value) in [
                ("id", &entry.id),
                ("name", &entry.name),
                ("category", &entry.category),
                ("file", &entry.file),
                ("description", &entry.description),
                ("complexity", &entry.complexity),
            ] {
                if value.is_empty() {
                    violations.push(Violation::MissingField(field));
                }
            }

            if !entry.id.is_empty() {
                check_id(&entry.id, &mut violations);
            }
            check_single_line("name", Some(&entry.name), &mut violations);
            check_single_line("source", entry.source.as_deref(), &mut violations);
            if !entry.category.is_empty() {
                self.check_category(&entry.category, &mut violations);
            }
            if !entry.complexity.is_empty() {
                check_complexity(&entry.complexity, &mut violations);
            }
            check_tags(&entry.tags, &mut violations);
            for (field, value) in [("created", &entry.created), ("updated", &entry.updated)] {
                let malformed = value
                    .as_deref()
                    .filter(|value| parse_date(Some(*value)).is_none());
                if let Some(value) = malformed {
                    violations.push(Violation::InvalidDate {
                        field,
                        value: value.to_owned(),
                    });
                }
            }

            if !(entry.file.is_empty() || entry.id.is_empty() || entry.category.is_empty()) {
                let expected = format!("{}/{}/{}_", self.prompts_dir, entry.category, entry.id);
                if !(entry.file.starts_with(&expected)
                    && entry.file.ends_with(".md")
                    && !entry.file[expected.len()..].contains('/'))
                {
                    violations.push(Violation::MisplacedFile {
                        file: entry.file.clone(),
                        expected,
                    });
                }
            }

            problems.extend(violations.into_iter().map(|violation| EntryViolation {
                position: Some(position),
                id: entry.id.clone(),
                violation,
            }));
        }

        debug!(
            entries = entries.len(),
            problems = problems.len(),
            "checked index schema"
        );
        problems
    }

    fn check_category(&self, category: &str, violations: &mut Vec<Violation>) {
        if !self.categories.contains(category) {
            violations.push(Violation::UnknownCategory {
                category: category.to_owned(),
                valid: self.categories.keys().collect::<Vec<_>>().join(", "),
            });
        }
    }
}

/// Required fields paired with their presence in `candidate`.
fn required_fields(candidate: &PromptCandidate) -> [(&'static str, bool); 7] {
    [
        ("id", candidate.id.is_some()),
        ("name", candidate.name.is_some()),
        ("category", candidate.category.is_some()),
        ("description", candidate.description.is_some()),
        ("tags", candidate.tags.is_some()),
        ("complexity", candidate.complexity.is_some()),
        ("prompt", candidate.body.is_some()),
    ]
}

fn check_single_line(
    field: &'static str,
    value: Option<&str>,
    violations: &mut Vec<Violation>,
) {
    if value.is_some_and(|value| value.contains(['\n', '\r'])) {
        violations.push(Violation::LineBreak(field));
    }
}

fn check_id(id: &str, violations: &mut Vec<Violation>) {
    if !is_valid_prompt_id(id) {
        violations.push(Violation::InvalidId(id.to_owned()));
    }
}

fn check_complexity(complexity: &str, violations: &mut Vec<Violation>) {
    if complexity.parse::<Complexity>().is_err() {
        violations.push(Violation::InvalidComplexity(complexity.to_owned()));
    }
}

fn check_tags(tags: &[String], violations: &mut Vec<Violation>) {
    violations.extend(
        tags.iter()
            .filter(|tag| !is_valid_tag(tag))
            .map(|tag| Violation::InvalidTag(tag.clone())),
    );
}

/// Converts a candidate that already passed [`SchemaValidator::check`].
fn assemble(candidate: PromptCandidate) -> Result<PromptRecord, ValidationErrors> {
    let PromptCandidate {
        id,
        name,
        category,
        description,
        tags,
        complexity,
        body,
        source,
        when_to_use,
        expected_output,
        variants,
        created,
        mistyped: _,
    } = candidate;

    let missing = |field| ValidationErrors::from(Violation::MissingField(field));
    let id = id.ok_or_else(|| missing("id"))?;
    let complexity = complexity.ok_or_else(|| missing("complexity"))?;

    Ok(PromptRecord {
        id: PromptId::new(id.clone()).map_err(|_| Violation::InvalidId(id))?,
        name: name.ok_or_else(|| missing("name"))?,
        category: category.ok_or_else(|| missing("category"))?,
        description: description.ok_or_else(|| missing("description"))?,
        tags: tags.ok_or_else(|| missing("tags"))?,
        complexity: complexity
            .parse::<Complexity>()
            .map_err(|_| Violation::InvalidComplexity(complexity))?,
        body: body.ok_or_else(|| missing("prompt"))?,
        source,
        when_to_use,
        expected_output,
        variants: variants
            .unwrap_or_default()
            .into_iter()
            .map(into_variant)
            .collect(),
        created,
        updated: None,
    })
}

fn into_variant(variant: VariantCandidate) -> Variant {
    Variant {
        name: variant.name.unwrap_or_default(),
        description: variant.description,
        body: variant.body.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> SchemaValidator {
        SchemaValidator::new(&LibraryConfig::for_root("/tmp/library").unwrap())
    }

    fn valid_candidate() -> PromptCandidate {
        PromptCandidate {
            id: Some("SYS-001".into()),
            name: Some("Health Check".into()),
            category: Some("system".into()),
            description: Some("Check system health".into()),
            tags: Some(vec!["health".into(), "ops".into()]),
            complexity: Some("medium".into()),
            body: Some(
                "Run a full diagnostic sweep across all subsystems and report status.".into(),
            ),
            ..PromptCandidate::default()
        }
    }

    #[test]
    fn valid_candidate_has_no_violations() {
        assert!(validator().check(&valid_candidate()).is_empty());
        let record = validator().validate(valid_candidate()).unwrap();
        assert_eq!(record.id.as_str(), "SYS-001");
        assert_eq!(record.complexity, Complexity::Medium);
        assert!(record.created.is_none());
    }

    #[test]
    fn missing_tags_is_reported_without_panicking() {
        let mut candidate = valid_candidate();
        candidate.tags = None;

        let errors = validator().validate(candidate).expect_err("tags missing");
        assert!(errors.contains(&Violation::MissingField("tags")));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn empty_candidate_lists_every_required_field() {
        let violations = validator().check(&PromptCandidate::default());
        assert_eq!(violations.len(), 7);
        assert!(violations.contains(&Violation::MissingField("prompt")));
    }

    #[test]
    fn present_fields_are_checked_even_when_others_are_missing() {
        let candidate = PromptCandidate {
            id: Some("bad".into()),
            tags: Some(vec!["Bad Tag".into()]),
            ..PromptCandidate::default()
        };
        let violations = validator().check(&candidate);
        assert!(violations.contains(&Violation::InvalidId("bad".into())));
        assert!(violations.contains(&Violation::InvalidTag("Bad Tag".into())));
        assert!(violations.contains(&Violation::MissingField("name")));
    }

    #[test]
    fn reports_all_value_violations_in_one_pass() {
        let candidate = PromptCandidate {
            id: Some("sys-1".into()),
            category: Some("ops".into()),
            complexity: Some("extreme".into()),
            tags: Some(vec!["ok".into(), "9bad".into(), "-bad".into()]),
            body: Some("too short".into()),
            ..valid_candidate()
        };

        let violations = validator().check(&candidate);
        assert_eq!(violations.len(), 6);
        assert!(violations.contains(&Violation::BodyTooShort {
            length: 9,
            minimum: 50
        }));
        assert!(matches!(
            &violations[1],
            Violation::UnknownCategory { category, valid }
                if category == "ops" && valid.starts_with("dev, docs")
        ));
    }

    #[test]
    fn body_length_counts_characters() {
        let mut candidate = valid_candidate();
        candidate.body = Some("é".repeat(50));
        assert!(validator().check(&candidate).is_empty());
        candidate.body = Some("é".repeat(49));
        assert_eq!(validator().check(&candidate).len(), 1);
    }

    #[test]
    fn variants_need_name_and_prompt() {
        let mut candidate = valid_candidate();
        candidate.variants = Some(vec![
            VariantCandidate {
                name: Some("Short".into()),
                description: None,
                body: Some("Shorter variant".into()),
            },
            VariantCandidate::default(),
        ]);
        let violations = validator().check(&candidate);
        assert_eq!(
            violations,
            vec![
                Violation::VariantMissingField {
                    index: 1,
                    field: "name"
                },
                Violation::VariantMissingField {
                    index: 1,
                    field: "prompt"
                },
            ]
        );
    }

    #[test]
    fn mistyped_fields_do_not_hide_other_problems() {
        let candidate =
            PromptCandidate::from_json(r#"{"id":"sys-1","tags":"health,ops","complexity":"extreme"}"#)
                .unwrap();

        let violations = validator().check(&candidate);
        assert_eq!(
            violations,
            vec![
                Violation::MissingField("name"),
                Violation::MissingField("category"),
                Violation::MissingField("description"),
                Violation::MissingField("prompt"),
                Violation::WrongType {
                    field: "tags".into(),
                    expected: "an array of strings"
                },
                Violation::InvalidId("sys-1".into()),
                Violation::InvalidComplexity("extreme".into()),
            ]
        );
    }

    #[test]
    fn mistyped_variant_field_is_not_also_missing() {
        let candidate =
            PromptCandidate::from_json(r#"{"variants":[{"name":1,"prompt":"p"}]}"#).unwrap();

        let violations = validator().check(&candidate);
        assert!(violations.contains(&Violation::WrongType {
            field: "variants[0].name".into(),
            expected: "a string"
        }));
        assert!(!violations.iter().any(|v| matches!(v, Violation::VariantMissingField { .. })));
    }

    #[test]
    fn metadata_fields_must_be_single_line() {
        let mut candidate = valid_candidate();
        candidate.name = Some("Health\n---\nCheck".into());
        candidate.source = Some("Runbook\r\n**Category:** Documentation".into());

        let violations = validator().check(&candidate);
        assert_eq!(
            violations,
            vec![Violation::LineBreak("name"), Violation::LineBreak("source")]
        );
        assert_eq!(violations[0].to_string(), "name must be a single line");
    }

    fn entry(id: &str, category: &str, file: &str) -> IndexEntry {
        IndexEntry {
            id: id.into(),
            name: "Name".into(),
            category: category.into(),
            file: file.into(),
            description: "Description".into(),
            tags: vec!["tag".into()],
            complexity: "low".into(),
            ..IndexEntry::default()
        }
    }

    #[test]
    fn index_check_accepts_well_formed_entries() {
        let entries = vec![
            entry("DEV-001", "dev", "prompts/dev/DEV-001_name.md"),
            entry("SYS-001", "system", "prompts/system/SYS-001_health_check.md"),
        ];
        let problems = validator().check_index(&entries, &CategoryTable::builtin());
        assert!(problems.is_empty(), "{problems:?}");
    }

    #[test]
    fn index_check_locates_problems() {
        let mut broken = entry("DEV-1", "dev", "elsewhere/DEV-1.md");
        broken.complexity = "huge".into();
        let entries = vec![entry("DEV-001", "dev", "prompts/dev/DEV-001_a.md"), broken];

        let mut categories = CategoryTable::builtin();
        categories = categories.with("ops", "Ops").unwrap();
        let problems = validator().check_index(&entries, &categories);

        assert_eq!(problems.len(), 3);
        assert!(problems.iter().all(|p| p.position == Some(1)));
        assert!(problems[0].to_string().starts_with("prompts[1] (DEV-1): invalid id"));
    }

    #[test]
    fn index_check_reports_malformed_dates() {
        let mut dated = entry("DEV-001", "dev", "prompts/dev/DEV-001_a.md");
        dated.created = Some("2025-01".into());
        dated.updated = Some("2025-01-31".into());

        let problems = validator().check_index(&[dated], &CategoryTable::builtin());
        assert_eq!(problems.len(), 1);
        assert_eq!(
            problems[0].violation,
            Violation::InvalidDate {
                field: "created",
                value: "2025-01".into()
            }
        );
    }

    #[test]
    fn index_check_flags_empty_required_fields() {
        let entries = vec![IndexEntry::default()];
        let problems = validator().check_index(&entries, &CategoryTable::builtin());
        assert_eq!(problems.len(), 6);
        assert_eq!(problems[0].to_string(), "prompts[0]: missing required field: id");
    }
}
