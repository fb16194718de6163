//! Unvalidated prompt data as supplied by callers.

use chrono::NaiveDate;
use library_primitives::parse_date;
use serde_json::{Map, Value};

/// A field whose JSON value has an unusable type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mistyped {
    /// Field path, e.g. `tags` or `variants[1].prompt`.
    pub field: String,
    /// What the field should have held.
    pub expected: &'static str,
}

/// Raw variant data; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantCandidate {
    /// Section title.
    pub name: Option<String>,
    /// Optional explanation.
    pub description: Option<String>,
    /// Variant prompt text.
    pub body: Option<String>,
}

/// A prompt record before validation.
///
/// Every field is optional so that incomplete input parses cleanly and
/// absence can be reported as a violation instead of a parse failure. A
/// field holding the wrong JSON type is left empty and recorded in
/// [`PromptCandidate::mistyped`]. Unknown keys, including a caller-supplied
/// `file`, are ignored: the artifact path is always derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptCandidate {
    /// Identifier, `PREFIX-NNN`.
    pub id: Option<String>,
    /// Human-readable name.
    pub name: Option<String>,
    /// Category key.
    pub category: Option<String>,
    /// One-line purpose statement.
    pub description: Option<String>,
    /// Tags.
    pub tags: Option<Vec<String>>,
    /// Complexity wire value.
    pub complexity: Option<String>,
    /// Prompt text, read from the `prompt` key.
    pub body: Option<String>,
    /// Attribution.
    pub source: Option<String>,
    /// Usage guidance.
    pub when_to_use: Option<String>,
    /// Expected answer description.
    pub expected_output: Option<String>,
    /// Alternate phrasings.
    pub variants: Option<Vec<VariantCandidate>>,
    /// Original creation date, preserved on ingestion when present.
    pub created: Option<NaiveDate>,
    /// Fields present with the wrong type.
    pub mistyped: Vec<Mistyped>,
}

impl PromptCandidate {
    /// Parses a candidate from a JSON object.
    ///
    /// Each field is read on its own: `null` counts as absent and a value of
    /// the wrong type is recorded in [`PromptCandidate::mistyped`] without
    /// stopping the others.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when the text is not JSON
    /// or not an object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_str(text)?;
        Ok(Self::from_object(&object))
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let mut fields = Fields {
            object,
            prefix: String::new(),
            mistyped: Vec::new(),
        };

        let mut candidate = Self {
            id: fields.string("id"),
            name: fields.string("name"),
            category: fields.string("category"),
            description: fields.string("description"),
            tags: fields.strings("tags"),
            complexity: fields.string("complexity"),
            body: fields.string("prompt"),
            source: fields.string("source"),
            when_to_use: fields.string("when_to_use"),
            expected_output: fields.string("expected_output"),
            variants: None,
            created: fields.date("created"),
            mistyped: Vec::new(),
        };
        candidate.variants = fields.variants();
        candidate.mistyped = fields.mistyped;
        candidate
    }

    /// Returns `true` when `field` was present with the wrong type.
    #[must_use]
    pub fn is_mistyped(&self, field: &str) -> bool {
        self.mistyped.iter().any(|m| m.field == field)
    }

    /// Sets the identifier and returns the updated candidate.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the category and returns the updated candidate.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Field reader over one JSON object that records type mismatches.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    prefix: String,
    mistyped: Vec<Mistyped>,
}

impl<'a> Fields<'a> {
    fn present(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|value| !value.is_null())
    }

    fn reject(&mut self, key: &str, expected: &'static str) {
        self.mistyped.push(Mistyped {
            field: format!("{}{key}", self.prefix),
            expected,
        });
    }

    fn string(&mut self, key: &str) -> Option<String> {
        match self.present(key)? {
            Value::String(text) => Some(text.clone()),
            _ => {
                self.reject(key, "a string");
                None
            }
        }
    }

    fn strings(&mut self, key: &str) -> Option<Vec<String>> {
        let items = self
            .present(key)?
            .as_array()
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_owned))
                    .collect::<Option<Vec<_>>>()
            });
        if items.is_none() {
            self.reject(key, "an array of strings");
        }
        items
    }

    fn date(&mut self, key: &str) -> Option<NaiveDate> {
        let value = self.present(key)?;
        let date = parse_date(value.as_str());
        if date.is_none() {
            self.reject(key, "a YYYY-MM-DD date");
        }
        date
    }

    fn variants(&mut self) -> Option<Vec<VariantCandidate>> {
        let value = self.present("variants")?;
        let Some(items) = value.as_array() else {
            self.reject("variants", "an array of objects");
            return None;
        };

        let mut variants = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let Some(object) = item.as_object() else {
                self.reject(&format!("variants[{index}]"), "an object");
                continue;
            };
            let mut nested = Fields {
                object,
                prefix: format!("variants[{index}]."),
                mistyped: Vec::new(),
            };
            variants.push(VariantCandidate {
                name: nested.string("name"),
                description: nested.string("description"),
                body: nested.string("prompt"),
            });
            self.mistyped.append(&mut nested.mistyped);
        }
        Some(variants)
    }
}
