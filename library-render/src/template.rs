//! `{{name}}` substitution for document skeletons.

use std::collections::HashMap;

/// Document skeleton with `{{name}}` slots.
///
/// Filling is a single left-to-right pass: inserted values are copied
/// verbatim and never rescanned, so prompt bodies that themselves contain
/// `{{...}}` come through unchanged.
///
/// # Examples
///
/// ```
/// use library_render::template::Template;
///
/// let title = Template::new("# {{id}}: {{name}}")
///     .with("id", "DEV-001")
///     .with("name", "Review {{code}}");
///
/// assert_eq!(title.render(), "# DEV-001: Review {{code}}");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Template {
    text: String,
    defaults: HashMap<String, String>,
}

impl Template {
    /// Creates a template from its text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            defaults: HashMap::new(),
        }
    }

    /// Binds a default value used when [`Template::fill`] gets none.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Fills the slots from the bound defaults only.
    #[must_use]
    pub fn render(&self) -> String {
        self.fill(&HashMap::new())
    }

    /// Fills every slot, preferring `values` over bound defaults. Unknown
    /// names become empty; an unterminated `{{` is kept literally.
    #[must_use]
    pub fn fill(&self, values: &HashMap<String, String>) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some((before, name, after)) = next_slot(rest) {
            out.push_str(before);
            if let Some(value) = values.get(name).or_else(|| self.defaults.get(name)) {
                out.push_str(value);
            }
            rest = after;
        }
        out.push_str(rest);
        out
    }
}

/// Splits `text` around its first complete `{{name}}` slot.
fn next_slot(text: &str) -> Option<(&str, &str, &str)> {
    let start = text.find("{{")?;
    let inner = &text[start + 2..];
    let end = inner.find("}}")?;
    Some((&text[..start], inner[..end].trim(), &inner[end + 2..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_override_defaults() {
        let template = Template::new("Hello {{ name }}!").with("name", "World");
        assert_eq!(template.render(), "Hello World!");

        let values = HashMap::from([("name".to_owned(), "Alice".to_owned())]);
        assert_eq!(template.fill(&values), "Hello Alice!");
    }

    #[test]
    fn inserted_values_are_not_rescanned() {
        let template = Template::new("{{first}} / {{second}}")
            .with("first", "literal {{second}}")
            .with("second", "two");
        assert_eq!(template.render(), "literal {{second}} / two");
    }

    #[test]
    fn unknown_and_unterminated_slots() {
        let template = Template::new("a{{missing}}b {{open");
        assert_eq!(template.render(), "ab {{open");
    }
}
