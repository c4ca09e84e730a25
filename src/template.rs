use std::fs;
use std::path::Path;

use crate::ConfigError;

const BUILTIN_TEMPLATE: &str = include_str!("../templates/graph.dot");

/// DOT document skeleton with positional `%s` slots.
///
/// `%%` produces a literal `%`; any other `%` sequence is copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    literals: Vec<String>,
}

impl Template {
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_TEMPLATE)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::TemplateMissing(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut literals = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '%' {
                current.push(ch);
                continue;
            }
            match chars.peek() {
                Some('s') => {
                    chars.next();
                    literals.push(std::mem::take(&mut current));
                }
                Some('%') => {
                    chars.next();
                    current.push('%');
                }
                _ => current.push('%'),
            }
        }
        literals.push(current);

        Self { literals }
    }

    pub fn slot_count(&self) -> usize {
        self.literals.len() - 1
    }

    /// Ensures the template accepts exactly `expected` fields.
    pub fn check_slots(&self, expected: usize) -> Result<(), ConfigError> {
        let found = self.slot_count();
        if found != expected {
            return Err(ConfigError::SlotMismatch { expected, found });
        }
        Ok(())
    }

    pub fn fill<S: AsRef<str>>(&self, fields: &[S]) -> Result<String, ConfigError> {
        self.check_slots(fields.len())?;

        let capacity = self.literals.iter().map(String::len).sum::<usize>()
            + fields.iter().map(|field| field.as_ref().len()).sum::<usize>();
        let mut body = String::with_capacity(capacity);
        for (literal, field) in self.literals.iter().zip(fields) {
            body.push_str(literal);
            body.push_str(field.as_ref());
        }
        if let Some(last) = self.literals.last() {
            body.push_str(last);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TEMPLATE_FIELDS;

    #[test]
    fn fills_slots_in_order() {
        let template = Template::parse("a=%s; b=%s;");
        assert_eq!(template.slot_count(), 2);
        assert_eq!(template.fill(&["1", "2"]).unwrap(), "a=1; b=2;");
    }

    #[test]
    fn percent_escapes_are_not_slots() {
        let template = Template::parse("width=100%%, %d %s");
        assert_eq!(template.slot_count(), 1);
        assert_eq!(template.fill(&["x"]).unwrap(), "width=100%, %d x");
    }

    #[test]
    fn slot_mismatch_is_reported() {
        let template = Template::parse("%s %s");
        let err = template.fill(&["only"]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SlotMismatch {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn builtin_template_matches_field_list() {
        assert_eq!(Template::builtin().slot_count(), TEMPLATE_FIELDS.len());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.dot");

        let err = Template::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TemplateMissing(_)));

        fs::write(&path, "digraph { %s }").unwrap();
        assert_eq!(Template::load(&path).unwrap().slot_count(), 1);
    }
}
