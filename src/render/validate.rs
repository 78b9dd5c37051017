//! Validation of outline records against the output contract.
//!
//! Every check runs; the result is the full list of problems found, empty
//! when the record is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::model::DocumentOutline;

/// Highest page number accepted by default.
pub const DEFAULT_MAX_PAGE: u64 = 50;

const VALID_LEVELS: &[&str] = &["H1", "H2", "H3", "H4", "H5", "H6", "title"];

/// Validation outcome for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// The validated file
    pub path: PathBuf,
    /// Problems found (empty when valid)
    pub problems: Vec<String>,
}

impl ValidationReport {
    /// Check if no problems were found.
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Checks outline records for required fields, types and ranges.
#[derive(Debug, Clone)]
pub struct OutlineValidator {
    max_page: u64,
    allow_empty_outline: bool,
}

impl OutlineValidator {
    /// Create a validator with the default page ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the highest accepted page number.
    pub fn with_max_page(mut self, max_page: u64) -> Self {
        self.max_page = max_page;
        self
    }

    /// Whether an outline with no headings passes.
    pub fn allow_empty_outline(mut self, allow: bool) -> Self {
        self.allow_empty_outline = allow;
        self
    }

    /// Validate an outline record.
    pub fn validate_outline(&self, outline: &DocumentOutline) -> Vec<String> {
        match serde_json::to_value(outline) {
            Ok(value) => self.validate_value(&value),
            Err(e) => vec![format!("Cannot serialize outline: {}", e)],
        }
    }

    /// Validate a JSON document given as text.
    pub fn validate_str(&self, json: &str) -> Vec<String> {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => self.validate_value(&value),
            Err(e) => vec![format!("Invalid JSON format: {}", e)],
        }
    }

    /// Validate a parsed JSON value.
    pub fn validate_value(&self, value: &Value) -> Vec<String> {
        let Some(record) = value.as_object() else {
            return vec!["Output must be a JSON object".to_string()];
        };

        let mut problems = Vec::new();

        for field in ["title", "outline"] {
            if !record.contains_key(field) {
                problems.push(format!("Missing required field: {}", field));
            }
        }

        match record.get("title") {
            Some(Value::String(title)) if title.trim().is_empty() => {
                problems.push("Title cannot be empty".to_string())
            }
            Some(Value::String(_)) | None => {}
            Some(_) => problems.push("Title must be a string".to_string()),
        }

        match record.get("outline") {
            Some(Value::Array(entries)) => self.check_entries(entries, &mut problems),
            Some(_) => problems.push("Outline must be a list".to_string()),
            None => {}
        }

        if let Some(metadata) = record.get("metadata") {
            check_metadata(metadata, &mut problems);
        }

        problems
    }

    fn check_entries(&self, entries: &[Value], problems: &mut Vec<String>) {
        if entries.is_empty() && !self.allow_empty_outline {
            problems.push("Outline cannot be empty".to_string());
            return;
        }

        for (idx, entry) in entries.iter().enumerate() {
            let Some(entry) = entry.as_object() else {
                problems.push(format!("Entry {} must be an object", idx));
                continue;
            };

            for field in ["level", "text", "page"] {
                if !entry.contains_key(field) {
                    problems.push(format!("Entry {} missing required field: {}", idx, field));
                }
            }

            if let Some(level) = entry.get("level") {
                let known = level.as_str().map(|l| VALID_LEVELS.contains(&l)).unwrap_or(false);
                if !known {
                    problems.push(format!("Entry {} invalid level: {}", idx, level));
                }
            }

            match entry.get("text") {
                Some(Value::String(text)) if text.trim().is_empty() => {
                    problems.push(format!("Entry {} text cannot be empty", idx))
                }
                Some(Value::String(_)) | None => {}
                Some(_) => problems.push(format!("Entry {} text must be a string", idx)),
            }

            if let Some(page) = entry.get("page") {
                match page.as_u64() {
                    Some(p) if p >= 1 && p <= self.max_page => {}
                    Some(p) if p > self.max_page => problems.push(format!(
                        "Entry {} page {} exceeds the {}-page limit",
                        idx, p, self.max_page
                    )),
                    _ => problems.push(format!("Entry {} page must be a positive integer", idx)),
                }
            }
        }
    }

    /// Validate a `.json` output file.
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> Result<ValidationReport> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(Error::InvalidInput(format!(
                "file does not exist: {}",
                path.display()
            )));
        }
        if !has_json_extension(path) {
            return Err(Error::InvalidInput(format!(
                "file must be JSON: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        Ok(ValidationReport {
            path: path.to_path_buf(),
            problems: self.validate_str(&content),
        })
    }

    /// Validate every `.json` file in a directory, sorted by file name.
    pub fn validate_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<ValidationReport>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::InvalidInput(format!(
                "directory does not exist: {}",
                dir.display()
            )));
        }

        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_json_extension(p))
            .collect();
        files.sort();

        if files.is_empty() {
            log::warn!("No JSON files found in {}", dir.display());
        }

        files.iter().map(|p| self.validate_file(p)).collect()
    }
}

impl Default for OutlineValidator {
    fn default() -> Self {
        Self {
            max_page: DEFAULT_MAX_PAGE,
            allow_empty_outline: true,
        }
    }
}

/// Validate an outline record with default settings.
pub fn validate_outline(outline: &DocumentOutline) -> Vec<String> {
    OutlineValidator::default().validate_outline(outline)
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Optional metadata: known fields must have the right JSON type.
fn check_metadata(metadata: &Value, problems: &mut Vec<String>) {
    let Some(metadata) = metadata.as_object() else {
        problems.push("Metadata must be an object".to_string());
        return;
    };

    let expect = |map: &Map<String, Value>, field: &str, ok: fn(&Value) -> bool, kind: &str| {
        map.get(field)
            .filter(|v| !ok(v))
            .map(|_| format!("Metadata {} must be {}", field, kind))
    };

    problems.extend(
        [
            expect(metadata, "total_pages", Value::is_u64, "an integer"),
            expect(metadata, "processing_time", Value::is_number, "a number"),
            expect(metadata, "extraction_method", Value::is_string, "a string"),
            expect(metadata, "pdf_filename", Value::is_string, "a string"),
        ]
        .into_iter()
        .flatten(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};
    use serde_json::json;

    #[test]
    fn test_valid_record() {
        let outline = DocumentOutline::new(
            "Guide",
            vec![OutlineEntry::new(HeadingLevel::H1, "1. Introduction", 1)],
        );
        assert!(validate_outline(&outline).is_empty());
    }

    #[test]
    fn test_reports_every_problem() {
        let value = json!({
            "title": "",
            "outline": [
                {"level": "H7", "text": " ", "page": 0},
                {"text": 3, "page": 51},
                "not an object"
            ]
        });
        let problems = OutlineValidator::new().validate_value(&value);

        assert!(problems.contains(&"Title cannot be empty".to_string()));
        assert!(problems.contains(&"Entry 0 invalid level: \"H7\"".to_string()));
        assert!(problems.contains(&"Entry 0 text cannot be empty".to_string()));
        assert!(problems.contains(&"Entry 0 page must be a positive integer".to_string()));
        assert!(problems.contains(&"Entry 1 missing required field: level".to_string()));
        assert!(problems.contains(&"Entry 1 text must be a string".to_string()));
        assert!(problems.contains(&"Entry 1 page 51 exceeds the 50-page limit".to_string()));
        assert!(problems.contains(&"Entry 2 must be an object".to_string()));
        assert_eq!(problems.len(), 8);
    }

    #[test]
    fn test_missing_fields_and_types() {
        let validator = OutlineValidator::new();
        assert_eq!(
            validator.validate_value(&json!({})),
            vec![
                "Missing required field: title".to_string(),
                "Missing required field: outline".to_string()
            ]
        );
        assert_eq!(
            validator.validate_value(&json!({"title": 1, "outline": {}})),
            vec![
                "Title must be a string".to_string(),
                "Outline must be a list".to_string()
            ]
        );
        assert_eq!(validator.validate_value(&json!([])).len(), 1);
    }

    #[test]
    fn test_title_level_allowed() {
        let value = json!({"title": "T", "outline": [{"level": "title", "text": "T", "page": 1}]});
        assert!(OutlineValidator::new().validate_value(&value).is_empty());
    }

    #[test]
    fn test_empty_outline_policy() {
        let value = json!({"title": "T", "outline": []});
        assert!(OutlineValidator::new().validate_value(&value).is_empty());
        assert_eq!(
            OutlineValidator::new()
                .allow_empty_outline(false)
                .validate_value(&value),
            vec!["Outline cannot be empty".to_string()]
        );
    }

    #[test]
    fn test_page_ceiling_configurable() {
        let value = json!({"title": "T", "outline": [{"level": "H1", "text": "x", "page": 120}]});
        assert_eq!(OutlineValidator::new().validate_value(&value).len(), 1);
        assert!(OutlineValidator::new()
            .with_max_page(500)
            .validate_value(&value)
            .is_empty());
    }

    #[test]
    fn test_metadata_types() {
        let value = json!({
            "title": "T",
            "outline": [],
            "metadata": {"total_pages": "ten", "processing_time": 1.5, "pdf_filename": 7}
        });
        let problems = OutlineValidator::new().validate_value(&value);
        assert_eq!(
            problems,
            vec![
                "Metadata total_pages must be an integer".to_string(),
                "Metadata pdf_filename must be a string".to_string()
            ]
        );
    }

    #[test]
    fn test_invalid_json_text() {
        let problems = OutlineValidator::new().validate_str("{ not json");
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("Invalid JSON format"));
    }

    #[test]
    fn test_validate_files_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"title":"B","outline":[{"level":"H2","text":"Scope","page":2}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("a.json"), r#"{"title":"","outline":[]}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let validator = OutlineValidator::new();
        let reports = validator.validate_dir(dir.path()).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].path.ends_with("a.json"));
        assert!(!reports[0].is_valid());
        assert!(reports[1].is_valid());

        let err = validator.validate_file(dir.path().join("notes.txt"));
        assert!(matches!(err, Err(Error::InvalidInput(_))));
        let err = validator.validate_file(dir.path().join("missing.json"));
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }
}
