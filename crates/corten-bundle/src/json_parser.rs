//! Structured bundle declarations
//!
//! One JSON file declares exactly one bundle with its full attribute set.
//! Modern plugins ship these files next to their package metadata and hand
//! the path to the parser.

use crate::declaration::BundleDeclaration;
use crate::errors::BundleError;
use crate::parser::DeclarationParser;
use std::path::Path;
use tracing::debug;

/// Parses the structured one-file-one-bundle declaration format
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl DeclarationParser for JsonParser {
    fn supports(&self, resource: &str, hint: Option<&str>) -> bool {
        hint == Some("json") || resource.ends_with(".json")
    }

    fn parse(&self, resource: &str, _hint: Option<&str>) -> Result<Vec<BundleDeclaration>, BundleError> {
        let path = Path::new(resource);

        let raw = std::fs::read_to_string(path).map_err(|err| {
            debug!(path = %path.display(), %err, "declaration file not readable");
            BundleError::MalformedDeclaration { path: path.to_path_buf() }
        })?;

        let declaration: BundleDeclaration = serde_json::from_str(&raw).map_err(|err| {
            debug!(path = %path.display(), %err, "declaration file not decodable");
            BundleError::MalformedDeclaration { path: path.to_path_buf() }
        })?;

        Ok(vec![declaration])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, name: &str, content: &str) -> Option<String> {
        let path = dir.path().join(name);
        let Ok(()) = std::fs::write(&path, content) else {
            return None;
        };
        Some(path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_supports_by_hint_and_extension() {
        let parser = JsonParser;
        assert!(parser.supports("foobar", Some("json")));
        assert!(parser.supports("bundles/news.json", None));
        assert!(!parser.supports("news", None));
        assert!(!parser.supports("news", Some("ini")));
    }

    #[test]
    fn test_parses_single_declaration() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let Some(path) = write_fixture(
            &dir,
            "bundle.json",
            r#"{"name": "acme/news-bundle", "load-after": ["corten/core-bundle"]}"#,
        ) else {
            return;
        };

        let result = JsonParser.parse(&path, None);
        assert!(result.is_ok(), "valid declaration should parse");
        assert!(result.is_ok_and(|declarations| {
            declarations.len() == 1
                && declarations[0].name.as_ref() == "acme/news-bundle"
                && declarations[0].load_after.iter().map(AsRef::as_ref).eq(["corten/core-bundle"])
        }));
    }

    #[test]
    fn test_broken_file_cannot_be_decoded() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let Some(path) = write_fixture(&dir, "broken.json", "{\"name\": ") else {
            return;
        };

        let result = JsonParser.parse(&path, None);
        assert!(result.is_err(), "broken declaration should fail");
        let Err(err) = result else {
            return;
        };
        assert_eq!(err.to_string(), format!("File \"{path}\" cannot be decoded"));
    }

    #[test]
    fn test_missing_file_cannot_be_decoded() {
        let result = JsonParser.parse("/nonexistent/bundle.json", None);
        assert!(result.is_err());
        let Err(err) = result else {
            return;
        };
        assert!(err.to_string().contains("cannot be decoded"));
    }
}
