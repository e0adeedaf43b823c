//! Declaration parser seam
//!
//! Parsers are polymorphic over declaration formats. Each implementation
//! decides via `supports` whether it can handle a resource; the delegating
//! parser tries its registered parsers in order and the first one claiming
//! support wins, so registration order is significant (the structured JSON
//! format is registered before the legacy INI format).

use crate::declaration::BundleDeclaration;
use crate::errors::BundleError;

/// Turns a module resource identifier into bundle declarations
///
/// The meaning of the resource depends on the format: the structured parser
/// takes a file path, the legacy parser takes a module directory name.
pub trait DeclarationParser {
    /// Whether this parser can handle the given resource
    fn supports(&self, resource: &str, hint: Option<&str>) -> bool;

    /// Parses the resource into zero or more declarations
    fn parse(&self, resource: &str, hint: Option<&str>) -> Result<Vec<BundleDeclaration>, BundleError>;
}

/// Delegates to the first registered parser that supports a resource
#[derive(Default)]
pub struct DelegatingParser {
    parsers: Vec<Box<dyn DeclarationParser>>,
}

impl DelegatingParser {
    pub fn new() -> Self {
        DelegatingParser { parsers: Vec::new() }
    }

    /// Appends a parser; earlier registrations take precedence
    pub fn register(&mut self, parser: Box<dyn DeclarationParser>) {
        self.parsers.push(parser);
    }
}

impl DeclarationParser for DelegatingParser {
    fn supports(&self, resource: &str, hint: Option<&str>) -> bool {
        self.parsers.iter().any(|parser| parser.supports(resource, hint))
    }

    fn parse(&self, resource: &str, hint: Option<&str>) -> Result<Vec<BundleDeclaration>, BundleError> {
        for parser in &self.parsers {
            if parser.supports(resource, hint) {
                return parser.parse(resource, hint);
            }
        }

        Err(BundleError::UnsupportedResource(resource.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedParser {
        kind: &'static str,
        emits: &'static str,
    }

    impl DeclarationParser for FixedParser {
        fn supports(&self, _resource: &str, hint: Option<&str>) -> bool {
            hint == Some(self.kind)
        }

        fn parse(&self, _resource: &str, _hint: Option<&str>) -> Result<Vec<BundleDeclaration>, BundleError> {
            Ok(vec![BundleDeclaration::new(self.emits)])
        }
    }

    #[test]
    fn test_first_supporting_parser_wins() {
        let mut parser = DelegatingParser::new();
        parser.register(Box::new(FixedParser { kind: "json", emits: "structured" }));
        parser.register(Box::new(FixedParser { kind: "json", emits: "shadowed" }));
        parser.register(Box::new(FixedParser { kind: "ini", emits: "legacy" }));

        let result = parser.parse("anything", Some("json"));
        assert!(result.is_ok_and(|d| d.len() == 1 && d[0].name.as_ref() == "structured"));

        let result = parser.parse("anything", Some("ini"));
        assert!(result.is_ok_and(|d| d.len() == 1 && d[0].name.as_ref() == "legacy"));
    }

    #[test]
    fn test_unsupported_resource_errors() {
        let parser = DelegatingParser::new();
        let result = parser.parse("module", None);
        assert!(result.is_err());
        let Err(err) = result else {
            return;
        };
        assert_eq!(err.to_string(), "No parser supports the resource \"module\"");
    }

    #[test]
    fn test_supports_probes_all_parsers() {
        let mut parser = DelegatingParser::new();
        parser.register(Box::new(FixedParser { kind: "ini", emits: "legacy" }));

        assert!(parser.supports("module", Some("ini")));
        assert!(!parser.supports("module", Some("json")));
    }
}
