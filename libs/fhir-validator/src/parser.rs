//! Resource parser capability used by the validator.

use fhirgate_format::{JsonResourceParser, ParsedResource};

use crate::error::ParseError;

/// Accepts or rejects resource text.
///
/// Implementations must be safe to call from several validations at once.
pub trait ResourceParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ParsedResource, ParseError>;
}

impl ResourceParser for JsonResourceParser {
    fn parse(&self, text: &str) -> Result<ParsedResource, ParseError> {
        JsonResourceParser::parse(self, text).map_err(ParseError::from)
    }
}

/// Adapts a closure into a [`ResourceParser`].
pub struct ParserFn<F>(pub F);

impl<F> ResourceParser for ParserFn<F>
where
    F: Fn(&str) -> Result<ParsedResource, ParseError> + Send + Sync,
{
    fn parse(&self, text: &str) -> Result<ParsedResource, ParseError> {
        (self.0)(text)
    }
}

impl<P: ResourceParser + ?Sized> ResourceParser for std::sync::Arc<P> {
    fn parse(&self, text: &str) -> Result<ParsedResource, ParseError> {
        (**self).parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_parser_reports_diagnostic() {
        let parser = JsonResourceParser::new();
        let err = ResourceParser::parse(&parser, r#"{"resourceType":"Nope"}"#).unwrap_err();
        assert_eq!(err.diagnostic(), "unknown resource type 'Nope'");
    }

    #[test]
    fn closures_are_parsers() {
        let parser = ParserFn(|text: &str| -> Result<ParsedResource, ParseError> {
            Err(ParseError::new(format!("rejected {} bytes", text.len())))
        });
        let err = parser.parse("abc").unwrap_err();
        assert_eq!(err.diagnostic(), "rejected 3 bytes");
    }
}
