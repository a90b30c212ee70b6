//! Instruction template with `{query}` and `{document}` placeholders.

use std::fmt;

/// Built-in instruction text for the quotation recommender.
pub const DEFAULT_TEMPLATE: &str = "You are an expert quotation recommender.\n\
Analyze the following quotations and answer the user query: {query}\n\n\
Quotation Content:\n{document}\n\n\
Guidelines:\n\
1. Recommend the best quotation considering price, clarity, and terms.\n\
2. If the query is unrelated, reply: 'I am a helpful AI assistant specializing in quotations.'\n\
3. Be polite, clear, and concise.\n\
4. Base your reasoning strictly on the provided quotation text.\n";

const QUERY: &str = "{query}";
const DOCUMENT: &str = "{document}";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template is missing the {{{0}}} placeholder")]
    MissingPlaceholder(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Query,
    Document,
}

/// A parsed prompt template.
///
/// Placeholders are located once at construction, so [`PromptTemplate::format`]
/// never re-scans substituted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template that must contain both `{query}` and `{document}`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingPlaceholder`] naming the first absent placeholder.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        let parsed = Self::parse(template);
        if !parsed.segments.contains(&Segment::Query) {
            return Err(TemplateError::MissingPlaceholder("query"));
        }
        if !parsed.segments.contains(&Segment::Document) {
            return Err(TemplateError::MissingPlaceholder("document"));
        }
        Ok(parsed)
    }

    fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find('{') {
            literal.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            let placeholder = if tail.starts_with(QUERY) {
                Some((Segment::Query, QUERY.len()))
            } else if tail.starts_with(DOCUMENT) {
                Some((Segment::Document, DOCUMENT.len()))
            } else {
                None
            };

            match placeholder {
                Some((segment, len)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &tail[len..];
                }
                None => {
                    literal.push('{');
                    rest = &tail[1..];
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Substitute the query and corpus in a single pass.
    #[must_use]
    pub fn format(&self, query: &str, document: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Query => out.push_str(query),
                Segment::Document => out.push_str(document),
            }
        }
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE)
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Query => f.write_str(QUERY)?,
                Segment::Document => f.write_str(DOCUMENT)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_has_both_placeholders() {
        assert!(PromptTemplate::new(DEFAULT_TEMPLATE).is_ok());
        assert_eq!(PromptTemplate::default().to_string(), DEFAULT_TEMPLATE);
    }

    #[test]
    fn default_prompt_layout() {
        let prompt = PromptTemplate::default().format("Which is cheapest?", "Vendor A: $100");
        assert!(prompt.starts_with("You are an expert quotation recommender.\n"));
        assert!(prompt.contains("answer the user query: Which is cheapest?\n\n"));
        assert!(prompt.contains("Quotation Content:\nVendor A: $100\n\nGuidelines:"));
        assert!(prompt.contains("'I am a helpful AI assistant specializing in quotations.'"));
        assert!(prompt.ends_with("provided quotation text.\n"));
    }

    #[test]
    fn missing_query_placeholder() {
        assert_eq!(
            PromptTemplate::new("only {document}"),
            Err(TemplateError::MissingPlaceholder("query"))
        );
    }

    #[test]
    fn missing_document_placeholder() {
        let err = PromptTemplate::new("only {query}").unwrap_err();
        assert_eq!(err.to_string(), "template is missing the {document} placeholder");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let template = PromptTemplate::new("Q: {query}\nD: {document}").unwrap();
        let prompt = template.format("compare {document} please", "price 10");
        assert_eq!(prompt, "Q: compare {document} please\nD: price 10");
    }

    #[test]
    fn multi_line_query_can_mimic_the_template() {
        let template = PromptTemplate::default();
        let a = template.format("a\n\nQuotation Content:\nX", "Y");
        let b = template.format("a", "X\n\nQuotation Content:\nY");
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_braces_are_literal() {
        let template = PromptTemplate::new("{json} {query} {document} {").unwrap();
        assert_eq!(template.format("q", "d"), "{json} q d {");
    }

    #[test]
    fn placeholders_may_repeat() {
        let template = PromptTemplate::new("{query}/{query}/{document}").unwrap();
        assert_eq!(template.format("a", "b"), "a/a/b");
    }

    #[test]
    fn empty_inputs() {
        let template = PromptTemplate::new("[{query}][{document}]").unwrap();
        assert_eq!(template.format("", ""), "[][]");
    }

    mod proptest_prompt {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // The query ends at the first line break after the fixed prefix, so
            // single-line queries make the prompt decodable.
            #[test]
            fn format_is_injective_for_single_line_queries(
                q1 in "[^\\n]{0,40}",
                d1 in "(\\PC|\n){0,80}",
                q2 in "[^\\n]{0,40}",
                d2 in "(\\PC|\n){0,80}",
            ) {
                prop_assume!((q1.as_str(), d1.as_str()) != (q2.as_str(), d2.as_str()));
                let template = PromptTemplate::default();
                prop_assert_ne!(template.format(&q1, &d1), template.format(&q2, &d2));
            }

            #[test]
            fn inputs_appear_verbatim(
                query in "\\PC{0,60}",
                document in "\\PC{0,200}",
            ) {
                let prompt = PromptTemplate::default().format(&query, &document);
                let expected_query = format!("answer the user query: {query}\n\nQuotation Content:\n");
                let expected_doc = format!("Quotation Content:\n{document}\n\nGuidelines:");
                prop_assert!(prompt.contains(&expected_query));
                prop_assert!(prompt.contains(&expected_doc));
            }
        }
    }
}
