//! Response schemas handed to the outline provider
//!
//! The schemas use the OpenAPI subset understood by structured-output
//! generators (upper-case type names). The slides schema carries an
//! optional subtitle; the document schema does not.

use docugen_ast::OutputType;
use serde_json::{json, Value};

/// Closed JSON schema of the outline for an output type
pub fn response_schema(output_type: OutputType) -> Value {
    match output_type {
        OutputType::Slides => json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "subtitle": { "type": "STRING" },
                "items": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": { "type": "STRING" },
                            "points": { "type": "ARRAY", "items": { "type": "STRING" } }
                        },
                        "required": ["title", "points"]
                    }
                }
            },
            "required": ["title", "items"]
        }),
        OutputType::Document => json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "items": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "heading": { "type": "STRING" },
                            "paragraphs": { "type": "ARRAY", "items": { "type": "STRING" } }
                        },
                        "required": ["heading", "paragraphs"]
                    }
                }
            },
            "required": ["title", "items"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slides_schema() {
        let schema = response_schema(OutputType::Slides);
        assert_eq!(schema["required"], json!(["title", "items"]));
        assert!(schema["properties"]["subtitle"].is_object());
        assert_eq!(
            schema["properties"]["items"]["items"]["required"],
            json!(["title", "points"])
        );
    }

    #[test]
    fn test_document_schema() {
        let schema = response_schema(OutputType::Document);
        assert!(schema["properties"].get("subtitle").is_none());
        assert_eq!(
            schema["properties"]["items"]["items"]["required"],
            json!(["heading", "paragraphs"])
        );
    }
}
