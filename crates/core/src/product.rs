//! Product kinds.
//!
//! Every product shares one row shape; the kind-specific attributes travel in
//! a JSON `extra` column discriminated by `kind`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "extra", rename_all = "snake_case")]
pub enum ProductDetails {
    PaperBook {
        pages: i32,
        publisher: String,
        #[serde(default)]
        isbn: Option<String>,
    },
    Ebook {
        file_format: String,
        file_size_bytes: i64,
    },
    AudioBook {
        duration_secs: i32,
        speaker: String,
    },
}

impl ProductDetails {
    /// Discriminator stored in the `kind` column.
    pub fn kind(&self) -> &'static str {
        match self {
            ProductDetails::PaperBook { .. } => "paper_book",
            ProductDetails::Ebook { .. } => "ebook",
            ProductDetails::AudioBook { .. } => "audio_book",
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            ProductDetails::PaperBook {
                pages, publisher, ..
            } => {
                if *pages <= 0 {
                    return Err(CoreError::Validation("pages must be positive".into()));
                }
                if publisher.trim().is_empty() {
                    return Err(CoreError::Validation("publisher is required".into()));
                }
            }
            ProductDetails::Ebook {
                file_format,
                file_size_bytes,
            } => {
                if file_format.trim().is_empty() {
                    return Err(CoreError::Validation("file_format is required".into()));
                }
                if *file_size_bytes < 0 {
                    return Err(CoreError::Validation(
                        "file_size_bytes must not be negative".into(),
                    ));
                }
            }
            ProductDetails::AudioBook {
                duration_secs,
                speaker,
            } => {
                if *duration_secs <= 0 {
                    return Err(CoreError::Validation(
                        "duration_secs must be positive".into(),
                    ));
                }
                if speaker.trim().is_empty() {
                    return Err(CoreError::Validation("speaker is required".into()));
                }
            }
        }
        Ok(())
    }

    /// The kind-specific payload, without the discriminator.
    pub fn to_extra(&self) -> Result<serde_json::Value, CoreError> {
        let mut tagged = serde_json::to_value(self)
            .map_err(|e| CoreError::Internal(format!("product serialization failed: {e}")))?;
        Ok(tagged
            .get_mut("extra")
            .map(serde_json::Value::take)
            .unwrap_or(serde_json::Value::Null))
    }

    /// Rebuild the variant from its stored `(kind, extra)` columns.
    pub fn from_parts(kind: &str, extra: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(serde_json::json!({ "kind": kind, "extra": extra }))
            .map_err(|e| CoreError::Validation(format!("Invalid {kind} product details: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn stored_columns_rebuild_the_variant() {
        let book = ProductDetails::PaperBook {
            pages: 320,
            publisher: "Nashr".into(),
            isbn: Some("978-0".into()),
        };
        let extra = book.to_extra().unwrap();

        assert_eq!(book.kind(), "paper_book");
        assert_eq!(extra["pages"], 320);
        assert!(extra.get("kind").is_none());
        assert_eq!(ProductDetails::from_parts("paper_book", extra).unwrap(), book);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_matches!(
            ProductDetails::from_parts("vinyl", json!({})),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn payload_must_match_kind() {
        assert_matches!(
            ProductDetails::from_parts("ebook", json!({ "pages": 3 })),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn validate_checks_variant_fields() {
        let audio = ProductDetails::AudioBook {
            duration_secs: 0,
            speaker: "Reza".into(),
        };
        assert_matches!(audio.validate(), Err(CoreError::Validation(_)));

        let ebook = ProductDetails::Ebook {
            file_format: "epub".into(),
            file_size_bytes: 1024,
        };
        assert!(ebook.validate().is_ok());
    }

    #[test]
    fn request_body_deserializes_by_tag() {
        let parsed: ProductDetails = serde_json::from_value(json!({
            "kind": "audio_book",
            "extra": { "duration_secs": 3600, "speaker": "Mina" }
        }))
        .unwrap();
        assert_eq!(parsed.kind(), "audio_book");
    }
}
