//! Permission codenames and per-object permission templates.
//!
//! Codenames have the shape `"{model}.{action}"` (e.g. `"post.change"`).
//! A [`PermissionTemplate`] is a codename with a `{model}` placeholder that is
//! resolved against an entity's `model_name` when the entity is created.

use crate::error::CoreError;

/// Placeholder substituted with the entity's model name.
pub const MODEL_PLACEHOLDER: &str = "{model}";

/// Templates applied to every new permission-bearing entity when
/// `PERMISSION_TEMPLATES` is not configured.
pub const DEFAULT_PERMISSION_TEMPLATES: &[&str] = &[
    "{model}.view",
    "{model}.change",
    "{model}.delete",
    "{model}.approve",
];

/// Well-known permission actions.
pub mod actions {
    pub const VIEW: &str = "view";
    pub const ADD: &str = "add";
    pub const CHANGE: &str = "change";
    pub const DELETE: &str = "delete";
    pub const APPROVE: &str = "approve";
}

/// Build the codename for `action` on `model_name`.
pub fn codename(model_name: &str, action: &str) -> String {
    format!("{model_name}.{action}")
}

/// A permission codename template such as `"{model}.approve"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionTemplate(String);

impl PermissionTemplate {
    /// Parse a single template. Blank templates are rejected.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation(
                "Permission template must not be empty".into(),
            ));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(CoreError::Validation(format!(
                "Permission template '{trimmed}' must not contain whitespace"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Substitute the model name into the template.
    ///
    /// Templates without a placeholder resolve to themselves.
    pub fn resolve(&self, model_name: &str) -> String {
        self.0.replace(MODEL_PLACEHOLDER, model_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse a comma-separated template list (the `PERMISSION_TEMPLATES` format).
///
/// Empty segments are ignored so trailing commas are harmless.
pub fn parse_templates(csv: &str) -> Result<Vec<PermissionTemplate>, CoreError> {
    csv.split(',')
        .filter(|segment| !segment.trim().is_empty())
        .map(PermissionTemplate::parse)
        .collect()
}

/// The built-in template list.
pub fn default_templates() -> Vec<PermissionTemplate> {
    DEFAULT_PERMISSION_TEMPLATES
        .iter()
        .map(|raw| PermissionTemplate((*raw).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn resolve_substitutes_model_name() {
        let template = PermissionTemplate::parse("{model}.approve").unwrap();
        assert_eq!(template.resolve("comment"), "comment.approve");
    }

    #[test]
    fn resolve_without_placeholder_is_identity() {
        let template = PermissionTemplate::parse("site.moderate").unwrap();
        assert_eq!(template.resolve("post"), "site.moderate");
    }

    #[test]
    fn parse_rejects_blank_and_whitespace() {
        assert_matches!(PermissionTemplate::parse("  "), Err(CoreError::Validation(_)));
        assert_matches!(
            PermissionTemplate::parse("{model}. view"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn parse_templates_skips_empty_segments() {
        let templates = parse_templates("{model}.view, {model}.change,,").unwrap();
        let resolved: Vec<String> = templates.iter().map(|t| t.resolve("tag")).collect();
        assert_eq!(resolved, vec!["tag.view", "tag.change"]);
    }

    #[test]
    fn default_templates_cover_view_change_delete_approve() {
        let resolved: Vec<String> = default_templates()
            .iter()
            .map(|t| t.resolve("post"))
            .collect();
        assert_eq!(
            resolved,
            vec!["post.view", "post.change", "post.delete", "post.approve"]
        );
    }

    #[test]
    fn codename_joins_model_and_action() {
        assert_eq!(codename("star", actions::ADD), "star.add");
    }
}
