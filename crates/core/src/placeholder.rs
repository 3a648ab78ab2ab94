//! Placeholder redirect rules.
//!
//! When a category is soft-deleted, rows that reference it are re-pointed at
//! a well-known placeholder category instead of being left dangling. Each
//! dependent table names its own placeholder so deleted post categories and
//! deleted product categories stay distinguishable.

/// Placeholder receiving posts whose category was deleted.
pub const DEFAULT_DELETED_POST_CATEGORY_NAME: &str = "__deleted_category";

/// Placeholder receiving products whose category was deleted.
pub const DEFAULT_DELETED_PRODUCT_CATEGORY_NAME: &str = "__deleted_product";

/// One dependent foreign key and the placeholder it is redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderRule {
    /// Table holding the foreign key.
    pub dependent_table: &'static str,
    /// Column referencing the deleted row.
    pub fk_column: &'static str,
    /// Name of the root-level placeholder category.
    pub placeholder_name: String,
}

impl PlaceholderRule {
    pub fn new(
        dependent_table: &'static str,
        fk_column: &'static str,
        placeholder_name: impl Into<String>,
    ) -> Self {
        Self {
            dependent_table,
            fk_column,
            placeholder_name: placeholder_name.into(),
        }
    }
}

/// Category redirect rules for posts and products.
pub fn category_rules(post_placeholder: &str, product_placeholder: &str) -> Vec<PlaceholderRule> {
    vec![
        PlaceholderRule::new("posts", "category_id", post_placeholder),
        PlaceholderRule::new("products", "category_id", product_placeholder),
    ]
}

/// [`category_rules`] with the built-in placeholder names.
pub fn default_category_rules() -> Vec<PlaceholderRule> {
    category_rules(
        DEFAULT_DELETED_POST_CATEGORY_NAME,
        DEFAULT_DELETED_PRODUCT_CATEGORY_NAME,
    )
}

/// Whether `name` belongs to one of the placeholder rows in `rules`.
pub fn is_placeholder_name(rules: &[PlaceholderRule], name: &str) -> bool {
    rules.iter().any(|rule| rule.placeholder_name == name)
}
