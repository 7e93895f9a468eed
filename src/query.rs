//! The reference query that relevance is measured against.
//!
//! Relevance here means "looks like meaningful user activity". The query is
//! a run of concrete example actions rather than a description of
//! importance, since embedding models match examples far better than
//! meta-descriptions. Optional flow context narrows it to one product flow.
//!
//! ```rust
//! use rank_select::query::{ActivityQuery, FlowContext};
//!
//! let context = FlowContext::new("Checkout")
//!     .with_use_case("e-commerce")
//!     .with_description("Buys a pair of shoes. Then leaves a review.");
//! let text = ActivityQuery::new().with_context(&context).text();
//!
//! assert!(text.starts_with("User completed tasks."));
//! assert!(text.ends_with(
//!     "User actions in Checkout. Actions related to e-commerce. User Buys a pair of shoes."
//! ));
//! ```

use std::fmt;

/// Example actions describing meaningful activity.
pub const ACTIVITY_EXAMPLES: &str = "User completed tasks. User submitted forms. \
User made decisions. User entered data. User confirmed actions. User achieved goals. \
User created something. User configured settings. User uploaded files. \
User saved changes. User published content. User finalized work.";

/// Flow name that carries no information.
const PLACEHOLDER_NAME: &str = "Untitled Flow";

/// Use-case labels that carry no information.
const PLACEHOLDER_USE_CASES: [&str; 2] = ["unknown", "other"];

/// Metadata about the recorded flow. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct FlowContext {
    /// Flow title.
    pub name: String,
    /// Use-case label, e.g. `"onboarding"`.
    pub use_case: String,
    /// Free-text description.
    pub description: String,
}

impl FlowContext {
    /// Context with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the use-case label.
    #[must_use]
    pub fn with_use_case(mut self, use_case: impl Into<String>) -> Self {
        self.use_case = use_case.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn name_part(&self) -> Option<String> {
        (!self.name.is_empty() && self.name != PLACEHOLDER_NAME)
            .then(|| format!("User actions in {}.", self.name))
    }

    fn use_case_part(&self) -> Option<String> {
        (!self.use_case.is_empty() && !PLACEHOLDER_USE_CASES.contains(&self.use_case.as_str()))
            .then(|| format!("Actions related to {}.", self.use_case))
    }

    fn description_part(&self) -> Option<String> {
        if self.description.is_empty() {
            return None;
        }
        let first = self
            .description
            .split_once('.')
            .map_or(self.description.as_str(), |(head, _)| head);
        Some(format!("User {first}."))
    }
}

/// Builder for the query text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityQuery<'a> {
    context: Option<&'a FlowContext>,
}

impl<'a> ActivityQuery<'a> {
    /// The bare example-actions query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrow the query with flow context.
    #[must_use]
    pub fn with_context(mut self, context: &'a FlowContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Like [`ActivityQuery::with_context`], for an optional context.
    #[must_use]
    pub fn with_optional_context(mut self, context: Option<&'a FlowContext>) -> Self {
        self.context = context;
        self
    }

    /// Query fragments in order: examples, then name, use case, description.
    #[must_use]
    pub fn parts(&self) -> Vec<String> {
        let mut parts = vec![ACTIVITY_EXAMPLES.to_owned()];
        if let Some(ctx) = self.context {
            parts.extend(ctx.name_part());
            parts.extend(ctx.use_case_part());
            parts.extend(ctx.description_part());
        }
        parts
    }

    /// The full query, fragments joined by single spaces.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts().join(" ")
    }
}

impl fmt::Display for ActivityQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_query_is_the_examples() {
        assert_eq!(ActivityQuery::new().text(), ACTIVITY_EXAMPLES);
        assert!(ACTIVITY_EXAMPLES.starts_with("User completed tasks. User submitted forms."));
        assert!(ACTIVITY_EXAMPLES.ends_with("User published content. User finalized work."));
        assert!(!ACTIVITY_EXAMPLES.contains("  "));
    }

    #[test]
    fn full_context_appends_three_parts() {
        let ctx = FlowContext::new("Onboarding")
            .with_use_case("signup")
            .with_description("Creates an account. Verifies email.");
        let parts = ActivityQuery::new().with_context(&ctx).parts();
        assert_eq!(
            parts[1..],
            [
                "User actions in Onboarding.".to_owned(),
                "Actions related to signup.".to_owned(),
                "User Creates an account.".to_owned(),
            ]
        );
    }

    #[test]
    fn placeholders_are_skipped() {
        let ctx = FlowContext::new("Untitled Flow").with_use_case("unknown");
        assert_eq!(ActivityQuery::new().with_context(&ctx).text(), ACTIVITY_EXAMPLES);

        let ctx = FlowContext::default().with_use_case("other");
        assert_eq!(ActivityQuery::new().with_context(&ctx).text(), ACTIVITY_EXAMPLES);
    }

    #[test]
    fn description_without_period_is_used_whole() {
        let ctx = FlowContext::default().with_description("Exports a report");
        let text = ActivityQuery::new().with_context(&ctx).text();
        assert_eq!(text, format!("{ACTIVITY_EXAMPLES} User Exports a report."));
    }

    #[test]
    fn parts_joined_with_single_spaces() {
        let ctx = FlowContext::new("Billing");
        let text = ActivityQuery::new().with_context(&ctx).to_string();
        assert_eq!(text, format!("{ACTIVITY_EXAMPLES} User actions in Billing."));
    }

    #[test]
    fn optional_context_none_is_bare() {
        let text = ActivityQuery::new().with_optional_context(None).text();
        assert_eq!(text, ACTIVITY_EXAMPLES);
    }
}
