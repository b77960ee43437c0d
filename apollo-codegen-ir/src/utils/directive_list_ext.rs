use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::ast::Value;
use apollo_compiler::schema;

/// The reason `@deprecated` reports when it is applied without one.
pub(crate) const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

pub(crate) trait DirectiveListExt {
    /// The reason given to `@deprecated`, or `None` when the element is not deprecated.
    fn deprecation_reason(&self) -> Option<String>;
}

fn reason(argument: Option<&Node<Value>>) -> String {
    argument
        .and_then(|value| value.as_str())
        .unwrap_or(DEFAULT_DEPRECATION_REASON)
        .to_owned()
}

impl DirectiveListExt for ast::DirectiveList {
    fn deprecation_reason(&self) -> Option<String> {
        self.get("deprecated")
            .map(|directive| reason(directive.specified_argument_by_name("reason")))
    }
}

impl DirectiveListExt for schema::DirectiveList {
    fn deprecation_reason(&self) -> Option<String> {
        self.get("deprecated")
            .map(|directive| reason(directive.specified_argument_by_name("reason")))
    }
}
