//! Identifier names and module specifiers shared across the pass.

/// Default module whose import enables the transform.
pub const COMPILED_IMPORT: &str = "@compiled/core";

/// Default module origins that trigger the transform.
pub const DEFAULT_IMPORT_SOURCES: &[&str] = &[COMPILED_IMPORT];

/// Runtime helpers appended to the enabling import. They are always added;
/// unused specifiers are tree-shaken downstream.
pub const RUNTIME_IMPORTS: &[&str] = &["ax", "CC", "CS"];

/// Identifier used to reference the props rest object in emitted components.
pub const PROPS_IDENTIFIER_NAME: &str = "__cmplp";

/// Identifier used to track the React ref passed through emitted components.
pub const REF_IDENTIFIER_NAME: &str = "__cmplr";

/// Identifier the incoming `style` prop is renamed to in emitted components.
pub const STYLE_IDENTIFIER_NAME: &str = "__cmpls";

/// Identifier the `as` prop is renamed to in emitted components.
pub const TAG_IDENTIFIER_NAME: &str = "C";
