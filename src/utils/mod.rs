pub mod ast;
pub mod build_compiled_component;
pub mod build_css_variables;
pub mod build_styled_component;
pub mod css_builders;
pub mod evaluate_expression;
pub mod hoist_sheet;
pub mod is_prop_valid;
pub mod is_prop_valid_data;
