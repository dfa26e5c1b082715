use swc_core::ecma::ast::Ident;
use tracing::trace;

use crate::types::Metadata;
use crate::utils::ast::ident;

fn next_identifier_name(counter: usize) -> String {
  if counter == 1 {
    "_".to_string()
  } else {
    format!("_{}", counter)
  }
}

/// Hoist a rule string to module scope and return the referencing
/// identifier. Each unique rule string maps to exactly one identifier per
/// module; the enclosing visitor emits the `const` declarations on exit.
pub fn hoist_sheet(sheet: &str, meta: &Metadata) -> Ident {
  if let Some(existing) = meta.state().sheets.get(sheet) {
    return existing.clone();
  }

  let mut state = meta.state_mut();

  state.sheet_identifier_counter += 1;
  let name = next_identifier_name(state.sheet_identifier_counter);
  trace!(sheet, identifier = %name, "hoisting stylesheet");
  let id = ident(&name);

  state.sheets.insert(sheet.to_string(), id.clone());
  state.style_rules.insert(sheet.to_string());

  id
}
