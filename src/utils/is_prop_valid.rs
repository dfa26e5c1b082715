use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::utils::is_prop_valid_data::ALLOWED_PROPS;

static ALLOWED_PROPS_SET: Lazy<HashSet<&'static str>> =
  Lazy::new(|| ALLOWED_PROPS.iter().copied().collect());

fn has_dash_prefix(prop: &str, prefix: &str) -> bool {
  prop.len() > prefix.len() + 1
    && prop[..prefix.len()].eq_ignore_ascii_case(prefix)
    && prop.as_bytes()[prefix.len()] == b'-'
}

fn is_prefixed_attribute(prop: &str) -> bool {
  has_dash_prefix(prop, "data") || has_dash_prefix(prop, "aria") || prop.starts_with("x-")
}

fn is_event_handler(prop: &str) -> bool {
  let bytes = prop.as_bytes();
  bytes.len() >= 3 && bytes[0] == b'o' && bytes[1] == b'n' && bytes[2].is_ascii_uppercase()
}

/// Whether a prop may be forwarded to a DOM element. Props used only to
/// drive dynamic styles fail this check and get destructured out of the
/// rest spread so they never leak onto the element.
pub fn is_prop_valid(prop: &str) -> bool {
  if prop.is_empty() {
    return false;
  }

  ALLOWED_PROPS_SET.contains(prop) || is_prefixed_attribute(prop) || is_event_handler(prop)
}

#[cfg(test)]
mod tests {
  use super::is_prop_valid;

  #[test]
  fn allows_known_dom_props() {
    assert!(is_prop_valid("className"));
    assert!(is_prop_valid("disabled"));
    assert!(is_prop_valid("href"));
  }

  #[test]
  fn allows_prefixed_attributes() {
    assert!(is_prop_valid("data-testid"));
    assert!(is_prop_valid("aria-label"));
    assert!(is_prop_valid("x-custom"));
  }

  #[test]
  fn allows_event_handlers() {
    assert!(is_prop_valid("onClick"));
    assert!(is_prop_valid("onMouseEnter"));
  }

  #[test]
  fn rejects_style_only_props() {
    assert!(!is_prop_valid("isPrimary"));
    assert!(!is_prop_valid("textSize"));
    assert!(!is_prop_valid("onlower"));
  }
}
