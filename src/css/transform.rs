//! Atomic rule generation: turns a raw style block into content-addressed
//! class names plus the rule strings that define them.

use indexmap::IndexMap;

use crate::css::parser::{parse_rules, ParsedRule};
use crate::hash::{hash, hash_prefix};

/// Result of atomicizing one style block. `class_names` and `sheets` are in
/// source order; identical rules collapse to a single entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformCssResult {
  pub sheets: Vec<String>,
  pub class_names: Vec<String>,
}

const CLASS_HASH_LEN: usize = 4;

/// Atomicize a raw CSS block. Every declaration becomes its own rule with a
/// class name derived from hashing `(at-rules, selector suffix, property)`
/// as the group and the value separately, so the runtime class merger can
/// detect same-property conflicts from the class name alone.
///
/// An empty block still produces its (stable) class name and no sheets.
pub fn transform_css(css: &str) -> TransformCssResult {
  let rules = parse_rules(css);

  if rules.is_empty() {
    return TransformCssResult {
      sheets: Vec::new(),
      class_names: vec![class_name("", "", CLASS_HASH_LEN)],
    };
  }

  // Hash-prefix collisions between distinct rules are resolved by extending
  // the encoding for the whole block, keeping names deterministic per input.
  let mut hash_len = CLASS_HASH_LEN;
  let entries = loop {
    match try_assign_classes(&rules, hash_len) {
      Some(entries) => break entries,
      None => hash_len += 1,
    }
  };

  let mut sheets = Vec::new();
  let mut class_names = Vec::new();

  for (class, sheet) in entries {
    class_names.push(class);
    sheets.push(sheet);
  }

  TransformCssResult {
    sheets,
    class_names,
  }
}

fn group_key(rule: &ParsedRule) -> (String, String) {
  match rule {
    ParsedRule::Declaration {
      at_rules,
      selectors,
      property,
      value,
    } => (
      format!("{}{}{}", at_rules.join(""), selectors, property),
      value.clone(),
    ),
    ParsedRule::Raw {
      at_rules,
      selectors,
      text,
    } => (
      format!("{}{}{}", at_rules.join(""), selectors, text),
      text.clone(),
    ),
  }
}

fn class_name(group: &str, value: &str, hash_len: usize) -> String {
  format!(
    "_{}{}",
    hash_prefix(group, hash_len),
    hash_prefix(value, hash_len)
  )
}

/// Assign class names at the given encoding length. Returns `None` when two
/// distinct rules would share a name, signalling the caller to extend.
fn try_assign_classes(rules: &[ParsedRule], hash_len: usize) -> Option<Vec<(String, String)>> {
  let mut seen: IndexMap<String, (String, String)> = IndexMap::new();
  let mut entries: IndexMap<String, String> = IndexMap::new();

  for rule in rules {
    let (group, value) = group_key(rule);
    let class = class_name(&group, &value, hash_len);

    if let Some(existing) = seen.get(&class) {
      if existing != &(hash(&group), hash(&value)) {
        return None;
      }
    } else {
      seen.insert(class.clone(), (hash(&group), hash(&value)));
    }

    let sheet = rule_sheet(&class, rule);
    entries.entry(class).or_insert(sheet);
  }

  Some(entries.into_iter().collect())
}

fn rule_sheet(class: &str, rule: &ParsedRule) -> String {
  let (at_rules, selectors, body) = match rule {
    ParsedRule::Declaration {
      at_rules,
      selectors,
      property,
      value,
    } => (at_rules, selectors, format!("{property}:{value}")),
    ParsedRule::Raw {
      at_rules,
      selectors,
      text,
    } => (at_rules, selectors, text.clone()),
  };

  let mut sheet = format!(".{class}{selectors}{{{body}}}");
  for at_rule in at_rules.iter().rev() {
    sheet = format!("{at_rule}{{{sheet}}}");
  }
  sheet
}
