//! Value formatting helpers: kebab-casing, unit auto-suffixing, and the
//! affixes that surround a dynamic interpolation.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// CSS preceding an interpolation, with any quote or `url(` prefix moved off
/// the static text and onto the runtime variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeforeInterpolation {
  pub css: String,
  pub variable_prefix: String,
}

/// CSS following an interpolation, with any unit or closing quote moved off
/// the static text and onto the runtime variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AfterInterpolation {
  pub css: String,
  pub variable_suffix: String,
}

static UNIT_REGEX: Lazy<Regex> = Lazy::new(|| {
  const UNITS: &[&str] = &[
    "em", "ex", "cap", "ch", "ic", "rem", "lh", "rlh", "vw", "vh", "vi", "vb", "vmin", "vmax",
    "cm", "mm", "Q", "in", "pc", "pt", "px", "deg", "grad", "rad", "turn", "s", "ms", "Hz", "kHz",
    "dpi", "dpcm", "dppx", "x", "fr", "%",
  ];

  let pattern = format!(
    "^(({}|\"|'))(;|,|\\n| |\\\\)?",
    UNITS
      .iter()
      .map(|unit| regex::escape(unit))
      .collect::<Vec<_>>()
      .join("|")
  );

  Regex::new(&pattern).expect("valid css unit regex")
});

/// Properties whose numeric values stay unitless. Keyed by kebab-case name;
/// every other property gets a `px` suffix for bare numbers.
static UNITLESS_PROPERTIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
  HashSet::from([
    "animation-iteration-count",
    "border-image-outset",
    "border-image-slice",
    "border-image-width",
    "box-flex",
    "box-flex-group",
    "box-ordinal-group",
    "column-count",
    "columns",
    "flex",
    "flex-grow",
    "flex-positive",
    "flex-shrink",
    "flex-negative",
    "flex-order",
    "font-size-adjust",
    "font-weight",
    "grid-area",
    "grid-row",
    "grid-row-end",
    "grid-row-span",
    "grid-row-start",
    "grid-column",
    "grid-column-end",
    "grid-column-span",
    "grid-column-start",
    "line-clamp",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "tab-size",
    "-webkit-line-clamp",
    "widows",
    "z-index",
    "zoom",
    "fill-opacity",
    "flood-opacity",
    "stop-opacity",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
  ])
});

/// Converts camelCase property names into kebab-case. Custom properties
/// (`--name`) and already-kebab names pass through unchanged.
pub fn kebab_case(input: &str) -> String {
  if input.starts_with("--") {
    return input.to_string();
  }

  let mut result = String::with_capacity(input.len());
  for ch in input.chars() {
    if ch.is_ascii_uppercase() {
      result.push('-');
      result.push(ch.to_ascii_lowercase());
    } else {
      result.push(ch);
    }
  }
  result
}

/// Render a number the way JavaScript would (`0.5` → `.5`, `12.0` → `12`).
pub fn format_number(num: f64) -> String {
  format_css_number(num)
}

fn format_css_number(mut num: f64) -> String {
  if num == -0.0 {
    num = 0.0;
  }
  let mut text = num.to_string();
  if text.ends_with(".0") {
    text.truncate(text.len() - 2);
  }
  if text.starts_with("0.") {
    text.remove(0);
  } else if text.starts_with("-0.") {
    text.remove(1);
  }
  text
}

/// Render a numeric declaration value, appending `px` unless the value is
/// zero or the property is conventionally unitless. The property may be
/// camelCase or kebab-case. Applied uniformly to object values and inlined
/// template interpolations.
pub fn add_unit_if_needed(property: &str, num: f64) -> String {
  let canonical = kebab_case(property);
  if num == 0.0 || UNITLESS_PROPERTIES.contains(canonical.as_str()) {
    format_css_number(num)
  } else {
    format!("{}px", format_css_number(num))
  }
}

/// True when the static text that follows an interpolation already supplies
/// a unit (or quote), meaning an inlined number must not be suffixed again.
pub fn starts_with_unit(after: &str) -> bool {
  UNIT_REGEX.is_match(after)
}

fn css_before_interpolation(input: &str) -> BeforeInterpolation {
  let mut css = input.to_string();
  let mut variable_prefix = String::new();

  if let Some(last) = css.chars().last() {
    if matches!(last, '"' | '\'' | '-') {
      css.pop();
      variable_prefix.push(last);
    }
  }

  BeforeInterpolation {
    css,
    variable_prefix,
  }
}

fn css_after_interpolation(input: &str) -> AfterInterpolation {
  if let Some(captures) = UNIT_REGEX.captures(input) {
    if let Some(unit) = captures.get(1) {
      let mut css = input.to_string();
      css.replace_range(unit.range(), "");
      return AfterInterpolation {
        css,
        variable_suffix: unit.as_str().to_string(),
      };
    }
  }

  AfterInterpolation {
    css: input.to_string(),
    variable_suffix: String::new(),
  }
}

/// Extract the prefix and suffix around a dynamic interpolation so the
/// emitted `var()` reference stays valid CSS, with the affix re-applied to
/// the runtime value instead.
pub fn css_affix_interpolation(
  before: &str,
  after: &str,
) -> (BeforeInterpolation, AfterInterpolation) {
  if before.ends_with("url(") && after.starts_with(')') {
    let mut css_before = before.to_string();
    css_before.truncate(css_before.len() - "url(".len());

    let mut css_after = after.to_string();
    css_after.remove(0);

    return (
      BeforeInterpolation {
        css: css_before,
        variable_prefix: "url(".into(),
      },
      AfterInterpolation {
        css: css_after,
        variable_suffix: ")".into(),
      },
    );
  }

  (
    css_before_interpolation(before),
    css_after_interpolation(after),
  )
}
