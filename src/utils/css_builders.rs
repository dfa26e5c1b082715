//! The style evaluator: partially evaluates a style expression into raw CSS
//! text plus the dynamic CSS-variable bindings it references. Anything the
//! evaluator cannot fold statically becomes a `var(--…)` reference bound at
//! runtime through the element's inline style.

use swc_core::common::Spanned;
use swc_core::ecma::ast::{
  ArrayLit, Expr, KeyValueProp, Lit, ObjectLit, Prop, PropName, PropOrSpread, Tpl,
};

use crate::css::units::{
  add_unit_if_needed, css_affix_interpolation, format_number, kebab_case, starts_with_unit,
};
use crate::hash::hash;
use crate::types::{CssOutput, Metadata, Variable};
use crate::utils::ast::{print_expression, raise_code_frame_error, strip_props_function};
use crate::utils::evaluate_expression::evaluate_expression;

/// Evaluate a style expression into a normalised `CssOutput`.
pub fn build_css(node: &Expr, meta: &Metadata) -> CssOutput {
  match node {
    Expr::Lit(Lit::Str(str_lit)) => CssOutput {
      css: str_lit.value.as_ref().to_string(),
      variables: Vec::new(),
    },
    Expr::Tpl(template) => extract_template_literal(template, meta),
    Expr::Object(object) => extract_object_expression(object, meta),
    Expr::Array(array) => extract_array(array, meta),
    Expr::Paren(paren) => build_css(&paren.expr, meta),
    Expr::Arrow(_) | Expr::Fn(_) => {
      // A whole-style arrow (`props => ({ … })`): evaluate the body with
      // parameter accesses rewritten to the canonical props identifier.
      build_css(&strip_props_function(node), meta)
    }
    Expr::Ident(_) => {
      let resolved = evaluate_expression(node, meta);
      if matches!(resolved, Expr::Ident(_)) {
        raise_code_frame_error(
          "Unable to statically evaluate the styles referenced by this identifier",
          Some(node.span()),
          meta,
        );
      }
      build_css(&resolved, meta)
    }
    _ => raise_code_frame_error(
      &format!(
        "{} isn't a supported CSS type - try using an object, string, or template literal",
        expression_kind(node)
      ),
      Some(node.span()),
      meta,
    ),
  }
}

fn expression_kind(expr: &Expr) -> &'static str {
  match expr {
    Expr::Call(_) => "CallExpression",
    Expr::Cond(_) => "ConditionalExpression",
    Expr::Bin(_) => "BinaryExpression",
    Expr::TaggedTpl(_) => "TaggedTemplateExpression",
    Expr::Member(_) => "MemberExpression",
    Expr::JSXElement(_) => "JSXElement",
    _ => "This expression",
  }
}

/// The property a declaration in progress belongs to, read backwards from
/// the CSS text accumulated so far. Used to decide unit suffixing for
/// inlined numeric interpolations.
fn current_property(css_so_far: &str) -> Option<String> {
  let segment_start = css_so_far
    .rfind(|ch| matches!(ch, ';' | '{' | '}'))
    .map(|index| index + 1)
    .unwrap_or(0);
  let segment = &css_so_far[segment_start..];
  let colon = segment.find(':')?;
  let property = segment[..colon].trim();

  if property.is_empty() {
    return None;
  }

  Some(property.to_string())
}

fn variable_name(expression: &Expr) -> String {
  format!("--_{}", hash(&print_expression(expression)))
}

fn extract_template_literal(template: &Tpl, meta: &Metadata) -> CssOutput {
  let mut output = CssOutput::new();
  // Overrides the next quasi when an affix was lifted onto a variable.
  let mut override_raw: Option<String> = None;

  for index in 0..template.quasis.len() {
    let raw = override_raw
      .take()
      .unwrap_or_else(|| template.quasis[index].raw.as_ref().to_string());

    let Some(expression) = template.exprs.get(index) else {
      output.css.push_str(&raw);
      continue;
    };

    let evaluated = match expression.as_ref() {
      Expr::Arrow(_) | Expr::Fn(_) => expression.as_ref().clone(),
      other => evaluate_expression(other, meta),
    };

    // Arrows over props reduce to their body; a constant-returning arrow
    // then inlines like any other static value.
    let evaluated = match &evaluated {
      Expr::Arrow(_) | Expr::Fn(_) => strip_props_function(&evaluated),
      _ => evaluated,
    };

    match &evaluated {
      Expr::Lit(Lit::Str(str_lit)) => {
        output.css.push_str(&raw);
        output.css.push_str(str_lit.value.as_ref());
      }
      Expr::Lit(Lit::Num(num_lit)) => {
        output.css.push_str(&raw);
        let next_raw = template.quasis[index + 1].raw.as_ref();
        let property = current_property(&output.css);
        if starts_with_unit(next_raw) || property.is_none() {
          output.css.push_str(&format_number(num_lit.value));
        } else {
          let property = property.expect("checked above");
          output
            .css
            .push_str(&add_unit_if_needed(&property, num_lit.value));
        }
      }
      Expr::Tpl(inner) if inner.exprs.is_empty() => {
        output.css.push_str(&raw);
        for quasi in &inner.quasis {
          output.css.push_str(quasi.raw.as_ref());
        }
      }
      Expr::Tpl(inner) => {
        output.css.push_str(&raw);
        let nested = extract_template_literal(inner, meta);
        output.extend(nested);
      }
      Expr::Object(_) | Expr::Array(_) => {
        output.css.push_str(&raw);
        let nested = build_css(&evaluated, meta);
        output.extend(nested);
      }
      _ => {
        let expression = evaluated.clone();
        let name = variable_name(&expression);

        let combined = format!("{}{}", output.css, raw);
        let next_raw = template.quasis[index + 1].raw.as_ref();
        let (before, after) = css_affix_interpolation(&combined, next_raw);

        output.css = before.css;
        output.css.push_str(&format!("var({name})"));
        override_raw = Some(after.css);

        output.push_variable(Variable {
          name,
          expression,
          prefix: non_empty(before.variable_prefix),
          suffix: non_empty(after.variable_suffix),
        });
      }
    }
  }

  output
}

fn non_empty(value: String) -> Option<String> {
  if value.is_empty() {
    None
  } else {
    Some(value)
  }
}

fn prop_name_string(key: &PropName, meta: &Metadata) -> String {
  match key {
    PropName::Ident(id) => id.sym.as_ref().to_string(),
    PropName::Str(str_lit) => str_lit.value.as_ref().to_string(),
    PropName::Num(num) => format_number(num.value),
    PropName::Computed(computed) => {
      let resolved = evaluate_expression(&computed.expr, meta);
      match resolved {
        Expr::Lit(Lit::Str(str_lit)) => str_lit.value.as_ref().to_string(),
        _ => raise_code_frame_error(
          "Computed keys in style objects must resolve to a static string",
          Some(computed.span),
          meta,
        ),
      }
    }
    PropName::BigInt(big_int) => big_int.value.to_string(),
  }
}

/// Keys beginning with a pseudo, parent reference, attribute bracket, or
/// at-rule marker introduce a nested block rather than a declaration.
fn is_selector_key(key: &str) -> bool {
  key.starts_with(':')
    || key.starts_with('&')
    || key.starts_with('[')
    || key.starts_with('@')
    || key.contains(' ')
    || key.contains('>')
}

fn css_property_name(key: &str) -> String {
  if key.starts_with("--") {
    key.to_string()
  } else {
    kebab_case(key)
  }
}

fn extract_object_expression(object: &ObjectLit, meta: &Metadata) -> CssOutput {
  let mut output = CssOutput::new();

  for property in &object.props {
    match property {
      PropOrSpread::Spread(spread) => {
        // Spreads flatten in place; later properties override earlier ones
        // purely by CSS source order.
        let resolved = evaluate_expression(&spread.expr, meta);
        match resolved {
          Expr::Object(_) => output.extend(build_css(&resolved, meta)),
          _ => raise_code_frame_error(
            "Unable to statically resolve a spread element in a style object",
            Some(spread.expr.span()),
            meta,
          ),
        }
      }
      PropOrSpread::Prop(prop) => {
        let mut synthesized: Option<KeyValueProp> = None;
        let key_value: &KeyValueProp = match prop.as_ref() {
          Prop::KeyValue(key_value) => key_value,
          Prop::Shorthand(id) => synthesized.insert(KeyValueProp {
            key: PropName::Ident(id.clone().into()),
            value: Box::new(Expr::Ident(id.clone())),
          }),
          _ => continue,
        };

        let key = prop_name_string(&key_value.key, meta);
        extract_object_property(&key, key_value.value.as_ref(), meta, &mut output);
      }
    }
  }

  output
}

fn extract_object_property(key: &str, value: &Expr, meta: &Metadata, output: &mut CssOutput) {
  // Nested blocks: selector-like keys, or any key whose value resolves to
  // an object (`span: { … }` descendant selectors).
  let nested_value = match value {
    Expr::Object(_) => Some(value.clone()),
    _ if is_selector_key(key) => Some(evaluate_expression(value, meta)),
    _ => None,
  };

  if let Some(nested) = nested_value {
    if matches!(nested, Expr::Object(_) | Expr::Lit(Lit::Str(_)) | Expr::Tpl(_)) {
      let inner = build_css(&nested, meta);
      output.css.push_str(&format!("{key}{{{}}}", inner.css));
      for variable in inner.variables {
        output.push_variable(variable);
      }
      return;
    }

    raise_code_frame_error(
      "Nested selectors must resolve to an object or string of styles",
      Some(value.span()),
      meta,
    );
  }

  let property = css_property_name(key);

  match value {
    Expr::Lit(Lit::Str(str_lit)) => {
      output
        .css
        .push_str(&format!("{property}: {};", str_lit.value.as_ref()));
    }
    Expr::Lit(Lit::Num(num_lit)) => {
      output.css.push_str(&format!(
        "{property}: {};",
        add_unit_if_needed(&property, num_lit.value)
      ));
    }
    // Nullish and boolean values contribute nothing; conditional styles
    // resolve to them when disabled.
    Expr::Lit(Lit::Null(_)) | Expr::Lit(Lit::Bool(_)) => {}
    _ if ident_is_undefined(value) => {}
    Expr::Tpl(template) if template.exprs.is_empty() => {
      let mut text = String::new();
      for quasi in &template.quasis {
        text.push_str(quasi.raw.as_ref());
      }
      output.css.push_str(&format!("{property}: {text};"));
    }
    Expr::Tpl(template) => {
      let inner = extract_template_literal(template, meta);
      output.css.push_str(&format!("{property}: {};", inner.css));
      for variable in inner.variables {
        output.push_variable(variable);
      }
    }
    Expr::Paren(paren) => extract_object_property(key, &paren.expr, meta, output),
    Expr::Arrow(_) | Expr::Fn(_) => {
      let expression = strip_props_function(value);
      let name = variable_name(&expression);
      output.css.push_str(&format!("{property}: var({name});"));
      output.push_variable(Variable {
        name,
        expression,
        prefix: None,
        suffix: None,
      });
    }
    // Identifiers and any other dynamic expression become CSS variables
    // with the expression captured for the runtime style object.
    other => {
      let name = variable_name(other);
      output.css.push_str(&format!("{property}: var({name});"));
      output.push_variable(Variable {
        name,
        expression: other.clone(),
        prefix: None,
        suffix: None,
      });
    }
  }
}

fn ident_is_undefined(expr: &Expr) -> bool {
  matches!(expr, Expr::Ident(id) if id.sym.as_ref() == "undefined")
}

fn extract_array(array: &ArrayLit, meta: &Metadata) -> CssOutput {
  let mut output = CssOutput::new();

  for element in &array.elems {
    let Some(element) = element else {
      raise_code_frame_error(
        "undefined isn't a supported CSS type - try using an object or string",
        Some(array.span),
        meta,
      );
    };

    if element.spread.is_some() {
      raise_code_frame_error(
        "SpreadElement isn't a supported CSS type - try using an object or string",
        Some(element.expr.span()),
        meta,
      );
    }

    output.extend(build_css(&element.expr, meta));
  }

  output
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::panic::AssertUnwindSafe;
  use std::rc::Rc;

  use swc_core::common::sync::Lrc;
  use swc_core::common::{FileName, SourceMap};
  use swc_core::ecma::ast::Expr;
  use swc_core::ecma::parser::lexer::Lexer;
  use swc_core::ecma::parser::{EsSyntax, Parser, StringInput, Syntax};

  use crate::types::{Metadata, ModuleBinding, PluginOptions, TransformFile, TransformState};

  use super::build_css;

  fn parse_expression(code: &str) -> Expr {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom("expr.tsx".into()).into(), code.to_string());
    let lexer = Lexer::new(
      Syntax::Es(EsSyntax {
        jsx: true,
        ..Default::default()
      }),
      Default::default(),
      StringInput::from(&*fm),
      None,
    );
    let mut parser = Parser::new_from(lexer);
    *parser.parse_expr().expect("parse expression")
  }

  fn metadata() -> Metadata {
    let state = TransformState::new(TransformFile::default(), PluginOptions::default());
    Metadata::new(Rc::new(RefCell::new(state)))
  }

  fn bind_const(meta: &Metadata, name: &str, init: &str) {
    meta
      .state_mut()
      .module_scope
      .insert(name.to_string(), ModuleBinding::Const(parse_expression(init)));
  }

  #[test]
  fn passes_string_literals_through() {
    let output = build_css(&parse_expression("'color: red;'"), &metadata());
    assert_eq!(output.css, "color: red;");
    assert!(output.variables.is_empty());
  }

  #[test]
  fn object_keys_kebab_case_and_numbers_get_units() {
    let output = build_css(&parse_expression("({ fontSize: 20, color: 'blue' })"), &metadata());
    assert_eq!(output.css, "font-size: 20px;color: blue;");
  }

  #[test]
  fn unitless_properties_stay_bare() {
    let output = build_css(&parse_expression("({ lineHeight: 1.5, zIndex: 10 })"), &metadata());
    assert_eq!(output.css, "line-height: 1.5;z-index: 10;");
  }

  #[test]
  fn nested_selectors_wrap_their_block() {
    let output = build_css(
      &parse_expression("({ color: 'blue', ':hover': { color: 'red' } })"),
      &metadata(),
    );
    assert_eq!(output.css, "color: blue;:hover{color: red;}");
  }

  #[test]
  fn object_identifier_values_become_variables() {
    let meta = metadata();
    bind_const(&meta, "color", "'blue'");

    let output = build_css(&parse_expression("({ color })"), &meta);
    assert_eq!(output.variables.len(), 1);
    let variable = &output.variables[0];
    assert_eq!(output.css, format!("color: var({});", variable.name));
    assert!(matches!(&variable.expression, Expr::Ident(id) if id.sym.as_ref() == "color"));
  }

  #[test]
  fn spreads_flatten_in_source_order() {
    let meta = metadata();
    bind_const(&meta, "base", "({ color: 'blue', margin: 0 })");

    let output = build_css(&parse_expression("({ ...base, color: 'red' })"), &meta);
    assert_eq!(output.css, "color: blue;margin: 0;color: red;");
  }

  #[test]
  fn arrays_concatenate_in_order() {
    let output = build_css(
      &parse_expression("[{ color: 'blue' }, { margin: 0 }]"),
      &metadata(),
    );
    assert_eq!(output.css, "color: blue;margin: 0;");
  }

  #[test]
  fn template_literals_inline_static_bindings() {
    let meta = metadata();
    bind_const(&meta, "primary", "'blue'");

    let output = build_css(&parse_expression("`color: ${primary};`"), &meta);
    assert_eq!(output.css, "color: blue;");
    assert!(output.variables.is_empty());
  }

  #[test]
  fn template_literals_inline_numbers_with_units() {
    let meta = metadata();
    bind_const(&meta, "gap", "8");

    let output = build_css(&parse_expression("`margin-top: ${gap};`"), &meta);
    assert_eq!(output.css, "margin-top: 8px;");
  }

  #[test]
  fn template_numbers_with_explicit_units_are_not_suffixed_again() {
    let meta = metadata();
    bind_const(&meta, "size", "12");

    let output = build_css(&parse_expression("`font-size: ${size}px;`"), &meta);
    assert_eq!(output.css, "font-size: 12px;");
  }

  #[test]
  fn dynamic_interpolations_become_variables_with_suffix() {
    let output = build_css(&parse_expression("`font-size: ${p => p.size}px;`"), &metadata());
    assert_eq!(output.variables.len(), 1);
    let variable = &output.variables[0];
    assert_eq!(variable.suffix.as_deref(), Some("px"));
    assert_eq!(output.css, format!("font-size: var({});", variable.name));
  }

  #[test]
  fn duplicate_interpolations_reuse_one_variable() {
    let output = build_css(
      &parse_expression("`color: ${p => p.color};border-color: ${p => p.color};`"),
      &metadata(),
    );
    assert_eq!(output.variables.len(), 1);
    let name = &output.variables[0].name;
    assert_eq!(output.css.matches(&format!("var({name})")).count(), 2);
  }

  #[test]
  fn arrow_styles_evaluate_their_body() {
    let output = build_css(
      &parse_expression("props => ({ color: 'red', opacity: props.opacity })"),
      &metadata(),
    );
    assert!(output.css.starts_with("color: red;opacity: var(--_"));
    assert_eq!(output.variables.len(), 1);
  }

  #[test]
  fn empty_object_produces_empty_output() {
    let output = build_css(&parse_expression("({})"), &metadata());
    assert!(output.is_empty());
  }

  #[test]
  fn unsupported_expressions_raise() {
    let meta = metadata();
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
      build_css(&parse_expression("condition ? 'a' : 'b'"), &meta)
    }));
    assert!(result.is_err());
  }
}
