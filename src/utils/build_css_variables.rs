//! Builds the inline-style object properties that supply CSS variable
//! values at runtime.

use indexmap::IndexSet;
use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{
  BinExpr, BinaryOp, Expr, KeyValueProp, ParenExpr, Prop, PropName, PropOrSpread, Str,
};

use crate::types::Variable;

fn string_literal(value: &str) -> Expr {
  Expr::Lit(swc_core::ecma::ast::Lit::Str(Str {
    span: DUMMY_SP,
    value: value.into(),
    raw: None,
  }))
}

fn concat(left: Expr, right: Expr) -> Expr {
  Expr::Bin(BinExpr {
    span: DUMMY_SP,
    op: BinaryOp::Add,
    left: Box::new(left),
    right: Box::new(right),
  })
}

fn needs_parens(expr: &Expr) -> bool {
  matches!(expr, Expr::Arrow(_) | Expr::Fn(_) | Expr::Cond(_) | Expr::Bin(_))
}

/// Re-apply the affixes lifted off the CSS text around an interpolation:
/// `p => p.size` with suffix `px` becomes `size + "px"` in the style object.
fn apply_affixes(variable: &Variable, expr: Expr) -> Expr {
  if variable.prefix.is_none() && variable.suffix.is_none() {
    return expr;
  }

  let mut value = if needs_parens(&expr) {
    Expr::Paren(ParenExpr {
      span: DUMMY_SP,
      expr: Box::new(expr),
    })
  } else {
    expr
  };

  if let Some(prefix) = &variable.prefix {
    value = concat(string_literal(prefix), value);
  }
  if let Some(suffix) = &variable.suffix {
    value = concat(value, string_literal(suffix));
  }

  value
}

/// Build the `"--name": expression` properties for the emitted style
/// object, deduplicating by variable name (first occurrence wins) and
/// applying the supplied transform to each expression.
pub fn build_css_variables_with_transform<F>(
  variables: &[Variable],
  transform: F,
) -> Vec<PropOrSpread>
where
  F: Fn(&Expr) -> Expr,
{
  let mut seen = IndexSet::new();
  let mut properties = Vec::new();

  for variable in variables {
    if !seen.insert(variable.name.clone()) {
      continue;
    }

    let value = apply_affixes(variable, transform(&variable.expression));

    properties.push(PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
      key: PropName::Str(Str {
        span: DUMMY_SP,
        value: variable.name.clone().into(),
        raw: None,
      }),
      value: Box::new(value),
    }))));
  }

  properties
}

/// Convenience wrapper leaving expressions untouched.
pub fn build_css_variables(variables: &[Variable]) -> Vec<PropOrSpread> {
  build_css_variables_with_transform(variables, Clone::clone)
}
