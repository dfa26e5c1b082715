//! Focused binding resolution. Three rules, bounded on purpose: a local
//! `const` with a literal-like initializer substitutes the initializer; a
//! local `const` bound to a zero-argument arrow returning a literal
//! substitutes the body; anything else stays as-is and becomes a CSS
//! variable at the call site.

use swc_core::ecma::ast::{BlockStmtOrExpr, Expr, Lit, Number, UnaryOp};

use crate::types::{Metadata, ModuleBinding};
use crate::utils::ast::pick_function_body;

/// Whether an initializer can be folded into static CSS.
fn is_static_initializer(expr: &Expr) -> bool {
  matches!(
    expr,
    Expr::Lit(_) | Expr::Tpl(_) | Expr::Object(_) | Expr::Array(_)
  )
}

fn is_thunk(expr: &Expr) -> bool {
  match expr {
    Expr::Arrow(arrow) => {
      arrow.params.is_empty()
        && matches!(
          arrow.body.as_ref(),
          BlockStmtOrExpr::Expr(body) if is_static_initializer(body)
        )
    }
    _ => false,
  }
}

/// Resolve an expression as far as the module scope allows. Unresolvable
/// expressions come back unchanged so the caller can fall back to a CSS
/// variable binding.
pub fn evaluate_expression(expr: &Expr, meta: &Metadata) -> Expr {
  evaluate_with_depth(expr, meta, 0)
}

fn evaluate_with_depth(expr: &Expr, meta: &Metadata, depth: usize) -> Expr {
  // Binding chains are source-bounded, but guard against pathological input.
  if depth > 32 {
    return expr.clone();
  }

  match expr {
    Expr::Paren(paren) => evaluate_with_depth(&paren.expr, meta, depth + 1),
    Expr::Unary(unary) if unary.op == UnaryOp::Minus => {
      match evaluate_with_depth(&unary.arg, meta, depth + 1) {
        Expr::Lit(Lit::Num(num)) => Expr::Lit(Lit::Num(Number {
          span: num.span,
          value: -num.value,
          raw: None,
        })),
        _ => expr.clone(),
      }
    }
    Expr::Ident(id) => {
      let binding = {
        let state = meta.state();
        state.module_scope.get(id.sym.as_ref()).cloned()
      };

      match binding {
        Some(ModuleBinding::Const(init)) => {
          if is_static_initializer(&init) {
            evaluate_with_depth(&init, meta, depth + 1)
          } else if is_thunk(&init) {
            evaluate_with_depth(&pick_function_body(&init), meta, depth + 1)
          } else if matches!(init, Expr::Arrow(_) | Expr::Fn(_)) {
            // Style mixins over `props`: surface the function so the caller
            // can strip it the same way as an inline arrow.
            init
          } else if matches!(init, Expr::Ident(_)) {
            evaluate_with_depth(&init, meta, depth + 1)
          } else {
            expr.clone()
          }
        }
        Some(ModuleBinding::Import { source, export }) => {
          let resolved = {
            let state = meta.state();
            state
              .resolver
              .as_ref()
              .and_then(|resolver| resolver.resolve(&source, &export))
          };

          match resolved {
            Some(value) if is_static_initializer(&value) || is_thunk(&value) => {
              evaluate_with_depth(&value, meta, depth + 1)
            }
            _ => expr.clone(),
          }
        }
        None => expr.clone(),
      }
    }
    _ => expr.clone(),
  }
}
