//! Small AST construction and inspection helpers shared by the evaluator
//! and emitters.

use swc_core::common::sync::Lrc;
use swc_core::common::{Span, SourceMap, DUMMY_SP, SyntaxContext};
use swc_core::ecma::ast::{
  ArrayLit, BlockStmtOrExpr, CallExpr, Callee, Expr, ExprOrSpread, Ident, IdentName,
  JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElementName, JSXExpr, JSXExprContainer,
  Lit, MemberExpr, MemberProp, ObjectPatProp, Pat, ReturnStmt, Stmt, Str,
};
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::codegen::{Config, Emitter, Node};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::constants::PROPS_IDENTIFIER_NAME;
use crate::errors::format_with_location;
use crate::types::Metadata;

pub fn ident(name: &str) -> Ident {
  Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

pub fn ident_name(name: &str) -> IdentName {
  IdentName::new(name.into(), DUMMY_SP)
}

pub fn string_lit(value: &str) -> Expr {
  Expr::Lit(Lit::Str(Str {
    span: DUMMY_SP,
    value: value.into(),
    raw: None,
  }))
}

pub fn member_expression(object: Expr, property: &str) -> Expr {
  Expr::Member(MemberExpr {
    span: DUMMY_SP,
    obj: Box::new(object),
    prop: MemberProp::Ident(ident_name(property)),
  })
}

pub fn array_expression(values: Vec<Expr>) -> Expr {
  Expr::Array(ArrayLit {
    span: DUMMY_SP,
    elems: values
      .into_iter()
      .map(|expr| {
        Some(ExprOrSpread {
          spread: None,
          expr: Box::new(expr),
        })
      })
      .collect(),
  })
}

/// `ax([..])` call merging class names at runtime.
pub fn ax_call(values: Vec<Expr>) -> Expr {
  Expr::Call(CallExpr {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    callee: Callee::Expr(Box::new(Expr::Ident(ident("ax")))),
    args: vec![ExprOrSpread {
      spread: None,
      expr: Box::new(array_expression(values)),
    }],
    type_args: None,
  })
}

pub fn jsx_name(name: &str) -> JSXElementName {
  JSXElementName::Ident(ident(name))
}

pub fn jsx_attribute(name: &str, value: JSXAttrValue) -> JSXAttrOrSpread {
  JSXAttrOrSpread::JSXAttr(JSXAttr {
    span: DUMMY_SP,
    name: JSXAttrName::Ident(ident_name(name)),
    value: Some(value),
  })
}

pub fn jsx_expr_value(expr: Expr) -> JSXAttrValue {
  JSXAttrValue::JSXExprContainer(JSXExprContainer {
    span: DUMMY_SP,
    expr: JSXExpr::Expr(Box::new(expr)),
  })
}

/// Print an expression as source text. Used to derive deterministic CSS
/// variable names from the expression they bind.
pub fn print_expression(expr: &Expr) -> String {
  let cm: Lrc<SourceMap> = Default::default();
  let mut buffer = Vec::new();

  {
    let writer = JsWriter::new(cm.clone(), "\n", &mut buffer, None);
    let mut emitter = Emitter {
      cfg: Config::default(),
      comments: None,
      cm,
      wr: writer,
    };

    expr
      .emit_with(&mut emitter)
      .expect("in-memory emit cannot fail");
  }

  String::from_utf8(buffer)
    .expect("codegen produces utf8")
    .trim()
    .to_string()
}

/// Unwrap an arrow or function expression to the expression it returns.
/// Non-functions and bodies without a single computable return come back
/// unchanged.
pub fn pick_function_body(expr: &Expr) -> Expr {
  match expr {
    Expr::Arrow(arrow) => match arrow.body.as_ref() {
      BlockStmtOrExpr::Expr(body) => unwrap_parens(body).clone(),
      BlockStmtOrExpr::BlockStmt(block) => single_return(&block.stmts).unwrap_or_else(|| expr.clone()),
    },
    Expr::Fn(fn_expr) => fn_expr
      .function
      .body
      .as_ref()
      .and_then(|block| single_return(&block.stmts))
      .unwrap_or_else(|| expr.clone()),
    Expr::Paren(paren) => pick_function_body(&paren.expr),
    _ => expr.clone(),
  }
}

fn unwrap_parens(expr: &Expr) -> &Expr {
  match expr {
    Expr::Paren(paren) => unwrap_parens(&paren.expr),
    other => other,
  }
}

fn single_return(stmts: &[Stmt]) -> Option<Expr> {
  match stmts {
    [Stmt::Return(ReturnStmt { arg: Some(arg), .. })] => Some(unwrap_parens(arg).clone()),
    _ => None,
  }
}

struct PropsRenamer {
  param: Option<String>,
  destructured: Vec<String>,
}

impl VisitMut for PropsRenamer {
  fn visit_mut_expr(&mut self, expr: &mut Expr) {
    if let Expr::Ident(id) = expr {
      let name = id.sym.to_string();
      if self.param.as_deref() == Some(name.as_str()) {
        *expr = Expr::Ident(ident(PROPS_IDENTIFIER_NAME));
        return;
      }
      if self.destructured.contains(&name) {
        *expr = member_expression(Expr::Ident(ident(PROPS_IDENTIFIER_NAME)), &name);
        return;
      }
    }

    expr.visit_mut_children_with(self);
  }
}

/// Strip an arrow over `props` down to its body, rewriting parameter
/// accesses to the canonical props identifier: `p => p.size` becomes
/// `__cmplp.size`, `({ size }) => size` likewise.
pub fn strip_props_function(expr: &Expr) -> Expr {
  let (params, body) = match expr {
    Expr::Arrow(arrow) => (arrow.params.clone(), pick_function_body(expr)),
    Expr::Fn(fn_expr) => (
      fn_expr
        .function
        .params
        .iter()
        .map(|param| param.pat.clone())
        .collect(),
      pick_function_body(expr),
    ),
    _ => return expr.clone(),
  };

  let mut renamer = PropsRenamer {
    param: None,
    destructured: Vec::new(),
  };

  match params.first() {
    Some(Pat::Ident(binding)) => {
      renamer.param = Some(binding.id.sym.to_string());
    }
    Some(Pat::Object(object)) => {
      for prop in &object.props {
        match prop {
          ObjectPatProp::Assign(assign) => {
            renamer.destructured.push(assign.key.sym.to_string());
          }
          ObjectPatProp::KeyValue(key_value) => {
            if let Pat::Ident(binding) = key_value.value.as_ref() {
              renamer.destructured.push(binding.id.sym.to_string());
            }
          }
          ObjectPatProp::Rest(_) => {}
        }
      }
    }
    _ => {}
  }

  let mut body = body;
  body.visit_mut_with(&mut renamer);
  body
}

/// Format a message with the call site's source location and abort the call
/// site. The public transform entry converts the unwind into a diagnostic.
pub fn raise_code_frame_error(message: &str, span: Option<Span>, meta: &Metadata) -> ! {
  let formatted = {
    let state = meta.state();
    format_with_location(message, span, Some(&state.file.source_map))
  };
  panic!("{formatted}");
}
