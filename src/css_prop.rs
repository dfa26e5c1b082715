//! Recognition and rewriting of JSX elements carrying a `css` attribute.

use swc_core::common::Spanned;
use swc_core::ecma::ast::{
  Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXExpr, Lit,
};
use tracing::debug;

use crate::types::{CssOutput, Metadata};
use crate::utils::ast::raise_code_frame_error;
use crate::utils::build_compiled_component::build_compiled_component;
use crate::utils::css_builders::build_css;

fn is_css_attribute(attr: &JSXAttr) -> bool {
  matches!(
    &attr.name,
    JSXAttrName::Ident(id) if id.sym.as_ref() == "css"
  )
}

fn css_attribute_output(attr: &JSXAttr, meta: &Metadata) -> CssOutput {
  let Some(value) = &attr.value else {
    // A bare `css` attribute carries no styles.
    return CssOutput::new();
  };

  match value {
    JSXAttrValue::Lit(Lit::Str(str_lit)) => CssOutput {
      css: str_lit.value.as_ref().to_string(),
      variables: Vec::new(),
    },
    JSXAttrValue::JSXExprContainer(container) => match &container.expr {
      JSXExpr::Expr(expr) => build_css(expr, meta),
      JSXExpr::JSXEmptyExpr(empty) => raise_code_frame_error(
        "An empty expression isn't a valid value for the css prop",
        Some(empty.span),
        meta,
      ),
    },
    other => raise_code_frame_error(
      "This value isn't supported in a css prop - use an object, string, or template literal",
      Some(other.span()),
      meta,
    ),
  }
}

/// Rewrite an element with a `css` attribute into its compiled form.
/// Returns `None` when the element has no `css` attribute.
pub fn visit_css_prop(element: &JSXElement, meta: &Metadata) -> Option<JSXElement> {
  let index = element
    .opening
    .attrs
    .iter()
    .position(|attr| matches!(attr, JSXAttrOrSpread::JSXAttr(attr) if is_css_attribute(attr)))?;

  debug!("transforming css prop call site");

  let mut element = element.clone();
  let JSXAttrOrSpread::JSXAttr(attr) = element.opening.attrs.remove(index) else {
    unreachable!("position matched a plain attribute");
  };

  let css_output = css_attribute_output(&attr, meta);

  Some(build_compiled_component(element, css_output, meta))
}

/// Expression-position variant of [`visit_css_prop`].
pub fn visit_css_prop_expr(expr: &mut Expr, meta: &Metadata) -> bool {
  let Expr::JSXElement(element) = expr else {
    return false;
  };

  match visit_css_prop(element, meta) {
    Some(replacement) => {
      *expr = Expr::JSXElement(Box::new(replacement));
      true
    }
    None => false,
  }
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

  use crate::types::{Metadata, PluginOptions, TransformFile, TransformState};
  use crate::utils::ast::print_expression;

  use super::visit_css_prop_expr;

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

  #[test]
  fn rewrites_elements_with_a_css_attribute() {
    let meta = metadata();
    let mut expr = parse_expression("<div css={{ color: 'blue' }}>hi</div>");

    assert!(visit_css_prop_expr(&mut expr, &meta));
    let printed = print_expression(&expr);
    assert!(printed.starts_with("<CC>"));
    assert!(!printed.contains("css="));
  }

  #[test]
  fn accepts_string_literal_css_attributes() {
    let meta = metadata();
    let mut expr = parse_expression("<div css=\"color: blue\">hi</div>");

    assert!(visit_css_prop_expr(&mut expr, &meta));
    assert_eq!(meta.state().sheets.len(), 1);
  }

  #[test]
  fn leaves_elements_without_css_untouched() {
    let meta = metadata();
    let mut expr = parse_expression("<div className=\"a\">hi</div>");

    assert!(!visit_css_prop_expr(&mut expr, &meta));
  }

  #[test]
  fn raises_for_empty_jsx_expressions() {
    use swc_core::common::DUMMY_SP;
    use swc_core::ecma::ast::{
      JSXAttrOrSpread, JSXAttrValue, JSXEmptyExpr, JSXExpr, JSXExprContainer,
    };

    let meta = metadata();
    let mut expr = parse_expression("<div>hi</div>");

    // `css={}` does not survive every parser, so build the empty container
    // directly.
    if let Expr::JSXElement(element) = &mut expr {
      let mut attr = match parse_expression("<div css=\"x\" />") {
        Expr::JSXElement(other) => match other.opening.attrs.into_iter().next() {
          Some(JSXAttrOrSpread::JSXAttr(attr)) => attr,
          _ => panic!("expected css attribute"),
        },
        _ => panic!("expected element"),
      };
      attr.value = Some(JSXAttrValue::JSXExprContainer(JSXExprContainer {
        span: DUMMY_SP,
        expr: JSXExpr::JSXEmptyExpr(JSXEmptyExpr { span: DUMMY_SP }),
      }));
      element.opening.attrs.push(JSXAttrOrSpread::JSXAttr(attr));
    }

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
      visit_css_prop_expr(&mut expr, &meta)
    }));
    assert!(result.is_err());
  }

  #[test]
  fn bare_css_attribute_still_assigns_the_empty_class() {
    let meta = metadata();
    let mut expr = parse_expression("<div css>hi</div>");

    assert!(visit_css_prop_expr(&mut expr, &meta));
    let printed = print_expression(&expr);
    assert!(printed.contains("className=\"_"));
  }
}
