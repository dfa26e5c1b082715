//! Emits the wrapped element that replaces a `css` prop call site.

use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{
  Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementChild, JSXExpr,
  Lit, ObjectLit, PropOrSpread, SpreadElement,
};

use crate::css::transform_css;
use crate::types::{CssOutput, Metadata};
use crate::utils::ast::{ax_call, jsx_attribute, jsx_expr_value, string_lit};
use crate::utils::build_css_variables::build_css_variables;
use crate::utils::build_styled_component::{build_cc_element, build_cs_element};
use crate::utils::hoist_sheet::hoist_sheet;

fn take_attribute(element: &mut JSXElement, name: &str) -> Option<JSXAttr> {
  let index = element.opening.attrs.iter().position(|attr| {
    matches!(
      attr,
      JSXAttrOrSpread::JSXAttr(JSXAttr {
        name: JSXAttrName::Ident(id),
        ..
      }) if id.sym.as_ref() == name
    )
  })?;

  match element.opening.attrs.remove(index) {
    JSXAttrOrSpread::JSXAttr(attr) => Some(attr),
    _ => unreachable!("position matched a plain attribute"),
  }
}

fn attribute_expression(attr: JSXAttr) -> Option<Expr> {
  match attr.value? {
    JSXAttrValue::Lit(Lit::Str(str_lit)) => Some(Expr::Lit(Lit::Str(str_lit))),
    JSXAttrValue::JSXExprContainer(container) => match container.expr {
      JSXExpr::Expr(expr) => Some(*expr),
      JSXExpr::JSXEmptyExpr(_) => None,
    },
    _ => None,
  }
}

/// Merge a preexisting `style` attribute with the CSS variable assignments,
/// preserving the original declaration order ahead of the new entries.
fn merged_style_expr(existing: Option<Expr>, variable_props: Vec<PropOrSpread>) -> Expr {
  let mut props: Vec<PropOrSpread> = Vec::new();

  match existing {
    Some(Expr::Object(object)) => props.extend(object.props),
    Some(other) => props.push(PropOrSpread::Spread(SpreadElement {
      dot3_token: DUMMY_SP,
      expr: Box::new(other),
    })),
    None => {}
  }

  props.extend(variable_props);

  Expr::Object(ObjectLit {
    span: DUMMY_SP,
    props,
  })
}

/// Build the replacement for a JSX element whose `css` attribute has been
/// evaluated into `css_output`. The attribute itself must already be
/// removed. Returns the element to splice back in: the original element
/// with a class name when the styles are fully static-empty, or a `<CC>`
/// wrapper carrying the injected sheets.
pub fn build_compiled_component(
  mut element: JSXElement,
  css_output: CssOutput,
  meta: &Metadata,
) -> JSXElement {
  let result = transform_css(&css_output.css);

  let existing_class = take_attribute(&mut element, "className").and_then(attribute_expression);

  let mut class_values: Vec<Expr> = result
    .class_names
    .iter()
    .map(|class| string_lit(class))
    .collect();

  // Nothing to inject: write the class name straight onto the element and
  // skip the wrapper entirely.
  if result.sheets.is_empty() && css_output.variables.is_empty() {
    let class_value = match existing_class {
      Some(existing) => {
        class_values.push(existing);
        jsx_expr_value(ax_call(class_values))
      }
      None => JSXAttrValue::Lit(Lit::Str(swc_core::ecma::ast::Str {
        span: DUMMY_SP,
        value: result.class_names.join(" ").into(),
        raw: None,
      })),
    };
    element
      .opening
      .attrs
      .push(jsx_attribute("className", class_value));
    return element;
  }

  if let Some(existing) = existing_class {
    class_values.push(existing);
  }
  element
    .opening
    .attrs
    .push(jsx_attribute("className", jsx_expr_value(ax_call(class_values))));

  if !css_output.variables.is_empty() {
    let existing_style = take_attribute(&mut element, "style").and_then(attribute_expression);
    let style_expr = merged_style_expr(existing_style, build_css_variables(&css_output.variables));
    element
      .opening
      .attrs
      .push(jsx_attribute("style", jsx_expr_value(style_expr)));
  }

  let sheet_exprs: Vec<Expr> = {
    let mut exprs = Vec::new();
    for sheet in &result.sheets {
      exprs.push(Expr::Ident(hoist_sheet(sheet, meta)));
    }
    exprs
  };

  build_cc_element(vec![
    build_cs_element(sheet_exprs, meta),
    JSXElementChild::JSXElement(Box::new(element)),
  ])
}
