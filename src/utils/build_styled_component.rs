//! Emits the `React.forwardRef` component expression that replaces a
//! styled call site.

use indexmap::IndexSet;
use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
  ArrowExpr, AssignPat, AssignPatProp, BindingIdent, BlockStmtOrExpr, CallExpr, Callee, Expr,
  ExprOrSpread, JSXAttrOrSpread, JSXClosingElement, JSXElement, JSXElementChild, JSXExpr,
  JSXExprContainer, JSXOpeningElement, KeyValuePatProp, MemberExpr, MemberProp, ObjectLit,
  ObjectPat, ObjectPatProp, Pat, PropName, PropOrSpread, RestPat, SpreadElement,
};
use swc_core::ecma::visit::{Visit, VisitMut, VisitMutWith, VisitWith};

use crate::constants::{
  PROPS_IDENTIFIER_NAME, REF_IDENTIFIER_NAME, STYLE_IDENTIFIER_NAME, TAG_IDENTIFIER_NAME,
};
use crate::css::transform_css;
use crate::types::{CssOutput, Metadata, Tag, TagType, Variable};
use crate::utils::ast::{
  array_expression, ax_call, ident, ident_name, jsx_attribute, jsx_expr_value, jsx_name,
  member_expression, string_lit,
};
use crate::utils::build_css_variables::build_css_variables;
use crate::utils::hoist_sheet::hoist_sheet;
use crate::utils::is_prop_valid::is_prop_valid;

fn build_component_tag_expr(tag: &Tag) -> Expr {
  match tag.tag_type {
    TagType::InBuiltComponent => string_lit(&tag.name),
    TagType::UserDefinedComponent => Expr::Ident(ident(&tag.name)),
  }
}

/// Collects props accessed off the canonical props identifier that must not
/// be forwarded to the DOM.
struct InvalidDomPropsCollector {
  invalids: IndexSet<String>,
}

impl Visit for InvalidDomPropsCollector {
  fn visit_member_expr(&mut self, member: &MemberExpr) {
    if let Expr::Ident(object) = &*member.obj {
      if object.sym.as_ref() == PROPS_IDENTIFIER_NAME {
        if let MemberProp::Ident(prop) = &member.prop {
          let name = prop.sym.as_ref();
          if name != "children" && !is_prop_valid(name) {
            self.invalids.insert(name.to_string());
          }
        }
      }
    }

    member.visit_children_with(self);
  }
}

/// Rewrites `__cmplp.<name>` accesses to the bare destructured local for
/// props pulled out of the rest spread.
struct DestructuredPropsRewriter<'a> {
  destructured: &'a IndexSet<String>,
}

impl VisitMut for DestructuredPropsRewriter<'_> {
  fn visit_mut_expr(&mut self, expr: &mut Expr) {
    if let Expr::Member(member) = expr {
      if let (Expr::Ident(object), MemberProp::Ident(prop)) = (&*member.obj, &member.prop) {
        if object.sym.as_ref() == PROPS_IDENTIFIER_NAME
          && self.destructured.contains(prop.sym.as_ref())
        {
          *expr = Expr::Ident(ident(prop.sym.as_ref()));
          return;
        }
      }
    }

    expr.visit_mut_children_with(self);
  }
}

fn collect_invalid_dom_props(variables: &[Variable]) -> IndexSet<String> {
  let mut collector = InvalidDomPropsCollector {
    invalids: IndexSet::new(),
  };
  for variable in variables {
    variable.expression.visit_with(&mut collector);
  }
  collector.invalids
}

fn dedupe_sheets(sheets: &[String], meta: &Metadata) -> Vec<Expr> {
  let mut unique = IndexSet::new();
  let mut expressions = Vec::new();

  for sheet in sheets {
    if unique.insert(sheet.clone()) {
      expressions.push(Expr::Ident(hoist_sheet(sheet, meta)));
    }
  }

  expressions
}

/// `<CS nonce={..}>{[_, _2]}</CS>` carrying the hoisted sheets.
pub fn build_cs_element(sheet_exprs: Vec<Expr>, meta: &Metadata) -> JSXElementChild {
  let mut attrs = Vec::new();

  if let Some(nonce) = meta.state().opts.nonce.clone() {
    attrs.push(jsx_attribute("nonce", jsx_expr_value(Expr::Ident(ident(&nonce)))));
  }

  let children = vec![JSXElementChild::JSXExprContainer(JSXExprContainer {
    span: DUMMY_SP,
    expr: JSXExpr::Expr(Box::new(array_expression(sheet_exprs))),
  })];

  JSXElementChild::JSXElement(Box::new(JSXElement {
    span: DUMMY_SP,
    opening: JSXOpeningElement {
      span: DUMMY_SP,
      name: jsx_name("CS"),
      attrs,
      self_closing: false,
      type_args: None,
    },
    closing: Some(JSXClosingElement {
      span: DUMMY_SP,
      name: jsx_name("CS"),
    }),
    children,
  }))
}

/// `<CC>{children}</CC>` wrapper element.
pub fn build_cc_element(children: Vec<JSXElementChild>) -> JSXElement {
  JSXElement {
    span: DUMMY_SP,
    opening: JSXOpeningElement {
      span: DUMMY_SP,
      name: jsx_name("CC"),
      attrs: Vec::new(),
      self_closing: false,
      type_args: None,
    },
    closing: Some(JSXClosingElement {
      span: DUMMY_SP,
      name: jsx_name("CC"),
    }),
    children,
  }
}

fn styled_style_expr(variables: &[Variable]) -> Expr {
  if variables.is_empty() {
    return Expr::Ident(ident(STYLE_IDENTIFIER_NAME));
  }

  let mut props: Vec<PropOrSpread> = vec![PropOrSpread::Spread(SpreadElement {
    dot3_token: DUMMY_SP,
    expr: Box::new(Expr::Ident(ident(STYLE_IDENTIFIER_NAME))),
  })];
  props.extend(build_css_variables(variables));

  Expr::Object(ObjectLit {
    span: DUMMY_SP,
    props,
  })
}

fn build_inner_element(style_expr: Expr, class_expr: Expr) -> JSXElementChild {
  let attrs = vec![
    JSXAttrOrSpread::SpreadElement(SpreadElement {
      dot3_token: DUMMY_SP,
      expr: Box::new(Expr::Ident(ident(PROPS_IDENTIFIER_NAME))),
    }),
    jsx_attribute("style", jsx_expr_value(style_expr)),
    jsx_attribute("ref", jsx_expr_value(Expr::Ident(ident(REF_IDENTIFIER_NAME)))),
    jsx_attribute("className", jsx_expr_value(class_expr)),
  ];

  JSXElementChild::JSXElement(Box::new(JSXElement {
    span: DUMMY_SP,
    opening: JSXOpeningElement {
      span: DUMMY_SP,
      name: jsx_name(TAG_IDENTIFIER_NAME),
      attrs,
      self_closing: true,
      type_args: None,
    },
    closing: None,
    children: Vec::new(),
  }))
}

fn build_component_params(tag: &Tag, destructured: &IndexSet<String>) -> Vec<Pat> {
  let mut props: Vec<ObjectPatProp> = vec![
    ObjectPatProp::KeyValue(KeyValuePatProp {
      key: PropName::Ident(ident_name("as")),
      value: Box::new(Pat::Assign(AssignPat {
        span: DUMMY_SP,
        left: Box::new(Pat::Ident(BindingIdent {
          id: ident(TAG_IDENTIFIER_NAME),
          type_ann: None,
        })),
        right: Box::new(build_component_tag_expr(tag)),
      })),
    }),
    ObjectPatProp::KeyValue(KeyValuePatProp {
      key: PropName::Ident(ident_name("style")),
      value: Box::new(Pat::Ident(BindingIdent {
        id: ident(STYLE_IDENTIFIER_NAME),
        type_ann: None,
      })),
    }),
  ];

  for name in destructured {
    props.push(ObjectPatProp::Assign(AssignPatProp {
      span: DUMMY_SP,
      key: BindingIdent {
        id: ident(name),
        type_ann: None,
      },
      value: None,
    }));
  }

  props.push(ObjectPatProp::Rest(RestPat {
    span: DUMMY_SP,
    dot3_token: DUMMY_SP,
    arg: Box::new(Pat::Ident(BindingIdent {
      id: ident(PROPS_IDENTIFIER_NAME),
      type_ann: None,
    })),
    type_ann: None,
  }));

  vec![
    Pat::Object(ObjectPat {
      span: DUMMY_SP,
      props,
      optional: false,
      type_ann: None,
    }),
    Pat::Ident(BindingIdent {
      id: ident(REF_IDENTIFIER_NAME),
      type_ann: None,
    }),
  ]
}

/// Build the replacement expression for one styled call site.
pub fn build_styled_component(tag: Tag, css_output: CssOutput, meta: &Metadata) -> Expr {
  let result = transform_css(&css_output.css);

  // Props used only to feed dynamic styles are destructured out of the rest
  // spread so they never reach the underlying element.
  let destructured = collect_invalid_dom_props(&css_output.variables);
  let mut variables = css_output.variables;
  let mut rewriter = DestructuredPropsRewriter {
    destructured: &destructured,
  };
  for variable in &mut variables {
    variable.expression.visit_mut_with(&mut rewriter);
  }

  let mut class_values: Vec<Expr> = result
    .class_names
    .iter()
    .map(|class| string_lit(class))
    .collect();
  class_values.push(member_expression(
    Expr::Ident(ident(PROPS_IDENTIFIER_NAME)),
    "className",
  ));
  let class_expr = ax_call(class_values);

  let inner = build_inner_element(styled_style_expr(&variables), class_expr);

  let body_element = if result.sheets.is_empty() {
    match inner {
      JSXElementChild::JSXElement(element) => *element,
      _ => unreachable!("inner element is always a JSX element"),
    }
  } else {
    let sheet_exprs = dedupe_sheets(&result.sheets, meta);
    build_cc_element(vec![build_cs_element(sheet_exprs, meta), inner])
  };

  let arrow = Expr::Arrow(ArrowExpr {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    params: build_component_params(&tag, &destructured),
    body: Box::new(BlockStmtOrExpr::Expr(Box::new(Expr::JSXElement(Box::new(
      body_element,
    ))))),
    is_async: false,
    is_generator: false,
    type_params: None,
    return_type: None,
  });

  Expr::Call(CallExpr {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    callee: Callee::Expr(Box::new(member_expression(
      Expr::Ident(ident("React")),
      "forwardRef",
    ))),
    args: vec![ExprOrSpread {
      spread: None,
      expr: Box::new(arrow),
    }],
    type_args: None,
  })
}
