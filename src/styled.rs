//! Recognition and rewriting of styled call sites: `styled.div`, tagged
//! templates, and `styled(Component)` composition, in both template and
//! object-argument form.

use swc_core::common::DUMMY_SP;
use swc_core::ecma::ast::{
  ArrayLit, CallExpr, Callee, Expr, ExprOrSpread, MemberExpr, MemberProp, TaggedTpl,
};
use tracing::debug;

use crate::types::{Metadata, Tag, TagType};
use crate::utils::build_styled_component::build_styled_component;
use crate::utils::css_builders::build_css;

#[derive(Clone, Debug, PartialEq)]
struct StyledData {
  tag: Tag,
  css_node: Expr,
}

fn styled_imports_contains(meta: &Metadata, name: &str) -> bool {
  let state = meta.state();
  state
    .compiled_imports
    .as_ref()
    .map(|imports| imports.styled.iter().any(|value| value == name))
    .unwrap_or(false)
}

fn tag_from_member(member: &MemberExpr, meta: &Metadata) -> Option<Tag> {
  let Expr::Ident(object) = &*member.obj else {
    return None;
  };

  if !styled_imports_contains(meta, object.sym.as_ref()) {
    return None;
  }

  let MemberProp::Ident(prop) = &member.prop else {
    return None;
  };

  Some(Tag {
    name: prop.sym.as_ref().to_string(),
    tag_type: TagType::InBuiltComponent,
  })
}

fn tag_from_call(call: &CallExpr, meta: &Metadata) -> Option<Tag> {
  let Callee::Expr(callee) = &call.callee else {
    return None;
  };

  let Expr::Ident(callee_ident) = &**callee else {
    return None;
  };

  if !styled_imports_contains(meta, callee_ident.sym.as_ref()) {
    return None;
  }

  let first = call.args.first()?;
  if first.spread.is_some() {
    return None;
  }

  let Expr::Ident(component) = &*first.expr else {
    return None;
  };

  Some(Tag {
    name: component.sym.as_ref().to_string(),
    tag_type: TagType::UserDefinedComponent,
  })
}

fn extract_from_tagged_template(node: &TaggedTpl, meta: &Metadata) -> Option<StyledData> {
  let tag = match &*node.tag {
    Expr::Member(member) => tag_from_member(member, meta)?,
    Expr::Call(call) => tag_from_call(call, meta)?,
    _ => return None,
  };

  Some(StyledData {
    tag,
    css_node: Expr::Tpl((*node.tpl).clone()),
  })
}

fn extract_from_call(node: &CallExpr, meta: &Metadata) -> Option<StyledData> {
  let tag = match &node.callee {
    Callee::Expr(callee) => match &**callee {
      Expr::Member(member) => tag_from_member(member, meta)?,
      Expr::Call(call) => tag_from_call(call, meta)?,
      _ => return None,
    },
    _ => return None,
  };

  if node.args.is_empty() {
    return None;
  }

  // Multiple style arguments behave like an array literal: each argument is
  // evaluated and the outputs concatenate in order.
  let mut expressions = Vec::with_capacity(node.args.len());
  for arg in &node.args {
    if arg.spread.is_some() {
      return None;
    }
    expressions.push((*arg.expr).clone());
  }

  let css_node = if expressions.len() == 1 {
    expressions.into_iter().next().expect("length checked")
  } else {
    Expr::Array(ArrayLit {
      span: DUMMY_SP,
      elems: expressions
        .into_iter()
        .map(|expr| {
          Some(ExprOrSpread {
            spread: None,
            expr: Box::new(expr),
          })
        })
        .collect(),
    })
  };

  Some(StyledData { tag, css_node })
}

fn extract_styled_data(node: &Expr, meta: &Metadata) -> Option<StyledData> {
  match node {
    Expr::TaggedTpl(tagged) => extract_from_tagged_template(tagged, meta),
    Expr::Call(call) => extract_from_call(call, meta),
    _ => None,
  }
}

/// Replace a styled usage in place. Returns whether the expression was a
/// styled call site and has been rewritten.
pub fn visit_styled(node: &mut Expr, meta: &Metadata) -> bool {
  let Some(styled_data) = extract_styled_data(node, meta) else {
    return false;
  };

  debug!(tag = %styled_data.tag.name, "transforming styled call site");

  let css_output = build_css(&styled_data.css_node, meta);
  *node = build_styled_component(styled_data.tag, css_output, meta);

  true
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::rc::Rc;

  use swc_core::common::sync::Lrc;
  use swc_core::common::{FileName, SourceMap};
  use swc_core::ecma::ast::Expr;
  use swc_core::ecma::parser::lexer::Lexer;
  use swc_core::ecma::parser::{EsSyntax, Parser, StringInput, Syntax};

  use crate::types::{
    CompiledImports, Metadata, PluginOptions, TransformFile, TransformState,
  };
  use crate::utils::ast::print_expression;

  use super::visit_styled;

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

  fn metadata_with_styled_import(name: &str) -> Metadata {
    let mut state = TransformState::new(TransformFile::default(), PluginOptions::default());
    state.compiled_imports = Some(CompiledImports {
      styled: vec![name.into()],
    });
    Metadata::new(Rc::new(RefCell::new(state)))
  }

  #[test]
  fn transforms_member_tagged_templates() {
    let meta = metadata_with_styled_import("styled");
    let mut expr = parse_expression("styled.div`color: red;`");

    assert!(visit_styled(&mut expr, &meta));
    let printed = print_expression(&expr);
    assert!(printed.starts_with("React.forwardRef("));
    assert!(printed.contains("as: C = \"div\""));
  }

  #[test]
  fn transforms_object_call_form() {
    let meta = metadata_with_styled_import("styled");
    let mut expr = parse_expression("styled.span({ color: 'red' })");

    assert!(visit_styled(&mut expr, &meta));
    assert!(print_expression(&expr).contains("as: C = \"span\""));
  }

  #[test]
  fn transforms_component_composition() {
    let meta = metadata_with_styled_import("styled");
    let mut expr = parse_expression("styled(Button)`color: red;`");

    assert!(visit_styled(&mut expr, &meta));
    assert!(print_expression(&expr).contains("as: C = Button"));
  }

  #[test]
  fn concatenates_multiple_style_arguments() {
    let meta = metadata_with_styled_import("styled");
    let mut expr = parse_expression("styled.div({ color: 'red' }, { margin: 0 })");

    assert!(visit_styled(&mut expr, &meta));
    let state = meta.state();
    assert_eq!(state.sheets.len(), 2);
  }

  #[test]
  fn honours_the_recorded_local_name() {
    let meta = metadata_with_styled_import("myStyled");
    let mut expr = parse_expression("myStyled.div`color: red;`");

    assert!(visit_styled(&mut expr, &meta));
  }

  #[test]
  fn skips_unrelated_expressions() {
    let meta = metadata_with_styled_import("styled");
    let mut expr = parse_expression("notStyled.div`color: red;`");

    assert!(!visit_styled(&mut expr, &meta));
    assert!(matches!(expr, Expr::TaggedTpl(_)));
  }

  #[test]
  fn skips_everything_when_module_not_opted_in() {
    let state = TransformState::new(TransformFile::default(), PluginOptions::default());
    let meta = Metadata::new(Rc::new(RefCell::new(state)));
    let mut expr = parse_expression("styled.div`color: red;`");

    assert!(!visit_styled(&mut expr, &meta));
  }
}
