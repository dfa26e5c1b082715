//! The entry visitor: detects the enabling import, rewrites it, dispatches
//! styled and css-prop call sites, and finishes the module by inserting the
//! hoisted sheet constants and the React default import.

use std::cell::RefCell;
use std::rc::Rc;

use swc_core::common::{SyntaxContext, DUMMY_SP};
use swc_core::ecma::ast::{
  BindingIdent, Decl, Expr, Ident, ImportDecl, ImportNamedSpecifier, ImportSpecifier,
  ImportStarAsSpecifier, JSXElementChild, Lit, Module, ModuleDecl, ModuleExportName, ModuleItem,
  Pat, Stmt, Str, VarDecl, VarDeclKind, VarDeclarator,
};
use swc_core::ecma::visit::{noop_visit_mut_type, VisitMut, VisitMutWith};
use tracing::debug;

use crate::constants::RUNTIME_IMPORTS;
use crate::css_prop::{visit_css_prop, visit_css_prop_expr};
use crate::styled::visit_styled;
use crate::types::{
  CompiledImports, Metadata, ModuleBinding, PluginOptions, SharedTransformState, TransformFile,
  TransformMetadata, TransformState,
};
use crate::utils::ast::ident;

/// The CSS extraction pass over one module. Hosts running modules in
/// parallel must construct one visitor per module; all call-site state lives
/// on the shared [`TransformState`].
pub struct CompiledCssExtract {
  state: SharedTransformState,
}

impl CompiledCssExtract {
  pub fn new(options: PluginOptions) -> Self {
    Self::with_state(Rc::new(RefCell::new(TransformState::new(
      TransformFile::default(),
      options,
    ))))
  }

  pub fn with_state(state: SharedTransformState) -> Self {
    Self { state }
  }

  pub fn state(&self) -> SharedTransformState {
    Rc::clone(&self.state)
  }

  pub fn into_metadata(self) -> TransformMetadata {
    let state = self.state.borrow();
    TransformMetadata {
      style_rules: state.style_rules.iter().cloned().collect(),
    }
  }

  fn meta(&self) -> Metadata {
    Metadata::new(Rc::clone(&self.state))
  }

  /// Detect and rewrite the enabling import: remove a `styled` specifier
  /// (recording its local name) and append the runtime helpers.
  fn process_imports(&self, module: &mut Module) {
    let sources = self.state.borrow().opts.resolved_import_sources();

    let mut styled_locals: Vec<String> = Vec::new();
    let mut first_enabling: Option<usize> = None;

    for (index, item) in module.body.iter_mut().enumerate() {
      let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
        continue;
      };

      if !sources.iter().any(|s| s == import.src.value.as_ref()) {
        continue;
      }

      first_enabling.get_or_insert(index);

      import.specifiers.retain(|specifier| {
        let ImportSpecifier::Named(named) = specifier else {
          return true;
        };

        let imported_name = match &named.imported {
          Some(ModuleExportName::Ident(id)) => id.sym.as_ref(),
          Some(ModuleExportName::Str(s)) => s.value.as_ref(),
          None => named.local.sym.as_ref(),
        };

        if imported_name == "styled" {
          styled_locals.push(named.local.sym.as_ref().to_string());
          return false;
        }

        true
      });
    }

    let Some(enabling_index) = first_enabling else {
      return;
    };

    debug!(styled = ?styled_locals, "module opted in to css extraction");

    self.state.borrow_mut().compiled_imports = Some(CompiledImports {
      styled: styled_locals,
    });

    if let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = &mut module.body[enabling_index] {
      append_runtime_specifiers(import);
    }
  }

  /// Record module-scope bindings so the evaluator can resolve references.
  fn collect_module_scope(&self, module: &Module) {
    let mut state = self.state.borrow_mut();

    for item in &module.body {
      match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
          for specifier in &import.specifiers {
            match specifier {
              ImportSpecifier::Named(named) => {
                let export = match &named.imported {
                  Some(ModuleExportName::Ident(id)) => id.sym.as_ref().to_string(),
                  Some(ModuleExportName::Str(s)) => s.value.as_ref().to_string(),
                  None => named.local.sym.as_ref().to_string(),
                };
                state.module_scope.insert(
                  named.local.sym.as_ref().to_string(),
                  ModuleBinding::Import {
                    source: import.src.value.as_ref().to_string(),
                    export,
                  },
                );
              }
              ImportSpecifier::Default(default_spec) => {
                state.module_scope.insert(
                  default_spec.local.sym.as_ref().to_string(),
                  ModuleBinding::Import {
                    source: import.src.value.as_ref().to_string(),
                    export: "default".to_string(),
                  },
                );
              }
              ImportSpecifier::Namespace(_) => {}
            }
          }
        }
        ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => {
          collect_var_decl(&mut state, var);
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
          if let Decl::Var(var) = &export.decl {
            collect_var_decl(&mut state, var);
          }
        }
        _ => {}
      }
    }
  }

  /// Insert one `const` per hoisted sheet immediately after the leading
  /// import declarations, in first-use order.
  fn insert_sheet_declarations(&self, module: &mut Module) {
    let state = self.state.borrow();
    if state.sheets.is_empty() {
      return;
    }

    let mut declarations = Vec::with_capacity(state.sheets.len());
    for (sheet, id) in state.sheets.iter() {
      declarations.push(sheet_declaration(sheet, id.clone()));
    }
    drop(state);

    let insert_at = module
      .body
      .iter()
      .position(|item| !matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))))
      .unwrap_or(module.body.len());

    module.body.splice(insert_at..insert_at, declarations);
  }

  /// Guarantee the emitted JSX can be transpiled further: prepend
  /// `import * as React from 'react'` unless a `React` binding exists.
  fn ensure_react_import(&self, module: &mut Module) {
    if module_has_react_binding(module) {
      return;
    }

    let import = ImportDecl {
      span: DUMMY_SP,
      specifiers: vec![ImportSpecifier::Namespace(ImportStarAsSpecifier {
        span: DUMMY_SP,
        local: ident("React"),
      })],
      src: Box::new(Str {
        span: DUMMY_SP,
        value: "react".into(),
        raw: None,
      }),
      type_only: false,
      with: None,
      phase: Default::default(),
    };

    module
      .body
      .insert(0, ModuleItem::ModuleDecl(ModuleDecl::Import(import)));
  }
}

fn collect_var_decl(state: &mut TransformState, var: &VarDecl) {
  if var.kind != VarDeclKind::Const {
    return;
  }

  for declarator in &var.decls {
    let VarDeclarator {
      name: Pat::Ident(BindingIdent { id, .. }),
      init: Some(init),
      ..
    } = declarator
    else {
      continue;
    };

    state
      .module_scope
      .insert(id.sym.as_ref().to_string(), ModuleBinding::Const((**init).clone()));
  }
}

fn append_runtime_specifiers(import: &mut ImportDecl) {
  let existing: Vec<String> = import
    .specifiers
    .iter()
    .map(|specifier| match specifier {
      ImportSpecifier::Named(named) => named.local.sym.as_ref().to_string(),
      ImportSpecifier::Default(default_spec) => default_spec.local.sym.as_ref().to_string(),
      ImportSpecifier::Namespace(namespace) => namespace.local.sym.as_ref().to_string(),
    })
    .collect();

  for name in RUNTIME_IMPORTS {
    if existing.iter().any(|local| local == name) {
      continue;
    }

    import
      .specifiers
      .push(ImportSpecifier::Named(ImportNamedSpecifier {
        span: DUMMY_SP,
        local: ident(name),
        imported: None,
        is_type_only: false,
      }));
  }
}

fn sheet_declaration(sheet: &str, id: Ident) -> ModuleItem {
  ModuleItem::Stmt(Stmt::Decl(Decl::Var(Box::new(VarDecl {
    span: DUMMY_SP,
    ctxt: SyntaxContext::empty(),
    kind: VarDeclKind::Const,
    declare: false,
    decls: vec![VarDeclarator {
      span: DUMMY_SP,
      name: Pat::Ident(BindingIdent {
        id,
        type_ann: None,
      }),
      init: Some(Box::new(Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: sheet.into(),
        raw: None,
      })))),
      definite: false,
    }],
  }))))
}

fn module_has_react_binding(module: &Module) -> bool {
  module.body.iter().any(|item| match item {
    ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
      import.specifiers.iter().any(|specifier| match specifier {
        ImportSpecifier::Named(named) => named.local.sym.as_ref() == "React",
        ImportSpecifier::Default(default_spec) => default_spec.local.sym.as_ref() == "React",
        ImportSpecifier::Namespace(namespace) => namespace.local.sym.as_ref() == "React",
      })
    }
    ModuleItem::Stmt(Stmt::Decl(decl)) => decl_binds_react(decl),
    ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => decl_binds_react(&export.decl),
    _ => false,
  })
}

fn decl_binds_react(decl: &Decl) -> bool {
  match decl {
    Decl::Var(var) => var.decls.iter().any(|declarator| {
      matches!(&declarator.name, Pat::Ident(binding) if binding.id.sym.as_ref() == "React")
    }),
    Decl::Fn(fn_decl) => fn_decl.ident.sym.as_ref() == "React",
    Decl::Class(class_decl) => class_decl.ident.sym.as_ref() == "React",
    _ => false,
  }
}

impl VisitMut for CompiledCssExtract {
  noop_visit_mut_type!();

  fn visit_mut_module(&mut self, module: &mut Module) {
    self.process_imports(module);

    if !self.state.borrow().is_opted_in() {
      return;
    }

    self.collect_module_scope(module);
    module.visit_mut_children_with(self);
    self.insert_sheet_declarations(module);
    self.ensure_react_import(module);
  }

  fn visit_mut_expr(&mut self, expr: &mut Expr) {
    if !self.state.borrow().is_opted_in() {
      return;
    }

    // Children first: inner call sites are rewritten before their parents,
    // and replacement subtrees are never re-walked.
    expr.visit_mut_children_with(self);

    let meta = self.meta();
    if visit_styled(expr, &meta) {
      return;
    }
    visit_css_prop_expr(expr, &meta);
  }

  fn visit_mut_jsx_element_child(&mut self, child: &mut JSXElementChild) {
    if !self.state.borrow().is_opted_in() {
      return;
    }

    child.visit_mut_children_with(self);

    if let JSXElementChild::JSXElement(element) = child {
      let meta = self.meta();
      if let Some(replacement) = visit_css_prop(element, &meta) {
        *child = JSXElementChild::JSXElement(Box::new(replacement));
      }
    }
  }
}
