use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use swc_core::common::sync::Lrc;
use swc_core::common::SourceMap;
use swc_core::ecma::ast::{Expr, Ident};

use crate::constants::DEFAULT_IMPORT_SOURCES;

/// Options accepted by the transform. Deserializable so a plugin host can
/// pass JSON configuration straight through.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginOptions {
  /// Name of a nonce variable threaded onto every emitted `<CS>` element.
  pub nonce: Option<String>,
  /// Additional module specifiers that enable the transform, on top of the
  /// default import source.
  pub import_sources: Vec<String>,
}

impl PluginOptions {
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }

  /// The full list of enabling module specifiers.
  pub fn resolved_import_sources(&self) -> Vec<String> {
    DEFAULT_IMPORT_SOURCES
      .iter()
      .map(|source| source.to_string())
      .chain(self.import_sources.iter().cloned())
      .collect()
  }
}

/// Metadata collected while transforming one module.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformMetadata {
  /// Every emitted rule string, in first-emission order.
  pub style_rules: Vec<String>,
}

/// Result of a transform run: the mutated program plus collected metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformOutput {
  pub program: swc_core::ecma::ast::Program,
  pub metadata: TransformMetadata,
}

/// File-level context used to resolve spans in error messages.
#[derive(Clone)]
pub struct TransformFile {
  pub source_map: Lrc<SourceMap>,
  pub filename: Option<String>,
}

impl TransformFile {
  pub fn new(source_map: Lrc<SourceMap>, filename: Option<String>) -> Self {
    Self {
      source_map,
      filename,
    }
  }
}

impl Default for TransformFile {
  fn default() -> Self {
    Self::new(Lrc::new(SourceMap::default()), None)
  }
}

impl fmt::Debug for TransformFile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TransformFile")
      .field("filename", &self.filename)
      .finish()
  }
}

/// Resolves an imported binding to its defining expression. Supplied by
/// hosts running in full-program mode; without one, imported bindings
/// degrade to CSS variables.
pub trait ModuleResolver {
  fn resolve(&self, source: &str, export: &str) -> Option<Expr>;
}

/// Where a module-scope binding came from.
#[derive(Clone, Debug, PartialEq)]
pub enum ModuleBinding {
  /// A `const` declared in this module, with its initializer.
  Const(Expr),
  /// A named or default import from another module.
  Import { source: String, export: String },
}

/// Local names the user chose for the styled factory. Presence of this
/// record marks the module as opted in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledImports {
  pub styled: Vec<String>,
}

/// State shared across all call sites of one module compilation. Created
/// when a module enters the pass and discarded on exit; hosts running
/// modules in parallel must give each its own instance.
pub struct TransformState {
  pub compiled_imports: Option<CompiledImports>,
  pub opts: PluginOptions,
  pub file: TransformFile,
  /// Rule string → hoisted identifier. Write-once per key.
  pub sheets: IndexMap<String, Ident>,
  pub sheet_identifier_counter: usize,
  /// Every rule string emitted by this module, in first-emission order.
  pub style_rules: IndexSet<String>,
  /// Module-scope bindings collected before call sites are rewritten.
  pub module_scope: IndexMap<String, ModuleBinding>,
  pub resolver: Option<Rc<dyn ModuleResolver>>,
}

impl TransformState {
  pub fn new(file: TransformFile, opts: PluginOptions) -> Self {
    Self {
      compiled_imports: None,
      opts,
      file,
      sheets: IndexMap::new(),
      sheet_identifier_counter: 0,
      style_rules: IndexSet::new(),
      module_scope: IndexMap::new(),
      resolver: None,
    }
  }

  pub fn is_opted_in(&self) -> bool {
    self.compiled_imports.is_some()
  }
}

impl fmt::Debug for TransformState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TransformState")
      .field("compiled_imports", &self.compiled_imports)
      .field("opts", &self.opts)
      .field("sheet_identifier_counter", &self.sheet_identifier_counter)
      .finish()
  }
}

/// Shared pointer to the transform state.
pub type SharedTransformState = Rc<RefCell<TransformState>>;

/// Handle threaded through helpers during traversal.
#[derive(Clone, Debug)]
pub struct Metadata {
  pub state: SharedTransformState,
}

impl Metadata {
  pub fn new(state: SharedTransformState) -> Self {
    Self { state }
  }

  pub fn state(&self) -> Ref<'_, TransformState> {
    self.state.borrow()
  }

  pub fn state_mut(&self) -> RefMut<'_, TransformState> {
    self.state.borrow_mut()
  }
}

/// Tag information for styled components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagType {
  /// An HTML element, emitted as a string literal JSX tag.
  InBuiltComponent,
  /// A referenced component, emitted as an identifier.
  UserDefinedComponent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
  pub name: String,
  pub tag_type: TagType,
}

/// A CSS variable binding attached to a style expression. `prefix` and
/// `suffix` hold text lifted off the static CSS around a dynamic
/// interpolation (a unit, quote, or `url(` wrapper) that must be re-applied
/// to the runtime value.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
  pub name: String,
  pub expression: Expr,
  pub prefix: Option<String>,
  pub suffix: Option<String>,
}

/// Normalised output of the style evaluator: raw CSS text plus the dynamic
/// variable bindings it references.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CssOutput {
  pub css: String,
  pub variables: Vec<Variable>,
}

impl CssOutput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a variable binding, coalescing duplicates by name so later
  /// occurrences reuse the first entry.
  pub fn push_variable(&mut self, variable: Variable) {
    if self.variables.iter().any(|v| v.name == variable.name) {
      return;
    }
    self.variables.push(variable);
  }

  /// Append another output: CSS text concatenates, variables coalesce.
  pub fn extend(&mut self, other: CssOutput) {
    self.css.push_str(&other.css);
    for variable in other.variables {
      self.push_variable(variable);
    }
  }

  pub fn is_empty(&self) -> bool {
    self.css.trim().is_empty() && self.variables.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use swc_core::common::DUMMY_SP;
  use swc_core::ecma::ast::{Expr, Lit, Str};

  use super::*;

  fn string_expr(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str {
      span: DUMMY_SP,
      value: value.into(),
      raw: None,
    }))
  }

  #[test]
  fn options_parse_from_json() {
    let options = PluginOptions::from_json(r#"{ "nonce": "__webpack_nonce__" }"#).unwrap();
    assert_eq!(options.nonce.as_deref(), Some("__webpack_nonce__"));
    assert!(options.import_sources.is_empty());
  }

  #[test]
  fn import_sources_extend_the_default() {
    let options = PluginOptions {
      import_sources: vec!["@acme/styles".into()],
      ..PluginOptions::default()
    };
    let sources = options.resolved_import_sources();
    assert_eq!(sources, vec!["@compiled/core", "@acme/styles"]);
  }

  #[test]
  fn variables_coalesce_by_first_occurrence() {
    let mut output = CssOutput::new();
    output.push_variable(Variable {
      name: "--_a".into(),
      expression: string_expr("first"),
      prefix: None,
      suffix: None,
    });
    output.push_variable(Variable {
      name: "--_a".into(),
      expression: string_expr("second"),
      prefix: None,
      suffix: None,
    });

    assert_eq!(output.variables.len(), 1);
    assert_eq!(output.variables[0].expression, string_expr("first"));
  }

  #[test]
  fn extend_concatenates_css_in_order() {
    let mut first = CssOutput {
      css: "color: blue;".into(),
      variables: Vec::new(),
    };
    first.extend(CssOutput {
      css: "margin: 0;".into(),
      variables: Vec::new(),
    });
    assert_eq!(first.css, "color: blue;margin: 0;");
  }
}
