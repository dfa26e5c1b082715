//! Build-time CSS-in-JS extraction for SWC ASTs.
//!
//! The pass recognises two styling APIs on modules that import
//! `@compiled/core` — a `styled` component factory and a `css` JSX prop —
//! partially evaluates their style expressions into atomic CSS rules, and
//! rewrites each call site to reference hoisted rule constants plus the
//! `ax`/`CC`/`CS` runtime helpers. Styles the evaluator cannot fold
//! statically become CSS custom properties bound through the element's
//! inline style, so output is always semantically equivalent to the input.

use std::panic;
use std::rc::Rc;

use swc_core::ecma::ast::Program;
use swc_core::ecma::visit::VisitMutWith;

pub mod constants;
pub mod css;
pub mod css_prop;
pub mod errors;
pub mod hash;
pub mod styled;
pub mod types;
pub mod utils;
pub mod visitor;

pub use errors::{ErrorKind, TransformError};
pub use types::{
  CssOutput, Metadata, ModuleResolver, PluginOptions, TransformFile, TransformMetadata,
  TransformOutput, TransformState, Variable,
};
pub use visitor::CompiledCssExtract;

fn run(
  mut program: Program,
  file: TransformFile,
  options: PluginOptions,
  resolver: Option<Rc<dyn ModuleResolver>>,
) -> Result<TransformOutput, Vec<TransformError>> {
  panic::catch_unwind(panic::AssertUnwindSafe(|| {
    let mut transform = CompiledCssExtract::new(options);

    {
      let state = transform.state();
      let mut state = state.borrow_mut();
      state.file = file;
      state.resolver = resolver;
    }

    program.visit_mut_with(&mut transform);

    TransformOutput {
      program,
      metadata: transform.into_metadata(),
    }
  }))
  .map_err(|payload| vec![TransformError::from_panic(payload)])
}

/// Apply the extraction pass to a program, mutating it in place. Call-site
/// failures surface as diagnostics rather than aborting the process, so a
/// host may continue with other modules.
pub fn transform(
  program: Program,
  options: PluginOptions,
) -> Result<TransformOutput, Vec<TransformError>> {
  run(program, TransformFile::default(), options, None)
}

/// Like [`transform`], with file context for better diagnostic locations.
pub fn transform_with_file(
  program: Program,
  file: TransformFile,
  options: PluginOptions,
) -> Result<TransformOutput, Vec<TransformError>> {
  run(program, file, options, None)
}

/// Full-program mode: a [`ModuleResolver`] lets the evaluator inline
/// bindings imported from other modules. Without one they degrade to CSS
/// variables.
pub fn transform_with_resolver(
  program: Program,
  options: PluginOptions,
  resolver: Rc<dyn ModuleResolver>,
) -> Result<TransformOutput, Vec<TransformError>> {
  run(program, TransformFile::default(), options, Some(resolver))
}

/// Cheap pre-check a host can run on source text before parsing: modules
/// that never mention an enabling import source are left untouched.
pub fn should_transform(code: &str, options: &PluginOptions) -> bool {
  options
    .resolved_import_sources()
    .iter()
    .any(|source| code.contains(source.as_str()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn should_transform_detects_the_enabling_import() {
    let options = PluginOptions::default();
    assert!(should_transform(
      "import { styled } from '@compiled/core';",
      &options
    ));
    assert!(!should_transform("const x = 1;", &options));
  }

  #[test]
  fn should_transform_honours_extra_sources() {
    let options = PluginOptions {
      import_sources: vec!["@acme/styles".into()],
      ..PluginOptions::default()
    };
    assert!(should_transform("import '@acme/styles';", &options));
  }
}
