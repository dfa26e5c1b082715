//! Shared helpers for the end-to-end transform tests: parse a module,
//! run the pass, and emit the result back to JavaScript for assertions.

use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, Globals, SourceMap, GLOBALS};
use swc_core::ecma::ast::Program;
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::codegen::{Config, Emitter};
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{EsSyntax, Parser, StringInput, Syntax};

use compiled_css_extract::{transform, PluginOptions, TransformMetadata};

pub fn parse_program(source: &str) -> (Program, Lrc<SourceMap>) {
  let cm: Lrc<SourceMap> = Default::default();
  let fm = cm.new_source_file(
    FileName::Custom("test.tsx".into()).into(),
    source.to_string(),
  );
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
  let module = parser.parse_module().expect("fixture should parse");
  (Program::Module(module), cm)
}

pub fn emit_program(program: &Program, cm: Lrc<SourceMap>) -> String {
  let mut buffer = Vec::new();

  {
    let writer = JsWriter::new(cm.clone(), "\n", &mut buffer, None);
    let mut emitter = Emitter {
      cfg: Config::default(),
      comments: None,
      cm,
      wr: writer,
    };
    emitter.emit_program(program).expect("emit program");
  }

  String::from_utf8(buffer).expect("emitted code is utf8")
}

pub fn transform_source(source: &str, options: PluginOptions) -> (String, TransformMetadata) {
  GLOBALS.set(&Globals::new(), || {
    let (program, cm) = parse_program(source);
    let output = transform(program, options).expect("transform should succeed");
    (emit_program(&output.program, cm), output.metadata)
  })
}

pub fn transform_default(source: &str) -> String {
  transform_source(source, PluginOptions::default()).0
}
