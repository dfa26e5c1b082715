//! End-to-end scenarios: source modules in, emitted JavaScript out.

mod support;

use compiled_css_extract::PluginOptions;
use support::{transform_default, transform_source};

#[test]
fn empty_css_object_assigns_a_stable_class_and_react_import() {
  let source = r#"
import '@compiled/core';

const el = <div css={{}}>hello</div>;
"#;

  let first = transform_default(source);
  let second = transform_default(source);

  assert!(first.contains("import * as React from 'react'") || first.contains("from \"react\""));
  assert!(first.contains("className=\"_"));
  assert!(first.contains(">hello</div>"));
  // No rules to inject, so no wrapper and no hoisted constants.
  assert!(!first.contains("<CC>"));
  assert!(!first.contains("const _ ="));
  assert_eq!(first, second);
}

#[test]
fn object_styles_split_into_atomic_rules() {
  let source = r#"
import '@compiled/core';

const el = <div css={{ fontSize: 20, color: 'blue' }}>text</div>;
"#;

  let (output, metadata) = transform_source(source, PluginOptions::default());

  assert!(output.contains("{font-size:20px}"));
  assert!(output.contains("{color:blue}"));
  assert!(output.contains("ax(["));
  assert!(output.contains("<CC>"));
  assert!(output.contains("<CS>"));
  assert_eq!(metadata.style_rules.len(), 2);
}

#[test]
fn nested_pseudo_selectors_extend_the_rule_selector() {
  let source = r#"
import '@compiled/core';

const el = <div css={{ ':hover': { color: 'blue' } }} />;
"#;

  let output = transform_default(source);
  assert!(output.contains(":hover{color:blue}"));
}

#[test]
fn identical_rules_hoist_to_a_single_constant() {
  let source = r#"
import '@compiled/core';

const a = <div css={{ fontSize: 12 }} />;
const b = <div css={{ fontSize: 12 }} />;
"#;

  let (output, metadata) = transform_source(source, PluginOptions::default());

  assert_eq!(metadata.style_rules.len(), 1);
  assert_eq!(output.matches("font-size:12px").count(), 1);
  // Both elements reference the hoisted identifier.
  assert_eq!(output.matches("{[_]}").count(), 2);
}

#[test]
fn identifier_values_become_css_variables_with_inline_style() {
  let source = r#"
import '@compiled/core';

const color = 'blue';
const el = <div css={{ color }} />;
"#;

  let output = transform_default(source);

  assert!(output.contains("{color:var(--_"));
  assert!(output.contains("style={{"));
  assert!(output.contains(": color"));
}

#[test]
fn styled_template_destructures_dynamic_props() {
  let source = r#"
import { styled } from '@compiled/core';

const S = styled.div`font-size: ${p => p.size}px;`;
"#;

  let output = transform_default(source);

  assert!(output.contains("React.forwardRef("));
  assert!(output.contains("size,"));
  assert!(output.contains("size + \"px\""));
  assert!(!output.contains("__cmplp.size"));
  assert!(output.contains("{font-size:var(--_"));
  assert!(output.contains("__cmplp.className"));
}

#[test]
fn styled_member_tags_emit_string_literal_elements() {
  let source = r#"
import { styled } from '@compiled/core';

const Heading = styled.h1({ fontWeight: 700 });
"#;

  let output = transform_default(source);

  assert!(output.contains("as: C = \"h1\""));
  assert!(output.contains("{font-weight:700}"));
}

#[test]
fn styled_composition_keeps_the_component_identifier() {
  let source = r#"
import { styled } from '@compiled/core';
import { Button } from './button';

const Primary = styled(Button)`color: red;`;
"#;

  let output = transform_default(source);
  assert!(output.contains("as: C = Button"));
}

#[test]
fn enabling_import_is_rewritten_with_runtime_helpers() {
  let source = r#"
import { styled } from '@compiled/core';

const S = styled.div`color: red;`;
"#;

  let output = transform_default(source);

  assert!(output.contains("{ ax, CC, CS }") || output.contains("{ax, CC, CS}"));
  assert!(!output.contains("styled } from '@compiled/core'"));
  assert!(!output.contains("{ styled"));
}

#[test]
fn aliased_styled_import_is_recognised() {
  let source = r#"
import { styled as s } from '@compiled/core';

const S = s.div`color: red;`;
"#;

  let output = transform_default(source);
  assert!(output.contains("React.forwardRef("));
}

#[test]
fn existing_class_names_merge_through_ax() {
  let source = r#"
import '@compiled/core';

const el = <div className="user" css={{ color: 'blue' }} />;
"#;

  let output = transform_default(source);

  assert!(output.contains("ax(["));
  assert!(output.contains("\"user\""));
}

#[test]
fn existing_style_attribute_merges_before_variables() {
  let source = r#"
import '@compiled/core';

const width = getWidth();
const el = <div style={{ display: 'block' }} css={{ width }} />;
"#;

  let output = transform_default(source);

  let display = output.find("display:").expect("original style entry kept");
  let variable = output.find("\"--_").expect("variable entry added");
  assert!(display < variable);
}

#[test]
fn nonce_option_threads_through_cs_elements() {
  let source = r#"
import '@compiled/core';

const el = <div css={{ color: 'blue' }} />;
"#;

  let options = PluginOptions {
    nonce: Some("__webpack_nonce__".into()),
    ..PluginOptions::default()
  };
  let (output, _) = transform_source(source, options);

  assert!(output.contains("nonce={__webpack_nonce__}"));
}

#[test]
fn modules_without_the_import_are_untouched() {
  let source = r#"
const styles = { color: 'red' };
const el = <div css={styles} />;
"#;

  let output = transform_default(source);

  assert!(output.contains("css={styles}"));
  assert!(!output.contains("React.forwardRef"));
  assert!(!output.contains("from 'react'") && !output.contains("from \"react\""));
}

#[test]
fn rules_are_shared_between_styled_and_css_prop_sites() {
  let source = r#"
import { styled } from '@compiled/core';

const S = styled.div`color: blue;`;
const el = <div css={{ color: 'blue' }} />;
"#;

  let (output, metadata) = transform_source(source, PluginOptions::default());

  assert_eq!(metadata.style_rules.len(), 1);
  assert_eq!(output.matches("color:blue").count(), 1);
}

#[test]
fn template_interpolations_of_static_bindings_inline() {
  let source = r#"
import { styled } from '@compiled/core';

const primary = 'blue';
const S = styled.div`color: ${primary};`;
"#;

  let output = transform_default(source);

  assert!(output.contains("{color:blue}"));
  assert!(!output.contains("var(--"));
}

#[test]
fn spread_styles_flatten_in_source_order() {
  let source = r#"
import '@compiled/core';

const base = { color: 'blue' };
const el = <div css={{ ...base, color: 'red' }} />;
"#;

  let output = transform_default(source);

  // Both rules survive; the runtime merger resolves last-wins by the shared
  // property-group prefix.
  assert!(output.contains("{color:blue}"));
  assert!(output.contains("{color:red}"));
}

#[test]
fn transform_is_deterministic() {
  let source = r#"
import { styled } from '@compiled/core';

const S = styled.div`
  color: ${p => p.color};
  :hover { opacity: 0.5; }
`;
const el = <div css={{ margin: 8 }} />;
"#;

  let (first, first_meta) = transform_source(source, PluginOptions::default());
  let (second, second_meta) = transform_source(source, PluginOptions::default());

  assert_eq!(first, second);
  assert_eq!(first_meta, second_meta);
}

#[test]
fn array_styles_concatenate() {
  let source = r#"
import '@compiled/core';

const el = <div css={[{ color: 'blue' }, { margin: 0 }]} />;
"#;

  let (_, metadata) = transform_source(source, PluginOptions::default());
  assert_eq!(metadata.style_rules.len(), 2);
}

#[test]
fn nested_css_prop_elements_are_transformed() {
  let source = r#"
import '@compiled/core';

const el = (
  <div css={{ color: 'blue' }}>
    <span css={{ color: 'red' }}>inner</span>
  </div>
);
"#;

  let (output, metadata) = transform_source(source, PluginOptions::default());

  assert_eq!(metadata.style_rules.len(), 2);
  assert!(output.contains("{color:red}"));
  assert!(output.contains(">inner</span>"));
}
