//! Minimal nested-CSS parser. Splits a raw style block into flat rules,
//! concatenating nested selectors onto their parent suffix. This is not a
//! general CSS parser: at-rules carry through as opaque wrapping contexts
//! and anything unparseable is preserved as a raw rule.

/// A single flattened rule extracted from a style block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedRule {
  /// One `property: value` declaration.
  Declaration {
    at_rules: Vec<String>,
    selectors: String,
    property: String,
    value: String,
  },
  /// Text the parser could not split into a declaration; passed through
  /// unchanged in the emitted sheet.
  Raw {
    at_rules: Vec<String>,
    selectors: String,
    text: String,
  },
}

/// Parse a raw CSS block into flat rules in source order.
pub fn parse_rules(css: &str) -> Vec<ParsedRule> {
  let mut rules = Vec::new();
  parse_block(css, &[], "", &mut rules);
  rules
}

fn parse_block(input: &str, at_rules: &[String], selectors: &str, out: &mut Vec<ParsedRule>) {
  let mut rest = input;

  while !rest.is_empty() {
    match next_segment(rest) {
      Segment::Declaration(text, remaining) => {
        push_declaration(text, at_rules, selectors, out);
        rest = remaining;
      }
      Segment::Block(header, body, remaining) => {
        let header = header.trim();
        if header.starts_with('@') {
          let mut nested = at_rules.to_vec();
          nested.push(collapse_whitespace(header));
          parse_block(body, &nested, selectors, out);
        } else {
          for part in split_top_level(header, ',') {
            let suffix = join_selector(selectors, part.trim());
            parse_block(body, at_rules, &suffix, out);
          }
        }
        rest = remaining;
      }
      Segment::Done => break,
    }
  }
}

enum Segment<'a> {
  /// Text up to a top-level `;` (or end of input).
  Declaration(&'a str, &'a str),
  /// `header { body }` with the remainder after the closing brace.
  Block(&'a str, &'a str, &'a str),
  Done,
}

/// Scan for whichever comes first at the top level: a `;` terminating a
/// declaration or a `{` opening a nested block. Quotes and parentheses are
/// respected so `url(a;b)` and `content: ";"` do not split early.
fn next_segment(input: &str) -> Segment<'_> {
  let bytes = input.as_bytes();
  let mut quote: Option<u8> = None;
  let mut parens = 0usize;

  for (index, &byte) in bytes.iter().enumerate() {
    if let Some(open) = quote {
      if byte == open {
        quote = None;
      }
      continue;
    }

    match byte {
      b'"' | b'\'' => quote = Some(byte),
      b'(' => parens += 1,
      b')' => parens = parens.saturating_sub(1),
      b';' if parens == 0 => {
        return Segment::Declaration(&input[..index], &input[index + 1..]);
      }
      b'{' if parens == 0 => {
        let Some(close) = matching_brace(input, index) else {
          // Unbalanced block: give up on structure, keep the text whole.
          return Segment::Declaration(input, "");
        };
        return Segment::Block(&input[..index], &input[index + 1..close], &input[close + 1..]);
      }
      _ => {}
    }
  }

  if input.trim().is_empty() {
    Segment::Done
  } else {
    Segment::Declaration(input, "")
  }
}

fn matching_brace(input: &str, open: usize) -> Option<usize> {
  let bytes = input.as_bytes();
  let mut depth = 0usize;
  let mut quote: Option<u8> = None;

  for (index, &byte) in bytes.iter().enumerate().skip(open) {
    if let Some(open_quote) = quote {
      if byte == open_quote {
        quote = None;
      }
      continue;
    }

    match byte {
      b'"' | b'\'' => quote = Some(byte),
      b'{' => depth += 1,
      b'}' => {
        depth -= 1;
        if depth == 0 {
          return Some(index);
        }
      }
      _ => {}
    }
  }

  None
}

fn split_top_level(input: &str, separator: char) -> Vec<&str> {
  let mut parts = Vec::new();
  let mut depth = 0usize;
  let mut start = 0usize;
  let mut quote: Option<char> = None;

  for (index, ch) in input.char_indices() {
    if let Some(open) = quote {
      if ch == open {
        quote = None;
      }
      continue;
    }

    match ch {
      '"' | '\'' => quote = Some(ch),
      '(' | '[' => depth += 1,
      ')' | ']' => depth = depth.saturating_sub(1),
      _ if ch == separator && depth == 0 => {
        parts.push(&input[start..index]);
        start = index + ch.len_utf8();
      }
      _ => {}
    }
  }

  parts.push(&input[start..]);
  parts
}

/// Concatenate a nested selector onto its parent suffix. `&` refers to the
/// parent class; bare element selectors become descendants.
fn join_selector(parent: &str, part: &str) -> String {
  if part.is_empty() {
    return parent.to_string();
  }

  if part.contains('&') {
    return part.replace('&', parent);
  }

  if part.starts_with(':') || part.starts_with('[') {
    return format!("{parent}{part}");
  }

  format!("{parent} {part}")
}

fn push_declaration(text: &str, at_rules: &[String], selectors: &str, out: &mut Vec<ParsedRule>) {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return;
  }

  if let Some(colon) = find_declaration_colon(trimmed) {
    let property = trimmed[..colon].trim();
    let value = collapse_whitespace(trimmed[colon + 1..].trim());
    if is_property_name(property) && !value.is_empty() {
      out.push(ParsedRule::Declaration {
        at_rules: at_rules.to_vec(),
        selectors: selectors.to_string(),
        property: property.to_string(),
        value,
      });
      return;
    }
  }

  out.push(ParsedRule::Raw {
    at_rules: at_rules.to_vec(),
    selectors: selectors.to_string(),
    text: collapse_whitespace(trimmed),
  });
}

fn find_declaration_colon(text: &str) -> Option<usize> {
  let mut quote: Option<u8> = None;
  for (index, &byte) in text.as_bytes().iter().enumerate() {
    if let Some(open) = quote {
      if byte == open {
        quote = None;
      }
      continue;
    }
    match byte {
      b'"' | b'\'' => quote = Some(byte),
      b':' => return Some(index),
      _ => {}
    }
  }
  None
}

fn is_property_name(name: &str) -> bool {
  !name.is_empty()
    && name
      .chars()
      .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

fn collapse_whitespace(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut in_whitespace = false;

  for ch in text.chars() {
    if ch.is_whitespace() {
      in_whitespace = true;
      continue;
    }
    if in_whitespace && !out.is_empty() {
      out.push(' ');
    }
    in_whitespace = false;
    out.push(ch);
  }

  out
}
