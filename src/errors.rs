use std::any::Any;

use serde::{Deserialize, Serialize};
use swc_core::common::{SourceMap, Span};
use thiserror::Error;

/// Category of a transform failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
  /// A styling expression the pass refuses to process, e.g. an empty JSX
  /// expression in a `css` attribute slot.
  UnsupportedExpression,
  /// The transform panicked; the payload is preserved as the message.
  Unexpected,
}

/// Error surfaced to the host framework. Fatal for the call site that raised
/// it; the host may choose to continue with other modules.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct TransformError {
  pub kind: ErrorKind,
  pub message: String,
  /// `file:line:column` when the source map could resolve the span.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub loc: Option<String>,
}

impl TransformError {
  pub fn unsupported(message: impl Into<String>, loc: Option<String>) -> Self {
    Self {
      kind: ErrorKind::UnsupportedExpression,
      message: message.into(),
      loc,
    }
  }

  /// Convert a caught panic payload into a diagnostic. Call-site errors are
  /// raised as panics carrying a formatted message, so this is the single
  /// funnel from the visitor back to the host.
  pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
    let message = if let Some(text) = payload.downcast_ref::<String>() {
      text.clone()
    } else if let Some(text) = payload.downcast_ref::<&str>() {
      (*text).to_string()
    } else {
      "unknown transform failure".to_string()
    };

    Self {
      kind: ErrorKind::Unexpected,
      message,
      loc: None,
    }
  }
}

/// Format an error message with the source location appended, when the span
/// is real and a source map is available to resolve it.
pub fn format_with_location(
  message: &str,
  span: Option<Span>,
  source_map: Option<&SourceMap>,
) -> String {
  let Some(span) = span else {
    return message.to_string();
  };

  if span.lo.is_dummy() || span.hi.is_dummy() {
    return message.to_string();
  }

  match source_map {
    Some(cm) => {
      let pos = cm.lookup_char_pos(span.lo);
      format!(
        "{} ({}:{}:{})",
        message,
        pos.file.name,
        pos.line,
        pos.col_display + 1
      )
    }
    None => message.to_string(),
  }
}
