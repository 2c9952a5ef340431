use serde_json::Value;
use tracing::warn;

use crate::error::GenerateError;

const REASONING_OPEN: &str = "<think>";
const REASONING_CLOSE: &str = "</think>";

/// Extract the JSON object from raw model text.
///
/// Reasoning blocks are stripped first, then the greedy span from the
/// first `{` to the last `}` is parsed strictly. The greedy span can
/// over-capture when trailing prose contains braces; that approximation
/// is deliberate and surfaces as a `ParseError`.
pub fn extract_json_object(raw: &str) -> Result<Value, GenerateError> {
    let cleaned = strip_reasoning(raw);
    let text = cleaned.trim();

    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            warn!("no JSON object found in model output");
            return Err(GenerateError::NoJsonFound);
        }
    };

    serde_json::from_str(span).map_err(|e| {
        warn!("failed to parse model output as JSON: {e}");
        GenerateError::ParseError(e)
    })
}

/// Remove `<think>...</think>` blocks, then everything up to and
/// including any dangling close marker left by a truncated block.
fn strip_reasoning(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find(REASONING_OPEN) {
        let after_open = &rest[open + REASONING_OPEN.len()..];
        let Some(close) = after_open.find(REASONING_CLOSE) else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &after_open[close + REASONING_CLOSE.len()..];
    }
    out.push_str(rest);

    match out.rfind(REASONING_CLOSE) {
        Some(pos) => out[pos + REASONING_CLOSE.len()..].to_string(),
        None => out,
    }
}

#[cfg(test)]
mod tests {
    use super::strip_reasoning;

    #[test]
    fn strips_paired_blocks() {
        assert_eq!(
            strip_reasoning("<think>one</think>a<think>two</think>b"),
            "ab"
        );
    }

    #[test]
    fn strips_through_dangling_close() {
        assert_eq!(strip_reasoning("half a thought</think>payload"), "payload");
        assert_eq!(strip_reasoning("a</think>b</think>c"), "c");
    }

    #[test]
    fn leaves_unclosed_open_alone() {
        assert_eq!(strip_reasoning("x<think>never closed"), "x<think>never closed");
    }
}
