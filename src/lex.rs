use crate::error::EvalError;

/// Characters removed before scanning.
const WHITESPACE: [char; 2] = [' ', '\t'];

/// One raw lexeme of the whitespace-free input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub text: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// Splits validated input into lexemes.
///
/// Whitespace is removed first, so offsets refer to the compacted text. The
/// lexemes must tile the compacted text exactly; anything left between or
/// after them is reported as [`EvalError::Lexeme`].
pub fn tokenize(input: &str) -> Result<Vec<Lexeme>, EvalError> {
    let compact: String = input.chars().filter(|c| !WHITESPACE.contains(c)).collect();

    let mut lexemes = Vec::new();
    let mut prev_end = 0;
    while let Some((start, end)) = find_lexeme(&compact, prev_end) {
        if start != prev_end {
            return Err(gap(&compact, prev_end, start));
        }
        lexemes.push(Lexeme {
            text: compact[start..end].to_string(),
            start,
            end,
        });
        prev_end = end;
    }
    if prev_end != compact.len() {
        return Err(gap(&compact, prev_end, compact.len()));
    }

    log::trace!("tokenized {input:?} into {} lexemes", lexemes.len());
    Ok(lexemes)
}

fn gap(compact: &str, start: usize, end: usize) -> EvalError {
    EvalError::Lexeme {
        offset: start,
        text: compact[start..end].to_string(),
    }
}

/// Finds the first lexeme starting at or after `from`.
fn find_lexeme(text: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    // Lexemes only start on ASCII bytes, which are always char boundaries.
    (from..bytes.len())
        .find_map(|start| lexeme_len(&bytes[start..]).map(|len| (start, start + len)))
}

/// Length of the longest lexeme at the start of `bytes`.
fn lexeme_len(bytes: &[u8]) -> Option<usize> {
    match *bytes.first()? {
        b'(' | b')' | b'+' | b'-' | b'*' | b'/' => Some(1),
        b'0'..=b'9' => {
            let integer = digit_run(bytes);
            let fraction = match bytes.get(integer).copied() {
                Some(b'.') => match digit_run(&bytes[integer + 1..]) {
                    0 => 0,
                    digits => digits + 1,
                },
                _ => 0,
            };
            Some(integer + fraction)
        }
        _ => None,
    }
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
