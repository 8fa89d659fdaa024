use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::element::Element;

/// Count given to a token whose numeric suffix does not parse. One such
/// token voids the whole formula.
const UNPARSEABLE: i32 = 999_999;

const SEPARATORS: [char; 3] = ['[', ']', '.'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaPartKind {
    Element,
    Multiplier,
    Charge,
    Separator,
}

/// One token of a parsed formula.
///
/// `index` is the byte offset of the token in the input (after `·` has been
/// normalised to `.`). `count` is the element count, the multiplier, or the
/// signed charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoleculeFormulaPart {
    pub kind: FormulaPartKind,
    pub text: String,
    pub index: usize,
    pub count: i32,
}

impl MoleculeFormulaPart {
    pub fn new(kind: FormulaPartKind, text: impl Into<String>, index: usize, count: i32) -> Self {
        Self {
            kind,
            text: text.into(),
            index,
            count,
        }
    }
}

/// Element symbols longest first, then the charge and separator symbols.
static SYMBOL_TABLE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut symbols = Element::symbols_longest_first().to_vec();
    symbols.extend(["+", "-", "[", "]", "."]);
    symbols
});

/// Tokenize a formula string.
///
/// Returns an empty vector when nothing could be parsed: no element symbol
/// was found, a count was not numeric, or a chunk held text with no symbol
/// at all. An empty result means "not a formula", never "empty formula".
///
/// ```
/// use chemconv::formula::{parse_formula_into_parts, FormulaPartKind};
///
/// let parts = parse_formula_into_parts("2H2O");
/// assert_eq!(parts[0].kind, FormulaPartKind::Multiplier);
/// assert_eq!(parts[1].text, "H");
/// assert_eq!(parts[1].count, 2);
/// assert!(parse_formula_into_parts("C6H6x").is_empty());
/// ```
pub fn parse_formula_into_parts(input: &str) -> Vec<MoleculeFormulaPart> {
    let normalised = input.replace('·', ".");
    let mut parts = Vec::new();

    for (offset, chunk) in split_chunks(&normalised) {
        if chunk.len() == 1 && chunk.starts_with(SEPARATORS) {
            parts.push(MoleculeFormulaPart::new(
                FormulaPartKind::Separator,
                chunk,
                offset,
                0,
            ));
            continue;
        }
        match parse_chunk(chunk, offset) {
            Some(chunk_parts) => parts.extend(chunk_parts),
            None => return Vec::new(),
        }
    }

    if !parts.iter().any(|p| p.kind == FormulaPartKind::Element) {
        return Vec::new();
    }
    parts
}

/// Split on separators, keeping each separator as its own chunk.
fn split_chunks(text: &str) -> Vec<(usize, &str)> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        if SEPARATORS.contains(&ch) {
            if i > start {
                chunks.push((start, &text[start..i]));
            }
            chunks.push((i, &text[i..i + 1]));
            start = i + 1;
        }
    }
    if start < text.len() {
        chunks.push((start, &text[start..]));
    }
    chunks
}

/// First occurrence of each symbol, keyed by position.
///
/// Longer symbols are placed first, so an occurrence lying inside one of
/// them (the `C` of `Cu`) is passed over for the next. A symbol is recorded
/// once only; a repeat is left in the previous token's suffix and voids the
/// parse.
fn symbol_positions(chunk: &str) -> BTreeMap<usize, &'static str> {
    let mut found: BTreeMap<usize, &'static str> = BTreeMap::new();
    for &symbol in SYMBOL_TABLE.iter() {
        let first = chunk
            .match_indices(symbol)
            .map(|(idx, _)| idx)
            .find(|&idx| !inside_recorded(&found, idx));
        if let Some(idx) = first {
            found.insert(idx, symbol);
        }
    }
    found
}

fn inside_recorded(found: &BTreeMap<usize, &'static str>, idx: usize) -> bool {
    found
        .range(..=idx)
        .next_back()
        .is_some_and(|(&start, symbol)| idx < start + symbol.len())
}

fn parse_chunk(chunk: &str, offset: usize) -> Option<Vec<MoleculeFormulaPart>> {
    let positions: Vec<(usize, &'static str)> = symbol_positions(chunk).into_iter().collect();
    if positions.is_empty() {
        return if chunk.trim().is_empty() { Some(Vec::new()) } else { None };
    }

    let mut parts = Vec::with_capacity(positions.len() + 1);
    let first = positions[0].0;
    let leading = chunk[..first].trim();
    if !leading.is_empty() {
        let multiplier = leading.parse::<i32>().unwrap_or(UNPARSEABLE);
        if multiplier == UNPARSEABLE {
            return None;
        }
        parts.push(MoleculeFormulaPart::new(
            FormulaPartKind::Multiplier,
            leading,
            offset,
            multiplier,
        ));
    }

    for (i, &(start, symbol)) in positions.iter().enumerate() {
        let end = positions.get(i + 1).map_or(chunk.len(), |&(next, _)| next);
        let suffix = chunk[start + symbol.len()..end].trim();
        let mut count = if suffix.is_empty() {
            1
        } else {
            suffix.parse::<i32>().unwrap_or(UNPARSEABLE)
        };
        if count == UNPARSEABLE {
            return None;
        }
        let kind = match symbol {
            "+" | "-" => FormulaPartKind::Charge,
            _ => FormulaPartKind::Element,
        };
        if symbol == "-" {
            count = -count;
        }
        parts.push(MoleculeFormulaPart::new(kind, symbol, offset + start, count));
    }
    Some(parts)
}
