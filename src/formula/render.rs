use super::parts::{FormulaPartKind, MoleculeFormulaPart};

/// Space-separated text, the form CML stores as `concise`: `C 6 H 6 -`.
///
/// Element counts are always written. Multipliers and separators are copied
/// verbatim. A zero charge is dropped, a unit charge is the bare sign and
/// any other charge is the sign followed by its magnitude.
pub fn formula_parts_as_string(parts: &[MoleculeFormulaPart]) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(parts.len());
    for part in parts {
        match part.kind {
            FormulaPartKind::Element => tokens.push(format!("{} {}", part.text, part.count)),
            FormulaPartKind::Multiplier | FormulaPartKind::Separator => {
                tokens.push(part.text.clone())
            }
            FormulaPartKind::Charge => match part.count.unsigned_abs() {
                0 => {}
                1 => tokens.push(part.text.clone()),
                n => tokens.push(format!("{}{}", part.text, n)),
            },
        }
    }
    tokens.join(" ")
}

/// Display text with subscript counts and superscript charges: `SO₄²⁻`.
pub fn formula_parts_as_unicode(parts: &[MoleculeFormulaPart]) -> String {
    let mut out = String::new();
    for part in parts {
        match part.kind {
            FormulaPartKind::Element => {
                out.push_str(&part.text);
                if part.count != 1 {
                    out.extend(part.count.unsigned_abs().to_string().chars().map(subscript));
                }
            }
            FormulaPartKind::Multiplier | FormulaPartKind::Separator => out.push_str(&part.text),
            FormulaPartKind::Charge => {
                let magnitude = part.count.unsigned_abs();
                if magnitude == 0 {
                    continue;
                }
                if magnitude > 1 {
                    out.extend(magnitude.to_string().chars().map(superscript));
                }
                out.push(if part.count > 0 { '⁺' } else { '⁻' });
            }
        }
    }
    out
}

fn subscript(digit: char) -> char {
    match digit.to_digit(10) {
        Some(d) => char::from_u32(0x2080 + d).unwrap_or(digit),
        None => digit,
    }
}

fn superscript(digit: char) -> char {
    match digit {
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        _ => match digit.to_digit(10) {
            Some(d) => char::from_u32(0x2070 + d).unwrap_or(digit),
            None => digit,
        },
    }
}
