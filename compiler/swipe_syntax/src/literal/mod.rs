//! Go literal decoding: string/rune unquoting, integer and float values,
//! and Go-style quoting for generated code.

#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum LiteralError {
    #[error("invalid syntax in literal {0}")]
    Syntax(String),
}

/// Decode an interpreted (`"..."`) or raw (`` `...` ``) string literal.
pub fn unquote(lit: &str) -> Result<String, LiteralError> {
    let err = || LiteralError::Syntax(lit.to_string());
    if let Some(body) = lit.strip_prefix('`').and_then(|l| l.strip_suffix('`')) {
        return Ok(body.replace('\r', ""));
    }
    let body = lit
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .ok_or_else(err)?;
    let bytes = unescape(body, b'"').ok_or_else(err)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode a rune literal (`'a'`, `'\n'`, `'é'`) to its code point.
pub fn unquote_char(lit: &str) -> Result<u32, LiteralError> {
    let err = || LiteralError::Syntax(lit.to_string());
    let body = lit
        .strip_prefix('\'')
        .and_then(|l| l.strip_suffix('\''))
        .ok_or_else(err)?;
    if !body.starts_with('\\') {
        let mut chars = body.chars();
        let c = chars.next().ok_or_else(err)?;
        if chars.next().is_some() {
            return Err(err());
        }
        return Ok(u32::from(c));
    }
    let mut chars = body[1..].chars();
    let code = match chars.next().ok_or_else(err)? {
        'a' => 7,
        'b' => 8,
        'f' => 12,
        'n' => 10,
        'r' => 13,
        't' => 9,
        'v' => 11,
        '\\' => u32::from('\\'),
        '\'' => u32::from('\''),
        'x' => u32::from_str_radix(chars.as_str(), 16).map_err(|_| err())?,
        'u' | 'U' => u32::from_str_radix(chars.as_str(), 16).map_err(|_| err())?,
        c @ '0'..='7' => {
            let rest = format!("{c}{}", chars.as_str());
            u32::from_str_radix(&rest, 8).map_err(|_| err())?
        }
        _ => return Err(err()),
    };
    Ok(code)
}

fn unescape(body: &str, quote: u8) -> Option<Vec<u8>> {
    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let esc = *bytes.get(i + 1)?;
        i += 2;
        match esc {
            b'a' => out.push(7),
            b'b' => out.push(8),
            b'f' => out.push(12),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(11),
            b'\\' => out.push(b'\\'),
            c if c == quote => out.push(c),
            b'x' => {
                let hex = body.get(i..i + 2)?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 2;
            }
            b'0'..=b'7' => {
                let oct = body.get(i - 1..i + 2)?;
                out.push(u8::from_str_radix(oct, 8).ok()?);
                i += 2;
            }
            b'u' | b'U' => {
                let n = if esc == b'u' { 4 } else { 8 };
                let hex = body.get(i..i + n)?;
                let c = char::from_u32(u32::from_str_radix(hex, 16).ok()?)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                i += n;
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Value of an integer literal (`0x1F`, `0o17`, `017`, `0b1`, `1_000`).
pub fn parse_int(lit: &str) -> Option<i128> {
    let clean: String = lit.chars().filter(|&c| c != '_').collect();
    let lower = clean.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    i128::from_str_radix(digits, radix).ok()
}

/// Value of a float literal, including hexadecimal mantissas (`0x1p-2`).
pub fn parse_float(lit: &str) -> Option<f64> {
    let clean: String = lit.chars().filter(|&c| c != '_').collect();
    let clean = clean.strip_suffix('i').unwrap_or(&clean).to_string();
    let lower = clean.to_ascii_lowercase();
    let Some(hex) = lower.strip_prefix("0x") else {
        return lower.parse::<f64>().ok();
    };
    let (mantissa, exp) = match hex.split_once('p') {
        Some((m, e)) => (m, e.parse::<i32>().ok()?),
        None => (hex, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mut value = 0f64;
    for c in int_part.chars() {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }
    let mut scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        value += f64::from(c.to_digit(16)?) * scale;
        scale /= 16.0;
    }
    Some(value * 2f64.powi(exp))
}

/// Quote `s` as a Go interpreted string literal, like `strconv.Quote`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests;
