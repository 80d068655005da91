/*
 * Responsibility
 * - クライアントから来た uid (文字列 / 数値) を整数へ寄せる
 * - 先頭の数字だけを読む緩い変換。数字が無ければ NaN のまま builder へ渡す
 * - i64 に収まらない桁は倍精度に落とし、JS の数値表記で account にする
 */
use std::fmt;

/// Participant id after best-effort integer coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uid {
    Int(i64),
    /// An integral value beyond `i64`, held at double precision.
    Large(f64),
    /// No leading digits.
    NaN,
}

impl Uid {
    /// Read an optional sign and the leading decimal (or `0x` hex) digits of `raw`.
    ///
    /// Leading whitespace is skipped and everything after the digit run is
    /// ignored, so `" 42abc"` is 42 and `"abc"` is NaN.
    pub fn parse_leading(raw: &str) -> Self {
        let s = raw.trim_start();
        let (negative, s) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (radix, s) = match s.get(..2) {
            Some("0x") | Some("0X") => (16, &s[2..]),
            _ => (10, s),
        };

        let end = s
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(s.len());
        let digits = &s[..end];
        if digits.is_empty() {
            return Self::NaN;
        }

        match i64::from_str_radix(digits, radix) {
            Ok(v) => Self::Int(if negative { -v } else { v }),
            Err(_) => {
                let magnitude = wide_value(digits, radix);
                Self::Large(if negative { -magnitude } else { magnitude })
            }
        }
    }

    /// Coerce a JSON number the way it would be coerced after printing it.
    ///
    /// Ordinary magnitudes truncate toward zero. Magnitudes that print in
    /// exponent form keep only the leading mantissa digit (`1.5e21` -> 1).
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::NaN;
        }

        let magnitude = value.abs();
        if magnitude >= 1e21 || (magnitude != 0.0 && magnitude < 1e-6) {
            return Self::parse_leading(&format!("{:e}", value));
        }

        let truncated = value.trunc();
        if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
            Self::Int(truncated as i64)
        } else {
            Self::Large(truncated)
        }
    }

    /// String form packed into the token. Uid 0 means "any user" and packs as "".
    pub fn account(&self) -> String {
        match self {
            Uid::Int(0) => String::new(),
            other => other.to_string(),
        }
    }
}

/// Digit run too long for `i64`, at double precision.
fn wide_value(digits: &str, radix: u32) -> f64 {
    if radix == 10 {
        // Decimal parsing is correctly rounded; an absurd run becomes infinity.
        return digits.parse().unwrap_or(f64::INFINITY);
    }
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
}

/// Print an integral double the way JS `String(n)` does: plain digits below
/// 1e21, shortest-mantissa exponent form from there on.
fn integral_to_js_string(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: usize = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if exp >= 21 {
        let mantissa = match digits.split_at(1) {
            (lead, "") => lead.to_string(),
            (lead, rest) => format!("{lead}.{rest}"),
        };
        format!("{sign}{mantissa}e+{exp}")
    } else {
        format!("{sign}{digits:0<width$}", width = exp + 1)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uid::Int(n) => write!(f, "{n}"),
            Uid::Large(v) => f.write_str(&integral_to_js_string(*v)),
            Uid::NaN => f.write_str("NaN"),
        }
    }
}
