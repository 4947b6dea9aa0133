//! Number formatting for axis and colorbar tick labels.
//!
//! Specifiers use the familiar `[sign][$][0][width][,][.precision][~][type]`
//! mini-language. Negative numbers are rendered with a typographic minus sign
//! (U+2212) so labels line up with the rest of the visualization text.

use std::fmt;

use crate::error::{VisError, VisResult};

use super::Domain;
use super::interpolate::round_half_up;
use super::ticks::tick_step;

const MINUS: char = '\u{2212}';
const DEFAULT_SPECIFIER: &str = ",f";
const DEFAULT_GENERAL_PRECISION: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatSign {
    /// Minus for negatives, nothing for positives.
    #[default]
    Minus,
    /// Plus for positives and zero.
    Plus,
    /// Parentheses around negatives.
    Parentheses,
    /// Space for positives and zero.
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatType {
    /// Shortest significant-digit form without an explicit type.
    #[default]
    None,
    Fixed,
    Exponent,
    Percent,
    Integer,
    Rounded,
    General,
}

impl FormatType {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'f' => Some(Self::Fixed),
            'e' => Some(Self::Exponent),
            '%' => Some(Self::Percent),
            'd' => Some(Self::Integer),
            'r' => Some(Self::Rounded),
            'g' => Some(Self::General),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Fixed => "f",
            Self::Exponent => "e",
            Self::Percent => "%",
            Self::Integer => "d",
            Self::Rounded => "r",
            Self::General => "g",
        }
    }
}

/// Parsed number format specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatSpecifier {
    pub sign: FormatSign,
    pub currency: bool,
    pub zero: bool,
    pub width: Option<usize>,
    pub comma: bool,
    pub precision: Option<usize>,
    pub trim: bool,
    pub kind: FormatType,
}

impl FormatSpecifier {
    pub fn parse(input: &str) -> VisResult<Self> {
        let invalid = || VisError::InvalidFormatSpecifier(input.to_owned());
        let mut spec = Self::default();
        let mut chars = input.chars().peekable();

        if let Some(&c) = chars.peek() {
            let sign = match c {
                '-' => Some(FormatSign::Minus),
                '+' => Some(FormatSign::Plus),
                '(' => Some(FormatSign::Parentheses),
                ' ' => Some(FormatSign::Space),
                _ => None,
            };
            if let Some(sign) = sign {
                spec.sign = sign;
                chars.next();
            }
        }
        if chars.next_if_eq(&'$').is_some() {
            spec.currency = true;
        }
        if chars.next_if_eq(&'0').is_some() {
            spec.zero = true;
        }

        let mut width = String::new();
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            width.push(digit);
        }
        if !width.is_empty() {
            spec.width = Some(width.parse().map_err(|_| invalid())?);
        }

        if chars.next_if_eq(&',').is_some() {
            spec.comma = true;
        }
        if chars.next_if_eq(&'.').is_some() {
            let mut precision = String::new();
            while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                precision.push(digit);
            }
            if precision.is_empty() {
                return Err(invalid());
            }
            spec.precision = Some(precision.parse().map_err(|_| invalid())?);
        }
        if chars.next_if_eq(&'~').is_some() {
            spec.trim = true;
        }
        if let Some(c) = chars.next() {
            spec.kind = FormatType::from_char(c).ok_or_else(invalid)?;
        }
        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(spec)
    }

    /// Returns a formatter with this specifier, filling defaults the same way
    /// an explicit `~g` with twelve significant digits would. Precision is
    /// clamped to 1..=21 significant digits or 0..=20 fraction digits.
    #[must_use]
    pub fn formatter(self) -> TickFormatter {
        let mut spec = self;
        if spec.kind == FormatType::None {
            spec.precision.get_or_insert(DEFAULT_GENERAL_PRECISION);
            spec.trim = true;
        }
        let (lowest, highest) = match spec.kind {
            FormatType::None | FormatType::Rounded | FormatType::General => (1, 21),
            _ => (0, 20),
        };
        if let Some(precision) = spec.precision.as_mut() {
            *precision = (*precision).clamp(lowest, highest);
        }
        TickFormatter { spec }
    }
}

impl fmt::Display for FormatSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            FormatSign::Minus => {}
            FormatSign::Plus => f.write_str("+")?,
            FormatSign::Parentheses => f.write_str("(")?,
            FormatSign::Space => f.write_str(" ")?,
        }
        if self.currency {
            f.write_str("$")?;
        }
        if self.zero {
            f.write_str("0")?;
        }
        if let Some(width) = self.width {
            write!(f, "{width}")?;
        }
        if self.comma {
            f.write_str(",")?;
        }
        if let Some(precision) = self.precision {
            write!(f, ".{precision}")?;
        }
        if self.trim {
            f.write_str("~")?;
        }
        f.write_str(self.kind.as_str())
    }
}

/// Formats tick values with a resolved specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickFormatter {
    spec: FormatSpecifier,
}

impl TickFormatter {
    /// Builds a formatter for ticks of `domain`.
    ///
    /// Without an explicit precision in `specifier`, precision is derived from
    /// the tick step so adjacent labels stay distinguishable: a step of `0.2`
    /// yields one decimal, a step of `2` none.
    pub fn for_domain(domain: Domain, count: usize, specifier: Option<&str>) -> VisResult<Self> {
        let (start, stop) = domain;
        let step = tick_step(start, stop, count);
        let mut spec = FormatSpecifier::parse(specifier.unwrap_or(DEFAULT_SPECIFIER))?;

        if spec.precision.is_none() {
            let resolved = match spec.kind {
                FormatType::None | FormatType::Rounded | FormatType::General => {
                    precision_round(step, start.abs().max(stop.abs()))
                }
                FormatType::Exponent => {
                    precision_round(step, start.abs().max(stop.abs())).map(|p| p.saturating_sub(1))
                }
                FormatType::Fixed => precision_fixed(step),
                FormatType::Percent => precision_fixed(step).map(|p| p.saturating_sub(2)),
                FormatType::Integer => None,
            };
            spec.precision = resolved;
        }

        Ok(spec.formatter())
    }

    #[must_use]
    pub fn specifier(&self) -> FormatSpecifier {
        self.spec
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        let spec = self.spec;
        let mut negative = value < 0.0 || (value == 0.0 && value.is_sign_negative());
        let mut body = format_magnitude(value.abs(), spec.kind, spec.precision);
        if spec.trim {
            body = trim_insignificant(&body);
        }
        if negative && is_zero_text(&body) && spec.sign != FormatSign::Plus {
            negative = false;
        }

        let mut prefix = String::new();
        if negative {
            prefix.push(if spec.sign == FormatSign::Parentheses {
                '('
            } else {
                MINUS
            });
        } else {
            match spec.sign {
                FormatSign::Plus => prefix.push('+'),
                FormatSign::Space => prefix.push(' '),
                FormatSign::Minus | FormatSign::Parentheses => {}
            }
        }
        if spec.currency {
            prefix.push('$');
        }

        let split = body
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(body.len());
        let mut suffix = body.split_off(split);
        if negative && spec.sign == FormatSign::Parentheses {
            suffix.push(')');
        }

        let width = spec.width.unwrap_or(0);
        if spec.comma && !spec.zero {
            body = group_thousands(&body, usize::MAX);
        }
        let length = prefix.chars().count() + body.chars().count() + suffix.chars().count();
        let padding = width.saturating_sub(length);

        if spec.zero {
            let padded = format!("{}{body}", "0".repeat(padding));
            body = if spec.comma {
                let limit = if padding > 0 {
                    width.saturating_sub(suffix.chars().count())
                } else {
                    usize::MAX
                };
                group_thousands(&padded, limit)
            } else {
                padded
            };
            format!("{prefix}{body}{suffix}")
        } else {
            format!("{}{prefix}{body}{suffix}", " ".repeat(padding))
        }
    }
}

/// Decimal exponent of `value` in scientific notation.
fn decimal_exponent(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some(0);
    }
    let formatted = format!("{:e}", value.abs());
    let (_, exponent) = formatted.split_once('e')?;
    exponent.parse().ok()
}

/// Decimal places needed to distinguish multiples of `step` in fixed notation.
#[must_use]
pub fn precision_fixed(step: f64) -> Option<usize> {
    decimal_exponent(step).map(|e| usize::try_from(-e).unwrap_or(0))
}

/// Significant digits needed to distinguish multiples of `step` up to `max`.
#[must_use]
pub fn precision_round(step: f64, max: f64) -> Option<usize> {
    let step = step.abs();
    let max = max.abs() - step;
    let step_exponent = decimal_exponent(step)?;
    let max_exponent = decimal_exponent(max).unwrap_or(0);
    Some(usize::try_from(max_exponent - step_exponent).unwrap_or(0) + 1)
}

fn format_magnitude(value: f64, kind: FormatType, precision: Option<usize>) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return "Infinity".to_owned();
    }

    match kind {
        FormatType::Fixed => fixed_notation(value, precision.unwrap_or(6)),
        FormatType::Exponent => exponent_notation(value, precision.unwrap_or(6)),
        FormatType::Percent => format!("{}%", fixed_notation(value * 100.0, precision.unwrap_or(6))),
        FormatType::Integer => format!("{:.0}", round_half_up(value)),
        FormatType::Rounded => significant_fixed(value, precision.unwrap_or(6).max(1)),
        FormatType::General | FormatType::None => {
            general_notation(value, precision.unwrap_or(6).max(1))
        }
    }
}

/// Number of fraction digits in the exact decimal expansion of `value`.
fn fraction_digits(value: f64) -> usize {
    let bits = value.to_bits();
    let biased = i32::try_from((bits >> 52) & 0x7ff).unwrap_or(0);
    let mantissa = bits & ((1 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (mantissa, -1074)
    } else {
        (mantissa | (1 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return 0;
    }
    let exponent = exponent + i32::try_from(mantissa.trailing_zeros()).unwrap_or(0);
    usize::try_from(-exponent).unwrap_or(0)
}

/// Significant digits of the exact decimal expansion of a finite positive
/// `value`, and the power of ten of the first one.
fn exact_digits(value: f64) -> (Vec<u8>, i32) {
    let text = format!("{:.*}", fraction_digits(value), value);
    let (integer, fraction) = text.split_once('.').unwrap_or((&text, ""));
    let mut digits: Vec<u8> = integer.bytes().chain(fraction.bytes()).collect();
    let leading = digits.iter().take_while(|&&digit| digit == b'0').count();
    digits.drain(..leading);
    while digits.last() == Some(&b'0') {
        digits.pop();
    }
    let exponent = i32::try_from(integer.len()).unwrap_or(i32::MAX)
        - 1
        - i32::try_from(leading).unwrap_or(0);
    (digits, exponent)
}

/// Rounds `digits` half up to `keep` digits. A carry out of the first digit
/// prepends a `1` and raises the exponent by one.
fn round_digits(digits: &[u8], exponent: i32, keep: usize) -> (Vec<u8>, i32) {
    let mut kept: Vec<u8> = digits.iter().copied().take(keep).collect();
    kept.resize(keep, b'0');
    if digits.get(keep).is_none_or(|&digit| digit < b'5') {
        return (kept, exponent);
    }
    for digit in kept.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return (kept, exponent);
        }
    }
    kept.insert(0, b'1');
    (kept, exponent + 1)
}

fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|&digit| char::from(digit)).collect()
}

/// Fixed notation with `decimals` fraction digits, ties rounded up.
fn fixed_notation(value: f64, decimals: usize) -> String {
    let mut scaled = String::new();
    if value > 0.0 {
        let (exact, exponent) = exact_digits(value);
        let keep = i64::from(exponent)
            .saturating_add(1)
            .saturating_add(i64::try_from(decimals).unwrap_or(i64::MAX));
        if let Ok(keep) = usize::try_from(keep) {
            let (kept, _) = round_digits(&exact, exponent, keep);
            scaled = digits_to_string(&kept);
        }
    }

    let padded = format!(
        "{:0>width$}",
        scaled.trim_start_matches('0'),
        width = decimals + 1
    );
    if decimals == 0 {
        return padded;
    }
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    format!("{integer}.{fraction}")
}

/// `1.5e+3` style exponent notation with `digits` fraction digits.
fn exponent_notation(value: f64, digits: usize) -> String {
    let (digits, exponent) = significant_parts(value, digits + 1);
    let (lead, rest) = digits.split_at(1);
    let sign = if exponent < 0 { "" } else { "+" };
    if rest.is_empty() {
        format!("{lead}e{sign}{exponent}")
    } else {
        format!("{lead}.{rest}e{sign}{exponent}")
    }
}

/// Splits `value` rounded to `digits` significant digits into digit string and exponent.
fn significant_parts(value: f64, digits: usize) -> (String, i32) {
    if value == 0.0 {
        return ("0".repeat(digits), 0);
    }
    let (exact, exponent) = exact_digits(value);
    let (mut kept, exponent) = round_digits(&exact, exponent, digits);
    kept.truncate(digits);
    (digits_to_string(&kept), exponent)
}

/// Fixed notation rounded to `digits` significant digits.
fn significant_fixed(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return if digits > 1 {
            format!("0.{}", "0".repeat(digits - 1))
        } else {
            "0".to_owned()
        };
    }

    let (digits, exponent) = significant_parts(value, digits);
    if exponent < 0 {
        let leading = usize::try_from(-exponent - 1).unwrap_or(0);
        return format!("0.{}{digits}", "0".repeat(leading));
    }

    let integer_len = usize::try_from(exponent).unwrap_or(0) + 1;
    if digits.len() <= integer_len {
        format!("{digits}{}", "0".repeat(integer_len - digits.len()))
    } else {
        format!("{}.{}", &digits[..integer_len], &digits[integer_len..])
    }
}

/// Significant-digit notation switching to exponent form for very small or large values.
fn general_notation(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return significant_fixed(value, digits);
    }
    let (_, exponent) = significant_parts(value, digits);
    let digits_i32 = i32::try_from(digits).unwrap_or(i32::MAX);
    if exponent < -6 || exponent >= digits_i32 {
        exponent_notation(value, digits - 1)
    } else {
        significant_fixed(value, digits)
    }
}

/// Removes insignificant trailing zeros (and a dangling decimal point).
fn trim_insignificant(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut trim_start: Option<usize> = None;
    let mut trim_end = 0;

    for (index, &byte) in bytes.iter().enumerate().skip(1) {
        match byte {
            b'.' => {
                trim_start = Some(index);
                trim_end = index;
            }
            b'0' => {
                if trim_start == Some(0) {
                    trim_start = Some(index);
                }
                trim_end = index;
            }
            b'1'..=b'9' => {
                if trim_start.is_some_and(|start| start > 0) {
                    trim_start = Some(0);
                }
            }
            _ => break,
        }
    }

    match trim_start {
        Some(start) if start > 0 => format!("{}{}", &text[..start], &text[trim_end + 1..]),
        _ => text.to_owned(),
    }
}

fn is_zero_text(text: &str) -> bool {
    let mantissa = text.split('e').next().unwrap_or(text);
    mantissa.chars().any(|c| c.is_ascii_digit()) && !mantissa.chars().any(|c| matches!(c, '1'..='9'))
}

/// Inserts `,` every three integer digits, stopping once `width` is reached.
fn group_thousands(digits: &str, width: usize) -> String {
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();
    let mut length = 0usize;

    while end > 0 {
        let mut size = 3usize;
        if length.saturating_add(size + 1) > width {
            size = width.saturating_sub(length).max(1);
        }
        let start = end.saturating_sub(size);
        groups.push(&digits[start..end]);
        end = start;
        length = length.saturating_add(size + 1);
        if length > width {
            break;
        }
    }

    groups.reverse();
    groups.join(",")
}
