use std::fmt::Write;

use crate::interpreter::value::{
    complex::ComplexNumber,
    core::Value,
    na::{Logical, NA_INTEGER, is_na_real},
    vector::{Vector, VectorData},
};

/// Significant digits used by `print`.
pub const PRINT_DIGITS: usize = 7;
/// Significant digits used by `as.character`.
pub const CHARACTER_DIGITS: usize = 15;
/// Console width used to wrap printed vectors.
const LINE_WIDTH: usize = 80;

/// Splits `x` into the shortest mantissa with at most `digits` significant
/// digits and its decimal exponent.
fn significant(x: f64, digits: usize) -> (String, i32) {
    let sci = format!("{:.*e}", digits.saturating_sub(1), x.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((&sci, "0"));
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    (mantissa.to_string(), exponent.parse().unwrap_or(0))
}

fn special(x: f64) -> Option<&'static str> {
    if is_na_real(x) {
        Some("NA")
    } else if x.is_nan() {
        Some("NaN")
    } else if x == f64::INFINITY {
        Some("Inf")
    } else if x == f64::NEG_INFINITY {
        Some("-Inf")
    } else {
        None
    }
}

fn scientific(x: f64, mantissa: &str, exponent: i32) -> String {
    let sign = if x < 0.0 { "-" } else { "" };
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{sign}{mantissa}e{exp_sign}{:02}", exponent.unsigned_abs())
}

fn decimals_for(mantissa: &str, exponent: i32) -> usize {
    let sig = mantissa.chars().filter(char::is_ascii_digit).count();
    let sig = i32::try_from(sig).unwrap_or(i32::MAX);
    usize::try_from((sig - 1 - exponent).max(0)).unwrap_or(0)
}

/// Formats a double with at most `digits` significant digits, choosing
/// fixed or scientific notation by whichever is narrower (fixed on ties).
///
/// # Example
/// ```
/// use statcore::interpreter::value::{NA_REAL, format::format_double};
///
/// assert_eq!(format_double(0.1, 15), "0.1");
/// assert_eq!(format_double(100000.0, 15), "1e+05");
/// assert_eq!(format_double(123456.0, 15), "123456");
/// assert_eq!(format_double(1.0 / 3.0, 7), "0.3333333");
/// assert_eq!(format_double(NA_REAL, 7), "NA");
/// ```
#[must_use]
pub fn format_double(x: f64, digits: usize) -> String {
    if let Some(s) = special(x) {
        return s.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    let (mantissa, exponent) = significant(x, digits);
    let fixed = format!("{:.*}", decimals_for(&mantissa, exponent), x);
    let sci = scientific(x, &mantissa, exponent);
    if fixed.len() <= sci.len() { fixed } else { sci }
}

/// Formats doubles for printing with a shared number of decimals, the way
/// a column of numbers lines up.
#[must_use]
pub fn format_doubles(values: &[f64], digits: usize) -> Vec<String> {
    let parts = values.iter()
                      .map(|&x| {
                          (special(x).is_none() && x != 0.0).then(|| significant(x, digits))
                      })
                      .collect::<Vec<_>>();
    let decimals = parts.iter()
                        .flatten()
                        .map(|(m, e)| decimals_for(m, *e))
                        .max()
                        .unwrap_or(0);
    let mantissa_decimals = parts.iter()
                                 .flatten()
                                 .map(|(m, _)| m.len().saturating_sub(2))
                                 .max()
                                 .unwrap_or(0);
    let fixed = values.iter()
                      .map(|&x| special(x).map_or_else(|| format!("{x:.decimals$}"), str::to_string))
                      .collect::<Vec<_>>();
    let sci = values.iter()
                    .zip(&parts)
                    .map(|(&x, part)| match (special(x), part) {
                        (Some(s), _) => s.to_string(),
                        (None, Some((_, e))) => {
                            let m = format!("{:.mantissa_decimals$}", x.abs() / 10f64.powi(*e));
                            scientific(x, &m, *e)
                        },
                        (None, None) => "0".to_string(),
                    })
                    .collect::<Vec<_>>();
    let width = |v: &[String]| v.iter().map(String::len).max().unwrap_or(0);
    if width(&fixed) <= width(&sci) { fixed } else { sci }
}

/// Formats a single logical element.
#[must_use]
pub const fn format_logical(l: Logical) -> &'static str {
    match l {
        Logical::True => "TRUE",
        Logical::False => "FALSE",
        Logical::Na => "NA",
    }
}

/// Formats a single integer element.
#[must_use]
pub fn format_integer(i: i32) -> String {
    if i == NA_INTEGER { "NA".to_string() } else { i.to_string() }
}

/// Quotes a string the way `print` shows it.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn format_complexes(values: &[ComplexNumber], digits: usize) -> Vec<String> {
    values.iter()
          .map(|c| {
              if c.is_na() {
                  return "NA".to_string();
              }
              let re = format_double(c.real, digits);
              if c.imaginary.is_sign_negative() && !c.imaginary.is_nan() {
                  format!("{re}-{}i", format_double(-c.imaginary, digits))
              } else {
                  format!("{re}+{}i", format_double(c.imaginary, digits))
              }
          })
          .collect()
}

/// Formats every element of an atomic vector for display.
#[must_use]
pub fn format_elements(data: &VectorData, digits: usize) -> Vec<String> {
    match data.to_dense() {
        VectorData::Logical(v) => v.iter().map(|l| format_logical(*l).to_string()).collect(),
        VectorData::Integer(v) => v.iter().map(|i| format_integer(*i)).collect(),
        VectorData::Double(v) => format_doubles(&v, digits),
        VectorData::Complex(v) => format_complexes(&v, digits),
        VectorData::Character(v) => {
            v.iter().map(|s| s.as_deref().map_or_else(|| "NA".to_string(), quote)).collect()
        },
        VectorData::Raw(v) => v.iter().map(|b| format!("{b:02x}")).collect(),
        VectorData::List(v) => v.iter().map(|e| format!("{e:?}")).collect(),
        VectorData::IntegerSequence { .. } | VectorData::DoubleSequence { .. } => Vec::new(),
    }
}

fn print_atomic(out: &mut String, vector: &Vector) {
    if vector.is_empty() {
        let _ = writeln!(out, "{}(0)", vector.kind().type_name());
        return;
    }
    let cells = format_elements(vector.data(), PRINT_DIGITS);
    if let Some(names) = vector.names() {
        let names = names.iter()
                         .map(|n| n.clone().unwrap_or_else(|| "<NA>".to_string()))
                         .collect::<Vec<_>>();
        let width = cells.iter().chain(&names).map(String::len).max().unwrap_or(0);
        let per_line = (LINE_WIDTH / (width + 1)).max(1);
        for (chunk_names, chunk_cells) in names.chunks(per_line).zip(cells.chunks(per_line)) {
            let header = chunk_names.iter().map(|n| format!("{n:>width$}")).collect::<Vec<_>>();
            let row = chunk_cells.iter().map(|c| format!("{c:>width$}")).collect::<Vec<_>>();
            let _ = writeln!(out, "{}", header.join(" "));
            let _ = writeln!(out, "{}", row.join(" "));
        }
        return;
    }
    let width = cells.iter().map(String::len).max().unwrap_or(0);
    let label_width = format!("[{}]", cells.len()).len();
    let per_line = ((LINE_WIDTH - label_width) / (width + 1)).max(1);
    for (line, chunk) in cells.chunks(per_line).enumerate() {
        let label = format!("[{}]", line * per_line + 1);
        let row = chunk.iter().map(|c| format!("{c:>width$}")).collect::<Vec<_>>();
        let _ = writeln!(out, "{label:>label_width$} {}", row.join(" "));
    }
}

fn print_value(out: &mut String, value: &Value, prefix: &str) {
    match value {
        Value::Null => {
            let _ = writeln!(out, "NULL");
        },
        Value::Vector(v) => match v.elements() {
            Some(elements) if elements.is_empty() => {
                let _ = writeln!(out, "list()");
            },
            Some(elements) => {
                let names = v.names();
                for (i, element) in elements.iter().enumerate() {
                    let tag = match names.and_then(|n| n.get(i)).and_then(Option::as_deref) {
                        Some(name) if !name.is_empty() => format!("{prefix}${name}"),
                        _ => format!("{prefix}[[{}]]", i + 1),
                    };
                    let _ = writeln!(out, "{tag}");
                    print_value(out, element, &tag);
                    out.push('\n');
                }
            },
            None => print_atomic(out, v),
        },
        Value::Closure(_) => {
            let _ = writeln!(out, "<closure>");
        },
        Value::Builtin(b) => {
            let _ = writeln!(out, "function (...) .Primitive(\"{}\")", b.def.name);
        },
        other => {
            let _ = writeln!(out, "<{}>", other.type_name());
        },
    }
}

/// Renders a value the way `print` shows it, one string per output line.
///
/// # Example
/// ```
/// use statcore::interpreter::value::{Value, format::print_lines};
///
/// assert_eq!(print_lines(&Value::double(1.5)), vec!["[1] 1.5"]);
/// assert_eq!(print_lines(&Value::Null), vec!["NULL"]);
/// ```
#[must_use]
pub fn print_lines(value: &Value) -> Vec<String> {
    let mut out = String::new();
    print_value(&mut out, value, "");
    out.lines().map(str::to_string).collect()
}
