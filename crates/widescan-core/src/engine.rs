//! Wide formatted-scan engine.
//!
//! Executes a parsed format against an in-memory wide string and produces
//! typed values. This is the conversion half of the core/abi split: the
//! engine never touches a pointer; callers (the ABI boundary or the
//! checked slot API) decide where values land.
//!
//! Reference: POSIX.1-2024 fwscanf, ISO C11 7.29.2.12.
//!
//! Long-double handling follows the legacy convention throughout: the
//! `L` length modifier converts exactly as `l` does (double width).

use crate::convert::{wcstod_impl, wcstol_impl, wcstoul_impl};
use crate::fmt::{LengthMod, ScanSegment, ScanSpec, Width, parse_format_string};
use crate::wide::{is_space, narrow};

/// Negative sentinel returned when input fails before the first
/// completed conversion. Mirrors the C `EOF` macro.
pub const EOF: i32 = -1;

/// Typed result of one assigning conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    /// `%lc`: exactly the chars read; not NUL-terminated when stored.
    WideChars(Vec<u32>),
    /// `%c`: the chars read, narrowed to the multibyte (UTF-8) convention.
    Chars(Vec<u8>),
    /// `%ls` / `%l[`: NUL-terminated when stored.
    WideStr(Vec<u32>),
    /// `%s` / `%[`: narrowed, NUL-terminated when stored.
    Str(Vec<u8>),
    /// `%n`: wide chars consumed so far. Not counted in the return value.
    Count(usize),
}

/// How a scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// Every directive executed.
    Complete,
    /// A directive failed to match available input; prior conversions stand.
    MatchingFailure,
    /// Input was exhausted mid-directive.
    InputFailure,
}

/// Outcome of a scan: status, produced values, and consumption counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub status: ScanStatus,
    /// Values produced by assigning conversions, in directive order
    /// (includes `%n` counts).
    pub values: Vec<ScanValue>,
    /// Conversions completed, including suppressed ones, excluding `%n`.
    pub converted: u32,
    /// Wide chars of input consumed.
    pub consumed: usize,
}

impl ScanReport {
    /// Assigned-conversion count (`%n` excluded), as C counts them.
    pub fn assigned(&self) -> i32 {
        self.values
            .iter()
            .filter(|v| !matches!(v, ScanValue::Count(_)))
            .count() as i32
    }

    /// The C-compatible return value: the assigned count, or [`EOF`] when
    /// input failed before the first conversion completed.
    pub fn ret(&self) -> i32 {
        if self.status == ScanStatus::InputFailure && self.converted == 0 {
            EOF
        } else {
            self.assigned()
        }
    }
}

/// Scan `input` against `fmt`, both plain wide slices (no NUL needed).
pub fn scan_wide(input: &[u32], fmt: &[u32]) -> ScanReport {
    scan_segments(input, &parse_format_string(fmt))
}

/// Scan `input` against pre-parsed segments.
pub fn scan_segments(input: &[u32], segments: &[ScanSegment<'_>]) -> ScanReport {
    let mut pos = 0usize;
    let mut values = Vec::new();
    let mut converted = 0u32;

    let mut status = ScanStatus::Complete;
    'directives: for seg in segments {
        match seg {
            ScanSegment::Whitespace => {
                while pos < input.len() && is_space(input[pos]) {
                    pos += 1;
                }
            }
            ScanSegment::Literal(run) => {
                for &c in *run {
                    if pos >= input.len() {
                        status = ScanStatus::InputFailure;
                        break 'directives;
                    }
                    if input[pos] != c {
                        status = ScanStatus::MatchingFailure;
                        break 'directives;
                    }
                    pos += 1;
                }
            }
            ScanSegment::Percent => {
                while pos < input.len() && is_space(input[pos]) {
                    pos += 1;
                }
                if pos >= input.len() {
                    status = ScanStatus::InputFailure;
                    break 'directives;
                }
                if input[pos] != b'%' as u32 {
                    status = ScanStatus::MatchingFailure;
                    break 'directives;
                }
                pos += 1;
            }
            ScanSegment::Spec(spec) => {
                match run_spec(input, &mut pos, spec) {
                    Ok(produced) => {
                        if spec.conversion != b'n' {
                            converted += 1;
                        }
                        if let Some(v) = produced {
                            values.push(v);
                        }
                    }
                    Err(stop) => {
                        status = stop;
                        break 'directives;
                    }
                }
            }
        }
    }

    ScanReport {
        status,
        values,
        converted,
        consumed: pos,
    }
}

/// Whether a spec's destination is wide (`l`-qualified or `%C`/`%S`).
fn is_wide_dest(spec: &ScanSpec) -> bool {
    matches!(spec.length, LengthMod::L | LengthMod::Ll)
        || spec.conversion == b'C'
        || spec.conversion == b'S'
}

/// Execute one conversion specifier at `*pos`.
///
/// `Ok(Some(value))` for an assigning conversion, `Ok(None)` when
/// suppressed, `Err(status)` on matching or input failure (cursor
/// position is then irrelevant; the caller stops).
fn run_spec(
    input: &[u32],
    pos: &mut usize,
    spec: &ScanSpec,
) -> Result<Option<ScanValue>, ScanStatus> {
    let len = input.len();
    match spec.conversion {
        b'n' => {
            let v = ScanValue::Count(*pos);
            Ok((!spec.suppress).then_some(v))
        }
        b'c' | b'C' => {
            let want = match spec.width {
                Width::Fixed(w) => w,
                Width::None => 1,
            };
            let avail = want.min(len - *pos);
            if avail == 0 {
                return Err(ScanStatus::InputFailure);
            }
            let run = &input[*pos..*pos + avail];
            *pos += avail;
            let v = if is_wide_dest(spec) {
                ScanValue::WideChars(run.to_vec())
            } else {
                ScanValue::Chars(narrow(run))
            };
            Ok((!spec.suppress).then_some(v))
        }
        b's' | b'S' => {
            while *pos < len && is_space(input[*pos]) {
                *pos += 1;
            }
            if *pos >= len {
                return Err(ScanStatus::InputFailure);
            }
            let limit = match spec.width {
                Width::Fixed(w) => w,
                Width::None => usize::MAX,
            };
            let start = *pos;
            while *pos < len && !is_space(input[*pos]) && *pos - start < limit {
                *pos += 1;
            }
            if *pos == start {
                // Only possible with an explicit zero width.
                return Err(ScanStatus::MatchingFailure);
            }
            let run = &input[start..*pos];
            let v = if is_wide_dest(spec) {
                ScanValue::WideStr(run.to_vec())
            } else {
                ScanValue::Str(narrow(run))
            };
            Ok((!spec.suppress).then_some(v))
        }
        b'[' => {
            let Some(set) = spec.scanset.as_ref() else {
                return Err(ScanStatus::MatchingFailure);
            };
            let limit = match spec.width {
                Width::Fixed(w) => w,
                Width::None => usize::MAX,
            };
            let start = *pos;
            while *pos < len && set.matches(input[*pos]) && *pos - start < limit {
                *pos += 1;
            }
            if *pos == start {
                return Err(if start >= len {
                    ScanStatus::InputFailure
                } else {
                    ScanStatus::MatchingFailure
                });
            }
            let run = &input[start..*pos];
            let v = if is_wide_dest(spec) {
                ScanValue::WideStr(run.to_vec())
            } else {
                ScanValue::Str(narrow(run))
            };
            Ok((!spec.suppress).then_some(v))
        }
        b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b'p' => {
            while *pos < len && is_space(input[*pos]) {
                *pos += 1;
            }
            if *pos >= len {
                return Err(ScanStatus::InputFailure);
            }
            let field = width_slice(input, *pos, spec.width);
            let signed = matches!(spec.conversion, b'd' | b'i');
            let base = match spec.conversion {
                b'd' | b'u' => 10,
                b'i' => 0,
                b'o' => 8,
                _ => 16, // x, X, p
            };
            let (value, consumed) = if signed {
                let (v, n, _) = wcstol_impl(field, base);
                (ScanValue::Signed(v), n)
            } else {
                let (v, n, _) = wcstoul_impl(field, base);
                (ScanValue::Unsigned(v), n)
            };
            if consumed == 0 {
                return Err(ScanStatus::MatchingFailure);
            }
            *pos += consumed;
            Ok((!spec.suppress).then_some(value))
        }
        b'a' | b'A' | b'e' | b'E' | b'f' | b'F' | b'g' | b'G' => {
            while *pos < len && is_space(input[*pos]) {
                *pos += 1;
            }
            if *pos >= len {
                return Err(ScanStatus::InputFailure);
            }
            let field = width_slice(input, *pos, spec.width);
            let (v, consumed, _) = wcstod_impl(field);
            if consumed == 0 {
                return Err(ScanStatus::MatchingFailure);
            }
            *pos += consumed;
            Ok((!spec.suppress).then_some(ScanValue::Float(v)))
        }
        _ => Err(ScanStatus::MatchingFailure),
    }
}

fn width_slice(input: &[u32], pos: usize, width: Width) -> &[u32] {
    match width {
        Width::Fixed(w) => &input[pos..(pos + w).min(input.len())],
        Width::None => &input[pos..],
    }
}
