//! Checked output slots: the safe replacement for variadic capture.
//!
//! Callers build an explicit, tagged vector of destinations and pass it
//! by reference. The vector is validated against the format before any
//! input is consumed, so a count or kind mismatch is a reported error
//! rather than undefined behavior.

use crate::engine::{ScanValue, scan_segments};
use crate::fmt::{LengthMod, ScanSegment, ScanSpec, parse_format_string};

/// A caller-supplied destination for one assigning conversion.
#[derive(Debug)]
pub enum ScanSlot<'a> {
    /// `%d %i` (any integer length modifier).
    Signed(&'a mut i64),
    /// `%u %o %x %X %p`.
    Unsigned(&'a mut u64),
    /// `%a %e %f %g` (any case; `L` behaves as `l`).
    Float(&'a mut f64),
    /// `%lc` / `%C`.
    WideChars(&'a mut Vec<u32>),
    /// `%c`.
    Chars(&'a mut String),
    /// `%ls` / `%S` / `%l[`.
    WideStr(&'a mut Vec<u32>),
    /// `%s` / `%[`.
    Str(&'a mut String),
    /// `%n`.
    Count(&'a mut usize),
}

impl ScanSlot<'_> {
    fn kind(&self) -> &'static str {
        match self {
            ScanSlot::Signed(_) => "signed",
            ScanSlot::Unsigned(_) => "unsigned",
            ScanSlot::Float(_) => "float",
            ScanSlot::WideChars(_) => "wide chars",
            ScanSlot::Chars(_) => "chars",
            ScanSlot::WideStr(_) => "wide string",
            ScanSlot::Str(_) => "string",
            ScanSlot::Count(_) => "count",
        }
    }
}

/// Slot-vector validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// The slot vector length does not match the format's assigning
    /// conversions.
    CountMismatch { needed: usize, given: usize },
    /// A slot's kind does not match its conversion.
    KindMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

impl std::fmt::Display for SlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotError::CountMismatch { needed, given } => {
                write!(f, "format needs {needed} slot(s), {given} given")
            }
            SlotError::KindMismatch {
                index,
                expected,
                found,
            } => {
                write!(f, "slot {index}: conversion expects {expected}, slot is {found}")
            }
        }
    }
}

impl std::error::Error for SlotError {}

/// The slot kind a conversion will assign into. Mirrors the engine's
/// value production exactly.
fn expected_kind(spec: &ScanSpec) -> &'static str {
    let wide = matches!(spec.length, LengthMod::L | LengthMod::Ll)
        || spec.conversion == b'C'
        || spec.conversion == b'S';
    match spec.conversion {
        b'd' | b'i' => "signed",
        b'u' | b'o' | b'x' | b'X' | b'p' => "unsigned",
        b'a' | b'A' | b'e' | b'E' | b'f' | b'F' | b'g' | b'G' => "float",
        b'c' | b'C' => {
            if wide {
                "wide chars"
            } else {
                "chars"
            }
        }
        b'n' => "count",
        _ => {
            // s, S, [
            if wide {
                "wide string"
            } else {
                "string"
            }
        }
    }
}

/// Scan `input` against `fmt`, assigning into `slots`.
///
/// The slot vector must supply exactly one slot of the right kind per
/// non-suppressed conversion (including `%n`); this is checked up front,
/// before any input is consumed. Returns the C-compatible result:
/// assigned count, or [`crate::engine::EOF`] on input failure before the
/// first conversion. Slots past the point where the scan stopped are
/// left untouched.
pub fn scan_into(
    input: &[u32],
    fmt: &[u32],
    slots: &mut [ScanSlot<'_>],
) -> Result<i32, SlotError> {
    let segments = parse_format_string(fmt);

    let assigning: Vec<&ScanSpec> = segments
        .iter()
        .filter_map(|seg| match seg {
            ScanSegment::Spec(spec) if !spec.suppress => Some(spec),
            _ => None,
        })
        .collect();

    if assigning.len() != slots.len() {
        return Err(SlotError::CountMismatch {
            needed: assigning.len(),
            given: slots.len(),
        });
    }
    for (index, (spec, slot)) in assigning.iter().zip(slots.iter()).enumerate() {
        let expected = expected_kind(spec);
        if expected != slot.kind() {
            return Err(SlotError::KindMismatch {
                index,
                expected,
                found: slot.kind(),
            });
        }
    }

    let report = scan_segments(input, &segments);
    for (value, slot) in report.values.iter().zip(slots.iter_mut()) {
        store(value, slot);
    }
    Ok(report.ret())
}

fn store(value: &ScanValue, slot: &mut ScanSlot<'_>) {
    match (value, slot) {
        (ScanValue::Signed(v), ScanSlot::Signed(dst)) => **dst = *v,
        (ScanValue::Unsigned(v), ScanSlot::Unsigned(dst)) => **dst = *v,
        (ScanValue::Float(v), ScanSlot::Float(dst)) => **dst = *v,
        (ScanValue::WideChars(v), ScanSlot::WideChars(dst)) => **dst = v.clone(),
        (ScanValue::WideStr(v), ScanSlot::WideStr(dst)) => **dst = v.clone(),
        (ScanValue::Chars(v), ScanSlot::Chars(dst)) => {
            **dst = String::from_utf8_lossy(v).into_owned()
        }
        (ScanValue::Str(v), ScanSlot::Str(dst)) => {
            **dst = String::from_utf8_lossy(v).into_owned()
        }
        (ScanValue::Count(v), ScanSlot::Count(dst)) => **dst = *v,
        // Kinds were validated before scanning.
        _ => {}
    }
}
