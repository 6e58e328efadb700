//! Scan format-string interpreter.
//!
//! Clean-room spec-first implementation of the POSIX wide formatted-input
//! format string. Parses directives into segments the engine executes.
//!
//! Reference: POSIX.1-2024 fwscanf, ISO C11 7.29.2.12
//!
//! Differences from the printf grammar: `*` is assignment suppression
//! (not width-from-argument), there is no precision and no flags, and the
//! `[` conversion carries an explicit scanset.

// ---------------------------------------------------------------------------
// Format spec types
// ---------------------------------------------------------------------------

/// Maximum field width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
}

/// Length modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    Hh,   // 'hh'
    H,    // 'h'
    L,    // 'l'
    Ll,   // 'll'
    Z,    // 'z'
    T,    // 't'
    J,    // 'j'
    BigL, // 'L'
}

/// The `%[` conversion's explicit character set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scanset {
    pub negated: bool,
    singles: Vec<u32>,
    ranges: Vec<(u32, u32)>,
}

impl Scanset {
    /// Whether wide char `c` is accepted by this scanset.
    pub fn matches(&self, c: u32) -> bool {
        let member = self.singles.contains(&c)
            || self.ranges.iter().any(|&(lo, hi)| c >= lo && c <= hi);
        member != self.negated
    }
}

/// A parsed scan conversion specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSpec {
    /// `%*d`: convert and consume input, assign nothing.
    pub suppress: bool,
    pub width: Width,
    pub length: LengthMod,
    pub conversion: u8,
    /// Present iff `conversion == b'['`.
    pub scanset: Option<Scanset>,
}

// ---------------------------------------------------------------------------
// Segment: parsed pieces of a format string
// ---------------------------------------------------------------------------

/// A segment of a parsed scan format string.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanSegment<'a> {
    /// Literal non-whitespace wide chars that must match input verbatim.
    Literal(&'a [u32]),
    /// A white-space directive: consumes any run of input white space.
    Whitespace,
    /// A `%%` directive (skip white space, then match a single '%').
    Percent,
    /// A conversion specifier.
    Spec(ScanSpec),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single conversion specifier starting after the '%' character.
///
/// `fmt` points to the first wide char AFTER '%'. Returns
/// `(spec, chars_consumed)` counting from `fmt[0]`, or `None` if malformed.
pub fn parse_scan_spec(fmt: &[u32]) -> Option<(ScanSpec, usize)> {
    let mut pos = 0;
    let len = fmt.len();

    // --- assignment suppression ---
    let suppress = if pos < len && fmt[pos] == b'*' as u32 {
        pos += 1;
        true
    } else {
        false
    };

    // --- maximum field width ---
    let width = {
        let start = pos;
        while pos < len && crate::wide::is_digit(fmt[pos]) {
            pos += 1;
        }
        if pos > start {
            Width::Fixed(parse_decimal(&fmt[start..pos]))
        } else {
            Width::None
        }
    };

    // --- length modifier ---
    let length = if pos < len {
        match u8::try_from(fmt[pos]).unwrap_or(0) {
            b'h' => {
                pos += 1;
                if pos < len && fmt[pos] == b'h' as u32 {
                    pos += 1;
                    LengthMod::Hh
                } else {
                    LengthMod::H
                }
            }
            b'l' => {
                pos += 1;
                if pos < len && fmt[pos] == b'l' as u32 {
                    pos += 1;
                    LengthMod::Ll
                } else {
                    LengthMod::L
                }
            }
            b'z' => {
                pos += 1;
                LengthMod::Z
            }
            b't' => {
                pos += 1;
                LengthMod::T
            }
            b'j' => {
                pos += 1;
                LengthMod::J
            }
            b'L' => {
                pos += 1;
                LengthMod::BigL
            }
            _ => LengthMod::None,
        }
    } else {
        LengthMod::None
    };

    // --- conversion specifier ---
    if pos >= len {
        return None;
    }
    let conversion = u8::try_from(fmt[pos]).unwrap_or(0);
    pos += 1;

    let mut scanset = None;
    match conversion {
        b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b'p' | b'n' | b'c' | b's' | b'C' | b'S'
        | b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {}
        b'[' => {
            let (set, consumed) = parse_scanset(&fmt[pos..])?;
            scanset = Some(set);
            pos += consumed;
        }
        _ => return None,
    }

    Some((
        ScanSpec {
            suppress,
            width,
            length,
            conversion,
            scanset,
        },
        pos,
    ))
}

/// Parse a scanset body starting after `%[`.
///
/// Handles leading `^` negation, a literal `]` as first member, and
/// `a-z` ranges. A `-` that is first or last is a plain member.
/// Returns `(scanset, chars_consumed)` including the closing `]`,
/// or `None` if the set is unterminated.
fn parse_scanset(fmt: &[u32]) -> Option<(Scanset, usize)> {
    let mut set = Scanset::default();
    let mut pos = 0;
    let len = fmt.len();

    if pos < len && fmt[pos] == b'^' as u32 {
        set.negated = true;
        pos += 1;
    }
    // A ']' immediately after '[' or '[^' is a member, not the terminator.
    if pos < len && fmt[pos] == b']' as u32 {
        set.singles.push(b']' as u32);
        pos += 1;
    }

    while pos < len && fmt[pos] != b']' as u32 {
        let c = fmt[pos];
        // Range form: c '-' d where d is not the closing ']'.
        if pos + 2 < len && fmt[pos + 1] == b'-' as u32 && fmt[pos + 2] != b']' as u32 {
            let d = fmt[pos + 2];
            if c <= d {
                set.ranges.push((c, d));
            } else {
                // Reversed range: members taken literally, as glibc does.
                set.singles.extend_from_slice(&[c, b'-' as u32, d]);
            }
            pos += 3;
        } else {
            set.singles.push(c);
            pos += 1;
        }
    }

    if pos >= len {
        return None; // unterminated scanset
    }
    Some((set, pos + 1))
}

/// Parse a wide format string into segments.
///
/// White-space runs become `Whitespace`, literal runs become `Literal`,
/// `%%` becomes `Percent`, and each `%`-directive becomes `Spec`.
/// A malformed directive ends the segment list at that point: the engine
/// reports a matching failure when it reaches it.
pub fn parse_format_string(fmt: &[u32]) -> Vec<ScanSegment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;
    let len = fmt.len();

    while pos < len {
        if crate::wide::is_space(fmt[pos]) {
            while pos < len && crate::wide::is_space(fmt[pos]) {
                pos += 1;
            }
            segments.push(ScanSegment::Whitespace);
            continue;
        }
        if fmt[pos] != b'%' as u32 {
            let start = pos;
            while pos < len && fmt[pos] != b'%' as u32 && !crate::wide::is_space(fmt[pos]) {
                pos += 1;
            }
            segments.push(ScanSegment::Literal(&fmt[start..pos]));
            continue;
        }
        // Skip the '%'.
        pos += 1;
        if pos < len && fmt[pos] == b'%' as u32 {
            segments.push(ScanSegment::Percent);
            pos += 1;
            continue;
        }
        match parse_scan_spec(&fmt[pos..]) {
            Some((spec, consumed)) => {
                pos += consumed;
                segments.push(ScanSegment::Spec(spec));
            }
            None => break, // malformed directive: stop here
        }
    }
    segments
}

fn parse_decimal(digits: &[u32]) -> usize {
    let mut result = 0_usize;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add((d - b'0' as u32) as usize);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wide::widen;

    fn spec_of(fmt: &str) -> ScanSpec {
        let wide = widen(fmt);
        let (spec, consumed) = parse_scan_spec(&wide).unwrap();
        assert_eq!(consumed, wide.len());
        spec
    }

    #[test]
    fn test_parse_simple_int() {
        let spec = spec_of("d");
        assert_eq!(spec.conversion, b'd');
        assert!(!spec.suppress);
        assert_eq!(spec.width, Width::None);
        assert_eq!(spec.length, LengthMod::None);
    }

    #[test]
    fn test_parse_suppress_and_width() {
        let spec = spec_of("*10s");
        assert!(spec.suppress);
        assert_eq!(spec.width, Width::Fixed(10));
        assert_eq!(spec.conversion, b's');
    }

    #[test]
    fn test_parse_length_mods() {
        assert_eq!(spec_of("hhd").length, LengthMod::Hh);
        assert_eq!(spec_of("hd").length, LengthMod::H);
        assert_eq!(spec_of("ld").length, LengthMod::L);
        assert_eq!(spec_of("lld").length, LengthMod::Ll);
        assert_eq!(spec_of("zu").length, LengthMod::Z);
        assert_eq!(spec_of("td").length, LengthMod::T);
        assert_eq!(spec_of("jd").length, LengthMod::J);
        assert_eq!(spec_of("Lf").length, LengthMod::BigL);
    }

    #[test]
    fn test_parse_unknown_conversion_is_malformed() {
        assert!(parse_scan_spec(&widen("q")).is_none());
        assert!(parse_scan_spec(&widen("")).is_none());
    }

    #[test]
    fn test_parse_scanset_basic() {
        let spec = spec_of("[abc]");
        let set = spec.scanset.unwrap();
        assert!(set.matches(b'a' as u32));
        assert!(set.matches(b'c' as u32));
        assert!(!set.matches(b'd' as u32));
    }

    #[test]
    fn test_parse_scanset_negated_with_bracket_member() {
        let spec = spec_of("[^]x]");
        let set = spec.scanset.unwrap();
        assert!(!set.matches(b']' as u32));
        assert!(!set.matches(b'x' as u32));
        assert!(set.matches(b'y' as u32));
    }

    #[test]
    fn test_parse_scanset_range() {
        let spec = spec_of("[0-9a-f]");
        let set = spec.scanset.unwrap();
        assert!(set.matches(b'7' as u32));
        assert!(set.matches(b'e' as u32));
        assert!(!set.matches(b'g' as u32));
    }

    #[test]
    fn test_parse_scanset_trailing_dash_is_member() {
        let spec = spec_of("[a-]");
        let set = spec.scanset.unwrap();
        assert!(set.matches(b'a' as u32));
        assert!(set.matches(b'-' as u32));
        assert!(!set.matches(b'b' as u32));
    }

    #[test]
    fn test_parse_scanset_unterminated() {
        assert!(parse_scan_spec(&widen("[abc")).is_none());
    }

    #[test]
    fn test_parse_format_string_segments() {
        let fmt = widen("id %d, name %s!");
        let segments = parse_format_string(&fmt);
        assert_eq!(segments.len(), 9);
        assert_eq!(segments[0], ScanSegment::Literal(&widen("id")));
        assert_eq!(segments[1], ScanSegment::Whitespace);
        assert!(matches!(&segments[2], ScanSegment::Spec(s) if s.conversion == b'd'));
        assert_eq!(segments[3], ScanSegment::Literal(&widen(",")));
        assert_eq!(segments[4], ScanSegment::Whitespace);
        assert_eq!(segments[5], ScanSegment::Literal(&widen("name")));
        assert_eq!(segments[6], ScanSegment::Whitespace);
        assert!(matches!(&segments[7], ScanSegment::Spec(s) if s.conversion == b's'));
        assert_eq!(segments[8], ScanSegment::Literal(&widen("!")));
    }

    #[test]
    fn test_parse_percent_escape() {
        let fmt = widen("100%%");
        let segments = parse_format_string(&fmt);
        assert_eq!(segments.len(), 2);
        assert!(matches!(segments[1], ScanSegment::Percent));
    }

    #[test]
    fn test_parse_malformed_stops() {
        let fmt = widen("%d %q %s");
        let segments = parse_format_string(&fmt);
        // '%q' is malformed: everything after it is dropped.
        assert_eq!(segments.len(), 2);
        assert!(matches!(&segments[0], ScanSegment::Spec(s) if s.conversion == b'd'));
        assert!(matches!(segments[1], ScanSegment::Whitespace));
    }

    #[test]
    fn test_parse_trailing_percent_stops() {
        let fmt = widen("x%");
        let segments = parse_format_string(&fmt);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0], ScanSegment::Literal(&widen("x")));
    }
}
