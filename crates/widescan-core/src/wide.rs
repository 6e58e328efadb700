//! Wide-character primitives used by the scan engine.
//!
//! Wide strings are `u32` slices representing Linux `wchar_t` values.
//! Only the operations the scanner needs live here; this is not a full
//! `<wchar.h>` surface.

/// Returns the length of a NUL-terminated wide string (not counting the NUL).
///
/// Equivalent to C `wcslen`. Scans `s` for the first `0u32` element.
/// If no NUL is found, returns the full slice length.
pub fn wcslen(s: &[u32]) -> usize {
    s.iter().position(|&c| c == 0).unwrap_or(s.len())
}

/// Whether `c` is white space in the sense of `iswspace` in the POSIX locale.
pub fn is_space(c: u32) -> bool {
    matches!(c, 0x09..=0x0d | 0x20)
}

/// Whether `c` is an ASCII decimal digit.
pub fn is_digit(c: u32) -> bool {
    (0x30..=0x39).contains(&c)
}

/// ASCII lowercase fold. Non-ASCII values pass through unchanged.
pub fn to_lower(c: u32) -> u32 {
    if (0x41..=0x5a).contains(&c) { c + 0x20 } else { c }
}

/// Case-insensitive match of `input` against the ASCII keyword `kw`.
///
/// Returns the number of wide chars matched (`kw.len()`) or 0.
/// Used for `inf`/`infinity`/`nan` recognition.
pub fn match_keyword(input: &[u32], kw: &[u8]) -> usize {
    if input.len() < kw.len() {
        return 0;
    }
    for (i, &k) in kw.iter().enumerate() {
        if to_lower(input[i]) != k as u32 {
            return 0;
        }
    }
    kw.len()
}

/// Widen a Rust string into a wide vector, one element per char.
pub fn widen(s: &str) -> Vec<u32> {
    s.chars().map(|c| c as u32).collect()
}

/// Encode a run of wide chars as UTF-8 bytes.
///
/// This is the repository's multibyte convention for narrow `%c`/`%s`
/// destinations. Values that are not scalar Unicode (lone surrogates,
/// out-of-range) encode as U+FFFD.
pub fn narrow(run: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(run.len());
    for &w in run {
        let ch = char::from_u32(w).unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wcslen_basic() {
        assert_eq!(wcslen(&[b'h' as u32, b'i' as u32, 0]), 2);
        assert_eq!(wcslen(&[0]), 0);
        assert_eq!(wcslen(&[65, 66, 67]), 3); // no NUL found
    }

    #[test]
    fn test_is_space() {
        for c in [b' ', b'\t', b'\n', b'\x0b', b'\x0c', b'\r'] {
            assert!(is_space(c as u32));
        }
        assert!(!is_space(b'x' as u32));
        assert!(!is_space(0xa0)); // NBSP is not POSIX-locale space
    }

    #[test]
    fn test_match_keyword() {
        let inf = [b'I' as u32, b'n' as u32, b'F' as u32, b'x' as u32];
        assert_eq!(match_keyword(&inf, b"inf"), 3);
        assert_eq!(match_keyword(&inf, b"infinity"), 0);
        assert_eq!(match_keyword(&inf[1..], b"inf"), 0);
    }

    #[test]
    fn test_narrow_ascii_and_multibyte() {
        assert_eq!(narrow(&[b'a' as u32, b'b' as u32]), b"ab");
        assert_eq!(narrow(&[0xe9]), "é".as_bytes());
        assert_eq!(narrow(&[0xd800]), "\u{fffd}".as_bytes()); // lone surrogate
    }
}
