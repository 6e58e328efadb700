//! Typed stores of engine values through caller destination pointers.
//!
//! The engine produces width-independent values (`i64`/`u64`/`f64` plus
//! char runs); the conversion's length modifier decides the destination
//! width here, at the single place raw pointers are written.

use widescan_core::engine::ScanValue;
use widescan_core::fmt::{LengthMod, ScanSpec};

/// Store one produced value through `ptr` with the narrowing `spec`'s
/// length modifier dictates. String stores NUL-terminate; char-run
/// stores do not. `%p` stores pointer width regardless of modifier.
///
/// The destination must be valid for the write the conversion implies;
/// this is the C caller contract, unchecked here exactly as in libc.
pub unsafe fn store_value(value: &ScanValue, spec: &ScanSpec, ptr: usize) {
    if ptr == 0 {
        return;
    }
    match value {
        ScanValue::Signed(v) => unsafe { store_signed(*v, spec.length, ptr) },
        ScanValue::Unsigned(v) => {
            if spec.conversion == b'p' {
                unsafe { *(ptr as *mut usize) = *v as usize };
            } else {
                unsafe { store_unsigned(*v, spec.length, ptr) };
            }
        }
        ScanValue::Float(v) => {
            // Legacy long-double convention: BigL stores double width.
            match spec.length {
                LengthMod::L | LengthMod::Ll | LengthMod::BigL => unsafe {
                    *(ptr as *mut f64) = *v;
                },
                _ => unsafe {
                    *(ptr as *mut f32) = *v as f32;
                },
            }
        }
        ScanValue::WideChars(run) => unsafe {
            std::ptr::copy_nonoverlapping(run.as_ptr(), ptr as *mut u32, run.len());
        },
        ScanValue::Chars(run) => unsafe {
            std::ptr::copy_nonoverlapping(run.as_ptr(), ptr as *mut u8, run.len());
        },
        ScanValue::WideStr(run) => unsafe {
            std::ptr::copy_nonoverlapping(run.as_ptr(), ptr as *mut u32, run.len());
            *(ptr as *mut u32).add(run.len()) = 0;
        },
        ScanValue::Str(run) => unsafe {
            std::ptr::copy_nonoverlapping(run.as_ptr(), ptr as *mut u8, run.len());
            *(ptr as *mut u8).add(run.len()) = 0;
        },
        // %n honors length modifiers like the signed conversions do.
        ScanValue::Count(n) => unsafe { store_signed(*n as i64, spec.length, ptr) },
    }
}

unsafe fn store_signed(v: i64, length: LengthMod, ptr: usize) {
    unsafe {
        match length {
            LengthMod::Hh => *(ptr as *mut i8) = v as i8,
            LengthMod::H => *(ptr as *mut i16) = v as i16,
            LengthMod::L | LengthMod::Ll | LengthMod::J => *(ptr as *mut i64) = v,
            LengthMod::Z | LengthMod::T => *(ptr as *mut isize) = v as isize,
            LengthMod::None | LengthMod::BigL => *(ptr as *mut i32) = v as i32,
        }
    }
}

unsafe fn store_unsigned(v: u64, length: LengthMod, ptr: usize) {
    unsafe {
        match length {
            LengthMod::Hh => *(ptr as *mut u8) = v as u8,
            LengthMod::H => *(ptr as *mut u16) = v as u16,
            LengthMod::L | LengthMod::Ll | LengthMod::J => *(ptr as *mut u64) = v,
            LengthMod::Z | LengthMod::T => *(ptr as *mut usize) = v as usize,
            LengthMod::None | LengthMod::BigL => *(ptr as *mut u32) = v as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widescan_core::fmt::parse_scan_spec;
    use widescan_core::wide::widen;

    fn spec(directive: &str) -> ScanSpec {
        parse_scan_spec(&widen(directive)).unwrap().0
    }

    #[test]
    fn test_store_signed_narrowing() {
        let mut c: i8 = 0;
        unsafe { store_value(&ScanValue::Signed(-2), &spec("hhd"), &mut c as *mut i8 as usize) };
        assert_eq!(c, -2);

        let mut i: i32 = 0;
        unsafe { store_value(&ScanValue::Signed(300), &spec("d"), &mut i as *mut i32 as usize) };
        assert_eq!(i, 300);

        let mut l: i64 = 0;
        unsafe {
            store_value(
                &ScanValue::Signed(i64::MIN),
                &spec("lld"),
                &mut l as *mut i64 as usize,
            )
        };
        assert_eq!(l, i64::MIN);
    }

    #[test]
    fn test_store_signed_truncates() {
        let mut c: i8 = 0;
        unsafe { store_value(&ScanValue::Signed(0x1ff), &spec("hhd"), &mut c as *mut i8 as usize) };
        assert_eq!(c, -1);
    }

    #[test]
    fn test_store_float_width() {
        let mut f: f32 = 0.0;
        unsafe { store_value(&ScanValue::Float(2.5), &spec("f"), &mut f as *mut f32 as usize) };
        assert_eq!(f, 2.5);

        let mut d: f64 = 0.0;
        unsafe { store_value(&ScanValue::Float(2.5), &spec("lf"), &mut d as *mut f64 as usize) };
        assert_eq!(d, 2.5);

        // Legacy convention: %Lf lands in a double.
        let mut ld: f64 = 0.0;
        unsafe { store_value(&ScanValue::Float(9.25), &spec("Lf"), &mut ld as *mut f64 as usize) };
        assert_eq!(ld, 9.25);
    }

    #[test]
    fn test_store_strings_nul_terminate() {
        let mut buf = [0xffu8; 4];
        unsafe {
            store_value(
                &ScanValue::Str(b"ab".to_vec()),
                &spec("s"),
                buf.as_mut_ptr() as usize,
            )
        };
        assert_eq!(&buf, b"ab\0\xff");

        let mut wbuf = [0xffffu32; 4];
        unsafe {
            store_value(
                &ScanValue::WideStr(widen("ab")),
                &spec("ls"),
                wbuf.as_mut_ptr() as usize,
            )
        };
        assert_eq!(wbuf, [b'a' as u32, b'b' as u32, 0, 0xffff]);
    }

    #[test]
    fn test_store_chars_no_terminator() {
        let mut buf = [0xffu8; 3];
        unsafe {
            store_value(
                &ScanValue::Chars(b"ab".to_vec()),
                &spec("2c"),
                buf.as_mut_ptr() as usize,
            )
        };
        assert_eq!(&buf, b"ab\xff");
    }

    #[test]
    fn test_store_pointer_width() {
        let mut p: usize = 0;
        unsafe {
            store_value(
                &ScanValue::Unsigned(0xdead_beef),
                &spec("p"),
                &mut p as *mut usize as usize,
            )
        };
        assert_eq!(p, 0xdead_beef);
    }

    #[test]
    fn test_store_count_respects_length() {
        let mut n: i16 = 0;
        unsafe { store_value(&ScanValue::Count(7), &spec("hn"), &mut n as *mut i16 as usize) };
        assert_eq!(n, 7);
    }

    #[test]
    fn test_null_destination_ignored() {
        unsafe { store_value(&ScanValue::Signed(1), &spec("d"), 0) };
        unsafe { store_value(&ScanValue::Str(b"x".to_vec()), &spec("s"), 0) };
    }
}
