//! ABI layer for the wide formatted-scan-from-string surface.
//!
//! `swscanf` here is the legacy long-double compatibility entry: it
//! captures its variadic argument list and forwards it, unchanged, to
//! `__nldbl_vswscanf`, returning that routine's result verbatim. The
//! `__nldbl_`-prefixed names are the internal symbols old binaries
//! resolve; all four exports delegate to one implementation.
//!
//! Pointer extraction is two-pass, as in the printf path this mirrors:
//! walk the parsed format to pull one destination per non-suppressed
//! conversion (bounded by [`MAX_VA_ARGS`]), run the engine over the wide
//! input, then store each produced value with its length-modifier
//! narrowing.

use core::ffi::VaList;

use libc::{c_int, c_void, wchar_t};

use widescan_core::engine::{EOF, scan_segments};
use widescan_core::fmt::{ScanSegment, ScanSpec, parse_format_string};

use crate::store::store_value;

/// Maximum variadic arguments we extract per scan call.
const MAX_VA_ARGS: usize = 32;

/// Count how many destination pointers a parsed format consumes.
fn count_scan_args(segments: &[ScanSegment<'_>]) -> usize {
    segments
        .iter()
        .filter(|seg| matches!(seg, ScanSegment::Spec(spec) if !spec.suppress))
        .count()
        .min(MAX_VA_ARGS)
}

/// Borrow a NUL-terminated wide string as a slice (terminator excluded).
unsafe fn wide_cstr<'a>(ptr: *const u32) -> &'a [u32] {
    let mut len = 0usize;
    // SAFETY: caller guarantees a valid NUL-terminated wide string.
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        std::slice::from_raw_parts(ptr, len)
    }
}

/// The one implementation behind all four exported names.
unsafe fn vswscanf_impl(s: *const wchar_t, fmt: *const wchar_t, mut ap: VaList) -> c_int {
    if s.is_null() || fmt.is_null() {
        return EOF;
    }
    // SAFETY: null checked above; NUL termination is the caller contract.
    let input = unsafe { wide_cstr(s.cast::<u32>()) };
    let format = unsafe { wide_cstr(fmt.cast::<u32>()) };

    let segments = parse_format_string(format);
    let assigning: Vec<&ScanSpec> = segments
        .iter()
        .filter_map(|seg| match seg {
            ScanSegment::Spec(spec) if !spec.suppress => Some(spec),
            _ => None,
        })
        .collect();

    let extract_count = count_scan_args(&segments);
    let mut ptrs = [0usize; MAX_VA_ARGS];
    for slot in ptrs.iter_mut().take(extract_count) {
        // SAFETY: one pointer was promised per non-suppressed conversion.
        *slot = unsafe { ap.next_arg::<*mut c_void>() } as usize;
    }

    let report = scan_segments(input, &segments);

    for (i, value) in report.values.iter().enumerate() {
        if i >= extract_count {
            break;
        }
        // SAFETY: destination validity is the caller contract.
        unsafe { store_value(value, assigning[i], ptrs[i]) };
    }

    report.ret()
}

/// `swscanf` under the legacy long-double ABI: open the variadic list,
/// hand it to `__nldbl_vswscanf`, and return its result unchanged.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swscanf(s: *const wchar_t, fmt: *const wchar_t, args: ...) -> c_int {
    unsafe { __nldbl_vswscanf(s, fmt, args) }
}

/// Internal-compat alias of [`swscanf`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __nldbl_swscanf(
    s: *const wchar_t,
    fmt: *const wchar_t,
    args: ...
) -> c_int {
    unsafe { __nldbl_vswscanf(s, fmt, args) }
}

/// `vswscanf` under the legacy long-double ABI.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn vswscanf(s: *const wchar_t, fmt: *const wchar_t, ap: VaList) -> c_int {
    unsafe { vswscanf_impl(s, fmt, ap) }
}

/// The collaborator entry old binaries resolve directly: performs the
/// scan with `L`-qualified conversions bound to double-width
/// destinations.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __nldbl_vswscanf(
    s: *const wchar_t,
    fmt: *const wchar_t,
    ap: VaList,
) -> c_int {
    unsafe { vswscanf_impl(s, fmt, ap) }
}
