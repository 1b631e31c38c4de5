//! C ABI over the UUID core.
//!
//! Constructors return a heap handle owned by the caller, or null on failure.
//! Each handle must be released exactly once with [`ruuid_destroy`]; handles
//! are read-only, so several threads may query one handle at the same time.
//! Formatting writes into a buffer the caller owns, NUL terminated.

use std::ffi::{CStr, c_char, c_int};
use std::{ptr, slice};

use tracing::debug;

use crate::format::Format;
use crate::uuid::{Uuid, UuidError};

fn into_handle(result: Result<Uuid, UuidError>) -> *mut Uuid {
    match result {
        Ok(uuid) => Box::into_raw(Box::new(uuid)),
        Err(e) => {
            debug!(error = %e, "no uuid handle created");
            ptr::null_mut()
        }
    }
}

/// Generate a nil UUID handle.
#[unsafe(no_mangle)]
pub extern "C" fn ruuid_generate_nil() -> *mut Uuid {
    into_handle(Ok(Uuid::nil()))
}

/// Generate a version 4 UUID handle, or null if no entropy is available.
#[unsafe(no_mangle)]
pub extern "C" fn ruuid_generate_version_4() -> *mut Uuid {
    into_handle(Uuid::new_v4())
}

/// Generate a version 5 UUID handle in the SIP namespace.
///
/// Returns null if `name` is null or empty.
///
/// # Safety
///
/// `name` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ruuid_generate_version_5_sip(name: *const c_char) -> *mut Uuid {
    if name.is_null() {
        return into_handle(Err(UuidError::InvalidName));
    }
    let name = unsafe { CStr::from_ptr(name) };
    into_handle(Uuid::new_v5_sip(name.to_bytes()))
}

/// Parse UUID text into a handle, or null if it is malformed.
///
/// # Safety
///
/// `text` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ruuid_parse(text: *const c_char) -> *mut Uuid {
    if text.is_null() {
        return into_handle(Err(UuidError::InvalidInput("null text".to_string())));
    }
    let raw = unsafe { CStr::from_ptr(text) };
    let result = raw
        .to_str()
        .map_err(|_| UuidError::ParseError(raw.to_string_lossy().into_owned()))
        .and_then(Uuid::parse_str);
    into_handle(result)
}

/// Returns 1 for the nil UUID, 0 otherwise, -1 for a null handle.
///
/// # Safety
///
/// `uuid` must be null or a live handle from this library.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ruuid_is_nil(uuid: *const Uuid) -> c_int {
    match unsafe { uuid.as_ref() } {
        Some(uuid) => c_int::from(uuid.is_nil()),
        None => -1,
    }
}

unsafe fn format_handle(
    uuid: *const Uuid,
    format: Format,
    buffer: *mut c_char,
    length: usize,
) -> c_int {
    let Some(uuid) = (unsafe { uuid.as_ref() }) else {
        return -1;
    };
    if buffer.is_null() {
        return -1;
    }

    let buffer = unsafe { slice::from_raw_parts_mut(buffer.cast::<u8>(), length) };
    match uuid.format_into(format, buffer) {
        Ok(len) => len as c_int,
        Err(e) => {
            debug!(error = %e, style = %format, "uuid not formatted");
            -1
        }
    }
}

/// Write the simple form plus NUL into `buffer`.
///
/// Returns the text length, or -1 if an argument is null or the buffer is
/// shorter than 33 bytes.
///
/// # Safety
///
/// `uuid` must be null or a live handle; `buffer` must be null or valid for
/// `length` bytes of writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ruuid_get_simple(
    uuid: *const Uuid,
    buffer: *mut c_char,
    length: usize,
) -> c_int {
    unsafe { format_handle(uuid, Format::Simple, buffer, length) }
}

/// Write the hyphenated form plus NUL into `buffer` (needs 37 bytes).
///
/// # Safety
///
/// Same contract as [`ruuid_get_simple`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ruuid_get_hyphenated(
    uuid: *const Uuid,
    buffer: *mut c_char,
    length: usize,
) -> c_int {
    unsafe { format_handle(uuid, Format::Hyphenated, buffer, length) }
}

/// Write the urn form plus NUL into `buffer` (needs 46 bytes).
///
/// # Safety
///
/// Same contract as [`ruuid_get_simple`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ruuid_get_urn(
    uuid: *const Uuid,
    buffer: *mut c_char,
    length: usize,
) -> c_int {
    unsafe { format_handle(uuid, Format::Urn, buffer, length) }
}

/// Write the braced form plus NUL into `buffer` (needs 39 bytes).
///
/// # Safety
///
/// Same contract as [`ruuid_get_simple`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ruuid_get_braced(
    uuid: *const Uuid,
    buffer: *mut c_char,
    length: usize,
) -> c_int {
    unsafe { format_handle(uuid, Format::Braced, buffer, length) }
}

/// Release a handle. Null is ignored.
///
/// # Safety
///
/// `uuid` must be null or a handle from this library that has not been
/// released yet and is not used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ruuid_destroy(uuid: *mut Uuid) {
    if !uuid.is_null() {
        drop(unsafe { Box::from_raw(uuid) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FORMATTING_MAX_LENGTH;
    use std::ffi::CString;

    type Getter = unsafe extern "C" fn(*const Uuid, *mut c_char, usize) -> c_int;

    fn text(buf: &[c_char], len: c_int) -> String {
        buf[..len as usize].iter().map(|&c| c as u8 as char).collect()
    }

    #[test]
    fn test_nil_handle() {
        let nil = ruuid_generate_nil();
        assert!(!nil.is_null());
        unsafe {
            assert_eq!(ruuid_is_nil(nil), 1);
            let mut buf = [0 as c_char; FORMATTING_MAX_LENGTH];
            let n = ruuid_get_hyphenated(nil, buf.as_mut_ptr(), buf.len());
            assert_eq!(text(&buf, n), "00000000-0000-0000-0000-000000000000");
            assert_eq!(buf[n as usize], 0);
            ruuid_destroy(nil);
        }
    }

    #[test]
    fn test_v4_and_v5_handles() {
        let name = CString::new("abc123tagXYZ").unwrap();
        unsafe {
            let v4 = ruuid_generate_version_4();
            assert_eq!(ruuid_is_nil(v4), 0);

            let v5 = ruuid_generate_version_5_sip(name.as_ptr());
            let again = ruuid_generate_version_5_sip(name.as_ptr());
            assert_eq!(*v5, *again);
            assert_eq!(*v5, Uuid::new_v5_sip(b"abc123tagXYZ").unwrap());

            ruuid_destroy(v4);
            ruuid_destroy(v5);
            ruuid_destroy(again);
        }
    }

    #[test]
    fn test_v5_rejects_null_and_empty_name() {
        let empty = CString::new("").unwrap();
        unsafe {
            assert!(ruuid_generate_version_5_sip(ptr::null()).is_null());
            assert!(ruuid_generate_version_5_sip(empty.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_parse_handle() {
        let good = CString::new("{550e8400-e29b-41d4-a716-446655440000}").unwrap();
        let bad = CString::new("550e8400-e29b-41d4-a716-44665544000").unwrap();
        unsafe {
            assert!(ruuid_parse(ptr::null()).is_null());
            assert!(ruuid_parse(bad.as_ptr()).is_null());

            let uuid = ruuid_parse(good.as_ptr());
            assert!(!uuid.is_null());
            assert_eq!(ruuid_is_nil(uuid), 0);

            let mut buf = [0 as c_char; FORMATTING_MAX_LENGTH];
            let n = ruuid_get_simple(uuid, buf.as_mut_ptr(), buf.len());
            assert_eq!(text(&buf, n), "550e8400e29b41d4a716446655440000");
            let n = ruuid_get_urn(uuid, buf.as_mut_ptr(), buf.len());
            assert_eq!(text(&buf, n), "urn:uuid:550e8400-e29b-41d4-a716-446655440000");
            let n = ruuid_get_braced(uuid, buf.as_mut_ptr(), buf.len());
            assert_eq!(text(&buf, n), "{550e8400-e29b-41d4-a716-446655440000}");
            ruuid_destroy(uuid);
        }
    }

    #[test]
    fn test_format_rejects_bad_arguments() {
        unsafe {
            let uuid = ruuid_generate_version_4();
            let mut small = [7 as c_char; 10];
            assert_eq!(ruuid_get_hyphenated(uuid, small.as_mut_ptr(), small.len()), -1);
            assert!(small.iter().all(|&c| c == 7));

            let mut urn = [7 as c_char; 45];
            assert_eq!(ruuid_get_urn(uuid, urn.as_mut_ptr(), urn.len()), -1);

            assert_eq!(ruuid_get_simple(uuid, ptr::null_mut(), 64), -1);
            let mut buf = [0 as c_char; FORMATTING_MAX_LENGTH];
            assert_eq!(ruuid_get_simple(ptr::null(), buf.as_mut_ptr(), buf.len()), -1);
            ruuid_destroy(uuid);
        }
    }

    #[test]
    fn test_header_matches_exports() {
        let header = include_str!("../../include/ruuid.h");
        assert!(header.contains(&format!(
            "#define RUUID_FORMATTING_MAX_LENGTH {}",
            FORMATTING_MAX_LENGTH
        )));
        for symbol in [
            "ruuid_generate_nil(",
            "ruuid_generate_version_4(",
            "ruuid_generate_version_5_sip(",
            "ruuid_parse(",
            "ruuid_is_nil(",
            "ruuid_get_simple(",
            "ruuid_get_hyphenated(",
            "ruuid_get_urn(",
            "ruuid_get_braced(",
            "ruuid_destroy(",
        ] {
            assert!(header.contains(symbol), "{} missing from ruuid.h", symbol);
        }
    }

    #[test]
    fn test_buffer_of_text_length_is_rejected() {
        unsafe {
            let uuid = ruuid_generate_nil();
            let getters: [(Getter, usize); 4] = [
                (ruuid_get_simple, 32),
                (ruuid_get_hyphenated, 36),
                (ruuid_get_braced, 38),
                (ruuid_get_urn, 45),
            ];
            for (get, len) in getters {
                let mut buf = [7 as c_char; FORMATTING_MAX_LENGTH];
                assert_eq!(get(uuid, buf.as_mut_ptr(), len), -1);
                assert!(buf.iter().all(|&c| c == 7));
                assert_eq!(get(uuid, buf.as_mut_ptr(), len + 1), len as c_int);
                assert_eq!(buf[len], 0);
            }
            ruuid_destroy(uuid);
        }
    }

    #[test]
    fn test_null_handle() {
        unsafe {
            assert_eq!(ruuid_is_nil(ptr::null()), -1);
            ruuid_destroy(ptr::null_mut());
        }
    }
}
