//! Registry value encoding, independent of the Win32 calls.
//!
//! Only the Windows backend uses these; they are compiled everywhere so
//! the byte handling is tested on every platform.

#![cfg_attr(not(windows), allow(dead_code))]

/// `REG_SZ` value type code.
pub const REG_SZ: u32 = 1;

/// `REG_EXPAND_SZ` value type code.
pub const REG_EXPAND_SZ: u32 = 2;

/// `REG_DWORD` (little-endian) value type code.
pub const REG_DWORD: u32 = 4;

/// Returns true for the value types holding text.
#[must_use]
pub const fn is_string(kind: u32) -> bool {
    kind == REG_SZ || kind == REG_EXPAND_SZ
}

/// Decodes UTF-16LE registry text.
///
/// Stops at the first NUL; a missing terminator is tolerated and a
/// trailing odd byte is dropped. Unpaired surrogates become U+FFFD.
#[must_use]
pub fn decode_sz(bytes: &[u8]) -> String {
    let wide: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    String::from_utf16_lossy(&wide)
}

/// Decodes a `REG_DWORD`, or `None` for another type or a length other than 4.
#[must_use]
pub fn decode_dword(kind: u32, bytes: &[u8]) -> Option<u32> {
    if kind != REG_DWORD {
        return None;
    }
    <[u8; 4]>::try_from(bytes).ok().map(u32::from_le_bytes)
}

/// Encodes text as NUL-terminated UTF-16LE.
#[must_use]
pub fn encode_sz(value: &str) -> Vec<u8> {
    value
        .encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}
