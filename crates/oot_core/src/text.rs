//! The game's 8-bit character set.
//!
//! Only the glyphs that can appear in a player name are mapped: digits,
//! Latin letters, space, hyphen and period. Byte 0 is the digit `0` in the
//! table, but name fields use it as the empty-cell marker, so [`decode`]
//! skips it instead of emitting anything.

use crate::error::{CoreError, Result};

pub const NO_CHARACTER: u8 = 0;
pub const SPACE: u8 = 223;
pub const HYPHEN: u8 = 228;
pub const PERIOD: u8 = 234;

const UPPERCASE_FIRST: u8 = 171;
const UPPERCASE_LAST: u8 = 196;
const UPPERCASE_SHIFT: u8 = 106;
const LOWERCASE_FIRST: u8 = 197;
const LOWERCASE_LAST: u8 = 222;
const LOWERCASE_SHIFT: u8 = 100;

static CHARACTER_MAP: [Option<char>; 256] = build_character_map();

const fn build_character_map() -> [Option<char>; 256] {
    let mut map = [None; 256];

    let mut b = 0u8;
    while b <= 9 {
        map[b as usize] = Some((b + b'0') as char);
        b += 1;
    }

    let mut b = UPPERCASE_FIRST;
    while b <= UPPERCASE_LAST {
        map[b as usize] = Some((b - UPPERCASE_SHIFT) as char);
        b += 1;
    }

    let mut b = LOWERCASE_FIRST;
    while b <= LOWERCASE_LAST {
        map[b as usize] = Some((b - LOWERCASE_SHIFT) as char);
        b += 1;
    }

    map[SPACE as usize] = Some(' ');
    map[HYPHEN as usize] = Some('-');
    map[PERIOD as usize] = Some('.');
    map
}

/// Table lookup; `None` means the byte has no printable mapping.
pub fn lookup(byte: u8) -> Option<char> {
    CHARACTER_MAP[byte as usize]
}

/// Decodes a name field. Byte 0 and unmapped bytes contribute nothing.
pub fn decode(bytes: &[u8]) -> String {
    decode_with_dropped(bytes).0
}

/// Like [`decode`], also returning the unmapped byte values that were dropped
/// (byte 0 is not reported).
pub fn decode_with_dropped(bytes: &[u8]) -> (String, Vec<u8>) {
    let mut out = String::with_capacity(bytes.len());
    let mut dropped = Vec::new();
    for &b in bytes {
        if b == NO_CHARACTER {
            continue;
        }
        match lookup(b) {
            Some(c) => out.push(c),
            None => dropped.push(b),
        }
    }
    (out, dropped)
}

pub fn encode_char(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'A'..='Z' => Some(c as u8 + UPPERCASE_SHIFT),
        'a'..='z' => Some(c as u8 + LOWERCASE_SHIFT),
        ' ' => Some(SPACE),
        '-' => Some(HYPHEN),
        '.' => Some(PERIOD),
        _ => None,
    }
}

pub fn encode(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            encode_char(c).ok_or_else(|| {
                CoreError::malformed(format!("character {c:?} has no in-game glyph"))
            })
        })
        .collect()
}
