//! Translation between UTF-8 payloads and the legacy single-byte charset,
//! plus the add-13 message cipher.

/// Byte the cipher substitutes for a newline.
pub const CIPHER_NEWLINE: u8 = 0x1A;

/// Transliterate a UTF-8 string to the single-byte game charset.
///
/// Code points U+0000..U+00FF map to their byte value; everything else
/// becomes `?`. The snapshot arrives as UTF-8 and every string that
/// transits through the binary codec goes through here first.
pub fn to_game_charset(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

/// Expand single-byte game-charset data back to UTF-8.
///
/// Bytes >= 0x80 become the corresponding U+0080..U+00FF code point
/// (a two-byte UTF-8 sequence), so `to_game_charset` is its inverse.
pub fn from_game_charset(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Apply the legacy message cipher: newline becomes 0x1A, every other
/// character becomes `(c + 13) mod 256` after charset transliteration.
pub fn encipher_message(text: &str) -> Vec<u8> {
    to_game_charset(text)
        .into_iter()
        .map(|b| {
            if b == b'\n' {
                CIPHER_NEWLINE
            } else {
                b.wrapping_add(13)
            }
        })
        .collect()
}

/// Invert [`encipher_message`].
pub fn decipher_message(bytes: &[u8]) -> String {
    let plain: Vec<u8> = bytes
        .iter()
        .map(|&b| {
            if b == CIPHER_NEWLINE {
                b'\n'
            } else {
                b.wrapping_sub(13)
            }
        })
        .collect();
    from_game_charset(&plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_collapses_latin1_and_replaces_the_rest() {
        assert_eq!(to_game_charset("abc"), b"abc");
        // U+00E9 is a two-byte UTF-8 sequence that fits a single byte.
        assert_eq!(to_game_charset("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        // Outside U+00FF: replaced.
        assert_eq!(to_game_charset("\u{2603}"), b"?");
    }

    #[test]
    fn charset_round_trips_high_bytes() {
        let bytes: Vec<u8> = (0x20..=0xFFu8).collect();
        let text = from_game_charset(&bytes);
        assert_eq!(to_game_charset(&text), bytes);
    }

    #[test]
    fn cipher_adds_13_and_replaces_newlines() {
        assert_eq!(encipher_message("AB\n"), vec![b'N', b'O', CIPHER_NEWLINE]);
    }

    #[test]
    fn cipher_round_trips() {
        let input = "hello\nworld";
        let enciphered = encipher_message(input);
        assert_eq!(enciphered[5], CIPHER_NEWLINE);
        assert_eq!(decipher_message(&enciphered), input);
    }

    #[test]
    fn cipher_wraps_past_255() {
        // 0xF8 + 13 wraps around.
        let enciphered = encipher_message("\u{f8}");
        assert_eq!(enciphered, vec![0xF8u8.wrapping_add(13)]);
        assert_eq!(decipher_message(&enciphered), "\u{f8}");
    }
}
