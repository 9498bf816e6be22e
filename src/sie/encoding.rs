//! Legacy 8-bit encoding probe for SIE input.
//!
//! The SIE standard mandates IBM PC code page 437 ("PC8"), but files in
//! the wild also arrive in CP850, Latin-1, or UTF-8. The probe tries
//! each in turn and keeps the first that decodes cleanly.

use encoding_rs::WINDOWS_1252;

use crate::core::{AvstamningError, Config, SieEncoding};

/// Code page 437, upper half (0x80–0xFF). The lower half is ASCII.
const CP437_HIGH: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    // 0xD0
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    // 0xE0
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    // 0xF0
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

/// Code page 850, upper half (0x80–0xFF).
const CP850_HIGH: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', 'ø', '£', 'Ø', '×', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '®', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'À', '©', '╣', '║', '╗', '╝', '¢', '¥', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', 'ã', 'Ã', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤',
    // 0xD0
    'ð', 'Ð', 'Ê', 'Ë', 'È', 'ı', 'Í', 'Î', 'Ï', '┘', '┌', '█', '▄', '¦', 'Ì', '▀',
    // 0xE0
    'Ó', 'ß', 'Ô', 'Ò', 'õ', 'Õ', 'µ', 'þ', 'Þ', 'Ú', 'Û', 'Ù', 'ý', 'Ý', '¯', '´',
    // 0xF0
    '\u{ad}', '±', '‗', '¾', '¶', '§', '÷', '¸', '°', '¨', '·', '¹', '³', '²', '■', '\u{a0}',
];

fn decode_table(bytes: &[u8], high: &[char; 128]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b < 0x80 {
            out.push(b as char);
        } else {
            out.push(high[(b - 0x80) as usize]);
        }
    }
    out
}

/// Decode with one specific encoding.
///
/// `Err` carries the byte offset of the first undecodable byte. The DOS
/// code pages and Latin-1 assign a character to every byte value, so
/// only the UTF-8 leg can actually fail.
pub fn decode_with(bytes: &[u8], encoding: SieEncoding) -> Result<String, usize> {
    match encoding {
        SieEncoding::Cp437 => Ok(decode_table(bytes, &CP437_HIGH)),
        SieEncoding::Cp850 => Ok(decode_table(bytes, &CP850_HIGH)),
        SieEncoding::Latin1 => Ok(WINDOWS_1252.decode(bytes).0.into_owned()),
        SieEncoding::Utf8 => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(e) => Err(e.valid_up_to()),
        },
    }
}

/// Decode a raw SIE byte stream.
///
/// Uses the pinned encoding from [`Config`] when set; otherwise probes
/// [`SieEncoding::PROBE_ORDER`] and keeps the first encoding that
/// decodes without error. Exhausting the probe is fatal.
pub fn decode_bytes(
    bytes: &[u8],
    config: &Config,
) -> Result<(String, SieEncoding), AvstamningError> {
    if let Some(encoding) = config.encoding {
        return decode_with(bytes, encoding)
            .map(|text| (text, encoding))
            .map_err(|offset| AvstamningError::Encoding { offset });
    }

    let mut last_offset = 0;
    for encoding in SieEncoding::PROBE_ORDER {
        match decode_with(bytes, encoding) {
            Ok(text) => {
                tracing::debug!("decoded SIE input as {}", encoding.label());
                return Ok((text, encoding));
            }
            Err(offset) => last_offset = offset,
        }
    }
    Err(AvstamningError::Encoding { offset: last_offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, ConfigBuilder};

    #[test]
    fn cp437_swedish_letters() {
        let bytes = [0x86, 0x84, 0x94, 0x8F, 0x8E, 0x99];
        assert_eq!(decode_with(&bytes, SieEncoding::Cp437).unwrap(), "åäöÅÄÖ");
    }

    #[test]
    fn cp850_shares_the_nordic_range_with_cp437() {
        let bytes = [0x86, 0x84, 0x94, 0x8F, 0x8E, 0x99];
        assert_eq!(decode_with(&bytes, SieEncoding::Cp850).unwrap(), "åäöÅÄÖ");
    }

    #[test]
    fn cp850_differs_from_cp437_above_the_nordic_range() {
        assert_eq!(decode_with(&[0x9E], SieEncoding::Cp437).unwrap(), "₧");
        assert_eq!(decode_with(&[0x9E], SieEncoding::Cp850).unwrap(), "×");
    }

    #[test]
    fn latin1_swedish_letters() {
        let bytes = [0xE5, 0xE4, 0xF6, 0xC5, 0xC4, 0xD6];
        assert_eq!(decode_with(&bytes, SieEncoding::Latin1).unwrap(), "åäöÅÄÖ");
    }

    #[test]
    fn utf8_reports_offending_offset() {
        let bytes = b"abc\xFFdef";
        assert_eq!(decode_with(bytes, SieEncoding::Utf8), Err(3));
    }

    #[test]
    fn probe_settles_on_cp437() {
        let config = Config::default();
        let (text, encoding) = decode_bytes(&[0x86], &config).unwrap();
        assert_eq!(encoding, SieEncoding::Cp437);
        assert_eq!(text, "å");
    }

    #[test]
    fn pinned_utf8_fails_fatally_on_legacy_bytes() {
        let config = ConfigBuilder::new().encoding(SieEncoding::Utf8).build();
        let err = decode_bytes(&[b'#', 0x86], &config).unwrap_err();
        match err {
            AvstamningError::Encoding { offset } => assert_eq!(offset, 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
