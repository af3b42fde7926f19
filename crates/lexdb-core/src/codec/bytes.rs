use crate::error::InternalError;

const ESCAPE: u8 = 0x01;
const ESCAPED_ZERO: u8 = 0x01;
const ESCAPED_ESCAPE: u8 = 0x02;

// Byte strings are escaped so an ascending encoding never contains 0x00.
// 0x00 -> 01 01 and 0x01 -> 01 02 keep byte order and stay prefix-safe
// against the ascending separator.
pub(crate) fn push_escaped(out: &mut Vec<u8>, bytes: &[u8]) {
    out.reserve(bytes.len());
    for &byte in bytes {
        match byte {
            0x00 => out.extend_from_slice(&[ESCAPE, ESCAPED_ZERO]),
            ESCAPE => out.extend_from_slice(&[ESCAPE, ESCAPED_ESCAPE]),
            _ => out.push(byte),
        }
    }
}

pub(crate) fn unescape(bytes: &[u8]) -> Result<Vec<u8>, InternalError> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied();

    while let Some(byte) = iter.next() {
        match byte {
            0x00 => {
                return Err(InternalError::codec_illegal_data(
                    "unescaped zero byte inside variable-width payload",
                ));
            }
            ESCAPE => match iter.next() {
                Some(ESCAPED_ZERO) => out.push(0x00),
                Some(ESCAPED_ESCAPE) => out.push(ESCAPE),
                Some(other) => {
                    return Err(InternalError::codec_illegal_data(format!(
                        "invalid escape sequence 0x01 0x{other:02x}"
                    )));
                }
                None => {
                    return Err(InternalError::codec_illegal_data(
                        "truncated escape sequence at end of payload",
                    ));
                }
            },
            _ => out.push(byte),
        }
    }

    Ok(out)
}

/// Encoded length of `bytes` after escaping.
pub(crate) fn escaped_len(bytes: &[u8]) -> usize {
    bytes.len() + bytes.iter().filter(|&&b| b <= ESCAPE).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        push_escaped(&mut out, bytes);
        out
    }

    #[test]
    fn escaping_removes_zero_bytes() {
        assert_eq!(escaped(&[0x00, 0x01, 0x02]), vec![0x01, 0x01, 0x01, 0x02, 0x02]);
        assert!(!escaped(&[0, 0, 0, 1]).contains(&0));
        assert_eq!(escaped_len(&[0x00, 0x01, 0x02]), 5);
    }

    #[test]
    fn escaping_preserves_byte_order() {
        let samples: [&[u8]; 6] = [&[], &[0x00], &[0x00, 0xFF], &[0x01], &[0x02], &[0x02, 0x00]];
        for pair in samples.windows(2) {
            assert!(escaped(pair[0]) < escaped(pair[1]), "{pair:?}");
        }
    }

    #[test]
    fn unescape_rejects_malformed_payloads() {
        assert!(unescape(&[0x41, 0x00]).is_err());
        assert!(unescape(&[0x01]).is_err());
        assert!(unescape(&[0x01, 0x07]).is_err());
        assert_eq!(unescape(&escaped(b"a\0b\x01")).expect("valid"), b"a\0b\x01");
    }
}
