/// Expands 1, 2 or 4 bit packed pixels to one byte per pixel, most
/// significant bits first. Other depths are returned unchanged.
pub fn expand_pixels(scan_line: &[u8], depth: u16) -> Vec<u8> {
    let per_byte = match depth {
        1 | 2 | 4 => 8 / usize::from(depth),
        _ => return scan_line.to_vec(),
    };
    let mask = (1u8 << depth) - 1;
    let mut result = Vec::with_capacity(scan_line.len() * per_byte);
    for &byte in scan_line {
        for i in (0..per_byte).rev() {
            result.push((byte >> (i * usize::from(depth))) & mask);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_0xa5() {
        assert_eq!(expand_pixels(&[0xA5], 4), vec![0xA, 0x5]);
        assert_eq!(expand_pixels(&[0xA5], 2), vec![0x2, 0x2, 0x1, 0x1]);
        assert_eq!(expand_pixels(&[0xA5], 1), vec![1, 0, 1, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn test_one_bit_is_msb_first() {
        assert_eq!(expand_pixels(&[0x80, 0x01], 1), vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_full_bytes_bypass() {
        assert_eq!(expand_pixels(&[1, 2, 3], 8), vec![1, 2, 3]);
        assert!(expand_pixels(&[], 4).is_empty());
    }
}
