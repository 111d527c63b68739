#[path = "utils_test.rs"] mod utils_test;

/// Whether `p` is a multiple of `alignment` (a power of two).
#[inline]
pub fn is_aligned_on<T>(p: *const T, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    (p as usize) & (alignment - 1) == 0
}

/// Lowercase hex string of `bytes`.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse a hex string of exactly `N` bytes. Whitespace and `_` are ignored.
pub fn parse_hex<const N: usize>(text: &str) -> Option<[u8; N]> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|c| !c.is_ascii_whitespace() && *c != b'_')
        .collect();
    if digits.len() != 2 * N {
        return None;
    }
    let mut out = [0u8; N];
    for (o, pair) in out.iter_mut().zip(digits.chunks_exact(2)) {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        *o = (hi << 4 | lo) as u8;
    }
    Some(out)
}
