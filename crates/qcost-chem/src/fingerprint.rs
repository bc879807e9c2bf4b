//! Content fingerprints keying derived files to the data they came from.

/// DJB2a and FNV-1a over `bytes`, as 32 hex digits.
pub fn fingerprint(bytes: impl IntoIterator<Item = u8>) -> String {
    let mut h1: u64 = 5381;
    let mut h2: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        h1 = h1.wrapping_mul(33) ^ u64::from(b);
        h2 ^= u64::from(b);
        h2 = h2.wrapping_mul(0x0100_0000_01b3);
    }
    format!("{h1:016x}{h2:016x}")
}
