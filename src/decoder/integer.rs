//! Décodage des entiers signés (complément à deux)

/// Applique l'extension de signe à un motif non signé de `bits` bits :
/// si le bit de poids fort est positionné, la valeur vaut motif - 2^bits.
pub fn sign_extend(pattern: u64, bits: u32) -> i64 {
    debug_assert!(bits > 0 && bits < 64);
    let modulus = 1i64 << bits;
    let value = (pattern & (modulus as u64 - 1)) as i64;
    if value & (1i64 << (bits - 1)) != 0 {
        value - modulus
    } else {
        value
    }
}

/// Interprète des octets big-endian comme un entier en complément à deux
pub fn decode_signed(bytes: &[u8]) -> i64 {
    let pattern = bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
    sign_extend(pattern, bytes.len() as u32 * 8)
}
