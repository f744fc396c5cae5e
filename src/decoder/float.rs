//! Décodage IEEE-754 big-endian et formatage des flottants

/// Simple précision ; l'élargissement en f64 est exact
pub fn decode_single(bytes: [u8; 4]) -> f64 {
    f64::from(f32::from_be_bytes(bytes))
}

/// Double précision
pub fn decode_double(bytes: [u8; 8]) -> f64 {
    f64::from_be_bytes(bytes)
}

/// Formate un flottant sous sa forme la plus courte qui se relit à l'identique.
///
/// Les valeurs entières gardent un `.0`, les non-finis s'écrivent `nan`,
/// `inf` et `-inf`, et la notation scientifique (`1e+16`, `1e-05`) est
/// utilisée hors de l'intervalle [1e-4, 1e16).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return scientific(value);
    }

    let text = format!("{}", value);
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

fn scientific(value: f64) -> String {
    // `{:e}` donne "1e16" ou "1.5e-5" : on ajoute le signe et deux chiffres d'exposant
    let text = format!("{:e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}
