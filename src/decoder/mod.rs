//! Décodeur numérique
//!
//! Transforme une chaîne hexadécimale big-endian en valeur numérique selon
//! l'un des six encodages du formulaire. Toutes les fonctions sont pures.

pub mod float;
pub mod integer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

pub use float::format_float;
pub use integer::sign_extend;

/// Encodage sélectionnable dans le formulaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    SignedInt16,
    SignedInt32,
    TwosComplement16,
    TwosComplement32,
    Float32,
    Float64,
}

impl Encoding {
    /// Tous les encodages, dans l'ordre de la liste déroulante
    pub const ALL: [Encoding; 6] = [
        Encoding::SignedInt16,
        Encoding::SignedInt32,
        Encoding::TwosComplement16,
        Encoding::TwosComplement32,
        Encoding::Float32,
        Encoding::Float64,
    ];

    /// Libellé affiché dans le formulaire et dans les lignes de résultat
    pub fn label(self) -> &'static str {
        match self {
            Encoding::SignedInt16 => "16-bit Unsigned/Signed",
            Encoding::SignedInt32 => "32-bit Unsigned/Signed",
            Encoding::TwosComplement16 => "16-bit Two's Complement",
            Encoding::TwosComplement32 => "32-bit Two's Complement",
            Encoding::Float32 => "32-bit Float",
            Encoding::Float64 => "64-bit Float",
        }
    }

    /// Nom court utilisé en ligne de commande
    pub fn short_name(self) -> &'static str {
        match self {
            Encoding::SignedInt16 => "i16",
            Encoding::SignedInt32 => "i32",
            Encoding::TwosComplement16 => "twos16",
            Encoding::TwosComplement32 => "twos32",
            Encoding::Float32 => "f32",
            Encoding::Float64 => "f64",
        }
    }

    /// Largeur du motif binaire
    pub fn bit_width(self) -> u32 {
        match self {
            Encoding::SignedInt16 | Encoding::TwosComplement16 => 16,
            Encoding::SignedInt32 | Encoding::TwosComplement32 | Encoding::Float32 => 32,
            Encoding::Float64 => 64,
        }
    }

    /// Nombre de chiffres hexadécimaux attendus
    pub fn hex_digits(self) -> usize {
        (self.bit_width() / 4) as usize
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::SignedInt16
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = ConversionError;

    /// Accepte le libellé du formulaire, le nom court ou le nom de variante,
    /// sans tenir compte de la casse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Encoding::ALL
            .iter()
            .copied()
            .find(|encoding| {
                wanted.eq_ignore_ascii_case(encoding.label())
                    || wanted.eq_ignore_ascii_case(encoding.short_name())
                    || wanted.eq_ignore_ascii_case(encoding.variant_name())
            })
            .ok_or_else(|| ConversionError::UnsupportedEncoding(wanted.to_string()))
    }
}

impl Encoding {
    fn variant_name(self) -> &'static str {
        match self {
            Encoding::SignedInt16 => "signed_int16",
            Encoding::SignedInt32 => "signed_int32",
            Encoding::TwosComplement16 => "twos_complement16",
            Encoding::TwosComplement32 => "twos_complement32",
            Encoding::Float32 => "float32",
            Encoding::Float64 => "float64",
        }
    }
}

/// Valeur décodée : entière pour les encodages entiers, flottante sinon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Integer(i64),
    Float(f64),
}

impl DecodedValue {
    /// Projection numérique utilisée comme abscisse du tracé
    pub fn as_f64(self) -> f64 {
        match self {
            DecodedValue::Integer(value) => value as f64,
            DecodedValue::Float(value) => value,
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Integer(value) => write!(f, "{}", value),
            DecodedValue::Float(value) => f.write_str(&format_float(*value)),
        }
    }
}

/// Décode une chaîne hexadécimale selon l'encodage demandé
pub fn decode(hex: &str, encoding: Encoding) -> Result<DecodedValue, ConversionError> {
    let digits = strip_prefix(hex.trim());
    match encoding {
        Encoding::SignedInt16 | Encoding::TwosComplement16 => {
            let bytes: [u8; 2] = read_bytes(hex, digits)?;
            Ok(DecodedValue::Integer(integer::decode_signed(&bytes)))
        }
        Encoding::SignedInt32 | Encoding::TwosComplement32 => {
            let bytes: [u8; 4] = read_bytes(hex, digits)?;
            Ok(DecodedValue::Integer(integer::decode_signed(&bytes)))
        }
        Encoding::Float32 => {
            let bytes: [u8; 4] = read_bytes(hex, digits)?;
            Ok(DecodedValue::Float(float::decode_single(bytes)))
        }
        Encoding::Float64 => {
            let bytes: [u8; 8] = read_bytes(hex, digits)?;
            Ok(DecodedValue::Float(float::decode_double(bytes)))
        }
    }
}

/// Décode avec un encodage donné par son nom (libellé, nom court...)
pub fn decode_named(hex: &str, encoding: &str) -> Result<DecodedValue, ConversionError> {
    let encoding: Encoding = encoding.parse()?;
    decode(hex, encoding)
}

fn strip_prefix(hex: &str) -> &str {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

/// Lit exactement N octets ; aucune complétion ni troncature
fn read_bytes<const N: usize>(original: &str, digits: &str) -> Result<[u8; N], ConversionError> {
    if digits.len() != N * 2 {
        return Err(ConversionError::invalid_input(
            original,
            format!("expected {} hex digits, found {}", N * 2, digits.chars().count()),
        ));
    }

    let mut bytes = [0u8; N];
    hex::decode_to_slice(digits, &mut bytes).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { index, .. } => {
            // `index` compte des octets : on remonte au caractère qui le contient
            let (position, (_, c)) = digits
                .char_indices()
                .enumerate()
                .take_while(|(_, (start, _))| *start <= index)
                .last()
                .unwrap_or((0, (0, '?')));
            ConversionError::invalid_input(
                original,
                format!("invalid hex character {:?} at position {}", c, position),
            )
        }
        other => ConversionError::invalid_input(original, other.to_string()),
    })?;
    Ok(bytes)
}
