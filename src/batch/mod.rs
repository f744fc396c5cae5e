//! Conversion par lot d'un bloc de texte multi-lignes

use log::debug;
use serde::Serialize;

use crate::decoder::{decode, DecodedValue, Encoding};
use crate::error::ConversionError;

/// Une ligne convertie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionEntry {
    /// Texte d'origine, sans les espaces de bord
    pub hex: String,
    pub encoding: Encoding,
    pub value: DecodedValue,
}

impl ConversionEntry {
    /// Ligne affichée dans la zone de résultats
    pub fn display_line(&self) -> String {
        format!("Hex: {} => {}: {}", self.hex, self.encoding.label(), self.value)
    }
}

/// Résultat d'une conversion, dans l'ordre des lignes d'entrée
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConversionResult {
    entries: Vec<ConversionEntry>,
}

impl ConversionResult {
    pub fn entries(&self) -> &[ConversionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Abscisses du tracé
    pub fn x_values(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.value.as_f64()).collect()
    }

    /// Bloc de texte de la zone de résultats
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(ConversionEntry::display_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Convertit chaque ligne non vide du bloc.
///
/// La première ligne invalide annule tout le lot : aucun résultat partiel.
/// Un bloc sans aucune ligne est refusé ; un bloc fait uniquement de lignes
/// blanches donne un résultat vide.
pub fn convert_batch(text: &str, encoding: Encoding) -> Result<ConversionResult, ConversionError> {
    if text.lines().next().is_none() {
        return Err(ConversionError::EmptyInput);
    }

    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let hex = line.trim();
        if hex.is_empty() {
            continue;
        }

        let value = decode(hex, encoding).map_err(|e| ConversionError::Line {
            line: index + 1,
            source: Box::new(e),
        })?;
        debug!("ligne {}: {} -> {}", index + 1, hex, value);

        entries.push(ConversionEntry {
            hex: hex.to_string(),
            encoding,
            value,
        });
    }

    Ok(ConversionResult { entries })
}

/// Message remplaçant la zone de résultats en cas d'échec
pub fn error_block(error: &ConversionError) -> String {
    match error {
        ConversionError::EmptyInput => error.to_string(),
        other => format!("Error during conversion: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order() {
        let result = convert_batch("7FFF\n8000", Encoding::SignedInt16).unwrap();
        assert_eq!(result.x_values(), vec![32767.0, -32768.0]);
        assert_eq!(
            result.render(),
            "Hex: 7FFF => 16-bit Unsigned/Signed: 32767\nHex: 8000 => 16-bit Unsigned/Signed: -32768"
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let result = convert_batch("\n  3FC00000  \n\r\n\t\n40000000\n", Encoding::Float32);
        let result = result.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.entries()[0].hex, "3FC00000");
        assert_eq!(result.entries()[1].display_line(), "Hex: 40000000 => 32-bit Float: 2.0");
    }

    #[test]
    fn test_failure_aborts_whole_batch() {
        let err = convert_batch("7FFF\nZZZZ\n8000", Encoding::SignedInt16).unwrap_err();
        match &err {
            ConversionError::Line { line, source } => {
                assert_eq!(*line, 2);
                assert!(matches!(**source, ConversionError::InvalidInput { .. }));
            }
            other => panic!("erreur inattendue: {:?}", other),
        }
        assert!(error_block(&err).starts_with("Error during conversion: line 2:"));
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(
            convert_batch("", Encoding::SignedInt16).unwrap_err(),
            ConversionError::EmptyInput
        );
        assert_eq!(
            error_block(&ConversionError::EmptyInput),
            "Please enter hexadecimal values to convert."
        );
        assert!(convert_batch("\n  \n", Encoding::SignedInt16).unwrap().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let result = convert_batch("FFFF", Encoding::TwosComplement16).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "hex": "FFFF", "encoding": "twos_complement16", "value": -1 }])
        );
    }
}
