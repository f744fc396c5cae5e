//! Erreurs de conversion et de tracé

use thiserror::Error;

/// Message affiché quand le bloc d'entrée est vide
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter hexadecimal values to convert.";

/// Message affiché quand un tracé est demandé sans conversion préalable
pub const PRECONDITION_MESSAGE: &str =
    "Please first convert hexadecimal values to x-values before plotting.";

/// Message affiché quand m ou c ne sont pas numériques
pub const INVALID_PARAMETER_MESSAGE: &str = "Please enter valid numerical values for m and c.";

/// Erreurs du décodeur, du convertisseur par lot et de la projection linéaire
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Chaîne hexadécimale invalide ou de mauvaise longueur
    #[error("invalid hexadecimal input {input:?}: {reason}")]
    InvalidInput { input: String, reason: String },

    /// Encodage inconnu
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Paramètre m ou c non numérique
    #[error("{} ({name} = {value:?})", INVALID_PARAMETER_MESSAGE)]
    InvalidParameter { name: &'static str, value: String },

    /// Tracé demandé sans valeurs x
    #[error("{}", PRECONDITION_MESSAGE)]
    Precondition,

    /// Aucun texte à convertir
    #[error("{}", EMPTY_INPUT_MESSAGE)]
    EmptyInput,

    /// Échec d'une ligne d'un lot, qui annule tout le lot
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    pub(crate) fn invalid_input(input: &str, reason: impl Into<String>) -> Self {
        ConversionError::InvalidInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Erreur d'origine, sans l'enveloppe de numéro de ligne
    pub fn root(&self) -> &ConversionError {
        match self {
            ConversionError::Line { source, .. } => source.root(),
            other => other,
        }
    }

    /// Message destiné à une notification modale
    pub fn user_message(&self) -> String {
        match self.root() {
            ConversionError::InvalidParameter { .. } => INVALID_PARAMETER_MESSAGE.to_string(),
            ConversionError::Precondition => PRECONDITION_MESSAGE.to_string(),
            ConversionError::EmptyInput => EMPTY_INPUT_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_error_root() {
        let err = ConversionError::Line {
            line: 3,
            source: Box::new(ConversionError::invalid_input("ZZZZ", "bad digit")),
        };
        assert!(matches!(err.root(), ConversionError::InvalidInput { .. }));
        assert!(err.to_string().starts_with("line 3: invalid hexadecimal input \"ZZZZ\""));
    }

    #[test]
    fn test_user_messages() {
        let err = ConversionError::InvalidParameter {
            name: "m",
            value: "abc".to_string(),
        };
        assert_eq!(err.user_message(), INVALID_PARAMETER_MESSAGE);
        assert_eq!(ConversionError::Precondition.user_message(), PRECONDITION_MESSAGE);
    }
}
