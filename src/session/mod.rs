//! État du formulaire et répartition des actions utilisateur
//!
//! La couche de présentation (fenêtre egui ou ligne de commande) se contente
//! de remplir les champs de [`Session`] puis d'appeler [`Session::dispatch`].

use log::{info, warn};

use crate::batch::{convert_batch, error_block, ConversionResult};
use crate::decoder::Encoding;
use crate::error::ConversionError;
use crate::plot::{project, PlotRenderer};

/// Actions disponibles dans le formulaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Convert,
    Clear,
    PlotGraph,
    Close,
}

/// Effet d'une action, à refléter par la couche de présentation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Les champs du formulaire ont changé
    Updated,
    /// Le graphique a été transmis au collaborateur de rendu
    Plotted,
    /// Message à afficher dans une fenêtre modale
    Notify(String),
    /// Fermeture demandée
    Exit,
}

/// Champs du formulaire et dernier résultat de conversion
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub input: String,
    pub encoding: Encoding,
    pub output: String,
    pub slope: String,
    pub intercept: String,
    default_encoding: Encoding,
    result: Option<ConversionResult>,
}

impl Session {
    pub fn new(default_encoding: Encoding) -> Self {
        Self {
            encoding: default_encoding,
            default_encoding,
            ..Self::default()
        }
    }

    /// Résultat courant, tant qu'aucun « Clear » ni échec ne l'a remplacé
    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    /// Abscisses disponibles pour le tracé
    pub fn x_values(&self) -> Vec<f64> {
        self.result
            .as_ref()
            .map(ConversionResult::x_values)
            .unwrap_or_default()
    }

    pub fn dispatch(&mut self, action: Action, renderer: &mut dyn PlotRenderer) -> Outcome {
        match action {
            Action::Convert => self.convert(),
            Action::Clear => self.clear(),
            Action::PlotGraph => self.plot(renderer),
            Action::Close => {
                info!("Fermeture du formulaire");
                self.result = None;
                Outcome::Exit
            }
        }
    }

    fn convert(&mut self) -> Outcome {
        match convert_batch(&self.input, self.encoding) {
            Ok(result) => {
                info!("{} valeur(s) convertie(s) en {}", result.len(), self.encoding);
                self.output = result.render();
                self.result = Some(result);
                self.slope.clear();
                self.intercept.clear();
            }
            Err(ConversionError::EmptyInput) => {
                // Le résultat précédent reste utilisable pour le tracé
                self.output = error_block(&ConversionError::EmptyInput);
            }
            Err(e) => {
                warn!("Conversion échouée: {}", e);
                self.output = error_block(&e);
                self.result = None;
            }
        }
        Outcome::Updated
    }

    fn clear(&mut self) -> Outcome {
        self.input.clear();
        self.output.clear();
        self.slope.clear();
        self.intercept.clear();
        self.encoding = self.default_encoding;
        self.result = None;
        Outcome::Updated
    }

    fn plot(&mut self, renderer: &mut dyn PlotRenderer) -> Outcome {
        let plot = match project(&self.x_values(), &self.slope, &self.intercept) {
            Ok(plot) => plot,
            Err(e) => {
                warn!("Tracé refusé: {}", e);
                return Outcome::Notify(e.user_message());
            }
        };

        match renderer.render(&plot) {
            Ok(()) => Outcome::Plotted,
            Err(e) => {
                warn!("Rendu du graphique échoué: {:#}", e);
                Outcome::Notify(format!("Error while plotting: {:#}", e))
            }
        }
    }
}
