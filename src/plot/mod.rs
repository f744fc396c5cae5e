//! Projection linéaire y = m·x + c et rendu des graphiques

pub mod font;
pub mod raster;

use anyhow::{anyhow, Result};
use log::warn;

use crate::decoder::format_float;
use crate::error::ConversionError;

pub use raster::PngRenderer;

/// Titre commun à tous les graphiques
pub const PLOT_TITLE: &str = "Graph of y = mx + c";

/// Droite prête à être tracée
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlot {
    pub slope: f64,
    pub intercept: f64,
    /// Couples (x, y) dans l'ordre des valeurs converties
    pub points: Vec<(f64, f64)>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend: String,
    pub grid: bool,
}

impl LinePlot {
    pub fn y_values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, y)| y).collect()
    }

    /// Points dont les deux coordonnées sont finies
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }

    /// Étendue des points finis, élargie quand elle est dégénérée
    pub fn bounds(&self) -> Result<PlotBounds> {
        let mut points = self.finite_points();
        let (x0, y0) = points
            .next()
            .ok_or_else(|| anyhow!("aucun point fini à tracer"))?;

        let mut bounds = PlotBounds {
            x_min: x0,
            x_max: x0,
            y_min: y0,
            y_max: y0,
        };
        for (x, y) in points {
            bounds.x_min = bounds.x_min.min(x);
            bounds.x_max = bounds.x_max.max(x);
            bounds.y_min = bounds.y_min.min(y);
            bounds.y_max = bounds.y_max.max(y);
        }

        (bounds.x_min, bounds.x_max) = widen(bounds.x_min, bounds.x_max);
        (bounds.y_min, bounds.y_max) = widen(bounds.y_min, bounds.y_max);
        Ok(bounds)
    }
}

/// Rectangle de données affiché
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PlotBounds {
    /// Position relative (0..1) d'un point dans le rectangle, y vers le haut
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        (ratio(x, self.x_min, self.x_max), ratio(y, self.y_min, self.y_max))
    }
}

/// Élargit une étendue dégénérée de max(1, |v|·1e-3) de chaque côté, sans
/// dépasser les flottants finis
fn widen(min: f64, max: f64) -> (f64, f64) {
    if max - min > f64::EPSILON * max.abs().max(min.abs()).max(1.0) {
        return (min, max);
    }
    let pad = (max.abs().max(min.abs()) * 1e-3).max(1.0);
    ((min - pad).max(f64::MIN), (max + pad).min(f64::MAX))
}

/// (v - lo) / (hi - lo) calculé sur des moitiés : hi - lo peut dépasser f64::MAX
fn ratio(value: f64, lo: f64, hi: f64) -> f64 {
    (value * 0.5 - lo * 0.5) / (hi * 0.5 - lo * 0.5)
}

/// Collaborateur chargé d'afficher ou d'exporter un graphique
pub trait PlotRenderer {
    fn render(&mut self, plot: &LinePlot) -> Result<()>;
}

/// Lit un paramètre m ou c
pub fn parse_parameter(name: &'static str, text: &str) -> Result<f64, ConversionError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ConversionError::InvalidParameter {
            name,
            value: text.to_string(),
        })
}

/// Calcule y = m·x + c pour chaque abscisse.
///
/// Les abscisses sont vérifiées avant les paramètres.
pub fn project(x_values: &[f64], slope: &str, intercept: &str) -> Result<LinePlot, ConversionError> {
    if x_values.is_empty() {
        warn!("tracé demandé sans conversion préalable");
        return Err(ConversionError::Precondition);
    }

    let m = parse_parameter("m", slope)?;
    let c = parse_parameter("c", intercept)?;

    Ok(LinePlot {
        slope: m,
        intercept: c,
        points: x_values.iter().map(|&x| (x, m * x + c)).collect(),
        title: PLOT_TITLE.to_string(),
        x_label: "x".to_string(),
        y_label: "y".to_string(),
        legend: format!("y = {}x + {}", format_float(m), format_float(c)),
        grid: true,
    })
}
