//! Busmonitor - Convertisseur de valeurs hexadécimales
//!
//! Cette bibliothèque décode des mots hexadécimaux relevés sur un bus
//! (entiers 16/32 bits signés, flottants IEEE-754 32/64 bits) et trace les
//! valeurs obtenues comme abscisses de la droite y = mx + c.

pub mod batch;
pub mod config;
pub mod decoder;
pub mod error;
pub mod gui;
pub mod plot;
pub mod session;

pub use batch::*;
pub use config::*;
pub use decoder::{decode, decode_named, DecodedValue, Encoding};
pub use error::ConversionError;
pub use plot::{project, LinePlot, PlotRenderer, PngRenderer};
pub use session::*;

/// Version du convertisseur
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
