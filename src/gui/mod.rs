//! Interface graphique du convertisseur

use anyhow::{anyhow, Result};
use egui::{Align2, TextEdit, Vec2};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use log::info;

use crate::config::ConverterConfig;
use crate::decoder::Encoding;
use crate::plot::{LinePlot, PlotRenderer, PngRenderer};
use crate::session::{Action, Outcome, Session};

/// Fenêtre du graphique ; reçoit les tracés de la session
pub struct PlotViewer {
    pub plot: Option<LinePlot>,
    pub open: bool,
    exporter: PngRenderer,
    /// Résultat du dernier export PNG
    pub status: Option<String>,
}

impl PlotViewer {
    pub fn new(exporter: PngRenderer) -> Self {
        Self {
            plot: None,
            open: false,
            exporter,
            status: None,
        }
    }

    /// Exporte le graphique affiché en PNG
    pub fn export(&mut self) {
        let Some(plot) = &self.plot else { return };
        self.status = Some(match self.exporter.render(plot) {
            Ok(()) => format!("Saved to {}", self.exporter.path().display()),
            Err(e) => format!("Export failed: {:#}", e),
        });
    }

    fn show(&mut self, ctx: &egui::Context) {
        let mut open = self.open;
        let mut export = false;

        if let Some(plot) = &self.plot {
            let status = &self.status;
            egui::Window::new(plot.title.as_str())
                .open(&mut open)
                .default_size([640.0, 480.0])
                .show(ctx, |ui| {
                    draw_plot(ui, plot);
                    ui.horizontal(|ui| {
                        export = ui.button("Export PNG").clicked();
                        if let Some(status) = status {
                            ui.label(status.as_str());
                        }
                    });
                });
        }

        self.open = open;
        if export {
            self.export();
        }
    }
}

impl PlotRenderer for PlotViewer {
    fn render(&mut self, plot: &LinePlot) -> Result<()> {
        plot.bounds()?;
        self.plot = Some(plot.clone());
        self.open = true;
        self.status = None;
        Ok(())
    }
}

/// Application egui : formulaire de conversion
pub struct ConverterApp {
    pub session: Session,
    pub viewer: PlotViewer,
    /// Notification modale en attente
    pub notification: Option<String>,
}

impl ConverterApp {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            session: Session::new(config.conversion.default_encoding),
            viewer: PlotViewer::new(PngRenderer::from_config(&config.plot)),
            notification: None,
        }
    }

    /// Applique une action et mémorise la notification éventuelle
    pub fn apply(&mut self, action: Action) -> Outcome {
        let outcome = self.session.dispatch(action, &mut self.viewer);
        if let Outcome::Notify(message) = &outcome {
            self.notification = Some(message.clone());
        }
        outcome
    }

    fn form(&mut self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;

        ui.heading("Hexadecimal to Bit Conversion");
        ui.label("Enter hexadecimal values below, one per line:");
        ui.add(
            TextEdit::multiline(&mut self.session.input)
                .font(egui::TextStyle::Monospace)
                .desired_rows(10)
                .desired_width(f32::INFINITY),
        );

        ui.label("Select Conversion Type:");
        egui::ComboBox::from_id_source("conversion_type")
            .selected_text(self.session.encoding.label())
            .width(240.0)
            .show_ui(ui, |ui| {
                for encoding in Encoding::ALL {
                    ui.selectable_value(&mut self.session.encoding, encoding, encoding.label());
                }
            });

        ui.horizontal(|ui| {
            if ui.button("Convert").clicked() {
                action = Some(Action::Convert);
            }
            if ui.button("Clear").clicked() {
                action = Some(Action::Clear);
            }
        });

        ui.label("Results:");
        let mut output = self.session.output.as_str();
        ui.add(
            TextEdit::multiline(&mut output)
                .font(egui::TextStyle::Monospace)
                .desired_rows(10)
                .desired_width(f32::INFINITY),
        );

        ui.label("Enter m (slope) and c (intercept) for y = mx + c");
        ui.horizontal(|ui| {
            ui.label("m (slope):");
            ui.add(TextEdit::singleline(&mut self.session.slope).desired_width(80.0));
        });
        ui.horizontal(|ui| {
            ui.label("c (intercept):");
            ui.add(TextEdit::singleline(&mut self.session.intercept).desired_width(80.0));
        });
        if ui.button("Plot Graph").clicked() {
            action = Some(Action::PlotGraph);
        }

        action
    }

    fn show_notification(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.notification else { return };
        let mut dismissed = false;

        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.notification = None;
        }
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| self.form(ui))
                    .inner
            })
            .inner;

        if let Some(action) = action {
            self.apply(action);
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            self.apply(Action::Close);
        }

        self.viewer.show(ctx);
        self.show_notification(ctx);
    }
}

/// Suites de points finis consécutifs ; un point non fini coupe la droite
fn segments(plot: &LinePlot) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut run = Vec::new();
    for &(x, y) in &plot.points {
        if x.is_finite() && y.is_finite() {
            run.push([x, y]);
        } else if !run.is_empty() {
            runs.push(std::mem::take(&mut run));
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }
    runs
}

/// Trace la droite avec `egui_plot`, grille et légende comprises
fn draw_plot(ui: &mut egui::Ui, plot: &LinePlot) {
    let bounds = match plot.bounds() {
        Ok(bounds) => bounds,
        Err(e) => {
            ui.label(format!("{:#}", e));
            return;
        }
    };

    Plot::new("line_plot")
        .legend(Legend::default())
        .show_grid(plot.grid)
        .x_axis_label(plot.x_label.as_str())
        .y_axis_label(plot.y_label.as_str())
        .include_x(bounds.x_min)
        .include_x(bounds.x_max)
        .include_y(bounds.y_min)
        .include_y(bounds.y_max)
        .height((ui.available_height() - 32.0).max(240.0))
        .show(ui, |plot_ui| {
            for run in segments(plot) {
                if let [point] = run.as_slice() {
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![*point]))
                            .radius(3.0)
                            .name(&plot.legend),
                    );
                } else {
                    plot_ui.line(
                        Line::new(PlotPoints::from(run))
                            .width(2.0)
                            .name(&plot.legend),
                    );
                }
            }
        });
}

/// Ouvre la fenêtre principale et bloque jusqu'à sa fermeture
pub fn run(config: ConverterConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window.title.clone())
            .with_inner_size([config.window.width, config.window.height]),
        ..Default::default()
    };

    info!("Ouverture de la fenêtre « {} »", config.window.title);
    let title = config.window.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Box::new(ConverterApp::new(&config))),
    )
    .map_err(|e| anyhow!("Erreur de l'interface graphique: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ConverterApp {
        let mut config = ConverterConfig::default();
        config.conversion.default_encoding = Encoding::SignedInt32;
        ConverterApp::new(&config)
    }

    #[test]
    fn test_plot_opens_viewer() {
        let mut app = app();
        app.session.input = "00000001\n00000002".to_string();
        app.apply(Action::Convert);
        app.session.slope = "2".to_string();
        app.session.intercept = "3".to_string();

        assert_eq!(app.apply(Action::PlotGraph), Outcome::Plotted);
        assert!(app.viewer.open);
        assert_eq!(app.viewer.plot.as_ref().unwrap().y_values(), vec![5.0, 7.0]);
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_errors_become_notifications() {
        let mut app = app();
        app.session.slope = "1".to_string();
        app.session.intercept = "1".to_string();

        assert!(matches!(app.apply(Action::PlotGraph), Outcome::Notify(_)));
        assert!(app.notification.as_deref().unwrap().starts_with("Please first convert"));
        assert!(!app.viewer.open);
    }

    #[test]
    fn test_viewer_rejects_unplottable_values() {
        let mut app = app();
        app.session.encoding = Encoding::Float32;
        app.session.input = "7F800000".to_string();
        app.apply(Action::Convert);
        app.session.slope = "1".to_string();
        app.session.intercept = "0".to_string();

        assert!(matches!(app.apply(Action::PlotGraph), Outcome::Notify(_)));
        assert!(app.viewer.plot.is_none());
    }

    #[test]
    fn test_export_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.png");
        let mut viewer = PlotViewer::new(PngRenderer::new(&path, 320, 240));

        viewer.export();
        assert!(viewer.status.is_none(), "rien à exporter");

        let plot = crate::plot::project(&[1.0, 2.0], "1", "0").unwrap();
        viewer.render(&plot).unwrap();
        viewer.export();
        assert!(viewer.status.as_deref().unwrap().starts_with("Saved to"));
        assert!(path.exists());
    }

    #[test]
    fn test_segments_split_on_non_finite_points() {
        let plot = crate::plot::project(&[1.0, 2.0, f64::NAN, 4.0, f64::INFINITY], "1", "0").unwrap();
        assert_eq!(
            segments(&plot),
            vec![vec![[1.0, 1.0], [2.0, 2.0]], vec![[4.0, 4.0]]]
        );
    }
}
