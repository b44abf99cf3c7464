use super::state::StatusKind;
use super::UploaderApp;
use crate::upload::FilterKind;
use crate::utils::endpoint::{join_url, DEFAULT_BASE_URL};
use crate::utils::file_size::format_size;
use crate::utils::files;
use eframe::egui::{self, Color32, RichText};
use log::warn;
use rfd::FileDialog;

impl UploaderApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("DICOM zu 3D-Modell");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("DICOM-Serie hochladen und als 3D-Modell rekonstruieren")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });
                ui.add_space(20.0);

                self.render_server_input(ui);
                ui.add_space(10.0);
                self.render_file_selection(ui);
                ui.add_space(10.0);
                self.render_parameters(ui);
                ui.add_space(20.0);

                self.render_submit(ui);
                ui.add_space(10.0);
                self.render_status(ui);
                self.render_result(ui);
                ui.add_space(20.0);
            });
        });
    }

    fn render_server_input(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Server:");
                ui.add_sized(
                    [ui.available_width(), 20.0],
                    egui::TextEdit::singleline(&mut self.server_url).hint_text(DEFAULT_BASE_URL),
                );
            });
        });
    }

    fn render_file_selection(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                if ui.button("📄 DICOM-Dateien auswählen").clicked() {
                    if let Some(paths) = FileDialog::new()
                        .add_filter("DICOM", &["dcm", "dicom", "ima"])
                        .add_filter("Alle Dateien", &["*"])
                        .pick_files()
                    {
                        self.job.files = paths;
                    }
                }
                if ui.button("📁 Serien-Ordner auswählen").clicked() {
                    if let Some(dir) = FileDialog::new().pick_folder() {
                        self.job.files = files::collect_series(&dir);
                    }
                }
            });
            ui.add_space(5.0);
            if self.job.files.is_empty() {
                ui.label(
                    RichText::new("Keine Dateien ausgewählt")
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
            } else {
                let total: u64 = self
                    .job
                    .files
                    .iter()
                    .filter_map(|path| std::fs::metadata(path).ok())
                    .map(|meta| meta.len())
                    .sum();
                ui.label(format!(
                    "{} Dateien ausgewählt ({})",
                    self.job.files.len(),
                    format_size(total)
                ));
            }
        });
    }

    fn render_parameters(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("Rekonstruktionsparameter");
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("Filter:");
                egui::ComboBox::from_id_source("filter-type")
                    .selected_text(self.job.filter.label())
                    .show_ui(ui, |ui| {
                        for filter in [
                            FilterKind::Gaussian,
                            FilterKind::Median,
                            FilterKind::Unfiltered,
                        ] {
                            ui.selectable_value(&mut self.job.filter, filter, filter.label());
                        }
                    });

                ui.add_space(10.0);
                ui.label("Sigma:");
                ui.add_enabled(
                    self.job.filter.uses_sigma(),
                    egui::DragValue::new(&mut self.job.sigma)
                        .speed(0.1)
                        .clamp_range(0.1..=10.0),
                );
            });
            ui.horizontal(|ui| {
                ui.label("Schwellenwerte (HU):");
                ui.add(
                    egui::DragValue::new(&mut self.job.min_threshold)
                        .speed(10)
                        .clamp_range(-1024..=3000),
                );
                ui.label("bis");
                ui.add(
                    egui::DragValue::new(&mut self.job.max_threshold)
                        .speed(10)
                        .clamp_range(-1024..=4000),
                );
            });
        });
    }

    fn render_submit(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            let label = if self.state.in_flight() {
                "⏳ Wird hochgeladen..."
            } else {
                "📤 Hochladen und rekonstruieren"
            };
            let button = egui::Button::new(label).min_size(egui::vec2(240.0, 40.0));
            if ui.add_enabled(self.state.submit_enabled(), button).clicked() {
                self.start_upload();
            }
        });
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        if self.state.progress_visible {
            let progress_bar = egui::ProgressBar::new(f32::from(self.state.percent) / 100.0)
                .show_percentage()
                .animate(self.state.in_flight());
            ui.add(progress_bar);
            ui.add_space(5.0);
        }

        if let Some(banner) = &self.state.banner {
            let color = match banner.kind {
                StatusKind::Info => Color32::from_rgb(90, 150, 220),
                StatusKind::Success => Color32::from_rgb(0, 180, 0),
                StatusKind::Error => Color32::from_rgb(220, 50, 50),
            };
            ui.vertical_centered(|ui| {
                ui.colored_label(color, &banner.message);
            });
        }
    }

    fn render_result(&mut self, ui: &mut egui::Ui) {
        if let Some(texture) = &self.preview_texture {
            ui.add_space(10.0);
            ui.group(|ui| {
                ui.vertical_centered(|ui| {
                    ui.label("Vorschau");
                    ui.add_space(5.0);
                    let sized =
                        egui::load::SizedTexture::new(texture.id(), texture.size_vec2());
                    ui.add(egui::Image::new(sized).max_width(ui.available_width().min(420.0)));
                });
            });
        }

        if let Some(download) = self.state.download_target.clone() {
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                if ui.button("💾 3D-Modell herunterladen (STL)").clicked() {
                    let base = self.active_base.as_deref().unwrap_or(DEFAULT_BASE_URL);
                    let url = join_url(base, &download);
                    if let Err(e) = open::that(&url) {
                        warn!("could not open download link: {}", e);
                    }
                }
            });
        }
    }
}
