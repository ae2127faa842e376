use crate::pipeline::classify::Pipeline;
use crate::pipeline::session::Session;
use crate::pipeline::upload::ImageUpload;
use crate::presentation::view_model::{
    error_message, history_rows, prediction_view, PredictionView,
};
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;

enum Action {
    Open(PathBuf),
    Upload(ImageUpload),
    ModelChanged,
    ClearHistory,
}

pub struct PresenterGui {
    pipeline: Arc<Pipeline>,
    session: Session,
    selected_model: String,
    image_path: String,
    upload: Option<ImageUpload>,
    preview: Option<egui::TextureHandle>,
    prediction: Option<PredictionView>,
    error: Option<String>,
    notice: Option<String>,
}

impl PresenterGui {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        let selected_model = pipeline
            .model_names()
            .first()
            .map(|name| name.to_string())
            .unwrap_or_default();

        Self {
            pipeline,
            session: Session::new(),
            selected_model,
            image_path: String::new(),
            upload: None,
            preview: None,
            prediction: None,
            error: None,
            notice: None,
        }
    }

    pub fn run(self) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 780.0]),
            ..Default::default()
        };

        eframe::run_native(
            "Flower Classification",
            options,
            Box::new(|_cc| Box::new(self)),
        )
    }

    fn handle(&mut self, ctx: &egui::Context, action: Action) {
        match action {
            Action::Open(path) => match ImageUpload::from_path(&path) {
                Ok(upload) => self.submit(ctx, upload),
                Err(error) => {
                    self.error = Some(format!("Could not open {}: {}", path.display(), error));
                }
            },
            Action::Upload(upload) => self.submit(ctx, upload),
            Action::ModelChanged => {
                if let Some(upload) = self.upload.clone() {
                    self.submit(ctx, upload);
                }
            }
            Action::ClearHistory => {
                self.session.history.clear();
                self.notice = Some("History cleared.".to_string());
            }
        }
    }

    fn submit(&mut self, ctx: &egui::Context, upload: ImageUpload) {
        self.notice = None;
        self.prediction = None;

        match self.pipeline.normalize(&upload) {
            Ok(normalized) => {
                let (width, height) = normalized.display.dimensions();
                let image = egui::ColorImage::from_rgb(
                    [width as usize, height as usize],
                    normalized.display.as_raw(),
                );
                self.preview =
                    Some(ctx.load_texture("preview", image, egui::TextureOptions::default()));
            }
            Err(error) => {
                self.preview = None;
                self.upload = None;
                self.error = Some(error_message(&error));
                return;
            }
        }

        match self
            .pipeline
            .classify(&mut self.session, &upload, &self.selected_model)
        {
            Ok(classification) => {
                self.prediction = Some(prediction_view(&classification.prediction));
                self.error = None;
            }
            Err(error) => self.error = Some(error_message(&error)),
        }

        self.upload = Some(upload);
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;

        ui.heading("Settings");
        ui.add_space(8.0);

        let names: Vec<String> = self
            .pipeline
            .model_names()
            .into_iter()
            .map(String::from)
            .collect();
        egui::ComboBox::from_label("Model")
            .selected_text(self.selected_model.clone())
            .show_ui(ui, |ui| {
                for name in &names {
                    let response =
                        ui.selectable_value(&mut self.selected_model, name.clone(), name.as_str());
                    if response.changed() {
                        action = Some(Action::ModelChanged);
                    }
                }
            });

        ui.small(format!("Models loaded: {}", self.pipeline.loaded_models()));

        ui.add_space(8.0);
        ui.label("Flower image (jpg, jpeg, png)");
        ui.text_edit_singleline(&mut self.image_path);
        if ui.button("Open").clicked() && !self.image_path.trim().is_empty() {
            action = Some(Action::Open(PathBuf::from(self.image_path.trim())));
        }
        ui.small("Or drop an image onto the window.");

        ui.separator();
        ui.heading("History");
        if ui.button("Clear history").clicked() {
            action = Some(Action::ClearHistory);
        }
        if let Some(notice) = &self.notice {
            ui.label(notice);
        }
        ui.small(format!("Entries: {}", self.session.history.len()));

        action
    }

    fn input_card(&self, ui: &mut egui::Ui) {
        ui.heading("Input");
        ui.small("Letterboxed image exactly as the model sees it.");
        ui.add_space(6.0);

        match &self.preview {
            Some(texture) => {
                ui.image((texture.id(), texture.size_vec2()));
                if let Some(upload) = &self.upload {
                    ui.small(&upload.name);
                }
            }
            None => {
                ui.label("Open or drop an image to start.");
            }
        }
    }

    fn prediction_card(&self, ui: &mut egui::Ui) {
        ui.heading("Prediction");
        ui.add_space(6.0);

        if let Some(error) = &self.error {
            ui.colored_label(egui::Color32::LIGHT_RED, error);
        }

        let Some(view) = &self.prediction else {
            if self.error.is_none() {
                ui.label("No image has been classified yet.");
            }
            return;
        };

        ui.strong(&view.headline);
        ui.label(&view.badge);
        ui.add(egui::ProgressBar::new(view.progress).show_percentage());

        ui.add_space(8.0);
        ui.label(format!("Top-{}", view.top_rows.len()));
        egui::Grid::new("top_k").striped(true).show(ui, |ui| {
            for header in ["Rank", "Class", "Prob", "Percent"] {
                ui.strong(header);
            }
            ui.end_row();
            for row in &view.top_rows {
                ui.label(row.rank.to_string());
                ui.label(&row.class);
                ui.label(&row.prob);
                ui.label(&row.percent);
                ui.end_row();
            }
        });

        ui.add_space(8.0);
        ui.label("All classes");
        egui::Grid::new("all_classes").show(ui, |ui| {
            for (label, probability) in &view.class_rows {
                ui.label(label);
                ui.add(
                    egui::ProgressBar::new(probability.clamp(0.0, 1.0))
                        .desired_width(240.0)
                        .text(format!("{:.4}", probability)),
                );
                ui.end_row();
            }
        });
    }

    fn history_table(&self, ui: &mut egui::Ui) {
        ui.heading("History (newest first)");

        if self.session.history.is_empty() {
            ui.label("No predictions yet.");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("history").striped(true).show(ui, |ui| {
                for header in ["Time", "Model", "File", "Prediction", "Prob", "Percent"] {
                    ui.strong(header);
                }
                ui.end_row();
                for row in history_rows(&self.session.history) {
                    ui.label(row.time);
                    ui.label(row.model);
                    ui.label(row.file);
                    ui.label(row.pred);
                    ui.label(row.prob);
                    ui.label(row.percent);
                    ui.end_row();
                }
            });
        });
    }
}

impl eframe::App for PresenterGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions: Vec<Action> = ctx
            .input(|i| i.raw.dropped_files.clone())
            .into_iter()
            .filter_map(|file| match (file.bytes, file.path) {
                (Some(bytes), _) => Some(Action::Upload(ImageUpload::new(&file.name, bytes.to_vec()))),
                (None, Some(path)) => Some(Action::Open(path)),
                (None, None) => None,
            })
            .collect();

        egui::SidePanel::left("settings")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                if let Some(action) = self.settings_panel(ui) {
                    actions.push(action);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                self.input_card(&mut columns[0]);
                self.prediction_card(&mut columns[1]);
            });
            ui.separator();
            self.history_table(ui);
        });

        for action in actions {
            self.handle(ctx, action);
        }
    }
}
