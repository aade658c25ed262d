//! Batch upscaler front-end

use std::path::PathBuf;
use std::sync::Arc;

use ratatui::Frame;

use crate::config::{Settings, UpscaleSettings};
use crate::events::ProgressEvent;
use crate::shell::Session;
use crate::upscale::{run_batch, ProcessRunner, Scale, ToolRunner, UpscaleJob, MODELS, SCALE_LABELS};
use crate::worker::StartError;

use super::form::{Field, Form};
use super::{screens, TuiApp};

const EXE: usize = 0;
const MODELS_DIR: usize = 1;
const INPUT: usize = 2;
const OUTPUT: usize = 3;
const MODEL: usize = 4;
const SCALE: usize = 5;

pub struct UpscaleApp {
    pub(crate) session: Session,
    pub(crate) form: Form,
    pub(crate) tick: u64,
    settings: Settings,
    /// Where accepted form values are saved; `None` keeps them in memory
    config_path: Option<PathBuf>,
    runner: Arc<dyn ToolRunner>,
}

impl UpscaleApp {
    pub fn new(settings: Settings, config_path: Option<PathBuf>) -> Self {
        Self::with_runner(settings, config_path, Arc::new(ProcessRunner))
    }

    pub fn with_runner(
        settings: Settings,
        config_path: Option<PathBuf>,
        runner: Arc<dyn ToolRunner>,
    ) -> Self {
        let s = &settings.upscale;
        let form = Form::new(vec![
            Field::text("Upscaler executable", s.exe_path.clone()),
            Field::text("Models folder", s.models_dir.clone()),
            Field::text("Input (file or folder)", s.input_path.clone()),
            Field::text("Output folder", s.output_dir.clone()),
            Field::choice("Model", MODELS, &s.model_name),
            Field::choice("Scale", SCALE_LABELS, s.scale.label()),
        ]);
        Self {
            session: Session::new("Ready"),
            form,
            tick: 0,
            settings,
            config_path,
            runner,
        }
    }

    /// Current form contents as raw settings
    pub fn form_values(&self) -> UpscaleSettings {
        UpscaleSettings {
            exe_path: self.form.value(EXE).to_string(),
            models_dir: self.form.value(MODELS_DIR).to_string(),
            input_path: self.form.value(INPUT).to_string(),
            output_dir: self.form.value(OUTPUT).to_string(),
            model_name: self.form.value(MODEL).to_string(),
            scale: Scale::from_label(self.form.value(SCALE)).unwrap_or_default(),
        }
    }

    fn persist(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.settings.save_to(path) {
            tracing::warn!(error = %e, "could not save settings");
        }
    }
}

impl TuiApp for UpscaleApp {
    fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    fn form(&mut self) -> &mut Form {
        &mut self.form
    }

    fn start(&mut self) {
        if self.session.is_busy() {
            self.session.inform("Info", StartError::AlreadyRunning);
            return;
        }

        let values = self.form_values();
        let validated = match UpscaleJob::validate(&values) {
            Ok(validated) => validated,
            Err(e) => {
                tracing::info!(error = %e, "upscaler settings rejected");
                self.session.show_error("Invalid settings", e);
                return;
            }
        };

        self.settings.upscale = values;
        self.persist();

        for warning in &validated.warnings {
            self.session
                .publisher()
                .publish(ProgressEvent::warning(warning.clone()));
        }

        let job = validated.job;
        let runner = Arc::clone(&self.runner);
        self.session
            .start("upscale-worker", "Preparing...", move |cancel, out| {
                run_batch(&job, runner.as_ref(), cancel, out)
            });
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    fn render(&self, f: &mut Frame) {
        screens::upscale::render(f, self);
    }
}
