use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::fmt::Write;

/// Progress bar over the timesteps of a run.
pub struct StepProgress {
    pb: ProgressBar,
}

impl StepProgress {
    pub fn new(total_steps: u64) -> Self {
        let pb = ProgressBar::with_draw_target(Some(total_steps), ProgressDrawTarget::stderr())
            .with_style(Self::bar_style())
            .with_message("Integrating");
        Self { pb }
    }

    /// A bar that tracks state but never draws, for quiet runs and tests.
    pub fn hidden(total_steps: u64) -> Self {
        let pb = ProgressBar::with_draw_target(Some(total_steps), ProgressDrawTarget::hidden())
            .with_style(Self::bar_style());
        Self { pb }
    }

    pub fn inc(&self) {
        self.pb.inc(1);
    }

    pub fn finish(&self) {
        if let Some(len) = self.pb.length() {
            if self.pb.position() < len {
                self.pb.set_position(len);
            }
        }
        self.pb.finish_with_message("✓ Done");
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} steps ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
            })
            .progress_chars("##-")
    }
}
