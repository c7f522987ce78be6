//! Terminal output while awaiting a run, via `indicatif` and `console`.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::awaiter::RunOutcome;
use crate::github::Conclusion;

/// Spinner shown while a run is being awaited, plus styled result lines.
pub struct RunProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
    cyan: Style,
}

impl RunProgress {
    /// Start the spinner for the given run.
    pub fn start(run_id: u64) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("awaiting workflow run {run_id}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            cyan: Style::new().cyan(),
        }
    }

    /// Show the URL of the job the run is executing.
    pub fn job_url(&self, url: &str) {
        self.pb
            .println(format!("  watching {}", self.cyan.apply_to(url)));
    }

    /// Stop the spinner and print the final outcome.
    pub fn finish(&self, outcome: &RunOutcome) {
        self.pb.finish_and_clear();
        match outcome {
            RunOutcome::Completed(Conclusion::Success) => {
                println!("  {} run concluded successfully", self.green.apply_to("✓"));
            }
            RunOutcome::Completed(conclusion) => {
                println!(
                    "  {} run concluded with {conclusion}",
                    self.red.apply_to("✗")
                );
            }
            RunOutcome::TimedOut => {
                println!(
                    "  {} run did not complete within the timeout",
                    self.yellow.apply_to("⧗")
                );
            }
        }
    }
}
