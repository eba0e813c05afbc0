use super::models::{JobOutcome, JobStatus, SegmentJob};
use super::pipeline::{PipelineStage, ProgressObserver};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

/// 在終端機顯示場景偵測的等待動畫與片段轉檔進度條
#[derive(Default)]
pub struct ConsoleProgress {
    bar: RefCell<Option<ProgressBar>>,
}

impl ConsoleProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn replace(&self, bar: Option<ProgressBar>) {
        if let Some(old) = self.bar.replace(bar) {
            old.finish_and_clear();
        }
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
            spinner.set_style(template);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn job_bar(total: usize) -> ProgressBar {
        let bar = ProgressBar::new(total as u64);
        if let Ok(template) =
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg} [{elapsed}]")
        {
            bar.set_style(template.progress_chars("=> "));
        }
        bar
    }
}

impl ProgressObserver for ConsoleProgress {
    fn stage_changed(&self, stage: PipelineStage) {
        match stage {
            PipelineStage::Detecting => self.replace(Some(Self::spinner("偵測場景中..."))),
            PipelineStage::Planning | PipelineStage::Summarizing | PipelineStage::Idle => {
                self.replace(None);
            }
            PipelineStage::Probing | PipelineStage::Executing => {}
        }
    }

    fn job_started(&self, index: usize, total: usize, job: &SegmentJob) {
        let mut slot = self.bar.borrow_mut();
        let bar = slot.get_or_insert_with(|| Self::job_bar(total));
        let name = job
            .output_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        bar.set_message(format!(
            "[{}/{}] {name} ({:.2}s - {:.2}s)",
            index + 1,
            total,
            job.interval.start(),
            job.interval.end()
        ));
    }

    fn job_finished(&self, outcome: &JobOutcome) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            let name = outcome.job.output_path.display();
            let line = match &outcome.status {
                JobStatus::Success => format!("  {} {name}", style("✓").green()),
                JobStatus::Failed(reason) => {
                    format!("  {} {name}: {reason}", style("✗").red())
                }
            };
            bar.println(line);
            bar.inc(1);
        }
    }
}
