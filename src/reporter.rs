use std::io::Write;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use crate::events::{Event, ProgressEvent, ResultEvent};

/// Reporter consumes engine events and produces human or JSON output.
pub struct Reporter<W: Write = std::io::Stdout> {
    out: W,
    results: Vec<ResultEvent>,
    json_mode: bool,
    #[cfg(feature = "cli")]
    bar: Option<indicatif::ProgressBar>,
}

impl Reporter {
    pub fn new(json_mode: bool) -> Self {
        Self::with_writer(std::io::stdout(), json_mode)
    }

    /// Drain `events` on a dedicated presentation thread until every sender
    /// is gone, then hand the reporter back.
    pub fn spawn(events: Receiver<Event>, json_mode: bool) -> JoinHandle<Reporter> {
        thread::spawn(move || {
            let mut reporter = Reporter::new(json_mode);
            for event in events {
                reporter.record(event);
            }
            reporter
        })
    }
}

impl<W: Write> Reporter<W> {
    pub fn with_writer(out: W, json_mode: bool) -> Self {
        Self {
            out,
            results: Vec::new(),
            json_mode,
            #[cfg(feature = "cli")]
            bar: None,
        }
    }

    pub fn record(&mut self, event: Event) {
        if self.json_mode {
            // Emit JSON line
            if let Ok(line) = serde_json::to_string(&event) {
                let _ = writeln!(self.out, "{line}");
            }
        } else {
            match &event {
                Event::Progress(progress) => self.render_progress(*progress),
                Event::Result(result) => {
                    let mark = if result.success { "ok" } else { "failed" };
                    let _ = writeln!(self.out, "[{mark}] {}: {}", result.title, result.message);
                }
            }
        }
        if let Event::Result(result) = event {
            self.results.push(result);
        }
    }

    #[cfg(feature = "cli")]
    fn render_progress(&mut self, progress: ProgressEvent) {
        match progress {
            ProgressEvent::Starting { total } => {
                let bar = indicatif::ProgressBar::new(total as u64);
                bar.set_message("Cleaning...");
                self.bar = Some(bar);
            }
            ProgressEvent::Advanced { completed } => {
                if let Some(bar) = &self.bar {
                    bar.set_position(completed as u64);
                }
            }
            ProgressEvent::Finished => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }

    #[cfg(not(feature = "cli"))]
    fn render_progress(&mut self, progress: ProgressEvent) {
        if let ProgressEvent::Starting { total } = progress {
            let _ = writeln!(self.out, "Cleaning {total} item(s)...");
        }
    }

    pub fn results(&self) -> &[ResultEvent] {
        &self.results
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn summary(&self) -> String {
        let failed = self.results.iter().filter(|r| !r.success).count();
        format!("{} result(s), {} failed", self.results.len(), failed)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_mode_writes_one_line_per_event() {
        let mut reporter = Reporter::with_writer(Vec::new(), true);
        reporter.record(Event::Progress(ProgressEvent::Starting { total: 2 }));
        reporter.record(Event::Result(ResultEvent::failure("Error", "nope")));
        assert!(!reporter.all_succeeded());
        assert_eq!(reporter.summary(), "1 result(s), 1 failed");

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: Event = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, Event::Result(ResultEvent::failure("Error", "nope")));
    }

    #[test]
    fn human_mode_marks_outcome() {
        let mut reporter = Reporter::with_writer(Vec::new(), false);
        reporter.record(Event::Result(ResultEvent::success("Empty Trash", "Trash emptied successfully!")));
        assert!(reporter.all_succeeded());
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(out.contains("[ok] Empty Trash: Trash emptied successfully!"));
    }
}
