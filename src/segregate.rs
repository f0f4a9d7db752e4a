use std::path::{Path, PathBuf};

use log::info;

use crate::analyze::{analyze, Analysis};
use crate::balance::balance;
use crate::error::{Result, SegregateError};
use crate::format::CsvFormat;
use crate::partition::{partition, PartitionSummary};
use crate::progress::ProgressReporter;
use crate::records::{CsvSinkOpener, CsvSource};
use crate::target::{Quotas, Target};
use crate::validate::validate;

/// Lifecycle of a [`Segregator`].
///
/// Validation is a check run inside `process`, not a state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegregateState {
    /// Targets may be added; nothing has been read yet.
    Idle,
    /// Input counted and quotas computed.
    Balanced,
    /// Held only while `process` streams; callers see `Done` afterwards.
    Processing,
    /// Quotas consumed; analyze again before another run.
    Done,
}

/// Splits one delimited file into several by percentage.
///
/// ```no_run
/// use segregate::{CsvFormat, NoProgress, Segregator};
///
/// let mut seg = Segregator::new("data.csv", CsvFormat::ENGLISH, true);
/// seg.add_target(70, "train.csv");
/// seg.add_target(30, "test.csv");
/// seg.analyze()?;
/// seg.process(&mut NoProgress)?;
/// # Ok::<(), segregate::SegregateError>(())
/// ```
#[derive(Debug)]
pub struct Segregator {
    input: PathBuf,
    format: CsvFormat,
    expect_headers: bool,
    produce_output_headers: bool,
    targets: Vec<Target>,
    analysis: Option<Analysis>,
    quotas: Option<Quotas>,
    state: SegregateState,
}

impl Segregator {
    pub fn new(input: impl Into<PathBuf>, format: CsvFormat, expect_headers: bool) -> Self {
        Self {
            input: input.into(),
            format,
            expect_headers,
            produce_output_headers: true,
            targets: Vec::new(),
            analysis: None,
            quotas: None,
            state: SegregateState::Idle,
        }
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
        self.targets.extend(targets);
        self.reset();
        self
    }

    /// Append a target. Any earlier analysis is dropped since the quotas no
    /// longer match the target set.
    pub fn add_target(&mut self, percent: u8, output: impl Into<PathBuf>) {
        self.targets.push(Target::new(percent, output));
        self.reset();
    }

    /// Whether outputs repeat the input's header row (default: yes).
    pub fn set_produce_output_headers(&mut self, produce: bool) {
        self.produce_output_headers = produce;
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn quotas(&self) -> Option<&Quotas> {
        self.quotas.as_ref()
    }

    pub fn state(&self) -> SegregateState {
        self.state
    }

    /// Count the input's records and balance the target quotas against them.
    pub fn analyze(&mut self) -> Result<&Analysis> {
        // a failed count invalidates any earlier quotas
        let analysis = match analyze(&self.input, &self.format, self.expect_headers) {
            Ok(analysis) => analysis,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };
        let quotas = balance(analysis.record_count, &self.targets);
        info!(
            "Balanced {} records over {} targets: {:?}",
            analysis.record_count,
            self.targets.len(),
            quotas.as_slice()
        );

        self.quotas = Some(quotas);
        self.state = SegregateState::Balanced;
        Ok(self.analysis.insert(analysis))
    }

    pub fn validate(&self) -> Result<()> {
        validate(&self.targets, self.state != SegregateState::Idle)
    }

    /// Write every target's share of the input to its output file.
    pub fn process<P>(&mut self, progress: &mut P) -> Result<PartitionSummary>
    where
        P: ProgressReporter + ?Sized,
    {
        match self.state {
            SegregateState::Balanced => {}
            SegregateState::Idle => {
                return Err(SegregateError::state("analyze must run before process"))
            }
            SegregateState::Processing | SegregateState::Done => {
                return Err(SegregateError::state(
                    "quotas already consumed, analyze again before processing",
                ))
            }
        }
        self.validate()?;

        let (Some(analysis), Some(quotas)) = (self.analysis.as_ref(), self.quotas.as_ref()) else {
            return Err(SegregateError::state("analysis missing"));
        };
        let headers = if self.expect_headers && self.produce_output_headers {
            analysis.headers.clone()
        } else {
            None
        };

        info!("Segregating {}", self.input.display());
        self.state = SegregateState::Processing;

        let result = CsvSource::open(&self.input, &self.format, self.expect_headers).and_then(
            |mut source| {
                let mut sinks = CsvSinkOpener::new(self.format, headers);
                partition(&mut source, &self.targets, quotas, &mut sinks, progress)
            },
        );

        // stale quotas must never be reused, even after a failed run
        self.state = SegregateState::Done;
        let summary = result?;
        info!(
            "Segregated {} records into {} files",
            summary.processed,
            summary.written.len()
        );
        Ok(summary)
    }

    fn reset(&mut self) {
        self.analysis = None;
        self.quotas = None;
        self.state = SegregateState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use std::fs;
    use tempfile::tempdir;

    fn write_input(dir: &Path, rows: usize) -> PathBuf {
        let path = dir.join("in.csv");
        let mut body = String::from("id,val\n");
        for i in 1..=rows {
            body.push_str(&format!("{i},v{i}\n"));
        }
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn process_before_analyze() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), 4);
        let train = dir.path().join("train.csv");
        let mut seg = Segregator::new(&input, CsvFormat::ENGLISH, true);
        seg.add_target(50, &train);
        seg.add_target(50, dir.path().join("test.csv"));

        let err = seg.process(&mut NoProgress).unwrap_err();
        assert!(matches!(err, SegregateError::State(_)));
        assert!(!train.exists());
    }

    #[test]
    fn bad_targets_open_nothing() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), 4);
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        let mut seg = Segregator::new(&input, CsvFormat::ENGLISH, true)
            .with_targets([Target::new(60, &a), Target::new(30, &b)]);
        seg.analyze().unwrap();

        let err = seg.process(&mut NoProgress).unwrap_err();
        assert!(matches!(err, SegregateError::Config(_)));
        assert!(!a.exists());
        assert!(!b.exists());
        assert_eq!(seg.state(), SegregateState::Balanced);
    }

    #[test]
    fn second_process_needs_new_analysis() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), 4);
        let mut seg = Segregator::new(&input, CsvFormat::ENGLISH, true);
        seg.add_target(50, dir.path().join("a.csv"));
        seg.add_target(50, dir.path().join("b.csv"));
        seg.analyze().unwrap();
        seg.process(&mut NoProgress).unwrap();
        assert_eq!(seg.state(), SegregateState::Done);

        assert!(matches!(
            seg.process(&mut NoProgress),
            Err(SegregateError::State(_))
        ));

        seg.analyze().unwrap();
        let summary = seg.process(&mut NoProgress).unwrap();
        assert_eq!(summary.written, vec![2, 2]);
    }

    #[test]
    fn adding_a_target_drops_quotas() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), 4);
        let mut seg = Segregator::new(&input, CsvFormat::ENGLISH, true);
        seg.add_target(50, dir.path().join("a.csv"));
        seg.analyze().unwrap();
        assert!(seg.quotas().is_some());

        seg.add_target(50, dir.path().join("b.csv"));
        assert_eq!(seg.state(), SegregateState::Idle);
        assert!(seg.quotas().is_none());
        assert!(matches!(seg.validate(), Err(SegregateError::State(_))));
    }

    #[test]
    fn headers_can_be_left_out_of_outputs() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), 2);
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        let mut seg = Segregator::new(&input, CsvFormat::ENGLISH, true)
            .with_targets([Target::new(50, &a), Target::new(50, &b)]);
        seg.set_produce_output_headers(false);
        seg.analyze().unwrap();
        seg.process(&mut NoProgress).unwrap();

        assert_eq!(fs::read_to_string(&a).unwrap(), "1,v1\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "2,v2\n");
    }

    #[test]
    fn missing_input_fails_analyze() {
        let dir = tempdir().unwrap();
        let mut seg = Segregator::new(dir.path().join("nope.csv"), CsvFormat::ENGLISH, true);
        seg.add_target(50, dir.path().join("a.csv"));
        seg.add_target(50, dir.path().join("b.csv"));
        assert!(seg.analyze().is_err());
        assert_eq!(seg.state(), SegregateState::Idle);
    }

    #[test]
    fn failed_reanalysis_drops_old_quotas() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path(), 10);
        let train = dir.path().join("train.csv");
        let mut seg = Segregator::new(&input, CsvFormat::ENGLISH, true);
        seg.add_target(70, &train);
        seg.add_target(30, dir.path().join("test.csv"));
        seg.analyze().unwrap();
        assert_eq!(seg.quotas().unwrap().as_slice(), &[7, 3]);

        fs::remove_file(&input).unwrap();
        assert!(seg.analyze().is_err());
        assert_eq!(seg.state(), SegregateState::Idle);
        assert!(seg.quotas().is_none());
        assert!(seg.analysis().is_none());

        write_input(dir.path(), 2);
        assert!(matches!(
            seg.process(&mut NoProgress),
            Err(SegregateError::State(_))
        ));
        assert!(!train.exists());
    }
}
