use log::{debug, warn};

use crate::error::{Result, SegregateError};
use crate::progress::ProgressReporter;
use crate::records::{RecordSink, RecordSource, SinkOpener};
use crate::target::{Quotas, Target};

/// Outcome of one streaming pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionSummary {
    /// Records read from the source and written to some target.
    pub processed: u64,
    /// Records written per target, in target order.
    pub written: Vec<u64>,
}

/// Stream `source` once into the targets' sinks, in target order.
///
/// Each target receives a contiguous block of records until its quota runs
/// out. When the source ends early the remaining targets just come up short;
/// their sinks are still created.
pub fn partition<S, O, P>(
    source: &mut S,
    targets: &[Target],
    quotas: &Quotas,
    sinks: &mut O,
    progress: &mut P,
) -> Result<PartitionSummary>
where
    S: RecordSource + ?Sized,
    O: SinkOpener + ?Sized,
    P: ProgressReporter + ?Sized,
{
    if quotas.len() != targets.len() {
        return Err(SegregateError::config(format!(
            "{} quotas for {} targets",
            quotas.len(),
            targets.len()
        )));
    }

    let mut left: Vec<u64> = quotas.iter().collect();
    let mut summary = PartitionSummary {
        processed: 0,
        written: Vec::with_capacity(targets.len()),
    };

    for (target, remaining) in targets.iter().zip(left.iter_mut()) {
        let quota = *remaining;
        let mut sink = sinks.open(target)?;

        while *remaining > 0 {
            let Some(record) = source.next_record()? else {
                break;
            };
            summary.processed += 1;
            progress.record(summary.processed);
            sink.write_record(&record)?;
            *remaining -= 1;
        }

        sink.finish()?;

        let written = quota - *remaining;
        if *remaining > 0 {
            warn!(
                "{} received {} of {} records, source ran out",
                target.output().display(),
                written,
                quota
            );
        } else {
            debug!("{} received {} records", target.output().display(), written);
        }
        summary.written.push(written);
    }

    progress.done(summary.processed);
    Ok(summary)
}
