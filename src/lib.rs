//! Split a delimited text file into several files by percentage, e.g. into
//! train / validation / test sets.
//!
//! The input is counted once ([`analyze`]), the shares are turned into row
//! quotas ([`balance`]) and a single streaming pass ([`partition`]) writes a
//! contiguous block of rows to each target in order. [`Segregator`] runs the
//! whole sequence for a CSV file.

pub mod analyze;
pub mod balance;
mod error;
pub mod format;
pub mod partition;
pub mod progress;
pub mod records;
pub mod segregate;
pub mod target;
pub mod validate;

pub use analyze::{analyze, Analysis};
pub use balance::balance;
pub use error::{Result, SegregateError};
pub use format::CsvFormat;
pub use partition::{partition, PartitionSummary};
pub use progress::{BarProgress, LogProgress, NoProgress, ProgressReporter};
pub use records::{CsvSink, CsvSinkOpener, CsvSource, RecordSink, RecordSource, SinkOpener};
pub use segregate::{SegregateState, Segregator};
pub use target::{Quotas, Target};
pub use validate::validate;
