/*
cargo run --release --bin segregate_csv -- \
    data/iris.csv \
    --target 70:data/splits/iris_train.csv \
    --target 15:data/splits/iris_val.csv \
    --target 15:data/splits/iris_test.csv

cargo run --release --bin segregate_csv -- \
    data/prices_de.csv \
    --targets-file data/splits/targets.json \
    --decimal-comma \
    --progress log --report-interval 50000

targets.json:
[{"percent": 80, "output": "data/splits/train.csv"},
 {"percent": 20, "output": "data/splits/test.csv"}]
*/

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use segregate::{
    BarProgress, CsvFormat, LogProgress, NoProgress, ProgressReporter, Segregator, Target,
};
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::{self, create_dir_all, File};
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ProgressMode {
    Bar,
    Log,
    None,
}

// CLI parameters
#[derive(Parser, Debug)]
#[command(version, about = "Split a CSV file into percentage-sized parts (train/val/test)")]
struct Cli {
    // Input CSV file
    input: PathBuf,

    // PERCENT:PATH, repeat once per output (in order)
    #[arg(short, long = "target", value_name = "PERCENT:PATH", value_parser = parse_target)]
    targets: Vec<Target>,

    // JSON list of {"percent", "output"} objects, appended after --target entries
    #[arg(long)]
    targets_file: Option<PathBuf>,

    // Input has no header row
    #[arg(long, default_value_t = false)]
    no_headers: bool,

    // Do not repeat the header row in every output
    #[arg(long, default_value_t = false)]
    no_output_headers: bool,

    // ';' separated, ',' decimal point
    #[arg(long, default_value_t = false)]
    decimal_comma: bool,

    #[arg(long, value_enum, default_value_t = ProgressMode::Bar)]
    progress: ProgressMode,

    // Records between log lines with --progress log
    #[arg(long, default_value_t = segregate::progress::DEFAULT_REPORT_INTERVAL)]
    report_interval: u64,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn parse_target(raw: &str) -> std::result::Result<Target, String> {
    let (percent, path) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected PERCENT:PATH, got {raw:?}"))?;
    let percent: u8 = percent
        .trim()
        .parse()
        .map_err(|_| format!("invalid percent {percent:?}"))?;
    if percent > 100 {
        return Err(format!("percent {percent} is above 100"));
    }
    if path.is_empty() {
        return Err("empty output path".to_string());
    }
    Ok(Target::new(percent, path))
}

fn load_targets(path: &Path) -> Result<Vec<Target>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let targets: Vec<Target> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON list of targets", path.display()))?;
    Ok(targets)
}

// --target entries first, then the file's, in file order
fn collect_targets(flags: &[Target], file: Option<&Path>) -> Result<Vec<Target>> {
    let mut targets = flags.to_vec();
    if let Some(file) = file {
        targets.extend(load_targets(file)?);
    }
    if targets.is_empty() {
        bail!("no targets given, use --target PERCENT:PATH or --targets-file");
    }
    Ok(targets)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // logging setup
    create_dir_all(&cli.log_dir)?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = cli.log_dir.join(format!("segregate_{ts}.log"));
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            LogConfig::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::Info,
            LogConfig::default(),
            File::create(&log_path)?,
        ),
    ])?;
    info!("Starting segregation of {:?}", cli.input);

    // targets
    let targets = collect_targets(&cli.targets, cli.targets_file.as_deref())?;

    let format = if cli.decimal_comma {
        CsvFormat::DECIMAL_COMMA
    } else {
        CsvFormat::ENGLISH
    };

    let mut seg = Segregator::new(&cli.input, format, !cli.no_headers).with_targets(targets);
    seg.set_produce_output_headers(!cli.no_output_headers);

    // count + balance
    let total = seg
        .analyze()
        .with_context(|| format!("failed to analyze {}", cli.input.display()))?
        .record_count;
    seg.validate().context("invalid targets")?;

    for t in seg.targets() {
        if let Some(parent) = t.output().parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        info!("Target {}% -> {}", t.percent, t.output().display());
    }

    // stream
    let mut progress: Box<dyn ProgressReporter> = match cli.progress {
        ProgressMode::Bar => Box::new(BarProgress::new(total)),
        ProgressMode::Log => Box::new(LogProgress::new(total).with_interval(cli.report_interval)),
        ProgressMode::None => Box::new(NoProgress),
    };
    let summary = seg
        .process(&mut *progress)
        .with_context(|| format!("failed to segregate {}", cli.input.display()))?;

    for (t, n) in seg.targets().iter().zip(&summary.written) {
        println!("{:>3}%  {:>10}  {}", t.percent, n, t.output().display());
    }
    info!("All done, {} records written", summary.processed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_percent_and_path() {
        assert_eq!(
            parse_target("70:data/train.csv").unwrap(),
            Target::new(70, "data/train.csv")
        );
        assert_eq!(parse_target(" 0 :z.csv").unwrap(), Target::new(0, "z.csv"));
    }

    #[test]
    fn rejects_bad_targets() {
        assert!(parse_target("101:a.csv").unwrap_err().contains("above 100"));
        assert!(parse_target("300:a.csv").unwrap_err().contains("invalid percent"));
        assert!(parse_target("70").unwrap_err().contains("PERCENT:PATH"));
        assert!(parse_target("x:a.csv").unwrap_err().contains("invalid percent"));
        assert_eq!(parse_target("70:").unwrap_err(), "empty output path");
    }

    #[test]
    fn flag_targets_come_before_file_targets() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("targets.json");
        fs::write(
            &file,
            r#"[{"percent":20,"output":"val.csv"},{"percent":10,"output":"test.csv"}]"#,
        )
        .unwrap();

        let flags = vec![Target::new(70, "train.csv")];
        let targets = collect_targets(&flags, Some(file.as_path())).unwrap();
        assert_eq!(
            targets,
            vec![
                Target::new(70, "train.csv"),
                Target::new(20, "val.csv"),
                Target::new(10, "test.csv"),
            ]
        );
    }

    #[test]
    fn no_targets_at_all() {
        assert!(collect_targets(&[], None).is_err());
    }

    #[test]
    fn malformed_targets_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("targets.json");
        fs::write(&file, r#"{"percent":20}"#).unwrap();
        assert!(collect_targets(&[], Some(file.as_path())).is_err());
        assert!(collect_targets(&[], Some(dir.path().join("missing.json").as_path())).is_err());
    }
}
