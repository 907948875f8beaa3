use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dossier_core::{
    Aggregator, ConsolidatedReport, ExtractionObserver, RecordingObserver, TracingObserver,
};
use tokio::task::JoinSet;

use super::AggregateArgs;
use crate::config;
use crate::input::LookupInput;

struct Job {
    aggregator: Aggregator,
    phones: Arc<[String]>,
    names: Arc<[String]>,
    explain: bool,
}

impl Job {
    fn process(&self, file: &Path) -> Result<ConsolidatedReport> {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?;
        let value = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", file.display()))?;
        let input = LookupInput::from_value(value)
            .with_context(|| format!("reading payload from {}", file.display()))?;

        let phones = input.phones.iter().chain(self.phones.iter());
        let names = input.names.iter().chain(self.names.iter());

        let report = if self.explain {
            let observer = RecordingObserver::new();
            let report = self.aggregate(&input, phones, names, &observer);
            for event in observer.into_events() {
                eprintln!("{}: {}", file.display(), serde_json::to_string(&event)?);
            }
            report
        } else {
            self.aggregate(&input, phones, names, &TracingObserver)
        };

        tracing::info!(
            file = %file.display(),
            providers = report.stats.providers,
            records = report.record_count(),
            phones = report.phones.len(),
            names = report.names.len(),
            "Aggregated lookup"
        );
        Ok(report)
    }

    fn aggregate<'a>(
        &self,
        input: &LookupInput,
        phones: impl Iterator<Item = &'a String>,
        names: impl Iterator<Item = &'a String>,
        observer: &dyn ExtractionObserver,
    ) -> ConsolidatedReport {
        self.aggregator
            .aggregate_observed(&input.payload, phones, names, observer)
    }
}

fn report_path(file: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = file
        .file_stem()
        .map_or_else(|| "lookup".into(), |s| s.to_string_lossy().into_owned());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| file.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.report.json"))
}

pub async fn run(args: AggregateArgs) -> Result<()> {
    let schema = config::load_schema(args.schema.as_deref())?;
    let job = Arc::new(Job {
        aggregator: Aggregator::new().with_schema(schema),
        phones: args.phones.into(),
        names: args.names.into(),
        explain: args.explain,
    });

    if let ([file], None) = (args.files.as_slice(), &args.out_dir) {
        let report = job.process(file)?;
        println!("{}", super::render(&report, args.compact)?);
        return Ok(());
    }

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let total = args.files.len();
    let mut tasks = JoinSet::new();
    for file in args.files {
        let job = Arc::clone(&job);
        let out = report_path(&file, args.out_dir.as_deref());
        let compact = args.compact;

        tasks.spawn_blocking(move || -> Result<PathBuf> {
            let report = job.process(&file)?;
            std::fs::write(&out, super::render(&report, compact)?)
                .with_context(|| format!("writing {}", out.display()))?;
            Ok(out)
        });
    }

    let mut failures = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(path) => println!("{}", path.display()),
            Err(e) => {
                eprintln!("error: {e:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {total} lookup files failed");
    }
    Ok(())
}
