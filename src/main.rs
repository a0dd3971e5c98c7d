use anyhow::{Context, Result};
use clap::Parser;
use simregress::cli::{Cli, Command, CompareArgs, Selection, SuiteArgs};
use simregress::config::SuiteConfig;
use simregress::orchestrator::{self, RunOptions};
use simregress::report;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Outcome classes mapped onto the process exit status
enum Status {
    Passed,
    Failed,
    Usage,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Passed => ExitCode::SUCCESS,
            Status::Failed => ExitCode::from(1),
            Status::Usage => ExitCode::from(2),
        }
    }
}

fn run_suite(args: &SuiteArgs) -> Result<Status> {
    let mut config = match args.config.as_deref().map(SuiteConfig::from_toml) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            eprintln!("Error: {e:#}");
            return Ok(Status::Usage);
        }
        None => SuiteConfig::default(),
    };
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if let Some(dir) = &args.legacy_refs {
        config.legacy_reference_dir = Some(dir.clone());
    }
    if let Some(tol) = args.tolerance {
        config.override_tolerance(tol);
    }

    let cases = match args.selection() {
        Selection::All => config.cases(),
        Selection::Cases(wanted) => config.select(&wanted),
        Selection::Nothing => {
            eprintln!("No cases selected. Use --all, a model flag, or --case MODEL/VARIANT.");
            return Ok(Status::Usage);
        }
    };

    let options = RunOptions {
        update_baseline: args.update_baseline,
    };
    let suite = orchestrator::run_suite(&config, &cases, options);

    for case in &suite.cases {
        for line in case.lines() {
            println!("{line}");
        }
        if args.show {
            if let orchestrator::CaseOutcome::Scored(scores) = &case.outcome {
                for score in scores {
                    if let Some(path) = &score.plot_path {
                        println!("{}", report::show_line(path, &score.plot));
                    }
                }
            }
        }
    }
    if !args.quiet {
        println!("{}", suite.summary_line());
    }

    // Configuration mistakes in a case are usage errors, not regressions
    let misconfigured = suite.cases.iter().any(|c| {
        matches!(&c.outcome, orchestrator::CaseOutcome::Errored { error, .. } if error.is_configuration())
    });
    Ok(if suite.success() {
        Status::Passed
    } else if misconfigured && suite.failed_count() == 0 {
        Status::Usage
    } else {
        Status::Failed
    })
}

fn run_compare(args: &CompareArgs) -> Result<Status> {
    let aligned = match orchestrator::compare_files(
        &args.reference,
        &args.reference_locator(),
        &args.simulation,
        &args.simulation_locator(),
        args.tolerance,
        &args.title,
        &args.ylabel,
    ) {
        Ok(aligned) => aligned,
        Err(e) if e.is_configuration() => {
            eprintln!("Error: {e}");
            return Ok(Status::Usage);
        }
        Err(e) => return Err(e).context("Comparison failed"),
    };

    let label = format!(
        "{} vs {}",
        args.simulation.display(),
        args.reference.display()
    );
    println!("{}", aligned.result.summary_line(&label));

    let path = report::write_plot_data(&args.outdir, None, &aligned.plot)?;
    if args.show {
        println!("{}", report::show_line(&path, &aligned.plot));
    }

    Ok(if aligned.result.passed {
        Status::Passed
    } else {
        Status::Failed
    })
}

fn main() -> ExitCode {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let status = match &args.command {
        Command::Suite(suite) => run_suite(suite),
        Command::Compare(compare) => run_compare(compare),
    };

    match status {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("Error: {e:#}");
            Status::Failed.into()
        }
    }
}
