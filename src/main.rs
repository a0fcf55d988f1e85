use anyhow::Context;
use clap::Parser;
use reachping::cli::Args;
use reachping::config::AppSettings;
use reachping::output::{self, OutputFormat};
use reachping::prober::{create_prober, icmp, IcmpProber};
use reachping::scheduler::{InterruptSignal, Scheduler, Session, StdinPrompt};
use reachping::types::Protocol;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "reachping=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => AppSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppSettings::load().unwrap_or_else(|e| {
            output::print_warning(&format!("ignoring settings file: {}", e));
            AppSettings::default()
        }),
    };

    let mut plan = args.into_plan(&settings)?;

    let fallback = create_prober(Protocol::Icmp);
    if let Some(warning) = plan
        .config
        .resolve_icmp(fallback.as_ref(), IcmpProber::check_available)
    {
        output::print_warning(&warning);
        if !icmp::is_root() {
            output::print_warning("Try running with sudo to enable it.");
        }
    }

    let reporter = output::create_reporter(plan.output);
    let mut scheduler = Scheduler::new(create_prober(plan.target.protocol), reporter);
    if plan.config.icmp_fallback {
        scheduler = scheduler.with_fallback(fallback);
    }

    tracing::debug!(probe_target = %plan.target, config = ?plan.config, "session starting");
    let session = Session::new(plan.target, plan.config, InterruptSignal::ctrl_c());
    let mut prompt = StdinPrompt::new();
    scheduler.run(session, &mut prompt).await;

    if plan.output == OutputFormat::Plain {
        output::print_info("Stopped.");
    }
    Ok(())
}
