use anyhow::{Context, Result, bail};
use clap::Parser;
use scenetty::state::DEFAULT_PROMPT;
use scenetty::{
    AnsiSink, PlaybackConfig, PlaybackReport, Scenario, Scheduler, parse_file, scenario_to_source,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "scenetty",
    about = "Play a scripted terminal session on the console",
    version
)]
struct Args {
    /// Path to the scenario file
    #[arg(short, long)]
    scenario: PathBuf,

    /// Directory `audio:` paths are resolved against [default: the scenario's directory]
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Prompt written before each input
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Start without a prompt
    #[arg(long, conflicts_with = "prompt")]
    no_prompt: bool,

    /// Only parse the scenario and report problems
    #[arg(long, conflicts_with = "dump")]
    check: bool,

    /// Print the normalized scenario instead of playing it
    #[arg(long)]
    dump: bool,

    /// Refuse to play a scenario with invalid directives
    #[arg(long)]
    strict: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let scenario = parse_file(&args.scenario).with_context(|| {
        format!(
            "Failed to parse scenario file: {}",
            args.scenario.display()
        )
    })?;

    let assets = match &args.assets {
        Some(dir) => dir.clone(),
        None => scenario_dir(&args.scenario),
    };
    check_audio(&args.scenario, &scenario, &assets)?;

    if args.check {
        return report(&args.scenario, &scenario);
    }
    if args.dump {
        print!("{}", scenario_to_source(&scenario));
        return Ok(());
    }
    if args.strict && !scenario.is_clean() {
        report(&args.scenario, &scenario)?;
    }

    let prompt = (!args.no_prompt).then_some(args.prompt);
    let config = PlaybackConfig::default().with_prompt(prompt);
    let mut scheduler = Scheduler::with_config(config, AnsiSink::new(tokio::io::stdout()));

    clear_screen()?;
    let played = scheduler.play(scenario.actions).await;
    let restored = restore_cursor();

    let summary = finish(played, restored)?;
    tracing::debug!(?summary, "playback report");
    Ok(())
}

/// A playback failure takes precedence over a failure to restore the cursor.
fn finish(played: Result<PlaybackReport>, restored: Result<()>) -> Result<PlaybackReport> {
    let summary = played.context("Failed to play scenario")?;
    restored.context("Failed to restore the cursor")?;
    Ok(summary)
}

fn scenario_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Fail unless every `audio:` hint points at an existing file.
fn check_audio(path: &Path, scenario: &Scenario, assets: &Path) -> Result<()> {
    let missing: Vec<String> = scenario
        .audio
        .iter()
        .map(|cue| cue.resolve(assets))
        .filter(|file| !file.is_file())
        .map(|file| file.display().to_string())
        .collect();

    if !missing.is_empty() {
        bail!(
            "Audio file(s) not found for scenario {}: {}",
            path.display(),
            missing.join(", ")
        );
    }
    Ok(())
}

/// Print diagnostics and fail if there are any.
fn report(path: &Path, scenario: &Scenario) -> Result<()> {
    for diagnostic in &scenario.diagnostics {
        println!("{}: {diagnostic}", path.display());
    }
    if !scenario.is_clean() {
        bail!(
            "{} invalid directive(s) in {}",
            scenario.diagnostics.len(),
            path.display()
        );
    }
    println!(
        "{}: {} action(s), {} audio cue(s)",
        path.display(),
        scenario.actions.len(),
        scenario.audio.len()
    );
    Ok(())
}

fn clear_screen() -> Result<()> {
    print!("\x1B[2J\x1B[1;1H");
    std::io::stdout().flush()?;
    Ok(())
}

fn restore_cursor() -> Result<()> {
    print!("\x1B[?25h");
    std::io::stdout().flush()?;
    Ok(())
}
