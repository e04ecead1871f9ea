use std::{
    path::PathBuf,
    str::FromStr,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clipcut_core::{
    Action, ClipcutError, Editor, Gateway, GatewayConfig, Language, MediaSource, Provider,
    ProviderGateway, format_final_cut, format_transcript,
};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::EnvFilter;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let whole = d.as_secs();
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

/// The cut is printed even when translation failed; the failure still decides the exit
/// status.
fn translation_status(failure: Option<ClipcutError>) -> Result<()> {
    match failure {
        Some(e) => {
            Err(anyhow::Error::new(e).context("translation failed, the cut above is untranslated"))
        }
        None => Ok(()),
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Gemini => Provider::Gemini,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliLanguage {
    #[default]
    Tamil,
    Tanglish,
}

impl From<CliLanguage> for Language {
    fn from(cli: CliLanguage) -> Self {
        match cli {
            CliLanguage::Tamil => Language::Tamil,
            CliLanguage::Tanglish => Language::Tanglish,
        }
    }
}

/// A word to exclude, written as `SEGMENT_ID:WORD_INDEX`.
#[derive(Clone, Debug, PartialEq)]
struct WordRef {
    segment_id: String,
    word_index: usize,
}

impl FromStr for WordRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (segment_id, index) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected SEGMENT_ID:WORD_INDEX, got {s:?}"))?;
        if segment_id.is_empty() {
            return Err(format!("missing segment id in {s:?}"));
        }
        let word_index = index
            .parse()
            .map_err(|_| format!("word index {index:?} is not a non-negative number"))?;
        Ok(Self {
            segment_id: segment_id.to_string(),
            word_index,
        })
    }
}

#[derive(Parser)]
#[command(name = "clipcut")]
#[command(
    about = "Transcribe a Tamil video with AI, pick the segments worth keeping, and produce a final cut"
)]
struct Cli {
    /// Video file to import
    video: PathBuf,

    /// Master language for reviewing words and rendering the final cut
    #[arg(short, long, default_value = "tamil")]
    lang: CliLanguage,

    /// AI provider for transcripts and translation
    #[arg(short, long, default_value = "gemini")]
    provider: CliProvider,

    /// Override the provider's default model
    #[arg(short, long)]
    model: Option<String>,

    /// Toggle a segment into the cut (repeatable)
    #[arg(short, long = "select", value_name = "ID")]
    select: Vec<String>,

    /// Exclude a word from a segment (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "ID:INDEX")]
    exclude: Vec<WordRef>,

    /// Let the AI keep every segment scoring above 80 instead of the manual selection
    #[arg(short, long)]
    auto: bool,

    /// Translate the segments to English
    #[arg(short, long)]
    translate: bool,

    /// Print the final project as JSON instead of the readable cut
    #[arg(long)]
    json: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Dispatch a manual edit. Precondition gates are reported and skipped.
async fn apply_edit<G: Gateway>(editor: &Editor<G>, action: Action) -> Result<()> {
    match editor.dispatch(action).await {
        Ok(_) => Ok(()),
        Err(ClipcutError::InvalidOperation(reason)) => {
            eprintln!("{} {}", style("Skipped:").yellow().bold(), reason);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let provider: Provider = cli.provider.into();
    let language: Language = cli.lang.into();

    // Validate API key early
    let config = GatewayConfig {
        provider,
        model: cli.model.clone(),
        ..GatewayConfig::default()
    };
    let gateway = match ProviderGateway::new(config) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let media = MediaSource::from_path(&cli.video)?;
    fs::metadata(&cli.video)
        .await
        .with_context(|| format!("cannot read {}", cli.video.display()))?;

    println!(
        "\n{}  {}\n",
        style("clipcut").cyan().bold(),
        style("Final Cut Studio").dim()
    );

    let total_start = Instant::now();
    let editor = Editor::new(gateway);

    // Step 1: Import
    let mime_type = media.mime_type;
    let session = editor.dispatch(Action::ImportMedia(media)).await?;
    if let Some(project) = session.project() {
        println!(
            "{} Imported: {} {}",
            style("✓").green().bold(),
            style(&project.name).dim(),
            style(format!("[{}]", mime_type)).dim()
        );
    }

    // Step 2: Transcribe
    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Generating transcript with {}...", provider.name()));
    let session = match editor.dispatch(Action::RequestTranscription).await {
        Ok(session) => session,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    let segment_count = session.project().map_or(0, |p| p.segments.len());
    spinner.finish_with_message(format!(
        "{} Transcribed: {} segments {}",
        style("✓").green().bold(),
        segment_count,
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    // Step 3: Manual edits
    for id in &cli.select {
        apply_edit(&editor, Action::ToggleSegment(id.clone())).await?;
    }
    for word in &cli.exclude {
        apply_edit(
            &editor,
            Action::ToggleWord {
                segment_id: word.segment_id.clone(),
                word_index: word.word_index,
            },
        )
        .await?;
    }

    if let Some(project) = editor.session().project() {
        println!("{}", style("─".repeat(60)).dim());
        print!("{}", format_transcript(&project.segments, language));
        println!("{}", style("─".repeat(60)).dim());
    }

    // Step 4: Finalize
    let finalize = if cli.auto {
        Action::AutoEdit(language)
    } else {
        Action::ManualFinalize(language)
    };
    match editor.dispatch(finalize).await {
        Ok(session) => println!(
            "{} Final cut: {} of {} segments {}",
            style("✓").green().bold(),
            session.selected_segments().len(),
            segment_count,
            style(if cli.auto { "(auto edit)" } else { "(manual)" }).dim()
        ),
        Err(ClipcutError::InvalidOperation(reason)) => {
            eprintln!("{} {}", style("Error:").red().bold(), reason);
            eprintln!(
                "{}",
                style("Select segments with --select <ID> or let the AI pick with --auto").dim()
            );
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    }

    // Step 5: Translate
    let mut translation_failure = None;
    if cli.translate {
        let step_start = Instant::now();
        let spinner = create_spinner("Translating to English...");
        match editor.dispatch(Action::RequestTranslation).await {
            Ok(_) => spinner.finish_with_message(format!(
                "{} Translated {}",
                style("✓").green().bold(),
                style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
            )),
            Err(e) => {
                spinner.finish_with_message(format!(
                    "{} Translation failed, keeping original text: {}",
                    style("✗").red().bold(),
                    e
                ));
                translation_failure = Some(e);
            }
        }
    }

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    let session = editor.session();
    let project = session
        .project()
        .context("project was discarded before the cut was rendered")?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(project)?);
    } else {
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", format_final_cut(project, session.master_language()));
    }

    translation_status(translation_failure)
}
