//! `chyron` CLI - Produce conference talk videos with burned-in overlays

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use chyron::{compose, fetch_feed, Config, LocalStore, RenderPipeline, SpeakerInfo};

#[derive(Parser)]
#[command(name = "chyron")]
#[command(about = "Burn lower-third overlays into conference talk recordings")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./chyron.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce every talk the feed and the store agree on
    Render {
        /// Print each talk's filter graph instead of encoding
        #[arg(long)]
        dry_run: bool,

        /// Stop after the first talk that reaches production
        #[arg(long)]
        only_first: bool,
    },

    /// Compose the filter graph for a single talk
    Plan {
        /// Resolve the talk from the event feed by short-link code
        #[arg(long)]
        code: Option<String>,

        /// Talk title for an offline plan
        #[arg(long, conflicts_with = "code")]
        title: Option<String>,

        /// Speaker name, repeatable
        #[arg(long = "speaker")]
        speakers: Vec<String>,

        /// Tagline for the speaker at the same position; empty string for none
        #[arg(long = "tagline")]
        taglines: Vec<String>,

        /// Truncate the plan to the configured preview length
        #[arg(long)]
        trimmed: bool,
    },

    /// Verify ffmpeg, the intro clip, the store, and the feed
    Check {
        /// Skip the feed reachability check
        #[arg(long)]
        offline: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { dry_run, only_first } => {
            cmd_render(config, dry_run, only_first).await?;
        }
        Commands::Plan { code, title, speakers, taglines, trimmed } => {
            cmd_plan(&config, code.as_deref(), title.as_deref(), &speakers, &taglines, trimmed).await?;
        }
        Commands::Check { offline } => {
            cmd_check(config, offline).await?;
        }
    }

    Ok(())
}

async fn cmd_render(mut config: Config, dry_run: bool, only_first: bool) -> Result<()> {
    if only_first {
        config.render.only_first = true;
    }

    println!("🎬 chyron batch render");
    if let Some(url) = &config.feed_url {
        println!("   Feed: {url}");
    }
    println!("   Store: {}", config.paths.store_root.display());
    println!("   Output: {}", config.paths.output_dir.display());

    if dry_run {
        let feed = fetch_feed(&config).await?;
        let store = LocalStore::new(&config.paths.store_root);
        let pipeline = RenderPipeline::new(config, Box::new(store))?;
        let plan = pipeline.plan(&feed).await?;

        for talk in &plan.talks {
            println!("\n{} ({})", talk.code, talk.title);
            println!("   Speakers: {}", talk.speakers.join(", "));
            println!("   Recording: {}", talk.recording);
            println!("{}", talk.graph.script);
        }
        if !plan.skipped.is_empty() {
            println!("\nSkipped:");
            for skip in &plan.skipped {
                match &skip.code {
                    Some(code) => println!("   {} ({}): {}", code, skip.title, skip.reason),
                    None => println!("   {}: {}", skip.title, skip.reason),
                }
            }
        }
        println!(
            "\n✨ {} to produce, {} skipped",
            plan.talks.len(),
            plan.skipped.len()
        );
        return Ok(());
    }

    let store = LocalStore::new(&config.paths.store_root);
    let pipeline = RenderPipeline::new(config, Box::new(store))?;
    let summary = pipeline.run().await?;

    println!(
        "\n✨ Batch complete: {} produced, {} skipped, {} failed",
        summary.produced, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        bail!("{} talks failed", summary.failed);
    }
    Ok(())
}

async fn cmd_plan(
    config: &Config,
    code: Option<&str>,
    title: Option<&str>,
    speakers: &[String],
    taglines: &[String],
    trimmed: bool,
) -> Result<()> {
    let trimmed = trimmed || config.render.trimmed;

    if let Some(code) = code {
        return plan_from_feed(config, code, trimmed).await;
    }

    let Some(title) = title else {
        bail!("pass --code, or --title with at least one --speaker");
    };
    if speakers.is_empty() {
        bail!("an offline plan needs at least one --speaker");
    }

    let speakers: Vec<SpeakerInfo> = speakers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let (first, last) = split_name(name);
            let info = SpeakerInfo::new(first, last);
            match taglines.get(i).map(String::as_str).filter(|t| !t.is_empty()) {
                Some(tagline) => info.with_tagline(tagline),
                None => info,
            }
        })
        .collect();

    print_plan(config, title, &speakers, trimmed)
}

async fn plan_from_feed(config: &Config, code: &str, trimmed: bool) -> Result<()> {
    let feed = fetch_feed(config).await?;
    let question_id = feed.short_link_question_id()?;

    let session = feed
        .sessions
        .iter()
        .find(|s| s.code(question_id) == Some(code))
        .with_context(|| format!("no session in the feed has code '{code}'"))?;

    let speakers: Vec<SpeakerInfo> = feed
        .speakers_for(session)
        .into_iter()
        .map(SpeakerInfo::from)
        .collect();

    print_plan(config, &session.title, &speakers, trimmed)
}

fn print_plan(config: &Config, title: &str, speakers: &[SpeakerInfo], trimmed: bool) -> Result<()> {
    let result = compose(title, speakers, &config.layout, &config.timing, trimmed)?;
    let graph = result.to_filter_graph(&config.layout);

    println!("🎬 {title}");
    for speaker in speakers {
        match speaker.visible_tagline() {
            Some(tagline) => println!("   {} ({tagline})", speaker.display_name()),
            None => println!("   {}", speaker.display_name()),
        }
    }
    println!("   Map: {} {}", graph.video_label, graph.audio_label);
    println!("{}", graph.script);
    Ok(())
}

/// Everything before the final space is the first name. A single
/// token is a first name with no last name.
fn split_name(name: &str) -> (&str, &str) {
    let name = name.trim();
    match name.rsplit_once(' ') {
        Some((first, last)) => (first, last),
        None => (name, ""),
    }
}

async fn cmd_check(config: Config, offline: bool) -> Result<()> {
    println!("🧪 chyron environment check\n");

    let mut all_ok = true;

    if offline {
        println!("Feed... skipped (--offline)");
    } else {
        print!("Feed... ");
        match fetch_feed(&config).await {
            Ok(feed) => println!(
                "✅ {} sessions, {} speakers",
                feed.sessions.len(),
                feed.speakers.len()
            ),
            Err(e) => {
                println!("❌ {e:#}");
                all_ok = false;
            }
        }
    }

    let store = LocalStore::new(&config.paths.store_root);
    let pipeline = RenderPipeline::new(config, Box::new(store))?;
    for (name, ok) in pipeline.check_dependencies().await? {
        if ok {
            println!("✅ {name}");
        } else {
            println!("❌ {name}");
            all_ok = false;
        }
    }

    if !all_ok {
        bail!("environment check failed");
    }
    println!("\n✨ Ready to render");
    Ok(())
}
