use std::path::{Path, PathBuf};

use anyhow::Context as _;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use destiny_card::capture::{
    BackgroundVideo, CAPTURE_FPS, CaptureEngine, FfmpegRecorderFactory, FfmpegVideo,
    FrameScheduler, ManualClock, PaintScheduler, SteppedScheduler, SystemClock,
    video::decode_poster_frame,
};
use destiny_card::render::RasterizeOpts;
use destiny_card::{
    Animal, AppConfig, BloodType, CaptureSurface, CardData, CardRenderer, CardResult,
    ContentProvider, FixedProvider, GeminiProvider, JsonFileRepository, Mbti, Studio, Style,
    UserInput, Zodiac, export_file_name,
};

#[derive(Parser, Debug)]
#[command(name = "destiny-card", version, about = "Personality trait cards as PNG or video")]
struct Cli {
    /// JSON config file (environment variables still override it).
    #[arg(long, global = true, env = "DESTINY_CARD_CONFIG")]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a card and blurb for a selection and add it to the history.
    Generate(GenerateArgs),
    /// Inspect or edit the generation history.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Export a card as a transparent 2x PNG (background video excluded).
    Still(ExportArgs),
    /// Render a 1x PNG preview including the background's first frame.
    Preview(PreviewArgs),
    /// Record the card over a background video (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// Write a card's blurb to `<selection>.txt`.
    Blurb(ExportArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct SelectionArgs {
    /// Western zodiac sign, e.g. `水瓶座`, `aquarius` or `水瓶座 (Aquarius)`.
    #[arg(long)]
    zodiac: Option<Zodiac>,
    #[arg(long)]
    mbti: Option<Mbti>,
    /// Chinese zodiac animal, e.g. `鼠` or `rat`.
    #[arg(long)]
    animal: Option<Animal>,
    #[arg(long)]
    blood_type: Option<BloodType>,
    /// `descriptive` or `concise`.
    #[arg(long)]
    style: Option<Style>,
}

impl SelectionArgs {
    fn apply(&self, base: UserInput) -> UserInput {
        UserInput {
            zodiac: self.zodiac.unwrap_or(base.zodiac),
            mbti: self.mbti.unwrap_or(base.mbti),
            animal: self.animal.unwrap_or(base.animal),
            blood_type: self.blood_type.unwrap_or(base.blood_type),
            style: self.style.unwrap_or(base.style),
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Use the built-in sample text instead of calling the content service.
    #[arg(long)]
    offline: bool,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List entries, most recent first.
    List,
    /// Print one entry as JSON.
    Show { id: String },
    /// Delete one entry.
    Delete { id: String },
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// History entry to export; defaults to the sample card for the selection.
    #[arg(long)]
    id: Option<String>,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Output directory (defaults to the configured output dir).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    export: ExportArgs,

    /// Background clip whose first frame is shown behind the card.
    #[arg(long)]
    background: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct VideoArgs {
    #[command(flatten)]
    export: ExportArgs,

    /// Background clip to composite under the card.
    #[arg(long)]
    background: PathBuf,

    /// Pace frames by the wall clock instead of as fast as possible.
    #[arg(long)]
    realtime: bool,
}

/// The provider picked at runtime.
enum Provider {
    Fixed(FixedProvider),
    Gemini(GeminiProvider),
}

#[async_trait(?Send)]
impl ContentProvider for Provider {
    async fn generate_card(&self, input: &UserInput) -> CardResult<CardData> {
        match self {
            Self::Fixed(p) => p.generate_card(input).await,
            Self::Gemini(p) => p.generate_card(input).await,
        }
    }

    async fn generate_blurb(&self, input: &UserInput, card: &CardData) -> CardResult<String> {
        match self {
            Self::Fixed(p) => p.generate_blurb(input, card).await,
            Self::Gemini(p) => p.generate_blurb(input, card).await,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    destiny_card::logging::init(cli.verbose);
    let cfg = AppConfig::load(cli.config.as_deref())?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    rt.block_on(run(cli.cmd, cfg))
}

async fn run(cmd: Command, cfg: AppConfig) -> anyhow::Result<()> {
    match cmd {
        Command::Generate(args) => cmd_generate(args, &cfg).await,
        Command::History(cmd) => cmd_history(cmd, &cfg),
        Command::Still(args) => cmd_still(args, &cfg),
        Command::Preview(args) => cmd_preview(args, &cfg),
        Command::Video(args) => cmd_video(args, &cfg).await,
        Command::Blurb(args) => cmd_blurb(args, &cfg),
    }
}

fn open_studio<P: ContentProvider>(cfg: &AppConfig, provider: P) -> Studio<P, JsonFileRepository> {
    Studio::new(provider, JsonFileRepository::new(cfg.history_path()))
}

fn out_dir(args: &ExportArgs, cfg: &AppConfig) -> PathBuf {
    args.out_dir.clone().unwrap_or_else(|| cfg.output_dir.clone())
}

/// Selection and card for an export: a history entry, or the sample card.
fn pick_card(args: &ExportArgs, cfg: &AppConfig) -> anyhow::Result<(UserInput, CardData)> {
    let mut studio = open_studio(cfg, FixedProvider);
    match &args.id {
        Some(id) => {
            studio.load_history(id)?;
            Ok((*studio.input(), studio.display_card().into_owned()))
        }
        None => {
            let input = args.selection.apply(UserInput::default());
            Ok((input, FixedProvider::card_for(&input)))
        }
    }
}

async fn cmd_generate(args: GenerateArgs, cfg: &AppConfig) -> anyhow::Result<()> {
    let provider = if args.offline {
        Provider::Fixed(FixedProvider)
    } else {
        Provider::Gemini(GeminiProvider::new(cfg)?)
    };
    let mut studio = open_studio(cfg, provider);
    studio.set_input(args.selection.apply(UserInput::default()));

    let card = studio.generate().await?.clone();
    let id = studio
        .history()
        .items()
        .first()
        .map(|item| item.id.clone())
        .unwrap_or_default();

    println!("id:         {id}");
    println!("core trait: {}", card.core_trait);
    for section in [&card.zodiac, &card.mbti, &card.animal, &card.blood_type] {
        println!("{:<11} {}", format!("{}:", section.title), section.traits.join(" / "));
    }
    println!("fortune:    {}", card.fortune);
    if let Some(blurb) = studio.blurb() {
        println!();
        println!("{blurb}");
    }
    Ok(())
}

fn cmd_history(cmd: HistoryCommand, cfg: &AppConfig) -> anyhow::Result<()> {
    let mut studio = open_studio(cfg, FixedProvider);
    match cmd {
        HistoryCommand::List => {
            for item in studio.history().items() {
                let when = item
                    .created_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "{}  {when}  {}",
                    item.id,
                    destiny_card::export_stem(&item.input)
                );
            }
        }
        HistoryCommand::Show { id } => {
            let item = studio
                .history()
                .get(&id)
                .with_context(|| format!("no history entry '{id}'"))?;
            println!("{}", serde_json::to_string_pretty(item)?);
        }
        HistoryCommand::Delete { id } => {
            if !studio.delete_history(&id)? {
                anyhow::bail!("no history entry '{id}'");
            }
            eprintln!("deleted {id}");
        }
    }
    Ok(())
}

fn cmd_still(args: ExportArgs, cfg: &AppConfig) -> anyhow::Result<()> {
    let (input, card) = pick_card(&args, cfg)?;
    let renderer = CardRenderer::new(cfg.fonts_dir.as_deref());
    let surface = renderer.surface(&input, &card, None)?;
    let engine = CaptureEngine::new(FfmpegRecorderFactory::default());

    let out = out_dir(&args, cfg).join(export_file_name(&input, "png"));
    let written = engine
        .export_still(&surface, &out)
        .with_context(|| format!("still export to '{}' failed", out.display()))?;
    eprintln!("wrote {}", written.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs, cfg: &AppConfig) -> anyhow::Result<()> {
    let (input, card) = pick_card(&args.export, cfg)?;
    let poster = args
        .background
        .as_deref()
        .map(decode_poster_frame)
        .transpose()?;
    let renderer = CardRenderer::new(cfg.fonts_dir.as_deref());
    let surface = renderer.surface(&input, &card, poster)?;
    let png = surface.rasterize(&RasterizeOpts::preview())?.encode_png()?;

    let dir = out_dir(&args.export, cfg);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create output dir '{}'", dir.display()))?;
    let out = dir.join(format!("{}.preview.png", destiny_card::export_stem(&input)));
    std::fs::write(&out, png).with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

async fn cmd_video(args: VideoArgs, cfg: &AppConfig) -> anyhow::Result<()> {
    let (input, card) = pick_card(&args.export, cfg)?;
    let renderer = CardRenderer::new(cfg.fonts_dir.as_deref());
    let surface = renderer.surface(&input, &card, None)?;
    let engine = CaptureEngine::new(FfmpegRecorderFactory::detect());

    let (mut video, mut scheduler): (FfmpegVideo, Box<dyn FrameScheduler>) = if args.realtime {
        (
            FfmpegVideo::new(&args.background, CAPTURE_FPS, Box::new(SystemClock::start())),
            Box::new(PaintScheduler::new(CAPTURE_FPS)),
        )
    } else {
        let clock = ManualClock::new();
        (
            FfmpegVideo::new(&args.background, CAPTURE_FPS, Box::new(clock.clone())),
            Box::new(SteppedScheduler::new(clock, CAPTURE_FPS)),
        )
    };

    let video_ref: &mut dyn BackgroundVideo = &mut video;
    let outcome = engine
        .record(&surface, Some(video_ref), scheduler.as_mut(), &input)
        .await?
        .context("nothing was recorded")?;

    let path = outcome.artifact.save_to(&out_dir(&args.export, cfg))?;
    eprintln!(
        "wrote {} ({}, {} frames, {:.2}s)",
        path.display(),
        outcome.artifact.mime(),
        outcome.frames,
        outcome.duration_secs()
    );
    Ok(())
}

fn cmd_blurb(args: ExportArgs, cfg: &AppConfig) -> anyhow::Result<()> {
    let mut studio = open_studio(cfg, FixedProvider);
    let id = args
        .id
        .as_deref()
        .context("--id is required: blurbs come from generated history entries")?;
    studio.load_history(id)?;
    let file = studio
        .blurb_file()
        .with_context(|| format!("history entry '{id}' has no blurb"))?;
    let dir = out_dir(&args, cfg);
    write_text(&dir.join(&file.file_name), &file.contents)
}

fn write_text(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
