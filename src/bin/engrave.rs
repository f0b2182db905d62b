use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use engrave::assets::decode::decode_logo;
use engrave::assets::source::fetch_logo;
use engrave::content::sections::render_sections;
use engrave::{
    CommonMarkRenderer, DirAssetSource, EngraveResult, EngravingRenderer, LogoImage, SiteConfig,
    Surface, ToolCatalog, ViewportMetrics,
};

#[derive(Parser, Debug)]
#[command(name = "engrave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the hero at one progress value as a PNG.
    Frame(FrameArgs),
    /// Render evenly spaced progress values from 0 to 1 into a directory of PNGs.
    Sequence(SequenceArgs),
    /// Print the section markup of a tool document.
    Tool(ToolArgs),
}

#[derive(Args, Debug)]
struct HeroArgs {
    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in CSS pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio (clamped to 2).
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Logo file. Overrides the configured logo path; the emblem is drawn if it fails to load.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Site config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that asset paths are resolved against.
    #[arg(long, default_value = ".")]
    assets: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    hero: HeroArgs,

    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    hero: HeroArgs,

    /// Number of frames (at least 2).
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ToolArgs {
    /// Tool key, e.g. `ue`.
    key: String,

    /// Directory containing `content/tools/`.
    #[arg(long, default_value = ".")]
    assets: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Tool(args) => cmd_tool(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::from_path(path)
            .with_context(|| format!("load site config '{}'", path.display())),
        None => Ok(SiteConfig::default()),
    }
}

fn load_logo(args: &HeroArgs, cfg: &SiteConfig) -> EngraveResult<LogoImage> {
    match &args.logo {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read logo '{}'", path.display()))?;
            decode_logo(&path.to_string_lossy(), &bytes)
        }
        None => fetch_logo(&DirAssetSource::new(&args.assets), &cfg.logo_path),
    }
}

fn hero_renderer(args: &HeroArgs) -> anyhow::Result<EngravingRenderer> {
    let cfg = load_config(args.config.as_deref())?;
    let metrics = ViewportMetrics::new(args.width, args.height, args.dpr)?;
    let mut renderer = EngravingRenderer::new(cfg.engraving(), metrics);
    let ticket = renderer.begin_logo_load();
    renderer.complete_logo_load(ticket, load_logo(args, &cfg));
    Ok(renderer)
}

fn write_png(surface: &Surface, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let img = surface.to_rgba_image();
    image::save_buffer_with_format(
        out,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut renderer = hero_renderer(&args.hero)?;
    renderer.draw(args.progress);
    write_png(renderer.frame(), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    if args.frames < 2 {
        anyhow::bail!("--frames must be at least 2, got {}", args.frames);
    }
    let mut renderer = hero_renderer(&args.hero)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let last = f64::from(args.frames - 1);
    for i in 0..args.frames {
        renderer.draw(f64::from(i) / last);
        let path = args.out.join(format!("frame_{i:04}.png"));
        write_png(renderer.frame(), &path)?;
    }
    eprintln!("wrote {} frames to {}", args.frames, args.out.display());
    Ok(())
}

fn cmd_tool(args: ToolArgs) -> anyhow::Result<()> {
    let mut catalog = ToolCatalog::new(
        Box::new(DirAssetSource::new(&args.assets)),
        Box::new(CommonMarkRenderer),
        vec![args.key.clone()],
    );
    let data = catalog
        .load(&args.key)
        .with_context(|| format!("load tool '{}'", args.key))?;
    eprintln!("{} {} {}", data.icon, data.title, data.subtitle);
    println!("{}", render_sections(&data.html));
    Ok(())
}
