use axum::body::Bytes;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pixelator::api;
use pixelator::models::{AppConfig, RenderParams, RenderQuery};
use pixelator::server;
use pixelator::services::PixelateService;

#[derive(Parser)]
#[command(name = "pixelator")]
#[command(about = "Pixelator - turn images into palette-limited pixel art")]
struct Cli {
    /// Path to config.yaml (defaults to $CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert a PNG to pixel art
    Render {
        /// Input PNG file
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        options: RenderOptions,
    },
    /// Print the palette extracted from a PNG
    Extract {
        /// Input PNG file
        input: PathBuf,

        /// Maximum number of colors (2-16)
        #[arg(short, long)]
        colors: Option<usize>,
    },
    /// Convert PNG frames to an animated GIF
    Animate {
        /// Input PNG frames, in display order
        #[arg(required = true)]
        frames: Vec<PathBuf>,

        /// Output GIF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Delay between frames in milliseconds
        #[arg(short, long)]
        delay: Option<u32>,

        #[command(flatten)]
        options: RenderOptions,
    },
}

/// Rendering options shared by `render` and `animate`
#[derive(Args)]
struct RenderOptions {
    /// Working-grid scale in percent (10-100)
    #[arg(short, long)]
    pixel_size: Option<u32>,

    /// Dithering algorithm: floyd-steinberg or ordered
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Palette assignment: nearest, luminance, gradient-horizontal, gradient-vertical
    #[arg(short = 'm', long)]
    palette_mode: Option<String>,

    /// Palette as comma-separated hex RGB (e.g. "#000000,#ff0000,#ffffff")
    #[arg(long, conflicts_with = "auto_palette")]
    palette: Option<String>,

    /// Extract an N-color palette from the image instead
    #[arg(long, value_name = "N")]
    auto_palette: Option<usize>,

    /// Pixelate only, keeping the source colors
    #[arg(long)]
    no_dither: bool,
}

impl RenderOptions {
    fn into_query(self) -> RenderQuery {
        let auto = self.auto_palette.is_some();
        RenderQuery {
            pixel_size: self.pixel_size,
            algorithm: self.algorithm,
            palette_mode: self.palette_mode,
            palette: if auto {
                Some("auto".to_string())
            } else {
                self.palette
            },
            colors: self.auto_palette,
            dither: self.no_dither.then_some(false),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixelator API",
        description = "Pixel-art conversion with palette dithering and palette extraction",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_pixelate, api::handle_palette),
    components(schemas(api::PaletteResponse, api::ErrorResponse)),
    tags(
        (name = "Pixelate", description = "Pixel-art rendering"),
        (name = "Palette", description = "Palette extraction")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

    match cli.command {
        Some(Commands::Serve) => run_server(config_path).await,
        Some(Commands::Render {
            input,
            output,
            options,
        }) => {
            init_cli_tracing();
            run_render_command(config_path, &input, &output, options).await
        }
        Some(Commands::Extract { input, colors }) => {
            init_cli_tracing();
            run_extract_command(config_path, &input, colors).await
        }
        Some(Commands::Animate {
            frames,
            output,
            delay,
            options,
        }) => {
            init_cli_tracing();
            run_animate_command(config_path, &frames, &output, delay, options).await
        }
        None => {
            run_status_command(config_path.as_deref());
            Ok(())
        }
    }
}

/// Minimal logging for CLI commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelator=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn load_service(config_path: Option<PathBuf>) -> PixelateService {
    let config = AppConfig::load(config_path.as_deref());
    PixelateService::new(Arc::new(config))
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))
}

/// Convert one PNG file (no server needed)
async fn run_render_command(
    config_path: Option<PathBuf>,
    input: &Path,
    output: &Path,
    options: RenderOptions,
) -> anyhow::Result<()> {
    let service = load_service(config_path);
    let params = RenderParams::resolve(&options.into_query(), &service.config().defaults)?;
    let bytes = read_file(input)?;

    let result = service.render_png(Bytes::from(bytes), params).await?;
    std::fs::write(output, &result.png_bytes)?;

    println!(
        "Rendered {} -> {} ({} bytes, {} colors: {})",
        input.display(),
        output.display(),
        result.png_bytes.len(),
        result.palette.len(),
        result.palette.join(" ")
    );
    Ok(())
}

/// Print the extracted palette, one hex code per line
async fn run_extract_command(
    config_path: Option<PathBuf>,
    input: &Path,
    colors: Option<usize>,
) -> anyhow::Result<()> {
    let service = load_service(config_path);
    let count = pixelator::models::clamp_color_count(
        colors.unwrap_or(service.config().defaults.color_count),
    );
    let bytes = read_file(input)?;

    let palette = service.extract_palette(Bytes::from(bytes), count).await?;
    for hex in palette.to_hex_strings() {
        println!("{hex}");
    }
    Ok(())
}

/// Process frames through the pipeline and write an animated GIF
async fn run_animate_command(
    config_path: Option<PathBuf>,
    frames: &[PathBuf],
    output: &Path,
    delay: Option<u32>,
    options: RenderOptions,
) -> anyhow::Result<()> {
    let service = load_service(config_path);
    let params = RenderParams::resolve(&options.into_query(), &service.config().defaults)?;
    let delay_ms = delay.unwrap_or(service.config().defaults.frame_delay_ms);
    let inputs = frames
        .iter()
        .map(|path| read_file(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let gif = service
        .render_animation(inputs, params, delay_ms, |fraction| {
            eprint!("\rEncoding... {:3.0}%", fraction * 100.0);
        })
        .await?;
    eprintln!();

    std::fs::write(output, &gif)?;
    println!(
        "Wrote {} frames to {} ({} bytes, {delay_ms} ms per frame)",
        frames.len(),
        output.display(),
        gif.len()
    );
    Ok(())
}

fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();

    println!("Pixelator v{VERSION}");
    println!("Pixel-art conversion server and CLI\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        std::env::var("CONFIG_FILE").as_deref().unwrap_or("(not set)")
    );

    let config_source = match config_path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("{} (file not found, using defaults)", path.display()),
        None => "built-in defaults".to_string(),
    };
    println!("\nConfig: {config_source}");

    println!("\nCommands:");
    println!("  pixelator serve                         Start the HTTP server");
    println!("  pixelator render IN.png -o OUT.png      Convert a PNG to pixel art");
    println!("  pixelator extract IN.png [--colors N]   Print an extracted palette");
    println!("  pixelator animate F1.png F2.png -o OUT.gif");
    println!("                                          Encode frames as an animated GIF");
    println!("\nRun 'pixelator <command> --help' for options.");
}

/// Run the HTTP server
async fn run_server(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let config = AppConfig::load(config_path.as_deref());

    tracing::info!(
        max_upload_bytes = config.limits.max_upload_bytes,
        max_dimension = config.limits.max_dimension,
        cache_entries = config.limits.cache_entries,
        "Limits configured"
    );

    let state = server::create_app_state(config)?;

    // Build router: shared API routes plus production-only documentation
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Pixelator server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
