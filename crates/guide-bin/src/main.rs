//! Prevue entrypoint: scrolls the demo guide as text.
use anyhow::Result;
use clap::Parser;
use core_config::{Config, EffectiveLayout, RenderContext, load_from};
use core_render::{RowPipeline, RowPolicy, RowSource, RowStreamBuffer, StreamError};
use core_text::{CellMetrics, GlyphWidthCache};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod grid;
mod listings;

use grid::{TextGridFactory, TextRow};
use listings::DemoListings;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "prevue", version, about = "Scrolling program guide")]
struct Args {
    /// Configuration file path (overrides discovery of `prevue.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Viewport width in unscaled pixels.
    #[arg(long, default_value_t = 640)]
    pub width: u32,
    /// Viewport height in unscaled pixels.
    #[arg(long, default_value_t = 480)]
    pub height: u32,
    /// Display scale factor.
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,
    /// Stop after this many ticks. Runs until interrupted when omitted.
    #[arg(long)]
    pub ticks: Option<u64>,
    /// Pixels per text column in the printed grid.
    #[arg(long = "cell-width", default_value_t = 8)]
    pub cell_width: u32,
    /// Print the visible rows every N ticks.
    #[arg(long = "print-every", default_value_t = 60)]
    pub print_every: u64,
}

type GuidePipeline = RowPipeline<DemoListings, TextGridFactory, GlyphWidthCache<CellMetrics>>;

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("prevue.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "prevue.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn build_pipeline(
    config: &Config,
    layout: EffectiveLayout,
    ctx: &RenderContext,
    cell_width: u32,
) -> GuidePipeline {
    let cell = (cell_width as f32 * ctx.effective_scale()).round().max(1.0) as u32;
    let glyphs = GlyphWidthCache::new(CellMetrics::new(cell, layout.line_height));
    RowPipeline::new(
        DemoListings::default(),
        TextGridFactory::new(cell),
        glyphs,
        layout,
        RowPolicy::from(config.wrap()),
    )
}

fn print_frame<R>(buffer: &RowStreamBuffer<R>, viewport: f32, tick: u64)
where
    R: RowSource<Artifact = TextRow>,
{
    println!(
        "--- tick {tick} offset {:.1}px rows {} ---",
        buffer.scroll_offset(),
        buffer.len()
    );
    for (_, row) in buffer.visible_rows(viewport) {
        for line in &row.artifact.lines {
            println!("{}", line.trim_end());
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config_override = args.config.is_some();
    let mut config = load_from(args.config.clone())?;
    let ctx = RenderContext::new(args.width, args.height, args.scale);
    let layout = config.apply_context(ctx);
    info!(
        target: "runtime.startup",
        config_override,
        viewport_width = ctx.viewport_width,
        viewport_height = layout.viewport_height,
        scale = ctx.effective_scale(),
        column_count = layout.column_count,
        "bootstrap_complete"
    );

    let pipeline = build_pipeline(&config, layout, &ctx, args.cell_width);
    let mut buffer = RowStreamBuffer::new(pipeline);
    let viewport = layout.viewport_height as f32;
    let delta = config.scroll().pixels_per_tick * ctx.effective_scale();
    let print_every = args.print_every.max(1);

    if let Err(e) = buffer.fill_to_viewport(viewport) {
        warn!(target: "runtime", error = %e, "initial_fill_failed");
    }

    let tick_period = Duration::from_millis(config.scroll().tick_millis.max(1));
    let mut interval = tokio::time::interval(tick_period);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut tick = 0u64;
    while args.ticks.is_none_or(|n| tick < n) {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => {
                info!(target: "runtime", tick, "interrupted");
                break;
            }
        }
        match buffer.advance(delta, viewport) {
            Ok(evicted) if evicted > 0 => {
                debug!(target: "runtime", tick, evicted, "rows_evicted");
            }
            Ok(_) => {}
            Err(StreamError::NoContent) => {
                warn!(target: "runtime", tick, "no_content");
                println!("--- tick {tick}: no listings available ---");
            }
            Err(e) => return Err(e.into()),
        }
        if tick % print_every == 0 {
            print_frame(&buffer, viewport, tick);
        }
        tick += 1;
    }

    let snap = buffer.metrics().snapshot();
    info!(
        target: "runtime",
        ticks = tick,
        refreshes = buffer.source().source().refreshes(),
        live_rows = buffer.source().factory().live(),
        rows_created = snap.rows_created,
        rows_disposed = snap.rows_disposed,
        rows_skipped = snap.rows_skipped,
        programs_skipped = snap.programs_skipped,
        cycles = snap.cycles,
        starvations = snap.starvations,
        invalidations = snap.invalidations,
        "shutdown"
    );
    Ok(())
}
