//! Guide configuration: fixed layout table, optional TOML overrides, and the
//! explicit render context.
//!
//! The layout constants (column widths, arrow widths, bevel margin, line
//! height) ship as compile-time defaults. `prevue.toml` (or an override path
//! supplied by the binary) may replace any of them; absent fields keep their
//! defaults and unknown fields are ignored so the file can evolve without
//! warnings.
//!
//! Drawable size and scale are NOT global state. Callers build a
//! `RenderContext` per viewport and call `Config::apply_context`, which
//! produces the scaled `EffectiveLayout` consumed by span resolution and the
//! row stream. A viewport change goes through `recompute_with_context`; a
//! `Some` result means the layout moved and buffered rows must be invalidated.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// Fixed pixel constants of the guide grid (unscaled).
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutTable {
    pub standard_column_width: u32,
    /// Last visible column is wider to leave room for the trailing arrow art.
    pub last_column_width: u32,
    pub single_arrow_width: u32,
    pub double_arrow_width: u32,
    pub bevel_margin: u32,
    pub line_height: u32,
    pub channel_column_width: u32,
    pub row_padding: u32,
}

impl Default for LayoutTable {
    fn default() -> Self {
        Self {
            standard_column_width: 172,
            last_column_width: 208,
            single_arrow_width: 14,
            double_arrow_width: 24,
            bevel_margin: 4,
            line_height: 20,
            channel_column_width: 120,
            row_padding: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct WrapTable {
    /// Number of leading wrapped lines that give up width to arrow margins.
    pub margined_lines: usize,
    pub single_program_max_lines: usize,
    pub multi_program_max_lines: usize,
}

impl Default for WrapTable {
    fn default() -> Self {
        Self {
            margined_lines: 2,
            single_program_max_lines: 6,
            multi_program_max_lines: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ScrollTable {
    pub pixels_per_tick: f32,
    pub tick_millis: u64,
}

impl Default for ScrollTable {
    fn default() -> Self {
        Self {
            pixels_per_tick: 1.0,
            tick_millis: 16,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub layout: LayoutTable,
    #[serde(default)]
    pub wrap: WrapTable,
    #[serde(default)]
    pub scroll: ScrollTable,
}

/// Drawable surface handed in by the tick driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub scale: f32,
}

impl RenderContext {
    pub fn new(viewport_width: u32, viewport_height: u32, scale: f32) -> Self {
        Self {
            viewport_width,
            viewport_height,
            scale,
        }
    }

    pub fn unscaled(viewport_width: u32, viewport_height: u32) -> Self {
        Self::new(viewport_width, viewport_height, 1.0)
    }

    /// `scale`, or 1.0 when it is not a positive finite number.
    pub fn effective_scale(&self) -> f32 {
        if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        }
    }
}

/// Scaled layout for one viewport. All widths in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveLayout {
    pub standard_column_width: u32,
    pub last_column_width: u32,
    pub single_arrow_width: u32,
    pub double_arrow_width: u32,
    pub bevel_margin: u32,
    pub line_height: u32,
    pub channel_column_width: u32,
    pub row_padding: u32,
    pub column_count: usize,
    pub viewport_height: u32,
}

impl EffectiveLayout {
    /// Total width of the half-hour columns (excludes the channel label column).
    pub fn grid_width(&self) -> u32 {
        let standard = self.column_count.saturating_sub(1) as u32;
        standard * self.standard_column_width + self.last_column_width
    }

    pub fn row_width(&self) -> u32 {
        self.channel_column_width + self.grid_width()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub effective: Option<EffectiveLayout>,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("prevue.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("prevue").join("prevue.toml");
    }
    PathBuf::from("prevue.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            file,
            effective: None,
        }),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

fn scaled(value: u32, scale: f32) -> u32 {
    (value as f32 * scale).round() as u32
}

impl Config {
    pub fn layout(&self) -> &LayoutTable {
        &self.file.layout
    }

    pub fn wrap(&self) -> &WrapTable {
        &self.file.wrap
    }

    pub fn scroll(&self) -> &ScrollTable {
        &self.file.scroll
    }

    /// Scale the layout table for `ctx` and derive the visible column count.
    /// `column_count` counts every visible column, the wider last one included.
    pub fn apply_context(&mut self, ctx: RenderContext) -> EffectiveLayout {
        let t = &self.file.layout;
        let scale = ctx.effective_scale();
        let standard = scaled(t.standard_column_width, scale).max(1);
        let channel = scaled(t.channel_column_width, scale);
        let available = ctx.viewport_width.saturating_sub(channel);
        let raw_columns = (available / standard) as usize;
        let column_count = raw_columns.max(1);
        if raw_columns == 0 {
            info!(
                target: "config",
                viewport_width = ctx.viewport_width,
                channel_column_width = channel,
                standard_column_width = standard,
                "column_count_clamped"
            );
        }
        let layout = EffectiveLayout {
            standard_column_width: standard,
            last_column_width: scaled(t.last_column_width, scale),
            single_arrow_width: scaled(t.single_arrow_width, scale),
            double_arrow_width: scaled(t.double_arrow_width, scale),
            bevel_margin: scaled(t.bevel_margin, scale),
            line_height: scaled(t.line_height, scale).max(1),
            channel_column_width: channel,
            row_padding: scaled(t.row_padding, scale),
            column_count,
            viewport_height: ctx.viewport_height,
        };
        self.effective = Some(layout);
        layout
    }

    /// Recompute on a viewport or scale change. Returns `Some(layout)` when the
    /// effective layout differs from the previous one, else `None`.
    pub fn recompute_with_context(&mut self, ctx: RenderContext) -> Option<EffectiveLayout> {
        let prev = self.effective;
        let current = self.apply_context(ctx);
        if prev != Some(current) {
            Some(current)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let inner = Arc::new(Mutex::new(Vec::new()));
            let buf = Arc::clone(&inner);
            (Self { inner }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.layout().standard_column_width, 172);
        assert_eq!(cfg.layout().last_column_width, 208);
        assert_eq!(cfg.wrap().margined_lines, 2);
        assert_eq!(cfg.wrap().single_program_max_lines, 6);
        assert_eq!(cfg.wrap().multi_program_max_lines, 2);
    }

    #[test]
    fn parses_partial_layout_override() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[layout]\nbevel_margin = 6\nsingle_arrow_width = 10\n[wrap]\nmargined_lines = 1\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.layout().bevel_margin, 6);
        assert_eq!(cfg.layout().single_arrow_width, 10);
        // untouched fields keep their defaults
        assert_eq!(cfg.layout().standard_column_width, 172);
        assert_eq!(cfg.wrap().margined_lines, 1);
        assert_eq!(cfg.wrap().multi_program_max_lines, 2);
        assert!(cfg.raw.is_some());
    }

    #[test]
    fn parse_error_falls_back_to_defaults_and_warns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[layout\nbroken = ").unwrap();
        let path = tmp.path().to_path_buf();
        let mut cfg = None;
        let log = capture(|| cfg = Some(load_from(Some(path)).unwrap()));
        let cfg = cfg.unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.layout(), &LayoutTable::default());
        assert!(log.contains("WARN config:"));
        assert!(log.contains("config_parse_failed"));
    }

    #[test]
    fn column_count_derived_from_viewport_width() {
        let mut cfg = Config::default();
        // 120 label + 3 * 172 = 636
        let eff = cfg.apply_context(RenderContext::unscaled(640, 480));
        assert_eq!(eff.column_count, 3);
        assert_eq!(eff.grid_width(), 172 * 2 + 208);
        assert_eq!(eff.row_width(), 120 + 172 * 2 + 208);
        assert_eq!(eff.viewport_height, 480);
    }

    #[test]
    fn scale_multiplies_every_pixel_constant() {
        let mut cfg = Config::default();
        let eff = cfg.apply_context(RenderContext::new(1280, 960, 2.0));
        assert_eq!(eff.standard_column_width, 344);
        assert_eq!(eff.last_column_width, 416);
        assert_eq!(eff.bevel_margin, 8);
        assert_eq!(eff.line_height, 40);
        assert_eq!(eff.column_count, 3);
    }

    #[test]
    fn invalid_scale_is_treated_as_unscaled() {
        let mut cfg = Config::default();
        let eff = cfg.apply_context(RenderContext::new(640, 480, f32::NAN));
        assert_eq!(eff.standard_column_width, 172);
    }

    #[test]
    fn narrow_viewport_clamps_to_one_column_and_logs() {
        let mut cfg = Config::default();
        let mut eff = None;
        let narrow = RenderContext::unscaled(100, 480);
        let log = capture(|| eff = Some(cfg.apply_context(narrow)));
        assert_eq!(eff.unwrap().column_count, 1);
        assert!(log.contains("INFO config:"));
        assert!(log.contains("column_count_clamped"));
    }

    #[test]
    fn recompute_reports_only_changes() {
        let mut cfg = Config::default();
        let ctx = RenderContext::unscaled(640, 480);
        assert!(cfg.recompute_with_context(ctx).is_some());
        assert_eq!(cfg.recompute_with_context(ctx), None);
        let changed = cfg.recompute_with_context(RenderContext::unscaled(900, 480));
        assert_eq!(changed.map(|l| l.column_count), Some(4));
    }
}
