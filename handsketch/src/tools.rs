//! Drawing tool selection: palette color, eraser, brush and eraser sizes.

use tracing::{debug, info};

use crate::sexp::bool_sexp;

/// Built-in palette: red, blue, green, black, yellow, magenta, cyan, orange.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#ff0000", "#0000ff", "#00ff00", "#000000", "#ffff00", "#ff00ff", "#00ffff", "#ffa500",
];

/// Configuration for the drawing tools.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Number of palette entries in use (1-8).
    pub palette_size: usize,
    /// Brush widths in pixels.
    pub brush_sizes: Vec<f64>,
    /// Eraser widths in pixels.
    pub eraser_sizes: Vec<f64>,
    pub default_brush_index: usize,
    pub default_eraser_index: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            palette_size: DEFAULT_PALETTE.len(),
            brush_sizes: vec![2.0, 5.0, 10.0, 15.0, 20.0],
            eraser_sizes: vec![10.0, 20.0, 30.0, 40.0],
            default_brush_index: 1,
            default_eraser_index: 1,
        }
    }
}

/// Current tool selection.
#[derive(Debug, Clone)]
pub struct DrawingTools {
    palette: Vec<&'static str>,
    color_index: usize,
    eraser: bool,
    brush_sizes: Vec<f64>,
    brush_index: usize,
    eraser_sizes: Vec<f64>,
    eraser_index: usize,
}

impl DrawingTools {
    pub fn new(config: &ToolConfig) -> Self {
        let n = config.palette_size.clamp(1, DEFAULT_PALETTE.len());
        let clamp_index = |i: usize, len: usize| i.min(len.saturating_sub(1));
        Self {
            palette: DEFAULT_PALETTE[..n].to_vec(),
            color_index: 0,
            eraser: false,
            brush_index: clamp_index(config.default_brush_index, config.brush_sizes.len()),
            brush_sizes: config.brush_sizes.clone(),
            eraser_index: clamp_index(config.default_eraser_index, config.eraser_sizes.len()),
            eraser_sizes: config.eraser_sizes.clone(),
        }
    }

    pub fn palette(&self) -> &[&'static str] {
        &self.palette
    }

    pub fn color(&self) -> &'static str {
        self.palette[self.color_index]
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Select a palette color.  Leaves eraser mode.  Out-of-range indices
    /// are ignored and return false.
    pub fn set_color(&mut self, index: usize) -> bool {
        if index >= self.palette.len() {
            return false;
        }
        self.color_index = index;
        if self.eraser {
            debug!("Color selected: leaving eraser mode");
        }
        self.eraser = false;
        true
    }

    /// Flip eraser mode, returning the new state.
    pub fn toggle_eraser(&mut self) -> bool {
        self.eraser = !self.eraser;
        info!("Eraser {}", if self.eraser { "on" } else { "off" });
        self.eraser
    }

    pub fn is_eraser(&self) -> bool {
        self.eraser
    }

    pub fn select_brush_size(&mut self, index: usize) -> bool {
        if index >= self.brush_sizes.len() {
            return false;
        }
        self.brush_index = index;
        true
    }

    pub fn select_eraser_size(&mut self, index: usize) -> bool {
        if index >= self.eraser_sizes.len() {
            return false;
        }
        self.eraser_index = index;
        true
    }

    pub fn brush_size(&self) -> f64 {
        self.brush_sizes.get(self.brush_index).copied().unwrap_or(0.0)
    }

    pub fn eraser_size(&self) -> f64 {
        self.eraser_sizes.get(self.eraser_index).copied().unwrap_or(0.0)
    }

    /// Width of the stroke currently being drawn.
    pub fn active_size(&self) -> f64 {
        if self.eraser {
            self.eraser_size()
        } else {
            self.brush_size()
        }
    }

    /// Generate s-expression for status.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:color \"{}\" :color-index {} :eraser {} :brush-size {:.0} :eraser-size {:.0})",
            self.color(),
            self.color_index,
            bool_sexp(self.eraser),
            self.brush_size(),
            self.eraser_size(),
        )
    }
}

impl Default for DrawingTools {
    fn default() -> Self {
        Self::new(&ToolConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tools = DrawingTools::default();
        assert_eq!(tools.palette().len(), 8);
        assert_eq!(tools.color(), "#ff0000");
        assert_eq!(tools.brush_size(), 5.0);
        assert_eq!(tools.eraser_size(), 20.0);
        assert!(!tools.is_eraser());
    }

    #[test]
    fn test_set_color_leaves_eraser() {
        let mut tools = DrawingTools::default();
        assert!(tools.toggle_eraser());
        assert!(tools.set_color(7));
        assert!(!tools.is_eraser());
        assert_eq!(tools.color(), "#ffa500");
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut tools = DrawingTools::default();
        assert!(!tools.set_color(8));
        assert!(!tools.select_brush_size(5));
        assert!(!tools.select_eraser_size(4));
        assert_eq!(tools.color_index(), 0);
        assert_eq!(tools.brush_size(), 5.0);
        assert_eq!(tools.eraser_size(), 20.0);
    }

    #[test]
    fn test_active_size_follows_mode() {
        let mut tools = DrawingTools::default();
        tools.select_brush_size(4);
        tools.select_eraser_size(3);
        assert_eq!(tools.active_size(), 20.0);
        tools.toggle_eraser();
        assert_eq!(tools.active_size(), 40.0);
    }

    #[test]
    fn test_truncated_palette() {
        let tools = DrawingTools::new(&ToolConfig {
            palette_size: 3,
            ..ToolConfig::default()
        });
        assert_eq!(tools.palette(), &["#ff0000", "#0000ff", "#00ff00"]);
    }

    #[test]
    fn test_status_sexp() {
        let sexp = DrawingTools::default().status_sexp();
        assert_eq!(
            sexp,
            "(:color \"#ff0000\" :color-index 0 :eraser nil :brush-size 5 :eraser-size 20)"
        );
        assert!(lexpr::from_str(&sexp).is_ok());
    }
}
