/// Constants of the heuristic text flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Average glyph width as a fraction of the font size. The wrap budget
    /// is derived from it, not from real glyph metrics.
    ///
    /// Defaults to `0.55`.
    pub char_width_factor: f32,
    /// The wrap budget never drops below this many characters per line.
    ///
    /// Defaults to `10`.
    pub min_line_chars: usize,
    /// Extra vertical gap between consecutive lines, in points.
    ///
    /// Defaults to `5.0`.
    pub line_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            char_width_factor: 0.55,
            min_line_chars: 10,
            line_spacing: 5.0,
        }
    }
}
