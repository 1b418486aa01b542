//! Presentation attributes carried by parsed shapes.

/// Fill rule for determining the interior of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// A point is inside if the winding number is non-zero.
    #[default]
    NonZero,
    /// A point is inside if the number of crossings is odd.
    EvenOdd,
}

impl FillRule {
    /// Parse an SVG `fill-rule` value. Unknown values fall back to non-zero.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "evenodd" => FillRule::EvenOdd,
            "nonzero" | "" => FillRule::NonZero,
            other => {
                tracing::warn!("fill-rule \"{}\" is not implemented, using nonzero", other);
                FillRule::NonZero
            }
        }
    }
}

/// Line cap style for stroke endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "round" => LineCap::Round,
            "square" => LineCap::Square,
            _ => LineCap::Butt,
        }
    }
}

/// Line join style for stroke corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner, replaced by a bevel past the miter limit.
    #[default]
    Miter,
    /// Sharp corner, clipped at the miter limit.
    MiterClip,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "round" => LineJoin::Round,
            "bevel" => LineJoin::Bevel,
            "miter-clip" => LineJoin::MiterClip,
            _ => LineJoin::Miter,
        }
    }
}

/// Cascaded presentation style of an SVG node.
///
/// Paints are kept as written (`"none"`, `"#f00"`, `"url(#g)"`). Opacities are
/// clamped to [0, 1] and widths are non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub fill: String,
    pub fill_opacity: f32,
    pub fill_rule: String,
    pub opacity: f32,
    pub stroke: String,
    pub stroke_opacity: f32,
    pub stroke_width: f32,
    pub stroke_line_join: String,
    pub stroke_line_cap: String,
    pub stroke_miter_limit: f32,
    pub visibility: String,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: "#000".to_string(),
            fill_opacity: 1.0,
            fill_rule: "nonzero".to_string(),
            opacity: 1.0,
            stroke: "none".to_string(),
            stroke_opacity: 1.0,
            stroke_width: 1.0,
            stroke_line_join: "miter".to_string(),
            stroke_line_cap: "butt".to_string(),
            stroke_miter_limit: 4.0,
            visibility: "visible".to_string(),
        }
    }
}

impl NodeStyle {
    pub fn fill_rule(&self) -> FillRule {
        FillRule::parse(&self.fill_rule)
    }

    pub fn has_fill(&self) -> bool {
        !self.fill.is_empty() && self.fill != "none"
    }

    pub fn has_stroke(&self) -> bool {
        !self.stroke.is_empty() && self.stroke != "none"
    }

    pub fn is_visible(&self) -> bool {
        self.visibility != "hidden" && self.visibility != "collapse"
    }
}
