//! Four-axis radar ("spider") chart for footprint metrics.
//!
//! Geometry and SVG serialization are separate: [`RadarGeometry`] is a pure
//! function of the metrics and canvas size, and [`render_svg`] only formats
//! it. Rendering the same inputs twice yields byte-identical output.

use crate::dashboard::escape_html;
use crate::models::{FootprintMetrics, METRIC_MAX, METRIC_MIN};
use std::f64::consts::PI;
use std::fmt::Write;

/// Upper bound of the canvas edge in pixels.
pub const MAX_CANVAS_SIZE: u32 = 400;
/// Horizontal padding subtracted from the container width.
pub const CONTAINER_PADDING: u32 = 40;
/// Canvas edge used before the container has been measured.
pub const DEFAULT_CANVAS_SIZE: u32 = 300;
/// Space kept between the outer ring and the canvas edge for labels.
pub const MARGIN: f64 = 50.0;
/// Number of concentric reference rings.
pub const RING_LEVELS: usize = 5;
/// Labels sit at this fraction of the full radius.
pub const LABEL_RADIUS_FACTOR: f64 = 1.25;
/// Canvases narrower than this get smaller labels and markers.
pub const COMPACT_WIDTH: u32 = 350;

/// Dashboard background, used to outline the point markers.
pub const BACKGROUND_COLOR: &str = "#0f172a";

pub const HIGH_ACCENT: &str = "#f87171";
pub const MEDIUM_ACCENT: &str = "#fbbf24";
pub const LOW_ACCENT: &str = "#34d399";

/// Glow RGB channels keyed by accent hex. Only the three exposure accents
/// are known; any other color gets the LOW glow.
const GLOW_TABLE: [(&str, &str); 3] = [
    (HIGH_ACCENT, "248, 113, 113"),
    (MEDIUM_ACCENT, "251, 191, 36"),
    (LOW_ACCENT, "52, 211, 153"),
];
const DEFAULT_GLOW_RGB: &str = "52, 211, 153";

/// Axes in drawing order: clockwise from the top.
pub const AXES: [&str; 4] = ["Professional", "Social", "Activity", "Privacy"];

/// Canvas edge for a container of the given width.
pub fn canvas_size(container_width: u32) -> u32 {
    MAX_CANVAS_SIZE.min(container_width.saturating_sub(CONTAINER_PADDING))
}

/// Shadow and fill colors derived from an accent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glow {
    /// Drop-shadow color at 0.4 alpha.
    pub shadow: String,
    /// Polygon fill at 0.15 alpha.
    pub fill: String,
}

pub fn glow_for_accent(accent: &str) -> Glow {
    let rgb = GLOW_TABLE
        .iter()
        .find(|(hex, _)| *hex == accent)
        .map(|(_, rgb)| *rgb)
        .unwrap_or(DEFAULT_GLOW_RGB);
    Glow {
        shadow: format!("rgba({}, 0.4)", rgb),
        fill: format!("rgba({}, 0.15)", rgb),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    fn polar(distance: f64, angle: f64) -> Self {
        Self {
            x: distance * angle.cos(),
            y: distance * angle.sin(),
        }
    }

    pub fn distance_from_center(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// One axis of the chart, relative to the chart center.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGeometry {
    pub label: &'static str,
    /// Angle in radians; -π/2 is straight up.
    pub angle: f64,
    /// Metric value after clamping to [0, 100].
    pub value: f64,
    /// Where the data point sits.
    pub point: Point,
    /// End of the spoke at 100%.
    pub spoke_end: Point,
    /// Where the label text is anchored.
    pub label_anchor: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarGeometry {
    pub size: u32,
    pub radius: f64,
    /// Ring radii, innermost first.
    pub rings: Vec<f64>,
    pub axes: Vec<AxisGeometry>,
}

impl RadarGeometry {
    /// Lays out the chart on a square canvas of `size` pixels.
    ///
    /// Values outside [0, 100] are clamped so a stray model output cannot
    /// draw past the outer ring.
    pub fn new(metrics: &FootprintMetrics, size: u32) -> Self {
        let width = size as f64;
        let radius = (width / 2.0 - MARGIN).max(0.0);
        let scale = |v: f64| (v - METRIC_MIN) / (METRIC_MAX - METRIC_MIN) * radius;
        let angle_slice = 2.0 * PI / AXES.len() as f64;

        let values = [
            metrics.professional_density,
            metrics.social_connectivity,
            metrics.activity_frequency,
            metrics.privacy_resilience,
        ];

        let axes = AXES
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (&label, raw))| {
                let value = clamp_metric(raw);
                let angle = angle_slice * i as f64 - PI / 2.0;
                AxisGeometry {
                    label,
                    angle,
                    value,
                    point: Point::polar(scale(value), angle),
                    spoke_end: Point::polar(scale(METRIC_MAX), angle),
                    label_anchor: Point::polar(scale(METRIC_MAX) * LABEL_RADIUS_FACTOR, angle),
                }
            })
            .collect();

        let rings = (1..=RING_LEVELS)
            .map(|level| radius * level as f64 / RING_LEVELS as f64)
            .collect();

        Self {
            size,
            radius,
            rings,
            axes,
        }
    }

    pub fn is_compact(&self) -> bool {
        self.size < COMPACT_WIDTH
    }

    pub fn data_points(&self) -> Vec<Point> {
        self.axes.iter().map(|a| a.point).collect()
    }
}

fn clamp_metric(value: f64) -> f64 {
    if value.is_nan() {
        METRIC_MIN
    } else {
        value.clamp(METRIC_MIN, METRIC_MAX)
    }
}

/// Two decimals, with negative zero folded into zero.
fn coord(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0.00".to_string()
    } else {
        format!("{:.2}", rounded)
    }
}

/// Renders the chart as a standalone SVG document.
pub fn render_svg(geometry: &RadarGeometry, accent: &str) -> String {
    let size = geometry.size;
    let half = coord(size as f64 / 2.0);
    let glow = glow_for_accent(accent);
    let accent = escape_html(accent);
    let (font_size, marker_radius) = if geometry.is_compact() {
        ("10px", 4)
    } else {
        ("11px", 5)
    };

    let mut svg = String::with_capacity(2048);
    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}" role="img" aria-label="Presence metrics radar chart">"#
    );
    let _ = write!(svg, r#"<g transform="translate({half},{half})">"#);

    for ring in &geometry.rings {
        let _ = write!(
            svg,
            r#"<circle class="ring" r="{}" fill="none" stroke="rgba(255, 255, 255, 0.05)" stroke-dasharray="4,4"/>"#,
            coord(*ring)
        );
    }

    for axis in &geometry.axes {
        let _ = write!(
            svg,
            r#"<g class="axis"><line x1="0" y1="0" x2="{}" y2="{}" stroke="rgba(255, 255, 255, 0.15)"/>"#,
            coord(axis.spoke_end.x),
            coord(axis.spoke_end.y)
        );
        let _ = write!(
            svg,
            r##"<text class="legend" x="{}" y="{}" dy="0.35em" text-anchor="middle" fill="#94a3b8" font-size="{}" font-weight="700" style="text-transform: uppercase; letter-spacing: 0.1em">{}</text></g>"##,
            coord(axis.label_anchor.x),
            coord(axis.label_anchor.y),
            font_size,
            axis.label
        );
    }

    let mut path = String::new();
    for (i, axis) in geometry.axes.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(
            path,
            "{}{},{}",
            cmd,
            coord(axis.point.x),
            coord(axis.point.y)
        );
    }
    path.push('Z');

    let _ = write!(
        svg,
        r#"<path class="radar-area" d="{}" fill="{}" stroke="{}" stroke-width="2.5px" style="filter: drop-shadow(0px 0px 8px {})"/>"#,
        path, glow.fill, accent, glow.shadow
    );

    for axis in &geometry.axes {
        let _ = write!(
            svg,
            r#"<circle class="radar-point" r="{}" cx="{}" cy="{}" fill="{}" stroke="{}" stroke-width="2px"/>"#,
            marker_radius,
            coord(axis.point.x),
            coord(axis.point.y),
            accent,
            BACKGROUND_COLOR
        );
    }

    svg.push_str("</g></svg>");
    svg
}

/// Convenience wrapper: layout for `size` and serialize.
pub fn render(metrics: &FootprintMetrics, accent: &str, size: u32) -> String {
    render_svg(&RadarGeometry::new(metrics, size), accent)
}
