use crate::palette::Palette;

const CANVAS_WIDTH: u32 = 90;
const CANVAS_HEIGHT: u32 = 20;

/// Vertical budget for shapes; the canvas keeps a margin below 20 for
/// stroke rounding.
const MAX_HEIGHT: f64 = 15.0;
const COLUMN_WIDTH: f64 = 3.0;
const LINE_WIDTH: f64 = 2.0;
const MAX_VALUES: usize = 100;

const GRAYSCALE_BLOCK: &str = concat!(
    r#"<defs><filter id="gray"><feColorMatrix type="saturate" values="0" /></filter></defs>"#,
    r#"<style type="text/css"><![CDATA[rect, polyline { filter: url(#gray); }]]></style>"#,
);

/// Chart options as requested by the caller, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub gray: bool,
    /// Value mapped to full chart height. Zero or non-finite means
    /// "use the default of 100".
    pub max_value: f64,
    pub line: bool,
    pub fill: bool,
    pub bar: bool,
}

struct ShapeOptions<'a> {
    column_width: f64,
    max_height: f64,
    line_width: f64,
    color: &'a str,
    fill: bool,
    fill_gray: bool,
}

/// Resolve defaults and flag interactions, in order:
/// zero max falls back to 100; neither bar nor line means bar; an explicit
/// bar request clears fill; an explicit line request keeps line on even
/// alongside bar. Note the bar/fill exclusion keys off the *requested* bar
/// flag, so a defaulted bar chart still honors a fill request and draws
/// both shapes. That matches the original service and is left as is.
pub fn normalize_options(options: &RenderOptions) -> RenderOptions {
    let mut normalized = RenderOptions {
        gray: options.gray,
        max_value: if options.max_value.is_finite() && options.max_value != 0.0 {
            options.max_value
        } else {
            100.0
        },
        line: false,
        fill: options.fill,
        bar: false,
    };

    if !options.bar && !options.line {
        normalized.bar = true;
    }
    if options.bar {
        normalized.bar = true;
        normalized.fill = false;
    }
    if options.line {
        normalized.line = true;
    }

    normalized
}

/// Map values to pixel heights, keeping at most the first 100 entries.
/// No clamping here; the shape renderers clamp at the canvas edge.
fn value_heights(values: &[f64], max_value: f64) -> Vec<f64> {
    values
        .iter()
        .take(MAX_VALUES)
        .map(|value| value.floor() / max_value * MAX_HEIGHT)
        .collect()
}

fn render_rects(
    heights: &[f64],
    column_width: f64,
    max_height: f64,
    palette: &Palette,
) -> Vec<String> {
    let mut rects = Vec::with_capacity(heights.len());
    for (idx, &height) in heights.iter().enumerate() {
        let (height, fill) = if height >= max_height {
            // Hit the configured maximum; the darkest band is reserved
            // for exactly this case.
            (max_height, palette.band(3))
        } else if height >= 0.8 * max_height {
            (height, palette.band(2))
        } else if height >= 0.5 * max_height {
            (height, palette.band(1))
        } else {
            (height, palette.band(0))
        };

        rects.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
            idx as f64 * column_width,
            max_height + 1.0 - height,
            column_width,
            height,
            fill,
        ));
    }
    rects
}

fn render_polyline(heights: &[f64], options: &ShapeOptions, palette: &Palette) -> Vec<String> {
    let r = options.line_width / 2.0;
    let mut points = Vec::with_capacity(heights.len() + 3);
    let mut begin: Option<(f64, f64)> = None;
    let mut end: Option<(f64, f64)> = None;

    for (idx, &height) in heights.iter().enumerate() {
        // Keep the stroke inside the canvas.
        let height = height.min(options.max_height - r);
        let x = r + options.column_width * idx as f64;
        let y = options.max_height + r - height;
        points.push(format!("{},{}", x, y));

        if idx == 0 {
            begin = Some((x, y));
        } else if idx == heights.len() - 1 {
            end = Some((x, y));
        }
    }

    if options.fill {
        // Close the polygon down to the baseline and back up to the
        // first point, so the area under the curve gets filled.
        if let (Some((begin_x, begin_y)), Some((end_x, _))) = (begin, end) {
            points.push(format!("{},{}", end_x, options.max_height));
            points.push(format!("{},{}", begin_x, options.max_height));
            points.push(format!("{},{}", begin_x, begin_y));
        }
    }
    let points_value = points.join(" ");

    if options.fill {
        let fill_color = if options.fill_gray {
            palette.gray_fill.as_str()
        } else {
            options.color
        };

        let mut shapes = Vec::with_capacity(2);
        if let (Some((begin_x, _)), Some((end_x, _))) = (begin, end) {
            // The rounded stroke caps leave the bottom corners rounded;
            // a square-capped baseline segment covers them.
            shapes.push(format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" fill="{}" stroke="{}" stroke-width="{}" stroke-linecap="square" stroke-linejoin="square" />"#,
                begin_x,
                options.max_height,
                end_x,
                options.max_height,
                fill_color,
                fill_color,
                options.line_width,
            ));
        }
        shapes.push(format!(
            r#"<polyline fill="{}" stroke-linejoin="round" stroke-linecap="round" stroke="{}" stroke-width="{}" points="{}" />"#,
            fill_color, fill_color, options.line_width, points_value,
        ));
        shapes
    } else {
        vec![format!(
            r#"<polyline fill="none" stroke-linejoin="round" stroke-linecap="round" stroke="{}" stroke-width="{}" points="{}" />"#,
            options.color, options.line_width, points_value,
        )]
    }
}

/// Render a value series as a complete SVG document. Pure and
/// deterministic; identical inputs always produce identical text.
pub fn render_svg(values: &[f64], options: &RenderOptions, palette: &Palette) -> String {
    let options = normalize_options(options);
    let heights = value_heights(values, options.max_value);

    let svg_lines = if options.line {
        render_polyline(
            &heights,
            &ShapeOptions {
                column_width: COLUMN_WIDTH,
                max_height: MAX_HEIGHT,
                line_width: LINE_WIDTH,
                color: &palette.line_color,
                fill: false,
                fill_gray: false,
            },
            palette,
        )
    } else {
        Vec::new()
    };

    let svg_fill = if options.fill {
        render_polyline(
            &heights,
            &ShapeOptions {
                column_width: COLUMN_WIDTH,
                max_height: MAX_HEIGHT,
                line_width: LINE_WIDTH,
                color: &palette.band_0,
                fill: true,
                fill_gray: options.gray,
            },
            palette,
        )
    } else {
        Vec::new()
    };

    let svg_rects = if options.bar {
        render_rects(&heights, COLUMN_WIDTH, MAX_HEIGHT, palette)
    } else {
        Vec::new()
    };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT,
    );
    if options.gray {
        svg.push_str(GRAYSCALE_BLOCK);
    }
    for shape in svg_fill.iter().chain(&svg_rects).chain(&svg_lines) {
        svg.push_str(shape);
    }
    svg.push_str("</svg>");
    svg
}
