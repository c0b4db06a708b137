mod chart;
mod palette;
mod query;
mod server;

use clap::Parser;
use resvg::usvg;
use std::path::PathBuf;
use tiny_skia::{Pixmap, Transform};

/// A tiny sparkline chart renderer
#[derive(Parser, Debug)]
#[command(name = "sparkie")]
#[command(about = "Render numeric series as sparkline SVG, over HTTP or to a file", long_about = None)]
struct Args {
    /// Comma-separated values to render (one-shot mode)
    #[arg(short, long, value_name = "VALUES")]
    values: Option<String>,

    /// Output file path (extension determines format: .svg or .png); stdout when omitted
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Address to serve charts on, e.g. 127.0.0.1:8080 (server mode)
    #[arg(short, long, value_name = "ADDR")]
    listen: Option<String>,

    /// Path to a palette file (TOML or YAML)
    #[arg(short, long, value_name = "PALETTE")]
    palette: Option<PathBuf>,

    /// Value mapped to full chart height (0 means the default of 100)
    #[arg(long, default_value_t = 0.0)]
    max_value: f64,

    /// Render a line chart instead of bars
    #[arg(long)]
    line: bool,

    /// Fill the area under the line
    #[arg(long)]
    fill: bool,

    /// Render a bar chart (the default when no chart type is given)
    #[arg(long)]
    bar: bool,

    /// Desaturate the chart
    #[arg(long)]
    gray: bool,

    /// Raster scale multiplier for PNG output (e.g. 2.0 for sharper output)
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    // Load palette
    let palette = if let Some(ref palette_path) = args.palette {
        if palette_path.exists() && palette_path.is_file() {
            let content = std::fs::read_to_string(palette_path)
                .map_err(|e| format!("Failed to read palette file: {}", e))?;

            // Try TOML first, then YAML
            if let Ok(palette) = palette::Palette::from_toml(&content) {
                palette
            } else if let Ok(palette) = palette::Palette::from_yaml(&content) {
                palette
            } else {
                return Err("Failed to parse palette file as TOML or YAML".to_string());
            }
        } else {
            return Err(format!("Palette file not found: {}", palette_path.display()));
        }
    } else {
        palette::Palette::default()
    };

    if let Some(ref addr) = args.listen {
        return server::serve(addr, palette);
    }

    let raw_values = args
        .values
        .as_deref()
        .ok_or("Either --values or --listen is required")?;
    let values = query::parse_values(raw_values);

    let options = chart::RenderOptions {
        gray: args.gray,
        max_value: args.max_value,
        line: args.line,
        fill: args.fill,
        bar: args.bar,
    };
    let svg = chart::render_svg(&values, &options, &palette);

    let output = match args.output {
        Some(output) => output,
        None => {
            println!("{}", svg);
            return Ok(());
        }
    };

    let output_ext = output
        .extension()
        .and_then(|e| e.to_str())
        .ok_or("Output file has no extension")?
        .to_ascii_lowercase();

    match output_ext.as_str() {
        "svg" => {
            std::fs::write(&output, svg).map_err(|e| format!("Failed to write SVG: {}", e))?;
            eprintln!("SVG saved to: {}", output.display());
        }
        "png" => {
            let png_data = svg_to_png(&svg, args.png_scale)?;
            std::fs::write(&output, png_data)
                .map_err(|e| format!("Failed to write PNG: {}", e))?;
            eprintln!("PNG saved to: {}", output.display());
        }
        _ => {
            return Err(format!(
                "Unsupported output format: .{} (use .svg or .png)",
                output_ext
            ));
        }
    }

    Ok(())
}

fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, String> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("Invalid --png-scale value: {}", scale));
    }

    // Sparklines carry no text, so no fonts need to be loaded.
    let opts = usvg::Options::default();
    let tree =
        usvg::Tree::from_str(svg, &opts).map_err(|e| format!("Failed to parse SVG: {}", e))?;

    let svg_width = (tree.size().width() * scale).ceil() as u32;
    let svg_height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(svg_width, svg_height).ok_or("Failed to create pixmap")?;
    let transform = Transform::from_scale(scale, scale);

    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| format!("Failed to encode PNG: {}", e))
}
