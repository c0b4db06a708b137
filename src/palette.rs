use serde::{Deserialize, Serialize};

// GitHub contribution-graph greens, light to dark. The darkest band is
// reserved for values that hit the configured maximum.
const BAND_0: &str = "#C6E48B";
const BAND_1: &str = "#7BC96F";
const BAND_2: &str = "#239A3B";
const BAND_3: &str = "#196127";

const LINE_COLOR: &str = "#196127";
const GRAY_FILL: &str = "#d9d9d9";

/// Chart colors, loaded once at startup and shared by every render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_band_0")]
    pub band_0: String,
    #[serde(default = "default_band_1")]
    pub band_1: String,
    #[serde(default = "default_band_2")]
    pub band_2: String,
    #[serde(default = "default_band_3")]
    pub band_3: String,

    /// Stroke color for line charts.
    #[serde(default = "default_line_color")]
    pub line_color: String,
    /// Fill color substituted when grayscale output is requested.
    #[serde(default = "default_gray_fill")]
    pub gray_fill: String,
}

fn default_band_0() -> String {
    BAND_0.to_string()
}
fn default_band_1() -> String {
    BAND_1.to_string()
}
fn default_band_2() -> String {
    BAND_2.to_string()
}
fn default_band_3() -> String {
    BAND_3.to_string()
}
fn default_line_color() -> String {
    LINE_COLOR.to_string()
}
fn default_gray_fill() -> String {
    GRAY_FILL.to_string()
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            band_0: default_band_0(),
            band_1: default_band_1(),
            band_2: default_band_2(),
            band_3: default_band_3(),
            line_color: default_line_color(),
            gray_fill: default_gray_fill(),
        }
    }
}

impl Palette {
    /// Band color for a height in the ordinary (non-overflow) range.
    pub fn band(&self, index: usize) -> &str {
        match index {
            0 => &self.band_0,
            1 => &self.band_1,
            2 => &self.band_2,
            _ => &self.band_3,
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse palette TOML: {}", e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("Failed to parse palette YAML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::Palette;

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let palette = Palette::from_toml("band_3 = \"#000000\"").expect("partial palette");
        assert_eq!(palette.band_3, "#000000");
        assert_eq!(palette.band_0, Palette::default().band_0);
        assert_eq!(palette.line_color, Palette::default().line_color);
    }

    #[test]
    fn yaml_palette_parses() {
        let palette = Palette::from_yaml("line_color: \"#ff0000\"\ngray_fill: \"#cccccc\"")
            .expect("yaml palette");
        assert_eq!(palette.line_color, "#ff0000");
        assert_eq!(palette.gray_fill, "#cccccc");
    }

    #[test]
    fn band_lookup_saturates_at_darkest() {
        let palette = Palette::default();
        assert_eq!(palette.band(0), "#C6E48B");
        assert_eq!(palette.band(3), "#196127");
        assert_eq!(palette.band(9), "#196127");
    }
}
