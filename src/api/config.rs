use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{BranchPolicy, DEFAULT_HIT_HALF_BOX_PX, GridRange, TooltipTemplate};
use crate::core::tooltip::DEFAULT_TOOLTIP_TEMPLATE;
use crate::error::{GraphError, GraphResult};
use crate::render::Color;

/// Colours used for the coordinate grid.
///
/// Roles are named by what they stroke. `axes` colours the two axis lines
/// and their ticks, and `reference_lines` colours the unit grid. Override
/// files written against the older `colors.axes` key, which meant the
/// reference lines (`#E4EDF0`), should move that value to
/// `reference_lines`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridColors {
    /// Axis lines and tick marks.
    #[serde(default = "default_axes_color")]
    pub axes: Color,
    /// Unit reference lines behind the curves.
    #[serde(default = "default_reference_lines_color")]
    pub reference_lines: Color,
    #[serde(default = "default_text_color")]
    pub text: Color,
}

impl Default for GridColors {
    fn default() -> Self {
        Self {
            axes: default_axes_color(),
            reference_lines: default_reference_lines_color(),
            text: default_text_color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    #[serde(default = "default_true")]
    pub enable: bool,
    /// Half-extent of the square hover hit box.
    #[serde(default = "default_hit_box_px")]
    pub hit_box_px: f64,
    #[serde(default = "default_tooltip_template")]
    pub template: String,
    #[serde(default = "default_true")]
    pub round_edges: bool,
    /// Maximum width of one tooltip text line.
    #[serde(default = "default_tooltip_width")]
    pub width: f64,
    #[serde(default = "default_tooltip_font_color")]
    pub font_color: Color,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            enable: true,
            hit_box_px: default_hit_box_px(),
            template: default_tooltip_template(),
            round_edges: true,
            width: default_tooltip_width(),
            font_color: default_tooltip_font_color(),
        }
    }
}

/// Public session configuration.
///
/// Hosts usually start from the defaults and override a few keys through
/// [`GraphConfig::from_overrides`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub grid_range: GridRange,
    #[serde(default = "default_true")]
    pub reference_lines: bool,
    /// Draw tick labels.
    #[serde(default = "default_true")]
    pub text: bool,
    #[serde(default)]
    pub grid_colors: GridColors,
    #[serde(default)]
    pub tooltip: TooltipConfig,
    #[serde(default = "default_true")]
    pub random_colors: bool,
    /// Seed for palette picks when `random_colors` is on; entropy when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default = "default_color_palette")]
    pub color_palette: Vec<Color>,
    #[serde(default = "default_true")]
    pub pan_enable: bool,
    #[serde(default = "default_true")]
    pub zoom_enable: bool,
    #[serde(default = "default_true")]
    pub change_on_resize: bool,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_redraw_interval_ms")]
    pub redraw_interval_ms: u64,
    #[serde(default)]
    pub branch_policy: BranchPolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            grid_range: GridRange::default(),
            reference_lines: true,
            text: true,
            grid_colors: GridColors::default(),
            tooltip: TooltipConfig::default(),
            random_colors: true,
            random_seed: None,
            color_palette: default_color_palette(),
            pan_enable: true,
            zoom_enable: true,
            change_on_resize: true,
            font_family: default_font_family(),
            redraw_interval_ms: default_redraw_interval_ms(),
            branch_policy: BranchPolicy::default(),
        }
    }
}

impl GraphConfig {
    /// Deep-merges `overrides` over the defaults and validates the result.
    ///
    /// Objects merge key by key; scalars and arrays replace the default value.
    pub fn from_overrides(overrides: &Value) -> GraphResult<Self> {
        let mut merged = serde_json::to_value(Self::default()).map_err(|e| {
            GraphError::Configuration(format!("failed to serialize default config: {e}"))
        })?;
        merge_json(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged)
            .map_err(|e| GraphError::Configuration(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [`GraphConfig::from_overrides`] with overrides given as JSON text.
    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        let overrides: Value = serde_json::from_str(input)
            .map_err(|e| GraphError::Configuration(format!("failed to parse config json: {e}")))?;
        Self::from_overrides(&overrides)
    }

    pub fn to_json_pretty(&self) -> GraphResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GraphError::Configuration(format!("failed to serialize config: {e}")))
    }

    #[must_use]
    pub fn with_grid_range(mut self, grid_range: GridRange) -> Self {
        self.grid_range = grid_range;
        self
    }

    #[must_use]
    pub fn with_branch_policy(mut self, policy: BranchPolicy) -> Self {
        self.branch_policy = policy;
        self
    }

    #[must_use]
    pub fn with_random_colors(mut self, random_colors: bool, seed: Option<u64>) -> Self {
        self.random_colors = random_colors;
        self.random_seed = seed;
        self
    }

    #[must_use]
    pub fn with_redraw_interval_ms(mut self, interval_ms: u64) -> Self {
        self.redraw_interval_ms = interval_ms;
        self
    }

    pub fn validate(&self) -> GraphResult<()> {
        self.grid_range.validate()?;
        if self.color_palette.is_empty() {
            return Err(GraphError::Configuration(
                "color_palette must contain at least one color".to_owned(),
            ));
        }
        for color in &self.color_palette {
            color.validate()?;
        }
        for color in [
            self.grid_colors.axes,
            self.grid_colors.reference_lines,
            self.grid_colors.text,
            self.tooltip.font_color,
        ] {
            color.validate()?;
        }
        if !self.tooltip.hit_box_px.is_finite() || self.tooltip.hit_box_px <= 0.0 {
            return Err(GraphError::Configuration(
                "tooltip.hit_box_px must be finite and > 0".to_owned(),
            ));
        }
        if !self.tooltip.width.is_finite() || self.tooltip.width <= 0.0 {
            return Err(GraphError::Configuration(
                "tooltip.width must be finite and > 0".to_owned(),
            ));
        }
        if self.font_family.trim().is_empty() {
            return Err(GraphError::Configuration(
                "font_family must not be empty".to_owned(),
            ));
        }
        TooltipTemplate::parse(&self.tooltip.template)?;
        Ok(())
    }
}

/// Recursive JSON merge. `null` in the overrides keeps the default.
fn merge_json(target: &mut Value, overrides: &Value) {
    match (target, overrides) {
        (Value::Object(target), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match target.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (target, value) => *target = value.clone(),
    }
}

fn default_true() -> bool {
    true
}

fn default_axes_color() -> Color {
    Color::rgb8(0x7f, 0x8c, 0x8d)
}

fn default_reference_lines_color() -> Color {
    Color::rgb8(0xe4, 0xed, 0xf0)
}

fn default_text_color() -> Color {
    Color::rgb8(0x7f, 0x8c, 0x8d)
}

fn default_hit_box_px() -> f64 {
    DEFAULT_HIT_HALF_BOX_PX
}

fn default_tooltip_template() -> String {
    DEFAULT_TOOLTIP_TEMPLATE.to_owned()
}

fn default_tooltip_width() -> f64 {
    140.0
}

fn default_tooltip_font_color() -> Color {
    Color::rgb8(0xe3, 0xf2, 0xfd)
}

fn default_font_family() -> String {
    "Arial".to_owned()
}

fn default_redraw_interval_ms() -> u64 {
    33
}

fn default_color_palette() -> Vec<Color> {
    [
        (26, 188, 156),
        (46, 204, 113),
        (52, 152, 219),
        (155, 89, 182),
        (52, 73, 94),
        (22, 160, 133),
        (39, 174, 96),
        (41, 128, 185),
        (142, 68, 173),
        (44, 62, 80),
        (241, 196, 15),
        (230, 126, 34),
        (231, 76, 60),
        (243, 156, 18),
        (211, 84, 0),
        (192, 57, 43),
    ]
    .into_iter()
    .map(|(r, g, b)| Color::rgb8(r, g, b))
    .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{GraphConfig, merge_json};
    use crate::core::BranchPolicy;
    use crate::render::Color;

    #[test]
    fn defaults_validate() {
        let config = GraphConfig::default();
        config.validate().expect("default config is valid");
        assert_eq!(config.color_palette.len(), 16);
        assert_eq!(config.redraw_interval_ms, 33);
    }

    #[test]
    fn nested_objects_merge_and_scalars_replace() {
        let mut target = json!({"a": {"b": 1, "c": 2}, "d": [1, 2]});
        merge_json(&mut target, &json!({"a": {"c": 3}, "d": [9], "e": null}));
        assert_eq!(target, json!({"a": {"b": 1, "c": 3}, "d": [9], "e": null}));
    }

    #[test]
    fn reference_line_colour_is_separate_from_axes() {
        let config = GraphConfig::from_overrides(&json!({
            "grid_colors": {"reference_lines": "#ff0000"}
        }))
        .expect("config");
        assert_eq!(config.grid_colors.reference_lines, Color::rgb8(0xff, 0, 0));
        assert_eq!(config.grid_colors.axes, Color::rgb8(0x7f, 0x8c, 0x8d));
    }

    #[test]
    fn partial_overrides_keep_sibling_defaults() {
        let config = GraphConfig::from_overrides(&json!({
            "grid_range": {"x_min": -5.0, "x_max": 5.0},
            "tooltip": {"enable": false},
            "grid_colors": {"axes": "rgb(255, 0, 0)"},
            "branch_policy": "resume",
            "not_an_option": 42
        }))
        .expect("merged config");

        assert_eq!(config.grid_range.x_min, -5.0);
        assert_eq!(config.grid_range.y_max, 10.0);
        assert!(!config.tooltip.enable);
        assert!(config.tooltip.round_edges);
        assert_eq!(config.grid_colors.axes, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(config.branch_policy, BranchPolicy::Resume);
    }

    #[test]
    fn palette_overrides_replace_the_whole_array() {
        let config = GraphConfig::from_json_str(r##"{"color_palette": ["#000000"]}"##)
            .expect("config");
        assert_eq!(config.color_palette, vec![Color::rgb(0.0, 0.0, 0.0)]);
    }

    #[test]
    fn invalid_overrides_are_configuration_errors() {
        assert!(GraphConfig::from_overrides(&json!({"grid_range": {"x_max": -20.0}})).is_err());
        assert!(GraphConfig::from_overrides(&json!({"color_palette": []})).is_err());
        assert!(GraphConfig::from_overrides(&json!({"tooltip": {"template": "<z>"}})).is_err());
        assert!(GraphConfig::from_json_str("{not json").is_err());
    }
}
