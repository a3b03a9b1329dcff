//! Data-driven tooltip text templates.
//!
//! A template such as `P(<x(1)>, <y(1)>)<br>f(x) = <formula>` is parsed once
//! into literal and field tokens and then interpreted against the hovered
//! point. Lines are separated by `<br>`.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

pub const DEFAULT_TOOLTIP_TEMPLATE: &str = "P(<x(1)>, <y(1)>)<br>f(x) = <formula>";

const LINE_BREAK: &str = "<br>";
const MAX_PRECISION: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateToken {
    Literal(String),
    /// Logical x of the hovered point, rounded to `precision` decimals when set.
    X { precision: Option<u32> },
    Y { precision: Option<u32> },
    Formula,
}

/// Values a template can reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipFields<'a> {
    pub x: f64,
    pub y: f64,
    pub formula: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipTemplate {
    lines: Vec<Vec<TemplateToken>>,
}

impl Default for TooltipTemplate {
    fn default() -> Self {
        // The built-in template is known to parse.
        Self::parse(DEFAULT_TOOLTIP_TEMPLATE).unwrap_or(Self { lines: Vec::new() })
    }
}

impl TooltipTemplate {
    pub fn parse(source: &str) -> GraphResult<Self> {
        let lines = source
            .split(LINE_BREAK)
            .map(parse_line)
            .collect::<GraphResult<Vec<_>>>()?;
        Ok(Self { lines })
    }

    #[must_use]
    pub fn lines(&self) -> &[Vec<TemplateToken>] {
        &self.lines
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Produces one string per template line.
    #[must_use]
    pub fn render(&self, fields: &TooltipFields<'_>) -> Vec<String> {
        self.lines
            .iter()
            .map(|tokens| {
                let mut line = String::new();
                for token in tokens {
                    match token {
                        TemplateToken::Literal(text) => line.push_str(text),
                        TemplateToken::X { precision } => {
                            let _ = write!(line, "{}", round_decimal(fields.x, *precision));
                        }
                        TemplateToken::Y { precision } => {
                            let _ = write!(line, "{}", round_decimal(fields.y, *precision));
                        }
                        TemplateToken::Formula => line.push_str(fields.formula),
                    }
                }
                line
            })
            .collect()
    }
}

fn parse_line(line: &str) -> GraphResult<Vec<TemplateToken>> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find('<') {
        if open > 0 {
            tokens.push(TemplateToken::Literal(rest[..open].to_owned()));
        }
        let after_open = &rest[open + 1..];
        let close = after_open.find('>').ok_or_else(|| {
            GraphError::Configuration(format!("tooltip template field is not closed in `{line}`"))
        })?;
        tokens.push(parse_field(after_open[..close].trim())?);
        rest = &after_open[close + 1..];
    }
    if !rest.is_empty() {
        tokens.push(TemplateToken::Literal(rest.to_owned()));
    }

    Ok(tokens)
}

fn parse_field(field: &str) -> GraphResult<TemplateToken> {
    if field == "formula" {
        return Ok(TemplateToken::Formula);
    }

    let (name, precision) = match field.split_once('(') {
        Some((name, args)) => {
            let digits = args.strip_suffix(')').ok_or_else(|| {
                GraphError::Configuration(format!("tooltip field `{field}` is missing `)`"))
            })?;
            let precision = digits.trim().parse::<u32>().map_err(|_| {
                GraphError::Configuration(format!(
                    "tooltip field `{field}` needs a non-negative integer precision"
                ))
            })?;
            if precision > MAX_PRECISION {
                return Err(GraphError::Configuration(format!(
                    "tooltip field `{field}` precision exceeds {MAX_PRECISION}"
                )));
            }
            (name.trim(), Some(precision))
        }
        None => (field, None),
    };

    match name {
        "x" => Ok(TemplateToken::X { precision }),
        "y" => Ok(TemplateToken::Y { precision }),
        _ => Err(GraphError::Configuration(format!(
            "unknown tooltip field `{field}`; expected x(precision), y(precision) or formula"
        ))),
    }
}

/// Rounds half away from zero to `precision` decimals.
#[must_use]
pub fn round_decimal(value: f64, precision: Option<u32>) -> f64 {
    let Some(precision) = precision else {
        return value;
    };
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    // Avoid printing "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}
