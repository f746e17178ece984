use crate::domain::model::{LineSet, Segment, StrokeWidth};
use crate::utils::error::{Result, StickbugError};

const STROKE_WIDTH_KEY: &str = "stroke-width";

/// 解析 `key:value;key:value` 形式的 style 宣告
pub fn parse_style(style: &str) -> Vec<(&str, &str)> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

/// Drops the unit suffix (`px`, `pt`, `mm`, `em`, `%`...) whatever it is.
pub fn strip_unit(value: &str) -> &str {
    value
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .trim_end()
}

pub fn parse_length(value: &str) -> Result<f64> {
    let number = strip_unit(value);
    match number.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed > 0.0 => Ok(parsed),
        _ => Err(StickbugError::MalformedStrokeWidth {
            value: value.to_string(),
        }),
    }
}

/// 取出 style 中的 stroke-width；沒有宣告時使用設定的預設值
pub fn stroke_width_from_style(style: &str, default: Option<StrokeWidth>) -> Result<StrokeWidth> {
    let declared = parse_style(style)
        .into_iter()
        .find(|(key, _)| *key == STROKE_WIDTH_KEY)
        .map(|(_, value)| value);

    match (declared, default) {
        (Some(value), _) => parse_length(value).map(StrokeWidth),
        (None, Some(fallback)) => {
            tracing::debug!(
                "No stroke-width in style '{}', using default {}",
                style,
                fallback.value()
            );
            Ok(fallback)
        }
        (None, None) => Err(StickbugError::MissingStrokeWidth {
            style: style.to_string(),
        }),
    }
}

/// Splits the thickest item (first one on ties) from the rest.
///
/// Fails when every width is equal, since nothing tells the wall apart.
pub fn partition_wall<T>(items: Vec<(T, StrokeWidth)>) -> Result<(T, Vec<T>)> {
    if items.is_empty() {
        return Err(StickbugError::EmptyInput {
            context: "no lines to classify".to_string(),
        });
    }

    let widths: Vec<f64> = items.iter().map(|(_, width)| width.value()).collect();
    let min_width = widths.iter().copied().fold(f64::INFINITY, f64::min);
    let max_width = widths.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min_width == max_width {
        return Err(StickbugError::AmbiguousWallStick { width: max_width });
    }

    let wall_index = widths
        .iter()
        .position(|width| *width == max_width)
        .unwrap_or(0);

    tracing::debug!(
        "Wall is line #{} (stroke {} vs thinnest {}), {} sticks remain",
        wall_index,
        max_width,
        min_width,
        items.len() - 1
    );

    let mut wall = None;
    let mut sticks = Vec::with_capacity(items.len() - 1);
    for (index, (item, _)) in items.into_iter().enumerate() {
        if index == wall_index {
            wall = Some(item);
        } else {
            sticks.push(item);
        }
    }

    match wall {
        Some(wall) => Ok((wall, sticks)),
        None => Err(StickbugError::EmptyInput {
            context: "no lines to classify".to_string(),
        }),
    }
}

pub fn classify(lines: Vec<(Segment, StrokeWidth)>) -> Result<LineSet> {
    let (wall_line, stick_lines) = partition_wall(lines)?;
    Ok(LineSet {
        wall_line,
        stick_lines,
    })
}
