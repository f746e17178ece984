//! Resolves a straight-line path description into absolute, normalized points.
//!
//! Grammar accepted: a leading `M`/`m` (or `L`/`l`) picks absolute or relative
//! mode for the whole path, followed by coordinate pairs `x,y` or axis moves
//! `h x` / `v y`. Further `M`/`L` letters only separate pairs and do not switch
//! the mode. Any other command letter is rejected.

use crate::domain::model::{Bounds, Point, Segment};
use crate::utils::error::{Result, StickbugError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    AxisCommand(Axis),
    /// `M`/`m`/`L`/`l`，只作為分隔用
    Separator(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    Absolute,
    Relative,
}

impl PathMode {
    fn from_command(command: char) -> Self {
        if command.is_ascii_uppercase() {
            PathMode::Absolute
        } else {
            PathMode::Relative
        }
    }
}

/// 把路徑字串切成 token
pub fn tokenize(description: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = description.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() || c == ',' {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() || matches!(c, '.' | '-' | '+') {
            chars.next();
            let mut end = start + c.len_utf8();
            let mut prev = c;
            while let Some(&(idx, next)) = chars.peek() {
                let continues = next.is_ascii_digit()
                    || next == '.'
                    || matches!(next, 'e' | 'E')
                    || (matches!(next, '-' | '+') && matches!(prev, 'e' | 'E'));
                if !continues {
                    break;
                }
                chars.next();
                end = idx + next.len_utf8();
                prev = next;
            }

            let raw = &description[start..end];
            let value = raw
                .parse::<f64>()
                .map_err(|e| StickbugError::MalformedCoordinate {
                    token: raw.to_string(),
                    reason: e.to_string(),
                })?;
            tokens.push(Token::Number(value));
            continue;
        }

        chars.next();
        let token = match c {
            'h' | 'H' => Token::AxisCommand(Axis::Horizontal),
            'v' | 'V' => Token::AxisCommand(Axis::Vertical),
            'm' | 'M' | 'l' | 'L' => Token::Separator(c),
            other if other.is_alphabetic() => {
                return Err(StickbugError::UnsupportedPathCommand { command: other })
            }
            other => {
                return Err(StickbugError::MalformedCoordinate {
                    token: other.to_string(),
                    reason: "unexpected character".to_string(),
                })
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Small state machine turning tokens into absolute points.
struct Resolver {
    mode: PathMode,
    points: Vec<Point>,
    pending: Option<f64>,
    axis: Option<Axis>,
}

impl Resolver {
    fn new(mode: PathMode) -> Self {
        Self {
            mode,
            points: Vec::new(),
            pending: None,
            axis: None,
        }
    }

    fn feed(&mut self, token: Token) -> Result<()> {
        match token {
            Token::Number(value) => {
                if let Some(axis) = self.axis.take() {
                    self.push_axis_move(axis, value)?;
                } else if let Some(x) = self.pending.take() {
                    self.push_pair(x, value);
                } else {
                    self.pending = Some(value);
                }
            }
            Token::AxisCommand(axis) => {
                self.ensure_between_pairs(axis_letter(axis))?;
                if self.points.is_empty() {
                    return Err(StickbugError::MalformedCoordinate {
                        token: axis_letter(axis).to_string(),
                        reason: "axis move needs a preceding point".to_string(),
                    });
                }
                self.axis = Some(axis);
            }
            Token::Separator(command) => self.ensure_between_pairs(command)?,
        }
        Ok(())
    }

    fn ensure_between_pairs(&self, command: char) -> Result<()> {
        if self.pending.is_some() || self.axis.is_some() {
            return Err(StickbugError::MalformedCoordinate {
                token: command.to_string(),
                reason: "command inside an incomplete coordinate pair".to_string(),
            });
        }
        Ok(())
    }

    fn previous(&self) -> Option<Point> {
        self.points.last().copied()
    }

    fn push_pair(&mut self, x: f64, y: f64) {
        let raw = Point::new(x, y);
        let point = match (self.mode, self.previous()) {
            (PathMode::Relative, Some(prev)) => prev + raw,
            _ => raw,
        };
        self.points.push(point);
    }

    fn push_axis_move(&mut self, axis: Axis, value: f64) -> Result<()> {
        let prev = self
            .previous()
            .ok_or_else(|| StickbugError::MalformedCoordinate {
                token: axis_letter(axis).to_string(),
                reason: "axis move needs a preceding point".to_string(),
            })?;
        let relative = self.mode == PathMode::Relative;
        let point = match axis {
            Axis::Horizontal => {
                let x = if relative { prev.x + value } else { value };
                Point::new(x, prev.y)
            }
            Axis::Vertical => {
                let y = if relative { prev.y + value } else { value };
                Point::new(prev.x, y)
            }
        };
        self.points.push(point);
        Ok(())
    }

    fn finish(self) -> Result<Vec<Point>> {
        if let Some(value) = self.pending {
            return Err(StickbugError::MalformedCoordinate {
                token: value.to_string(),
                reason: "coordinate pair is missing its second component".to_string(),
            });
        }
        if let Some(axis) = self.axis {
            return Err(StickbugError::MalformedCoordinate {
                token: axis_letter(axis).to_string(),
                reason: "axis move is missing its value".to_string(),
            });
        }
        if self.points.is_empty() {
            return Err(StickbugError::EmptyInput {
                context: "path has no coordinates".to_string(),
            });
        }
        Ok(self.points)
    }
}

fn axis_letter(axis: Axis) -> char {
    match axis {
        Axis::Horizontal => 'h',
        Axis::Vertical => 'v',
    }
}

/// 解析出所有絕對座標（未正規化）
pub fn resolve_points(description: &str) -> Result<Vec<Point>> {
    let mut tokens = tokenize(description)?.into_iter();

    let mode = match tokens.next() {
        Some(Token::Separator(command)) => PathMode::from_command(command),
        Some(Token::AxisCommand(axis)) => {
            return Err(StickbugError::MalformedCoordinate {
                token: axis_letter(axis).to_string(),
                reason: "path must start with a move command".to_string(),
            })
        }
        Some(Token::Number(value)) => {
            return Err(StickbugError::MalformedCoordinate {
                token: value.to_string(),
                reason: "path must start with a move command".to_string(),
            })
        }
        None => {
            return Err(StickbugError::EmptyInput {
                context: "path description is empty".to_string(),
            })
        }
    };

    let mut resolver = Resolver::new(mode);
    for token in tokens {
        resolver.feed(token)?;
    }
    let points = resolver.finish()?;

    tracing::trace!(
        "Resolved {} points in {:?} mode from '{}'",
        points.len(),
        mode,
        description
    );
    Ok(points)
}

pub fn parse_points(description: &str, bounds: &Bounds) -> Result<Vec<Point>> {
    let points = resolve_points(description)?;
    Ok(points.into_iter().map(|p| bounds.normalize(p)).collect())
}

/// 只保留第一個與最後一個點
pub fn parse_segment(description: &str, bounds: &Bounds) -> Result<Segment> {
    let points = parse_points(description, bounds)?;
    match (points.first(), points.last()) {
        (Some(&start), Some(&end)) => Ok(Segment::new(start, end)),
        _ => Err(StickbugError::EmptyInput {
            context: "path has no coordinates".to_string(),
        }),
    }
}
