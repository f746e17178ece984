use crate::utils::error::{Result, StickbugError};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// 繪圖宣告的寬高，用來把座標正規化到 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    width: f64,
    height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(StickbugError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// 不做 clamp，超出邊界的內容原樣保留
    pub fn normalize(&self, raw: Point) -> Point {
        Point::new(raw.x / self.width, raw.y / self.height)
    }
}

/// A straight line reduced to its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SegmentRecord", into = "SegmentRecord")]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> Point {
        self.start + (self.end - self.start) * 0.5
    }

    /// 從正中間切成兩段，兩段首尾相接
    pub fn split(&self) -> (Segment, Segment) {
        let halfway = self.midpoint();
        (
            Segment::new(self.start, halfway),
            Segment::new(halfway, self.end),
        )
    }

    /// 把正規化座標放大到像素空間
    pub fn scaled(&self, width: f64, height: f64) -> Segment {
        Segment::new(
            Point::new(self.start.x * width, self.start.y * height),
            Point::new(self.end.x * width, self.end.y * height),
        )
    }
}

/// Flat wire shape of a segment inside the line JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl From<SegmentRecord> for Segment {
    fn from(record: SegmentRecord) -> Self {
        Segment::new(
            Point::new(record.start_x, record.start_y),
            Point::new(record.end_x, record.end_y),
        )
    }
}

impl From<Segment> for SegmentRecord {
    fn from(segment: Segment) -> Self {
        SegmentRecord {
            start_x: segment.start.x,
            start_y: segment.start.y,
            end_x: segment.end.x,
            end_y: segment.end.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct StrokeWidth(pub f64);

impl StrokeWidth {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// One drawing: the wall plus its sticks, in classification order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSet {
    pub wall_line: Segment,
    pub stick_lines: Vec<Segment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub source: Segment,
    pub destination: Segment,
}

impl MatchedPair {
    pub const fn new(source: Segment, destination: Segment) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// 來源圖與參考圖之間完整的對應關係
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Morph {
    pub wall: MatchedPair,
    pub sticks: Vec<MatchedPair>,
}
