//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Planar point type and its wire representation

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An immutable planar point.
///
/// Points are plain coordinate values: equality is exact coordinate
/// equality and there is no identity beyond the coordinates themselves.
/// The wire representation is `x,y` in both directions ([`fmt::Display`]
/// and [`FromStr`]).
///
/// # Example
///
/// ```
/// use hullgraph_geometry::Point;
///
/// let p: Point = "1.5,-2".parse().unwrap();
/// assert_eq!(p, Point::new(1.5, -2.0));
/// assert_eq!(p.to_string(), "1.5,-2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Total ordering used for hull construction: x ascending, ties
    /// broken by y ascending.
    pub fn cmp_xy(&self, other: &Point) -> Ordering {
        self.x.total_cmp(&other.x).then(self.y.total_cmp(&other.y))
    }

    /// Check that both coordinates are finite (no NaN, no infinities)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Error produced when parsing a `x,y` point line
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParsePointError {
    /// The line did not contain exactly two comma-separated fields
    #[error("expected two comma separated coordinates: `{0}`")]
    FieldCount(String),

    /// A coordinate field was not a decimal number
    #[error("invalid coordinate: `{0}`")]
    Coordinate(String),

    /// A coordinate parsed but was NaN or infinite
    #[error("non-finite coordinate: `{0}`")]
    NonFinite(String),
}

impl FromStr for Point {
    type Err = ParsePointError;

    /// Parse the strict `x,y` form. Whitespace around either coordinate
    /// is tolerated; anything beyond two fields is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(',');
        let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(ParsePointError::FieldCount(s.to_string()));
        };
        let parse = |field: &str| -> Result<f64, ParsePointError> {
            let value: f64 = field
                .trim()
                .parse()
                .map_err(|_| ParsePointError::Coordinate(field.trim().to_string()))?;
            if !value.is_finite() {
                return Err(ParsePointError::NonFinite(field.trim().to_string()));
            }
            Ok(value)
        };
        Ok(Point::new(parse(x)?, parse(y)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let p: Point = "3,4".parse().unwrap();
        assert_eq!(p, Point::new(3.0, 4.0));
        assert_eq!(p.to_string(), "3,4");

        let p: Point = " -1.25 , 0.5 ".parse().unwrap();
        assert_eq!(p, Point::new(-1.25, 0.5));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            "3".parse::<Point>(),
            Err(ParsePointError::FieldCount(_))
        ));
        assert!(matches!(
            "1,2,3".parse::<Point>(),
            Err(ParsePointError::FieldCount(_))
        ));
        assert!(matches!(
            "a,2".parse::<Point>(),
            Err(ParsePointError::Coordinate(_))
        ));
        assert!(matches!(
            "".parse::<Point>(),
            Err(ParsePointError::FieldCount(_))
        ));
        assert!(matches!(
            "NaN,2".parse::<Point>(),
            Err(ParsePointError::NonFinite(_))
        ));
        assert!(matches!(
            "1,inf".parse::<Point>(),
            Err(ParsePointError::NonFinite(_))
        ));
    }

    #[test]
    fn test_cmp_xy_orders_by_x_then_y() {
        let a = Point::new(0.0, 5.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(1.0, 2.0);
        assert_eq!(a.cmp_xy(&b), Ordering::Less);
        assert_eq!(b.cmp_xy(&c), Ordering::Less);
        assert_eq!(c.cmp_xy(&c), Ordering::Equal);
    }
}
