use crate::attrs::parse_invariant_f64;

/// The `bb` attribute: `leftX,lowerY,rightX,upperY`.
///
/// Input with fewer than four comma-separated fields leaves every coordinate
/// unset. Each field that does not parse as a number is unset on its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundingBox {
    source: Option<String>,
    pub left_x: Option<f64>,
    pub lower_y: Option<f64>,
    pub right_x: Option<f64>,
    pub upper_y: Option<f64>,
}

impl BoundingBox {
    pub fn parse(source: Option<&str>) -> Self {
        let mut bb = BoundingBox {
            source: source.map(str::to_string),
            ..BoundingBox::default()
        };
        if let Some(text) = source {
            let parts: Vec<&str> = text.split(',').collect();
            if parts.len() >= 4 {
                bb.left_x = parse_invariant_f64(Some(parts[0]));
                bb.lower_y = parse_invariant_f64(Some(parts[1]));
                bb.right_x = parse_invariant_f64(Some(parts[2]));
                bb.upper_y = parse_invariant_f64(Some(parts[3]));
            }
        }
        bb
    }

    /// The raw attribute value this box was parsed from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// True when this box was parsed from exactly `source`.
    pub fn is_parsed_from(&self, source: Option<&str>) -> bool {
        self.source.as_deref() == source
    }

    pub fn has_all_values(&self) -> bool {
        self.left_x.is_some()
            && self.lower_y.is_some()
            && self.right_x.is_some()
            && self.upper_y.is_some()
    }

    pub fn width(&self) -> Option<f64> {
        Some(self.right_x? - self.left_x?)
    }

    pub fn height(&self) -> Option<f64> {
        Some(self.upper_y? - self.lower_y?)
    }
}

/// A point attribute such as `pos` or `lp`: `x,y`, optionally followed by
/// `!` when the position is pinned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn parse(source: Option<&str>) -> Option<Point> {
        let text = source?.trim().trim_end_matches('!');
        let (x, y) = text.split_once(',')?;
        Some(Point {
            x: parse_invariant_f64(Some(x))?,
            y: parse_invariant_f64(Some(y))?,
        })
    }
}
