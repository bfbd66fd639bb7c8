//! Text decoding for coordinates entered at unloading and fence definitions.

use super::geometry::{Point, Polygon, PolygonError};

/// Parses `"X Y"` into a point. Anything other than exactly two finite,
/// whitespace-separated numbers is unparsable.
pub fn parse_coordinates(text: &str) -> Option<Point> {
    let mut tokens = text.split_whitespace();
    let x = parse_number(tokens.next()?)?;
    let y = parse_number(tokens.next()?)?;
    if tokens.next().is_some() {
        return None;
    }
    Some(Point::new(x, y))
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WktError {
    #[error("expected a POLYGON geometry")]
    NotAPolygon,
    #[error("unbalanced or missing parentheses")]
    MalformedRing,
    #[error("polygons with interior rings are not supported")]
    UnsupportedInteriorRings,
    #[error("invalid coordinate pair '{0}'")]
    InvalidCoordinate(String),
    #[error(transparent)]
    InvalidRing(#[from] PolygonError),
}

/// Decodes `POLYGON((x1 y1, x2 y2, ...))` into the exterior ring's vertices.
///
/// The keyword is case-insensitive and the closing vertex is optional; ring
/// validity itself is checked later by [`super::geometry::Polygon::new`].
pub fn parse_polygon_wkt(text: &str) -> Result<Vec<Point>, WktError> {
    let trimmed = text.trim();
    let keyword_len = "POLYGON".len();
    if trimmed.len() < keyword_len
        || !trimmed.is_char_boundary(keyword_len)
        || !trimmed[..keyword_len].eq_ignore_ascii_case("POLYGON")
    {
        return Err(WktError::NotAPolygon);
    }

    let body = trimmed[keyword_len..].trim();
    let rings = body
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or(WktError::MalformedRing)?
        .trim();

    let ring = rings
        .strip_prefix('(')
        .ok_or(WktError::MalformedRing)?;
    let close = ring.find(')').ok_or(WktError::MalformedRing)?;
    let (ring, rest) = ring.split_at(close);

    let rest = rest[1..].trim();
    if rest.starts_with(',') {
        return Err(WktError::UnsupportedInteriorRings);
    }
    if !rest.is_empty() || ring.contains('(') {
        return Err(WktError::MalformedRing);
    }

    ring.split(',')
        .map(|pair| {
            parse_coordinates(pair).ok_or_else(|| WktError::InvalidCoordinate(pair.trim().into()))
        })
        .collect()
}

/// Decodes WKT and validates the ring in one step, so a fence that parses
/// but cannot enclose anything is reported instead of silently rejecting
/// every delivery.
pub fn parse_fence_wkt(text: &str) -> Result<Polygon, WktError> {
    let vertices = parse_polygon_wkt(text)?;
    Ok(Polygon::new(vertices)?)
}
