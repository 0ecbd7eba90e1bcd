use indexmap::IndexMap;

use super::types::Offset;
use crate::geometry::{round_to_grid, screen_normal, Coordinate};

/// Signed position of slot `index` among `count` parallel lines, in line widths.
///
/// Slots are spread symmetrically around the centerline: two lines sit at
/// -0.5 and +0.5, three at -1, 0 and +1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn lateral_slot(index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    index as f64 - (count as f64 - 1.0) / 2.0
}

/// Offsets for every color of one segment.
///
/// `from` and `to` are the segment endpoints in canonical key order, so the
/// normal and therefore the offsets do not depend on which direction any line
/// travels. A zero-length segment falls back to a horizontal displacement.
#[must_use]
pub fn assign_offsets(
    colors: &[String],
    from: Coordinate,
    to: Coordinate,
    line_width: f64,
    grid: f64,
) -> IndexMap<String, Offset> {
    let (nx, ny) = screen_normal(from, to).unwrap_or((1.0, 0.0));
    let count = colors.len();

    colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let distance = lateral_slot(i, count) * line_width;
            let offset = [round_to_grid(nx * distance, grid), round_to_grid(ny * distance, grid)];
            (color.clone(), offset)
        })
        .collect()
}

/// `"dx|dy"` key used to bucket features that share a displacement
#[must_use]
pub fn offset_key(offset: Offset) -> String {
    format!("{}|{}", offset[0], offset[1])
}
