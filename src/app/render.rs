use sonarpool_core::{MediumLogic, Pool, Result, SimError};
use sonarpool_data::Coord;

/// Marker drawn over a navigator's cell.
pub const NAVIGATOR_SYMBOL: char = 'N';

/// Draws the `z` layer of the pool as text, one line per `y`.
///
/// Every navigator in `markers` that lies on the layer is drawn over its cell.
pub fn render_layer(pool: &Pool, z: usize, markers: &[Coord]) -> Result<String> {
    if z >= pool.height() {
        return Err(SimError::OutOfBounds(Coord::new(0, 0, z)));
    }

    let mut out = String::with_capacity((pool.length() + 1) * pool.width());
    for y in 0..pool.width() {
        for x in 0..pool.length() {
            let coord = Coord::new(x, y, z);
            let symbol = if markers.contains(&coord) {
                NAVIGATOR_SYMBOL
            } else {
                pool.medium(coord)?.symbol()
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    Ok(out)
}
