use crate::adjacency::Extent;
use crate::medium::MediumLogic;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sonarpool_data::{Cell, Coord};

/// Shortest contiguous terrain run found along each horizontal axis.
///
/// Caps the XY half-size of the box in which the propagation engine looks
/// for the next polyline vertex, so a single segment cannot cross the
/// narrowest obstacle in the pool. Without terrain the bound is the full
/// pool extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleBound {
    pub x: usize,
    pub y: usize,
}

impl ObstacleBound {
    pub(crate) fn scan(extent: &Extent, cells: &[Cell]) -> Self {
        let is_terrain = |x: usize, y: usize, z: usize| {
            !cells[extent.index(Coord::new(x, y, z))].medium.carries_sound()
        };

        let (min_x, min_y) = (0..extent.height)
            .into_par_iter()
            .map(|z| {
                let along_x = (0..extent.width)
                    .filter_map(|y| shortest_run((0..extent.length).map(|x| is_terrain(x, y, z))))
                    .min();
                let along_y = (0..extent.length)
                    .filter_map(|x| shortest_run((0..extent.width).map(|y| is_terrain(x, y, z))))
                    .min();
                (along_x, along_y)
            })
            .reduce(
                || (None, None),
                |a, b| (min_option(a.0, b.0), min_option(a.1, b.1)),
            );

        Self {
            x: min_x.unwrap_or(extent.length),
            y: min_y.unwrap_or(extent.width),
        }
    }
}

/// Length of the shortest maximal run of `true` in `line`.
fn shortest_run(line: impl Iterator<Item = bool>) -> Option<usize> {
    let mut shortest: Option<usize> = None;
    let mut run = 0;
    for solid in line.chain(std::iter::once(false)) {
        if solid {
            run += 1;
        } else if run > 0 {
            shortest = min_option(shortest, Some(run));
            run = 0;
        }
    }
    shortest
}

fn min_option(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;
    use sonarpool_data::{HeightField, Medium};

    #[test]
    fn test_source_does_not_join_terrain_runs() {
        let field = HeightField::from_rows(vec![vec![1, 0, 1]]).unwrap();
        let pool = Pool::new(&field, 2).unwrap();
        assert_eq!(pool.obstacle_bound(), ObstacleBound { x: 1, y: 1 });

        let mut cells = pool.cells().to_vec();
        cells[pool.extent.index(Coord::new(1, 0, 0))].medium = Medium::Source;
        assert_eq!(
            ObstacleBound::scan(&pool.extent, &cells),
            ObstacleBound { x: 1, y: 1 }
        );
    }

    #[test]
    fn test_shortest_run() {
        assert_eq!(shortest_run([false, false].into_iter()), None);
        assert_eq!(
            shortest_run([true, true, false, true, false].into_iter()),
            Some(1)
        );
        assert_eq!(shortest_run([true, true, true].into_iter()), Some(3));
        assert_eq!(
            shortest_run([false, true, true, false, true, true, true].into_iter()),
            Some(2)
        );
    }

    #[test]
    fn test_min_option() {
        assert_eq!(min_option(None, None), None);
        assert_eq!(min_option(Some(3), None), Some(3));
        assert_eq!(min_option(Some(3), Some(2)), Some(2));
    }
}
