//! Heatmaps over the 64 tiles of the board.
//!
//! A heatmap is built by asking an evaluation function for one number per
//! tile. The function gets the aggregated tracker data, the tile, the
//! reference square chosen by the caller, and any extra data the caller
//! passes along. Ready-made evaluation functions live in [`eval`].

pub mod eval;

use chess_core::square::{Square, SquareSelector};

use crate::error::HeatmapError;

/// An 8×8 grid of values, `map[rank][file]` with rank 0 being the first rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub map: [[f64; 8]; 8],
    pub min: f64,
    pub max: f64,
}

impl Heatmap {
    pub fn at(&self, square: Square) -> f64 {
        self.map[square.rank() as usize][square.file() as usize]
    }
}

/// Relative difference between two heatmaps, in percent.
///
/// A tile whose baseline value is zero has no defined difference and is
/// `None`. Such tiles are ignored for `min` and `max`, which are `None` only
/// when every tile is.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonHeatmap {
    pub map: [[Option<f64>; 8]; 8],
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ComparisonHeatmap {
    pub fn at(&self, square: Square) -> Option<f64> {
        self.map[square.rank() as usize][square.file() as usize]
    }
}

fn evaluate<A, O, F>(data: &A, reference: Square, eval: &F, opt_data: &O) -> Heatmap
where
    A: ?Sized,
    O: ?Sized,
    F: Fn(&A, Square, Square, &O) -> f64,
{
    let mut map = [[0.0; 8]; 8];
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for tile in Square::all() {
        let value = eval(data, tile, reference, opt_data);
        map[tile.rank() as usize][tile.file() as usize] = value;
        min = min.min(value);
        max = max.max(value);
    }
    Heatmap { map, min, max }
}

/// Evaluate `eval` on every tile for the square named by `selector`.
///
/// The selector is checked before any tile is evaluated.
pub fn generate_heatmap<A, O, F>(
    data: &A,
    selector: impl Into<SquareSelector>,
    eval: F,
    opt_data: &O,
) -> Result<Heatmap, HeatmapError>
where
    A: ?Sized,
    O: ?Sized,
    F: Fn(&A, Square, Square, &O) -> f64,
{
    let reference = selector.into().resolve()?;
    Ok(evaluate(data, reference, &eval, opt_data))
}

/// Heatmaps of `data` and `baseline` with the same arguments, compared tile by
/// tile as `((data / baseline) - 1) * 100`.
pub fn generate_comparison_heatmap<A, O, F>(
    data: &A,
    baseline: &A,
    selector: impl Into<SquareSelector>,
    eval: F,
    opt_data: &O,
) -> Result<ComparisonHeatmap, HeatmapError>
where
    A: ?Sized,
    O: ?Sized,
    F: Fn(&A, Square, Square, &O) -> f64,
{
    let reference = selector.into().resolve()?;
    let ours = evaluate(data, reference, &eval, opt_data);
    let theirs = evaluate(baseline, reference, &eval, opt_data);

    let mut map = [[None; 8]; 8];
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    for tile in Square::all() {
        let base = theirs.at(tile);
        if base == 0.0 {
            continue;
        }
        let diff = (ours.at(tile) / base - 1.0) * 100.0;
        map[tile.rank() as usize][tile.file() as usize] = Some(diff);
        min = Some(min.map_or(diff, |m| m.min(diff)));
        max = Some(max.map_or(diff, |m| m.max(diff)));
    }
    Ok(ComparisonHeatmap { map, min, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64) -> impl Fn(&f64, Square, Square, &()) -> f64 {
        move |_: &f64, _: Square, _: Square, _: &()| value
    }

    #[test]
    fn test_constant_heatmap() {
        let heatmap = generate_heatmap(&0.0, "e4", constant(5.0), &()).unwrap();
        assert!(heatmap.map.iter().flatten().all(|v| *v == 5.0));
        assert_eq!(heatmap.min, 5.0);
        assert_eq!(heatmap.max, 5.0);
    }

    #[test]
    fn test_tiles_follow_rank_and_file() {
        let by_index = |_: &(), tile: Square, _: Square, _: &()| tile.index() as f64;
        let heatmap = generate_heatmap(&(), [0, 0], by_index, &()).unwrap();
        assert_eq!(heatmap.at("a1".parse().unwrap()), 0.0);
        assert_eq!(heatmap.at("h8".parse().unwrap()), 63.0);
        assert_eq!(heatmap.map[1][0], 8.0);
        assert_eq!((heatmap.min, heatmap.max), (0.0, 63.0));
    }

    #[test]
    fn test_reference_square_is_passed() {
        let distance = |_: &(), tile: Square, reference: Square, _: &()| {
            (tile.file() as f64 - reference.file() as f64).abs()
        };
        let heatmap = generate_heatmap(&(), "c5", distance, &()).unwrap();
        assert_eq!(heatmap.at("c1".parse().unwrap()), 0.0);
        assert_eq!(heatmap.max, 5.0);
    }

    #[test]
    fn test_invalid_square_skips_evaluation() {
        let calls = std::cell::Cell::new(0);
        let counting = |_: &(), _: Square, _: Square, _: &()| {
            calls.set(calls.get() + 1);
            1.0
        };
        assert!(matches!(
            generate_heatmap(&(), "z9", &counting, &()),
            Err(HeatmapError::InvalidSquare(_))
        ));
        assert!(generate_heatmap(&(), [3, 8], &counting, &()).is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_comparison_minus_fifty() {
        let value = |data: &f64, _: Square, _: Square, _: &()| *data;
        let cmp = generate_comparison_heatmap(&5.0, &10.0, "a2", value, &()).unwrap();
        assert!(cmp.map.iter().flatten().all(|v| *v == Some(-50.0)));
        assert_eq!(cmp.min, Some(-50.0));
        assert_eq!(cmp.max, Some(-50.0));
    }

    #[test]
    fn test_comparison_zero_baseline_is_excluded() {
        // baseline is zero on the first rank only
        let value = |data: &f64, tile: Square, _: Square, _: &()| {
            if *data == 0.0 && tile.rank() == 0 {
                0.0
            } else if *data == 0.0 {
                4.0
            } else {
                *data
            }
        };
        let cmp = generate_comparison_heatmap(&8.0, &0.0, "a1", value, &()).unwrap();
        assert_eq!(cmp.at("d1".parse().unwrap()), None);
        assert_eq!(cmp.at("d2".parse().unwrap()), Some(100.0));
        assert_eq!(cmp.min, Some(100.0));
        assert_eq!(cmp.max, Some(100.0));

        let all_zero = generate_comparison_heatmap(&1.0, &0.0, "a1", |_: &f64, _, _, _: &()| 0.0, &()).unwrap();
        assert_eq!(all_zero.min, None);
        assert_eq!(all_zero.max, None);
    }
}
