use std::cmp::Ordering;

use super::model::{Movie, RankedMovie};

// ---------------------------------------------------------------------------
// Popularity threshold
// ---------------------------------------------------------------------------

/// Linear-interpolation quantile, `q` in `[0, 1]`.
///
/// With the values sorted ascending, the quantile sits at fractional
/// position `(n - 1) * q` and is interpolated between its two neighbours.
/// Returns `None` for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Top rated
// ---------------------------------------------------------------------------

/// The `n` best-rated movies among the popular ones.
///
/// A movie is popular when its `vote_count` is strictly greater than the
/// 75th percentile of all known vote counts; a missing count is never
/// popular. Popular movies are ordered by `vote_average` descending; equal
/// ratings keep their input order and NaN ratings go last. An empty table
/// yields an empty list.
pub fn top_rated(movies: &[Movie], n: usize) -> Vec<RankedMovie> {
    let counts: Vec<f64> = movies
        .iter()
        .filter_map(|m| m.vote_count)
        .map(|c| c as f64)
        .collect();
    let Some(q3) = quantile(&counts, 0.75) else {
        return Vec::new();
    };

    let mut popular: Vec<(usize, &Movie)> = movies
        .iter()
        .enumerate()
        .filter(|(_, m)| m.vote_count.is_some_and(|c| c as f64 > q3))
        .collect();

    // `sort_by` is stable: ties stay in input order.
    popular.sort_by(|(_, a), (_, b)| rating_desc(a.vote_average, b.vote_average));

    popular
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(rank, (source_row, movie))| RankedMovie {
            rank,
            source_row,
            movie: movie.clone(),
        })
        .collect()
}

fn rating_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.total_cmp(&a),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

// ---------------------------------------------------------------------------
// Year range
// ---------------------------------------------------------------------------

/// Movies released between `start_year` and `end_year`, both inclusive.
///
/// Movies without a release date never match. Input order is preserved, so
/// applying the same range to the result returns it unchanged.
pub fn in_year_range(movies: &[Movie], start_year: i32, end_year: i32) -> Vec<Movie> {
    movies
        .iter()
        .filter(|m| {
            m.release_year()
                .is_some_and(|y| (start_year..=end_year).contains(&y))
        })
        .cloned()
        .collect()
}
