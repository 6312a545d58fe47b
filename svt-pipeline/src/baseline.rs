//! Trailing moving-average baseline, computed causally per series.

use itertools::Itertools;
use std::collections::VecDeque;
use svt_core::series::DailyTrafficPoint;

/// Compute each point's trailing moving average over the `window` most
/// recent *preceding* recorded days of its own series.
///
/// Input must be sorted by (series_key, date) ascending, as produced by
/// [`crate::aggregate::aggregate_daily`]. The window is over recorded
/// points, not calendar days: gaps in a series simply shift it to the
/// nearest prior recorded days. A point's own value never feeds its own
/// baseline, and fewer than `window` prior points means no baseline at all
/// rather than a partial average.
pub fn compute_baselines(
    points: Vec<DailyTrafficPoint>,
    window: usize,
) -> Vec<(DailyTrafficPoint, Option<f64>)> {
    let mut result = Vec::with_capacity(points.len());

    for (_, series) in &points.into_iter().chunk_by(|p| p.key.clone()) {
        let mut trailing: VecDeque<u64> = VecDeque::with_capacity(window);
        for point in series {
            let moving_average = if window > 0 && trailing.len() == window {
                Some(trailing.iter().sum::<u64>() as f64 / window as f64)
            } else {
                None
            };
            if window > 0 {
                if trailing.len() == window {
                    trailing.pop_front();
                }
                trailing.push_back(point.daily_traffic);
            }
            result.push((point, moving_average));
        }
    }

    result
}
