//! Observers notified as trajectory points are appended.

use std::io::Write;

use fl_core::Point;

/// Receives each trajectory point, in order, as it is appended.
pub trait PointObserver {
    fn on_point(&mut self, index: usize, point: &Point);
}

impl<F> PointObserver for F
where
    F: FnMut(usize, &Point),
{
    fn on_point(&mut self, index: usize, point: &Point) {
        self(index, point)
    }
}

/// Ignores every point.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PointObserver for NoopObserver {
    fn on_point(&mut self, _index: usize, _point: &Point) {}
}

/// Prints each point to stdout as `index: x y (z)`.
#[derive(Debug, Default)]
pub struct StdoutObserver;

impl PointObserver for StdoutObserver {
    fn on_point(&mut self, index: usize, point: &Point) {
        let coords: Vec<String> = point.iter().map(|v| format!("{v:.6e}")).collect();
        let mut out = std::io::stdout().lock();
        // a closed stdout must not abort the trace
        let _ = writeln!(out, "{}: {}", index, coords.join(" "));
    }
}
