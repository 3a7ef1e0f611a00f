//! Chooses what the screen shows for the current state.

use crate::alert::AlertState;
use crate::constants::display::GRAPH_BAND;
use crate::history::HistoryBuffer;
use crate::mode::Mode;

/// One frame's worth of content.
#[derive(Debug, Clone)]
pub enum View<'a, const N: usize> {
    /// Alert counter, shown in statistics mode.
    Statistics { alerts: u32 },
    /// Alert banner while the threshold is exceeded.
    Alert,
    /// Reading, threshold and history graph.
    Live(LiveView<'a, N>),
}

#[derive(Debug, Clone)]
pub struct LiveView<'a, const N: usize> {
    pub reading: f32,
    pub threshold: f32,
    pub mode: Mode,
    pub graph: Graph<'a, N>,
}

/// History plotted into a band of fixed height.
///
/// Readings are scaled down so the tallest fits the band; small ranges are
/// never scaled up.
#[derive(Debug, Clone)]
pub struct Graph<'a, const N: usize> {
    history: &'a HistoryBuffer<N>,
    scale: f32,
}

impl<'a, const N: usize> Graph<'a, N> {
    pub fn new(history: &'a HistoryBuffer<N>) -> Self {
        Self {
            history,
            scale: GRAPH_BAND / history.max_value().max(GRAPH_BAND),
        }
    }

    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Band height in graph units.
    pub const fn height(&self) -> i32 {
        GRAPH_BAND as i32
    }

    /// `(column, row)` per reading, oldest first. Row 0 is the top of the band.
    pub fn points(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let height = self.height();
        self.history
            .ordered()
            .enumerate()
            .map(move |(column, reading)| (column as i32, height - (reading * self.scale) as i32))
    }
}

/// Pick the view for this cycle.
///
/// Statistics mode wins over an alert, an alert wins over the live view.
pub fn assemble<'a, const N: usize>(
    mode: Mode,
    alert: AlertState,
    reading: f32,
    threshold: f32,
    history: &'a HistoryBuffer<N>,
    alerts: u32,
) -> View<'a, N> {
    if mode == Mode::Statistics {
        View::Statistics { alerts }
    } else if alert == AlertState::Alerting {
        View::Alert
    } else {
        View::Live(LiveView {
            reading,
            threshold,
            mode,
            graph: Graph::new(history),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_statistics_takes_priority() {
        let history: HistoryBuffer<4> = HistoryBuffer::new();
        let view = assemble(Mode::Statistics, AlertState::Alerting, 110.0, 100.0, &history, 7);
        assert!(matches!(view, View::Statistics { alerts: 7 }));
    }

    #[test]
    fn test_alert_banner_when_alerting() {
        let history: HistoryBuffer<4> = HistoryBuffer::new();
        let view = assemble(Mode::Monitoring, AlertState::Alerting, 110.0, 100.0, &history, 1);
        assert!(matches!(view, View::Alert));
    }

    #[test]
    fn test_live_view_when_quiet() {
        let mut history: HistoryBuffer<4> = HistoryBuffer::new();
        history.record(55.0);
        let view = assemble(Mode::Monitoring, AlertState::Quiet, 55.0, 100.0, &history, 0);
        let View::Live(live) = view else {
            panic!("expected live view");
        };
        assert_eq!(live.reading, 55.0);
        assert_eq!(live.threshold, 100.0);
        assert_eq!(live.mode, Mode::Monitoring);
    }

    #[test]
    fn test_graph_scales_down_loud_history() {
        let mut history: HistoryBuffer<4> = HistoryBuffer::new();
        for r in [30.0, 80.0, 40.0, 60.0] {
            history.record(r);
        }
        let graph = Graph::new(&history);
        assert_eq!(graph.scale(), 0.5);
        let points: Vec<_> = graph.points().collect();
        assert_eq!(points, [(0, 25), (1, 0), (2, 20), (3, 10)]);
    }

    #[test]
    fn test_graph_never_scales_up() {
        let mut history: HistoryBuffer<3> = HistoryBuffer::new();
        history.record(20.0);
        let graph = Graph::new(&history);
        assert_eq!(graph.scale(), 1.0);
        let points: Vec<_> = graph.points().collect();
        assert_eq!(points, [(0, 40), (1, 40), (2, 20)]);
    }

    #[test]
    fn test_graph_points_stay_in_band() {
        let mut history: HistoryBuffer<16> = HistoryBuffer::new();
        for i in 0..40 {
            history.record(30.0 + (i * 7 % 90) as f32);
        }
        let graph = Graph::new(&history);
        assert_eq!(graph.points().count(), 16);
        assert!(graph.points().all(|(_, row)| (0..=40).contains(&row)));
    }
}
