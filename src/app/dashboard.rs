//! Dashboard view-model: latest card values, a rolling temperature series
//! and the persistent link status.
//!
//! The series lives in a fixed-capacity [`HistoryBuffer`], so the oldest
//! point falls off automatically once the window is full.

use core::fmt;

use heapless::HistoryBuffer;

use crate::protocol::SensorReading;

/// Points kept in the temperature series.
pub const SERIES_LEN: usize = 20;

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    #[default]
    Online,
    Disconnected,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Disconnected => f.write_str("DISCONNECTED"),
        }
    }
}

pub struct Dashboard {
    latest: Option<SensorReading>,
    temperatures: HistoryBuffer<f32, SERIES_LEN>,
    link: LinkStatus,
    accepted: u64,
    rejected: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            latest: None,
            temperatures: HistoryBuffer::new(),
            link: LinkStatus::Online,
            accepted: 0,
            rejected: 0,
        }
    }

    /// Fold an accepted reading into the cards and the series.
    pub fn record(&mut self, reading: SensorReading) {
        self.latest = Some(reading);
        self.temperatures.write(reading.temperature);
        self.accepted += 1;
    }

    /// Count a discarded line.
    pub fn note_rejected(&mut self) {
        self.rejected += 1;
    }

    pub fn latest(&self) -> Option<SensorReading> {
        self.latest
    }

    /// Temperature series, oldest first.
    pub fn series(&self) -> Vec<f32> {
        self.temperatures.oldest_ordered().copied().collect()
    }

    pub fn link(&self) -> LinkStatus {
        self.link
    }

    pub fn set_link(&mut self, status: LinkStatus) {
        self.link = status;
    }

    /// `(accepted, rejected)` line counters.
    pub fn counters(&self) -> (u64, u64) {
        (self.accepted, self.rejected)
    }

    /// Render the series as a one-line sparkline scaled to its own range.
    pub fn sparkline(&self) -> String {
        let series = self.series();
        let (min, max) = series
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            });
        let span = max - min;
        series
            .iter()
            .map(|&t| {
                if span <= f32::EPSILON {
                    SPARK[SPARK.len() / 2]
                } else {
                    let idx = ((t - min) / span * (SPARK.len() - 1) as f32).round() as usize;
                    SPARK[idx.min(SPARK.len() - 1)]
                }
            })
            .collect()
    }

    /// One-line status card.
    pub fn card(&self, threshold_c: f32) -> String {
        match self.latest {
            Some(r) => format!(
                "{:.1}°C  {:.1}%  light {}  | threshold {:.1}°C | link {} | {}",
                r.temperature,
                r.humidity,
                r.light_raw,
                threshold_c,
                self.link,
                self.sparkline()
            ),
            None => format!(
                "no readings yet | threshold {:.1}°C | link {}",
                threshold_c, self.link
            ),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}
