//! # Rating Engine
//! Pure scoring of one normalized point against one beach's orientation.
//! No I/O and no state between calls.
//!
//! Final rating is the rounded mean of three factors:
//! - wind/wave: 5 offshore, 1 when swell and wind share a bucket, else 3
//! - swell height: banded by `WaveHeights`
//! - swell period: <7 → 1, <10 → 2, <14 → 4, else 5

use crate::config::WaveHeights;
use crate::models::{Beach, GeoPosition, NormalizedPoint};

/// Bucket a direction in degrees into N/E/S/W.
pub fn position_from_degrees(degrees: f64) -> GeoPosition {
    if degrees < 50.0 {
        GeoPosition::N
    } else if degrees < 120.0 {
        GeoPosition::E
    } else if degrees < 220.0 {
        GeoPosition::S
    } else if degrees < 310.0 {
        GeoPosition::W
    } else {
        GeoPosition::N
    }
}

/// Rating engine bound to one beach.
#[derive(Debug, Clone, Copy)]
pub struct BeachRating {
    position: GeoPosition,
    heights: WaveHeights,
}

impl BeachRating {
    pub fn new(position: GeoPosition, heights: WaveHeights) -> Self {
        Self { position, heights }
    }

    pub fn for_beach(beach: &Beach, heights: WaveHeights) -> Self {
        Self::new(beach.position, heights)
    }

    /// Integer rating in `1..=5`.
    pub fn rate(&self, point: &NormalizedPoint) -> u8 {
        let swell = position_from_degrees(point.swell_direction);
        let wind = position_from_degrees(point.wind_direction);

        let sum = self.wind_and_wave_rating(swell, wind)
            + self.swell_size_rating(point.swell_height)
            + swell_period_rating(point.swell_period);

        // Mean of three integers never lands on .5, so rounding is unambiguous.
        (f64::from(sum) / 3.0).round() as u8
    }

    pub fn wind_and_wave_rating(&self, swell: GeoPosition, wind: GeoPosition) -> u8 {
        if self.is_wind_offshore(swell, wind) {
            5
        } else if swell == wind {
            1
        } else {
            3
        }
    }

    pub fn swell_size_rating(&self, height: f64) -> u8 {
        let h = &self.heights;
        if height < h.ankle_to_knee.min {
            1
        } else if height < h.ankle_to_knee.max {
            2
        } else if height < h.waist_high.max {
            3
        } else {
            5
        }
    }

    fn is_wind_offshore(&self, swell: GeoPosition, wind: GeoPosition) -> bool {
        use GeoPosition::*;
        matches!(
            (swell, wind, self.position),
            (N, S, N) | (S, N, S) | (E, W, E) | (W, E, W)
        )
    }
}

pub fn swell_period_rating(period: f64) -> u8 {
    if period < 7.0 {
        1
    } else if period < 10.0 {
        2
    } else if period < 14.0 {
        4
    } else {
        5
    }
}
