//! Audio feature extraction and the feature-to-field mapping.
//!
//! The extractor treats the audio analyser as a black-box sensor: each
//! frame the caller hands it the current frequency-bin energies (one byte
//! per bin, 0-255, the layout hardware analysers expose) and it derives a
//! small set of perceptual features. Nothing here blocks on audio; the
//! extractor reads whatever spectrum it is given, so its effective rate is
//! the frame loop's.
//!
//! # Features
//!
//! - **rms** - overall energy, 0-1
//! - **low / mid / high** - band energies split at fixed fractions of the
//!   bin range (10% and 40%)
//! - **onset** - energy spike over the previous frame, gated by an
//!   absolute floor so silence never registers beats
//! - **spectral_centroid** - index-weighted mean bin, a brightness proxy
//!
//! [`FeatureExtractor::extract_smoothed`] exponentially smooths all
//! continuous features to keep the visuals from jittering; the onset flag
//! is always reported raw. A rolling onset history (about one second at 60
//! frames) feeds the rhythm parameter of [`wave_params`].
//!
//! [`wave_params`]: FeatureExtractor::wave_params

use crate::field::WaveParams;
use crate::math;
use std::collections::VecDeque;

/// Default frequency bin count, matching an analyser FFT size of 2048.
pub const DEFAULT_BIN_COUNT: usize = 1024;

/// Current rms must exceed previous rms by this ratio to count as an onset.
const ONSET_THRESHOLD: f32 = 1.3;

/// Absolute rms floor for onsets; spikes in near-silence are ignored.
const ONSET_FLOOR: f32 = 0.3;

/// Exponential smoothing factor for the continuous features.
const SMOOTHING: f32 = 0.15;

/// Onset history length in frames (~1 second at 60 fps).
const ONSET_HISTORY: usize = 60;

/// Fractional bin offsets of the band boundaries.
const LOW_BAND_END: f32 = 0.1;
const MID_BAND_END: f32 = 0.4;

/// Perceptual features derived from one frame of spectrum data.
#[derive(Clone, Copy, Debug)]
pub struct AudioFeatures {
    /// Overall energy (0-1).
    pub rms: f32,
    /// Bass energy (0-1).
    pub low: f32,
    /// Mid-range energy (0-1).
    pub mid: f32,
    /// Treble energy (0-1).
    pub high: f32,
    /// Beat/hit detected this frame. Transient; never smoothed.
    pub onset: bool,
    /// Brightness proxy (0-1).
    pub spectral_centroid: f32,
}

impl Default for AudioFeatures {
    fn default() -> Self {
        Self {
            rms: 0.0,
            low: 0.0,
            mid: 0.0,
            high: 0.0,
            onset: false,
            spectral_centroid: 0.5,
        }
    }
}

/// Stateful per-frame feature extractor.
pub struct FeatureExtractor {
    bin_count: usize,
    previous_rms: f32,
    smoothed: AudioFeatures,
    onset_history: VecDeque<bool>,
}

impl FeatureExtractor {
    /// Create an extractor for spectra of `bin_count` bins.
    ///
    /// Analyser bin counts are always a power of two (half the FFT size).
    pub fn new(bin_count: usize) -> Self {
        assert!(bin_count.is_power_of_two(), "Bin count must be a power of two");
        Self {
            bin_count,
            previous_rms: 0.0,
            smoothed: AudioFeatures::default(),
            onset_history: VecDeque::with_capacity(ONSET_HISTORY + 1),
        }
    }

    /// The bin count this extractor was configured for.
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Extract raw features from the current spectrum.
    pub fn extract(&mut self, spectrum: &[u8]) -> AudioFeatures {
        debug_assert_eq!(spectrum.len(), self.bin_count);
        let n = spectrum.len();

        let mut sum_sq = 0.0f32;
        for &bin in spectrum {
            let v = bin as f32;
            sum_sq += v * v;
        }
        let rms = if n == 0 {
            0.0
        } else {
            (sum_sq / n as f32).sqrt() / 255.0
        };

        let low_end = (n as f32 * LOW_BAND_END) as usize;
        let mid_end = (n as f32 * MID_BAND_END) as usize;
        let low = band_energy(&spectrum[..low_end]);
        let mid = band_energy(&spectrum[low_end..mid_end]);
        let high = band_energy(&spectrum[mid_end..]);

        // Onset: relative spike over the previous frame, gated by an
        // absolute floor so silence never produces beats
        let onset = rms > self.previous_rms * ONSET_THRESHOLD && rms > ONSET_FLOOR;
        self.previous_rms = rms;

        // Spectral centroid: index-weighted mean bin, normalized by bin count
        let mut weighted_sum = 0.0f32;
        let mut total_energy = 0.0f32;
        for (i, &bin) in spectrum.iter().enumerate() {
            weighted_sum += i as f32 * bin as f32;
            total_energy += bin as f32;
        }
        let spectral_centroid = if total_energy > 0.0 {
            (weighted_sum / total_energy) / n as f32
        } else {
            0.5
        };

        AudioFeatures {
            rms,
            low,
            mid,
            high,
            onset,
            spectral_centroid,
        }
    }

    /// Extract features and fold them into the smoothed state.
    ///
    /// Continuous features decay exponentially toward the raw values; the
    /// onset flag passes through raw and is appended to the rolling onset
    /// history.
    pub fn extract_smoothed(&mut self, spectrum: &[u8]) -> AudioFeatures {
        let raw = self.extract(spectrum);
        let s = &mut self.smoothed;

        s.rms = math::lerp(s.rms, raw.rms, SMOOTHING);
        s.low = math::lerp(s.low, raw.low, SMOOTHING);
        s.mid = math::lerp(s.mid, raw.mid, SMOOTHING);
        s.high = math::lerp(s.high, raw.high, SMOOTHING);
        s.spectral_centroid =
            math::lerp(s.spectral_centroid, raw.spectral_centroid, SMOOTHING);
        s.onset = raw.onset;

        self.onset_history.push_back(raw.onset);
        if self.onset_history.len() > ONSET_HISTORY {
            self.onset_history.pop_front();
        }

        self.smoothed
    }

    /// Fraction of recent frames carrying an onset (0-1).
    pub fn onset_rate(&self) -> f32 {
        if self.onset_history.is_empty() {
            return 0.0;
        }
        let hits = self.onset_history.iter().filter(|&&o| o).count();
        hits as f32 / self.onset_history.len() as f32
    }

    /// Map features onto wave-field parameters.
    ///
    /// This mapping is the system's interpretation of music and is a fixed
    /// contract, not a tunable: bass weighted with overall energy becomes
    /// harmony, darkness becomes flow, energy becomes density, mids become
    /// depth, onset rate becomes rhythm, brightness becomes timbre.
    pub fn wave_params(&self, features: &AudioFeatures) -> WaveParams {
        WaveParams {
            harmony: features.low * 0.7 + features.rms * 0.3,
            flow: 1.0 - features.spectral_centroid,
            density: features.rms,
            space_depth: features.mid,
            rhythm: (self.onset_rate() * 2.0).min(1.0),
            timbre: features.spectral_centroid,
        }
    }
}

/// Mean energy of a band, normalized to 0-1. Empty bands have no energy.
fn band_energy(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    (sum as f32 / bins.len() as f32) / 255.0
}
