use crate::config::{BandKind, EqualizerSettings};

use super::filter::{Biquad, Filter};

type Chain = Vec<Box<dyn Filter>>;

/// Per-channel filter chains over an interleaved sample stream.
///
/// Every channel owns its chain; the constructor asks the factory for a new
/// chain per channel, so no filter instance can see two channels' samples.
pub struct Equalizer {
    chains: Vec<Chain>,
    // Channel of the next sample handed to `process`.
    next_channel: usize,
}

impl Equalizer {
    pub fn new<F>(channels: u16, mut factory: F) -> Self
    where
        F: FnMut(usize) -> Vec<Box<dyn Filter>>,
    {
        let channels = usize::from(channels.max(1));
        Self {
            chains: (0..channels).map(&mut factory).collect(),
            next_channel: 0,
        }
    }

    /// Equalizer with empty chains; output is only clamped.
    pub fn bypass(channels: u16) -> Self {
        Self::new(channels, |_| Vec::new())
    }

    /// Build the configured bands for a stream of the given format.
    pub fn from_settings(settings: &EqualizerSettings, channels: u16, sample_rate: u32) -> Self {
        if !settings.enabled {
            return Self::bypass(channels);
        }

        Self::new(channels, |_| {
            settings
                .bands
                .iter()
                .map(|band| {
                    let stage = match band.kind {
                        BandKind::LowShelf => {
                            Biquad::low_shelf(sample_rate, band.frequency, band.q, band.gain_db)
                        }
                        BandKind::HighShelf => {
                            Biquad::high_shelf(sample_rate, band.frequency, band.q, band.gain_db)
                        }
                        BandKind::Peaking => {
                            Biquad::peaking(sample_rate, band.frequency, band.q, band.gain_db)
                        }
                    };
                    Box::new(stage) as Box<dyn Filter>
                })
                .collect()
        })
    }

    pub fn channels(&self) -> usize {
        self.chains.len()
    }

    /// Filter and clamp a single sample belonging to `channel`.
    pub fn process_sample(&mut self, sample: f32, channel: usize) -> f32 {
        let len = self.chains.len();
        let chain = &mut self.chains[channel % len];
        // A non-finite value must never reach the filter history.
        let sample = if sample.is_finite() { sample } else { 0.0 };
        let out = chain.iter_mut().fold(sample, |s, f| f.transform(s));
        if !out.is_finite() {
            chain.iter_mut().for_each(|f| f.reset());
            return 0.0;
        }
        out.clamp(-1.0, 1.0)
    }

    /// Process the first `count` samples of `buf` in place.
    pub fn process(&mut self, buf: &mut [f32], count: usize) {
        let count = count.min(buf.len());
        let channels = self.chains.len();

        for sample in &mut buf[..count] {
            let ch = self.next_channel;
            *sample = self.process_sample(*sample, ch);
            self.next_channel = (ch + 1) % channels;
        }
    }

    /// Forget the interleaving position, e.g. after a seek.
    pub fn realign(&mut self) {
        self.next_channel = 0;
    }
}
