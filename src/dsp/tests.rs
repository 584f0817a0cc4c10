use super::*;
use crate::config::EqualizerSettings;
use proptest::prelude::*;

/// Test stage that records every sample it sees.
struct Recorder {
    seen: std::sync::Arc<std::sync::Mutex<Vec<f32>>>,
}

impl Filter for Recorder {
    fn transform(&mut self, sample: f32) -> f32 {
        self.seen.lock().unwrap().push(sample);
        sample
    }
}

struct Gain(f32);

impl Filter for Gain {
    fn transform(&mut self, sample: f32) -> f32 {
        sample * self.0
    }
}

fn sine(freq: f32, rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| (2.0 * std::f32::consts::PI * freq * n as f32 / rate as f32).sin() * 0.25)
        .collect()
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

#[test]
fn identity_biquad_passes_samples_through() {
    let mut f = Biquad::identity();
    for s in [0.0, 0.5, -0.25, 1.0] {
        assert_eq!(f.transform(s), s);
    }
}

#[test]
fn low_shelf_boosts_lows_and_leaves_highs() {
    let rate = 44_100;
    let mut low = Biquad::low_shelf(rate, 200.0, 0.7, 6.0);
    let input = sine(50.0, rate, 44_100);
    let out: Vec<f32> = input.iter().map(|&s| low.transform(s)).collect();
    // Skip the settling period.
    let gain = rms(&out[4410..]) / rms(&input[4410..]);
    assert!(gain > 1.7 && gain < 2.2, "gain was {gain}");

    let mut low = Biquad::low_shelf(rate, 200.0, 0.7, 6.0);
    let input = sine(10_000.0, rate, 44_100);
    let out: Vec<f32> = input.iter().map(|&s| low.transform(s)).collect();
    let gain = rms(&out[4410..]) / rms(&input[4410..]);
    assert!((gain - 1.0).abs() < 0.05, "gain was {gain}");
}

#[test]
fn high_shelf_boosts_highs_and_leaves_lows() {
    let rate = 44_100;
    let mut high = Biquad::high_shelf(rate, 2_000.0, 0.7, 6.0);
    let input = sine(12_000.0, rate, 44_100);
    let out: Vec<f32> = input.iter().map(|&s| high.transform(s)).collect();
    let gain = rms(&out[4410..]) / rms(&input[4410..]);
    assert!(gain > 1.7 && gain < 2.2, "gain was {gain}");

    let mut high = Biquad::high_shelf(rate, 2_000.0, 0.7, 6.0);
    let input = sine(50.0, rate, 44_100);
    let out: Vec<f32> = input.iter().map(|&s| high.transform(s)).collect();
    let gain = rms(&out[4410..]) / rms(&input[4410..]);
    assert!((gain - 1.0).abs() < 0.05, "gain was {gain}");
}

#[test]
fn corner_above_nyquist_stays_stable() {
    // 10 kHz on an 8 kHz stream would be past Nyquist without clamping.
    let mut high = Biquad::high_shelf(8_000, 10_000.0, 0.7, 3.0);
    let out: Vec<f32> = sine(1_000.0, 8_000, 8_000)
        .into_iter()
        .map(|s| high.transform(s))
        .collect();
    assert!(out.iter().all(|s| s.is_finite() && s.abs() < 2.0));
}

#[test]
fn equalizer_routes_interleaved_samples_to_their_channel() {
    let seen: Vec<_> = (0..2)
        .map(|_| std::sync::Arc::new(std::sync::Mutex::new(Vec::new())))
        .collect();
    let chains = seen.clone();
    let mut eq = Equalizer::new(2, move |ch| {
        vec![Box::new(Recorder {
            seen: chains[ch].clone(),
        }) as Box<dyn Filter>]
    });

    let mut buf = [0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
    eq.process(&mut buf, 6);

    assert_eq!(*seen[0].lock().unwrap(), vec![0.1, 0.2, 0.3]);
    assert_eq!(*seen[1].lock().unwrap(), vec![-0.1, -0.2, -0.3]);
}

#[test]
fn equalizer_keeps_interleaving_across_unaligned_reads() {
    let seen: Vec<_> = (0..2)
        .map(|_| std::sync::Arc::new(std::sync::Mutex::new(Vec::new())))
        .collect();
    let chains = seen.clone();
    let mut eq = Equalizer::new(2, move |ch| {
        vec![Box::new(Recorder {
            seen: chains[ch].clone(),
        }) as Box<dyn Filter>]
    });

    let mut first = [0.1, -0.1, 0.2];
    let mut second = [-0.2, 0.3, -0.3];
    eq.process(&mut first, 3);
    eq.process(&mut second, 3);

    assert_eq!(*seen[0].lock().unwrap(), vec![0.1, 0.2, 0.3]);
    assert_eq!(*seen[1].lock().unwrap(), vec![-0.1, -0.2, -0.3]);
}

#[test]
fn equalizer_only_touches_valid_samples() {
    let mut eq = Equalizer::new(1, |_| vec![Box::new(Gain(2.0)) as Box<dyn Filter>]);
    let mut buf = [0.25, 0.25, 0.25, 0.25];
    eq.process(&mut buf, 2);
    assert_eq!(buf, [0.5, 0.5, 0.25, 0.25]);
}

#[test]
fn factory_is_called_once_per_channel() {
    let mut calls = Vec::new();
    let eq = Equalizer::new(6, |ch| {
        calls.push(ch);
        Vec::new()
    });
    assert_eq!(eq.channels(), 6);
    assert_eq!(calls, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn disabled_settings_bypass_but_still_clamp() {
    let settings = EqualizerSettings {
        enabled: false,
        ..EqualizerSettings::default()
    };
    let mut eq = Equalizer::from_settings(&settings, 2, 44_100);
    let mut buf = [0.5, 3.0, -7.0, -0.5];
    eq.process(&mut buf, 4);
    assert_eq!(buf, [0.5, 1.0, -1.0, -0.5]);
}

#[test]
fn nan_input_is_silenced() {
    let mut eq = Equalizer::bypass(1);
    let mut buf = [f32::NAN];
    eq.process(&mut buf, 1);
    assert_eq!(buf, [0.0]);
}

#[test]
fn non_finite_input_does_not_poison_filter_history() {
    let mut eq = Equalizer::new(1, |_| {
        vec![Box::new(Biquad::low_shelf(44_100, 100.0, 0.7, 3.0)) as Box<dyn Filter>]
    });
    for bad in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
        assert_eq!(eq.process_sample(bad, 0), 0.0);
        let after: Vec<f32> = (0..64).map(|_| eq.process_sample(0.5, 0)).collect();
        assert!(after.iter().all(|s| s.is_finite() && *s > 0.0), "{after:?}");
    }
}

/// Doubles its running total, so it overflows after enough input.
struct Runaway {
    total: f32,
    resets: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl Filter for Runaway {
    fn transform(&mut self, sample: f32) -> f32 {
        self.total = self.total * 2.0 + sample;
        self.total
    }

    fn reset(&mut self) {
        self.total = 0.0;
        self.resets.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[test]
fn overflowing_chain_is_reset() {
    let resets = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = resets.clone();
    let mut eq = Equalizer::new(1, move |_| {
        vec![Box::new(Runaway {
            total: 0.0,
            resets: counter.clone(),
        }) as Box<dyn Filter>]
    });

    let outputs: Vec<f32> = (0..200).map(|_| eq.process_sample(1.0, 0)).collect();
    assert!(resets.load(std::sync::atomic::Ordering::SeqCst) >= 1);
    assert!(outputs.contains(&0.0));
    assert!(outputs.iter().all(|s| (-1.0..=1.0).contains(s)));
}

proptest! {
    #[test]
    fn equalizer_output_is_always_clamped(
        samples in prop::collection::vec(-100.0f32..100.0, 1..512),
        gain_db in -24.0f32..24.0,
        channels in 1u16..8,
    ) {
        let mut settings = EqualizerSettings::default();
        for band in &mut settings.bands {
            band.gain_db = gain_db;
        }
        let mut eq = Equalizer::from_settings(&settings, channels, 44_100);
        let mut buf = samples.clone();
        let n = buf.len();
        eq.process(&mut buf, n);
        prop_assert!(buf.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}
