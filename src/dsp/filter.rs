use std::f32::consts::PI;

/// A stateful single-sample processing stage.
///
/// `transform` is called once per sample of the channel the filter belongs
/// to, in stream order. Implementations keep their own history, so an
/// instance must never be fed samples from more than one channel.
pub trait Filter: Send {
    fn transform(&mut self, sample: f32) -> f32;

    /// Forget any history. Stateless stages have nothing to clear.
    fn reset(&mut self) {}
}

/// Corner frequencies are kept below this fraction of the sample rate.
const MAX_CORNER_RATIO: f32 = 0.45;

/// Second-order IIR stage (Direct Form I) using the RBJ cookbook designs.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    fn from_raw(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Pass-through stage.
    pub fn identity() -> Self {
        Self::from_raw(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Boosts (or cuts) everything below `frequency` by `gain_db`.
    ///
    /// `slope` is the cookbook shelf slope `S`; 1.0 is the steepest slope
    /// that stays monotonic.
    pub fn low_shelf(sample_rate: u32, frequency: f32, slope: f32, gain_db: f32) -> Self {
        let (a, cos, temp) = shelf_terms(sample_rate, frequency, slope, gain_db);

        Self::from_raw(
            a * ((a + 1.0) - (a - 1.0) * cos + temp),
            2.0 * a * ((a - 1.0) - (a + 1.0) * cos),
            a * ((a + 1.0) - (a - 1.0) * cos - temp),
            (a + 1.0) + (a - 1.0) * cos + temp,
            -2.0 * ((a - 1.0) + (a + 1.0) * cos),
            (a + 1.0) + (a - 1.0) * cos - temp,
        )
    }

    /// Boosts (or cuts) everything above `frequency` by `gain_db`.
    pub fn high_shelf(sample_rate: u32, frequency: f32, slope: f32, gain_db: f32) -> Self {
        let (a, cos, temp) = shelf_terms(sample_rate, frequency, slope, gain_db);

        Self::from_raw(
            a * ((a + 1.0) + (a - 1.0) * cos + temp),
            -2.0 * a * ((a - 1.0) + (a + 1.0) * cos),
            a * ((a + 1.0) + (a - 1.0) * cos - temp),
            (a + 1.0) - (a - 1.0) * cos + temp,
            2.0 * ((a - 1.0) - (a + 1.0) * cos),
            (a + 1.0) - (a - 1.0) * cos - temp,
        )
    }

    /// Bell-shaped boost/cut centred on `frequency` with bandwidth `q`.
    pub fn peaking(sample_rate: u32, frequency: f32, q: f32, gain_db: f32) -> Self {
        let a = 10f32.powf(gain_db / 40.0);
        let w0 = omega(sample_rate, frequency);
        let cos = w0.cos();
        let alpha = w0.sin() / (2.0 * q.max(f32::EPSILON));

        Self::from_raw(
            1.0 + alpha * a,
            -2.0 * cos,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cos,
            1.0 - alpha / a,
        )
    }
}

impl Filter for Biquad {
    #[inline]
    fn transform(&mut self, sample: f32) -> f32 {
        let out = self.b0 * sample + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = sample;
        self.y2 = self.y1;
        self.y1 = out;
        out
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

fn omega(sample_rate: u32, frequency: f32) -> f32 {
    let rate = sample_rate.max(1) as f32;
    let frequency = frequency.clamp(1.0, rate * MAX_CORNER_RATIO);
    2.0 * PI * frequency / rate
}

/// Returns `(A, cos w0, 2 sqrt(A) alpha)` shared by both shelf designs.
fn shelf_terms(sample_rate: u32, frequency: f32, slope: f32, gain_db: f32) -> (f32, f32, f32) {
    let a = 10f32.powf(gain_db / 40.0);
    let w0 = omega(sample_rate, frequency);
    let slope = slope.max(f32::EPSILON);
    let alpha = w0.sin() / 2.0 * ((a + 1.0 / a) * (1.0 / slope - 1.0) + 2.0).max(0.0).sqrt();

    (a, w0.cos(), 2.0 * a.sqrt() * alpha)
}
