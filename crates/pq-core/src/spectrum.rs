//! Spectral estimator
//!
//! Transforms each channel of a [`Waveform`] with a full complex FFT and keeps
//! the magnitude of every coefficient. No window is applied and no scaling is
//! done: a unit sine that completes a whole number of cycles in `N` samples
//! shows up as a line of height `N / 2`.
//!
//! ## Bin Frequencies
//!
//! Bin `k` of an `N`-point transform at sample rate `fs` is labelled
//!
//! ```text
//!   k * fs / N          for k <  N/2
//!   (k - N) * fs / N    for k >= N/2
//! ```
//!
//! so for even `N` the Nyquist bin carries a negative label. Rows are then
//! sorted by frequency, putting the negative half first.

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::types::{FrequencyTable, PqError, PqResult, Spectrum, Waveform};

/// Signed frequency of every bin of an `n`-point FFT, in FFT output order.
pub fn fft_frequencies(n: usize, sample_rate: f64) -> Vec<f64> {
    let len = n as f64;
    (0..n)
        .map(|k| {
            let signed = if 2 * k < n { k as f64 } else { k as f64 - len };
            signed * sample_rate / len
        })
        .collect()
}

/// Compute the magnitude spectrum of every channel.
///
/// `sample_rate` is the sampling frequency of the waveform in Hz.
pub fn spectrum(waveform: &Waveform, sample_rate: f64) -> PqResult<Spectrum> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(PqError::InvalidInput(format!(
            "sample rate must be a positive number, got {}",
            sample_rate
        )));
    }

    let n = waveform.len();
    let fft = FftPlanner::<f64>::new().plan_fft_forward(n);
    let magnitudes = channel_magnitudes(&fft, waveform.columns());

    let frequencies = fft_frequencies(n, sample_rate);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| frequencies[a].total_cmp(&frequencies[b]));

    let sorted_frequencies = order.iter().map(|&k| frequencies[k]).collect();
    let sorted_columns = magnitudes
        .into_iter()
        .map(|column| order.iter().map(|&k| column[k]).collect())
        .collect();

    Ok(Spectrum::from_table(FrequencyTable::from_parts(
        sorted_frequencies,
        waveform.channel_names().to_vec(),
        sorted_columns,
    )))
}

fn magnitudes(fft: &dyn Fft<f64>, samples: &[f64]) -> Vec<f64> {
    let mut buffer: Vec<Complex64> = samples.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    fft.process(&mut buffer);
    buffer.iter().map(|c| c.norm()).collect()
}

#[cfg(not(feature = "parallel"))]
fn channel_magnitudes(fft: &Arc<dyn Fft<f64>>, columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    columns
        .iter()
        .map(|column| magnitudes(&**fft, column))
        .collect()
}

#[cfg(feature = "parallel")]
fn channel_magnitudes(fft: &Arc<dyn Fft<f64>>, columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    columns
        .par_iter()
        .map(|column| magnitudes(&**fft, column))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine_wave(freq: f64, amplitude: f64, sample_rate: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_fft_frequencies_even() {
        assert_eq!(fft_frequencies(4, 4.0), vec![0.0, 1.0, -2.0, -1.0]);
    }

    #[test]
    fn test_fft_frequencies_odd() {
        assert_eq!(fft_frequencies(5, 5.0), vec![0.0, 1.0, 2.0, -2.0, -1.0]);
    }

    #[test]
    fn test_single_sample_is_dc() {
        let wf = Waveform::single("v", vec![3.0]).unwrap();
        let spec = spectrum(&wf, 100.0).unwrap();
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.frequencies(), &[0.0]);
        assert!((spec.columns()[0][0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_row_count_and_non_negative() {
        for n in [1usize, 2, 7, 64, 101] {
            let samples: Vec<f64> = (0..n).map(|i| ((i * 7) % 5) as f64 - 2.0).collect();
            let wf = Waveform::single("v", samples).unwrap();
            let spec = spectrum(&wf, 1000.0).unwrap();
            assert_eq!(spec.len(), n);
            assert!(spec.columns()[0].iter().all(|&a| a >= 0.0));
        }
    }

    #[test]
    fn test_sorted_ascending() {
        let wf = Waveform::single("v", sine_wave(50.0, 1.0, 1000.0, 200)).unwrap();
        let spec = spectrum(&wf, 1000.0).unwrap();
        assert!(spec.frequencies().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(spec.frequencies()[0], -500.0);
        assert_eq!(*spec.frequencies().last().unwrap(), 495.0);
    }

    #[test]
    fn test_sine_line_height() {
        let n = 1000;
        let wf = Waveform::single("v", sine_wave(60.0, 1.0, 1000.0, n)).unwrap();
        let spec = spectrum(&wf, 1000.0).unwrap();
        let col = spec.column("v").unwrap();

        let pos = spec.frequencies().iter().position(|&f| f == 60.0).unwrap();
        let neg = spec.frequencies().iter().position(|&f| f == -60.0).unwrap();
        assert!((col[pos] - n as f64 / 2.0).abs() < 1e-6, "line = {}", col[pos]);
        assert!((col[neg] - n as f64 / 2.0).abs() < 1e-6);

        let dc = spec.frequencies().iter().position(|&f| f == 0.0).unwrap();
        assert!(col[dc] < 1e-6);
    }

    #[test]
    fn test_channels_are_independent() {
        let a = sine_wave(50.0, 1.0, 1000.0, 500);
        let b = sine_wave(100.0, 2.0, 1000.0, 500);
        let wf = Waveform::new(
            vec!["a".to_string(), "b".to_string()],
            vec![a.clone(), b.clone()],
        )
        .unwrap();
        let both = spectrum(&wf, 1000.0).unwrap();
        let only_a = spectrum(&Waveform::single("a", a).unwrap(), 1000.0).unwrap();
        let only_b = spectrum(&Waveform::single("b", b).unwrap(), 1000.0).unwrap();

        assert_eq!(both.column("a"), only_a.column("a"));
        assert_eq!(both.column("b"), only_b.column("b"));
    }

    #[test]
    fn test_invalid_sample_rate() {
        let wf = Waveform::single("v", vec![1.0, 2.0]).unwrap();
        assert!(matches!(spectrum(&wf, 0.0), Err(PqError::InvalidInput(_))));
        assert!(matches!(spectrum(&wf, f64::NAN), Err(PqError::InvalidInput(_))));
    }
}
