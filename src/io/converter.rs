//! Conversions from captured float audio to analyser byte frames.

/// Map a float sample in [-1, 1] to the unsigned byte convention of
/// time-domain analysers: 128 is silence, clipped to 0..=255.
pub fn sample_to_byte(sample: f32) -> u8 {
    if !sample.is_finite() {
        return 128;
    }
    (128.0 * (1.0 + sample)).floor().clamp(0.0, 255.0) as u8
}

/// Average interleaved multi-channel audio down to mono.
pub fn downmix(interleaved: &[f32], channels: usize) -> impl Iterator<Item = f32> + '_ {
    let channels = channels.max(1);
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
}
