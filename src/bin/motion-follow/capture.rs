//! Default input device capture

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use motion_follow::io::converter::downmix;
use rtrb::{Consumer, PushError, RingBuffer};
use tracing::{info, warn};

/// Capacity of the capture→session ring, in samples (~0.7s @ 48 kHz)
const CAPTURE_RING_LEN: usize = 32 * 1024;

/// A running capture: the sample ring plus the stream feeding it.
pub struct Capture {
    pub samples: Consumer<f32>,
    pub sample_rate: u32,
    /// Held only to keep capture running; dropping it stops the stream
    _stream: cpal::Stream,
}

/// Open the default input device and start streaming mono samples.
pub fn start() -> EyreResult<Capture> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| eyre!("no default input device available"))?;
    let config = device
        .default_input_config()
        .wrap_err("failed to fetch default input config")?;
    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(eyre!(
            "input device delivers {:?}, f32 samples required",
            config.sample_format()
        ));
    }
    let channels = config.channels() as usize;
    let sample_rate = config.sample_rate().0;
    info!(
        device = %device.name().unwrap_or_default(),
        sample_rate,
        channels,
        "capturing audio"
    );

    let (mut producer, samples) = RingBuffer::<f32>::new(CAPTURE_RING_LEN);

    let stream = device
        .build_input_stream(
            &config.into(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Push mono samples, non-blocking (drop on overflow)
                for sample in downmix(data, channels) {
                    if let Err(PushError::Full(_)) = producer.push(sample) {
                        break;
                    }
                }
            },
            move |err| warn!(error = %err, "capture stream error"),
            None,
        )
        .wrap_err("failed to build input stream")?;

    stream.play().wrap_err("failed to start input stream")?;
    Ok(Capture {
        samples,
        sample_rate,
        _stream: stream,
    })
}
