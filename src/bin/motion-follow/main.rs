//! motion-follow - drive a linear actuator from live audio
//!
//! Run with: cargo run -- --port /dev/ttyUSB0

mod app;
mod capture;
mod ui;

use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use motion_follow::{
    config::parse_amplification,
    dsp::{envelope::DEFAULT_AMPLIFICATION, Quantizer},
    io::LineTransport,
    motion::{Mode, OutputGate},
    MotionSession, SessionConfig, DEFAULT_FRAME_LEN, DEFAULT_INTERVAL_MS, POSITION_MAX,
};
use rand::Rng;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

use app::{App, DeviceTransport};

#[derive(Debug, Parser)]
#[command(name = "motion-follow", version, about = "Follow live audio with a linear actuator")]
struct Args {
    /// Signal driving the actuator: envelope | oscillator
    #[arg(long, default_value = "envelope")]
    mode: Mode,

    /// Loudness amplification, 1 to 10
    #[arg(long, default_value_t = DEFAULT_AMPLIFICATION, value_parser = parse_amplification)]
    gain: f64,

    /// Quantizer targets: "raw" or a comma list such as "0,0.5,1"
    #[arg(long, default_value = "0,1")]
    targets: Quantizer,

    /// Output polling period, also sent as the interval hint
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MS)]
    interval_ms: u32,

    /// Samples per analysis frame
    #[arg(long, default_value_t = DEFAULT_FRAME_LEN)]
    frame_len: usize,

    /// Serial device to write commands to (stdout when omitted)
    #[arg(long)]
    port: Option<PathBuf>,

    /// Run without the terminal UI
    #[arg(long)]
    headless: bool,

    /// Send one test command at a random position, then exit
    #[arg(long)]
    probe: bool,

    /// Write log events to this file while the UI owns the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    init_logging(&args)?;

    let config = SessionConfig::new()
        .mode(args.mode)
        .amplification(args.gain)
        .quantizer(args.targets.clone())
        .interval_ms(args.interval_ms)
        .frame_len(args.frame_len);

    let gate = OutputGate::with_interval(open_transport(&args)?, config.interval_ms);

    if args.probe {
        return probe(gate);
    }

    // No session state exists until the audio source is acquired
    let capture = capture::start().wrap_err("failed to start audio capture")?;
    let session = MotionSession::start(config).wrap_err("failed to start session")?;
    let app = App::new(session, gate, capture);

    if args.headless {
        app::run_headless(app)
    } else {
        let mut terminal = ratatui::init();
        let res = ui::run(&mut terminal, app);
        ratatui::restore();
        res
    }
}

/// Layered subscriber: stderr when headless, the log file under the UI.
fn init_logging(args: &Args) -> EyreResult<()> {
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy()
    };

    let console_layer = args.headless.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_filter(filter())
    });

    let file_layer = match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(filter()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    Ok(())
}

fn open_transport(args: &Args) -> EyreResult<DeviceTransport> {
    let writer: Box<dyn Write + Send> = match &args.port {
        Some(path) => Box::new(
            OpenOptions::new()
                .write(true)
                .open(path)
                .wrap_err_with(|| format!("failed to open serial port {}", path.display()))?,
        ),
        // stdout belongs to the UI unless headless or probing
        None if args.headless || args.probe => Box::new(io::stdout()),
        None => Box::new(io::sink()),
    };
    Ok(LineTransport::new(writer))
}

fn probe(mut gate: OutputGate<DeviceTransport>) -> EyreResult<()> {
    let position = random_position(&mut rand::thread_rng());
    let outcome = gate.probe(position);
    tracing::info!(position, ?outcome, "probe sent");
    Ok(())
}

/// Any position the device accepts, uniformly chosen.
fn random_position<R: Rng + ?Sized>(rng: &mut R) -> u16 {
    rng.gen_range(0..=POSITION_MAX)
}
