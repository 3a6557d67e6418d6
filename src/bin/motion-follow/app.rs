//! Session driver shared by the TUI and headless front ends

use std::{
    collections::VecDeque,
    io::Write,
    thread,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::KeyCode;
use motion_follow::{
    dsp::{envelope::AMPLIFICATION_RANGE, Smoothing},
    io::{FrameAssembler, LineTransport},
    motion::{GateOutcome, OutputCommand, OutputGate, PositionUpdate},
    MotionSession,
};
use tracing::{debug, info};

use crate::capture::Capture;

/// Transport to the actuator: serial device, stdout or nowhere.
pub type DeviceTransport = LineTransport<Box<dyn Write + Send>>;

/// Raw loudness values kept for the scope panel
pub const SCOPE_HISTORY_LEN: usize = 180;

const AMPLIFICATION_STEP: f64 = 0.5;

pub struct App {
    session: MotionSession,
    gate: OutputGate<DeviceTransport>,
    capture: Capture,
    frames: FrameAssembler,
    /// Samples consumed since the last reset; the frame clock
    samples_consumed: u64,
    scope: VecDeque<f64>,
    started: Instant,
    next_tick: Duration,
    playing: bool,
    last_update: Option<PositionUpdate>,
    last_command: Option<OutputCommand>,
    should_quit: bool,
}

impl App {
    pub fn new(
        session: MotionSession,
        gate: OutputGate<DeviceTransport>,
        capture: Capture,
    ) -> Self {
        let frames = FrameAssembler::new(session.config().frame_len);
        Self {
            session,
            gate,
            capture,
            frames,
            samples_consumed: 0,
            scope: VecDeque::with_capacity(SCOPE_HISTORY_LEN),
            started: Instant::now(),
            next_tick: Duration::ZERO,
            playing: true,
            last_update: None,
            last_command: None,
            should_quit: false,
        }
    }

    /// Drain captured samples into frames, then run the output tick if due.
    pub fn pump(&mut self) {
        let frame_len = self.frames.frame_len() as u64;
        let sample_rate = f64::from(self.capture.sample_rate.max(1));

        while let Some(frame) = self.frames.fill(&mut self.capture.samples) {
            self.samples_consumed += frame_len;
            let now = Duration::from_secs_f64(self.samples_consumed as f64 / sample_rate);
            let output = self.session.process_frame(frame, now);

            if self.scope.len() == SCOPE_HISTORY_LEN {
                self.scope.pop_front();
            }
            self.scope.push_back(output.loudness.raw);
        }

        let elapsed = self.started.elapsed();
        if elapsed >= self.next_tick {
            self.tick();
            let interval = Duration::from_millis(self.session.config().interval_ms.into());
            self.next_tick += interval;
            // Skip missed ticks instead of bursting
            if self.next_tick <= elapsed {
                self.next_tick = elapsed + interval;
            }
        }
    }

    fn tick(&mut self) {
        let Some(update) = self.session.poll(self.playing) else {
            return;
        };
        if self.gate.offer(update, self.playing) == GateOutcome::Sent {
            self.last_command = Some(OutputCommand::new(update.position, self.gate.interval_ms()));
        }
        self.last_update = Some(update);
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                self.playing = !self.playing;
                info!(playing = self.playing, "playback toggled");
            }
            KeyCode::Char('m') => {
                let mode = self.session.mode().toggle();
                self.session.set_mode(mode);
                info!(%mode, "mode changed");
            }
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_amplification(AMPLIFICATION_STEP),
            KeyCode::Char('-') => self.nudge_amplification(-AMPLIFICATION_STEP),
            KeyCode::Char('t') => {
                let quantizer = self.session.config().quantizer.next_preset();
                info!(targets = %quantizer, "quantizer changed");
                self.session.set_quantizer(quantizer);
            }
            KeyCode::Char('s') => {
                let smoothing = match self.session.config().smoothing {
                    Smoothing::Weighted => Smoothing::Trend,
                    Smoothing::Trend => Smoothing::Weighted,
                };
                info!(?smoothing, "smoothing changed");
                self.session.set_smoothing(smoothing);
            }
            _ => {}
        }
    }

    fn nudge_amplification(&mut self, step: f64) {
        let amplification = (self.session.config().amplification + step)
            .clamp(*AMPLIFICATION_RANGE.start(), *AMPLIFICATION_RANGE.end());
        self.session.set_amplification(amplification);
        debug!(amplification, "amplification changed");
    }

    /// Start over as if a new source had been attached.
    fn reset(&mut self) {
        self.session.reset();
        self.frames.clear();
        self.samples_consumed = 0;
        self.scope.clear();
        self.started = Instant::now();
        self.next_tick = Duration::ZERO;
        self.last_update = None;
        self.last_command = None;
    }

    pub fn session(&self) -> &MotionSession {
        &self.session
    }

    pub fn gate(&self) -> &OutputGate<DeviceTransport> {
        &self.gate
    }

    pub fn scope(&self) -> &VecDeque<f64> {
        &self.scope
    }

    pub fn sample_rate(&self) -> u32 {
        self.capture.sample_rate
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Time since the session started or was last reset
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn last_update(&self) -> Option<PositionUpdate> {
        self.last_update
    }

    pub fn last_command(&self) -> Option<OutputCommand> {
        self.last_command
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Drive the session without a terminal until the process is stopped.
pub fn run_headless(mut app: App) -> EyreResult<()> {
    info!(
        interval_ms = app.session().config().interval_ms,
        "running headless"
    );
    while !app.should_quit() {
        app.pump();
        thread::sleep(Duration::from_millis(1));
    }
    Ok(())
}
