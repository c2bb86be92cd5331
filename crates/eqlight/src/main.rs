//! eqlight - seven-band spectrum analyzer runner
//!
//! Drives the spectrum pipeline from a simulated analyzer chip at a fixed
//! frame rate and hands every frame to the enabled consumers: per-cycle
//! dumps, a terminal meter and the log.

#![warn(missing_docs)]

mod cli;
mod config;
mod logging_setup;
mod meter;
mod sim;

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use eqlight_core::{Clock, MonotonicClock, ScaledDump, SpectrumPipeline};
use tracing::{debug, info};

use crate::cli::{Args, DumpFormat};
use crate::config::AppConfig;
use crate::meter::MeterLine;
use crate::sim::SimulatedDevice;

/// The running application
struct App {
    pipeline: SpectrumPipeline<SimulatedDevice>,
    clock: MonotonicClock,
    frame_ms: u64,
    max_frames: u64,
    dump: DumpFormat,
    meter: bool,
}

impl App {
    fn new(config: AppConfig, args: &Args) -> Result<Self> {
        let device = SimulatedDevice::new(config.simulation);
        let pipeline = SpectrumPipeline::new(device, config.audio)
            .context("Failed to build spectrum pipeline")?;

        Ok(Self {
            pipeline,
            clock: MonotonicClock::new(),
            frame_ms: args.frame_ms.max(1),
            max_frames: args.cycles,
            dump: args.dump,
            meter: args.meter,
        })
    }

    /// Frame loop: one clock reading per frame, then update, beat poll, consumers
    fn run(&mut self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let mut frame: u64 = 0;
        let mut beats: u64 = 0;

        info!(
            "Running at {}ms per frame{}",
            self.frame_ms,
            if self.max_frames > 0 {
                format!(" for {} frames", self.max_frames)
            } else {
                String::new()
            }
        );

        while self.max_frames == 0 || frame < self.max_frames {
            let now = self.clock.now_ms();

            self.pipeline.device_mut().advance_to(now);
            let new_cycle = self.pipeline.update(now);
            let beat = self.pipeline.poll_beat(now);
            if beat {
                beats += 1;
            }

            if new_cycle {
                self.dump_cycle(&mut out)?;
            }
            if self.meter {
                let line = MeterLine::new(
                    &self.pipeline.view(),
                    beat,
                    self.pipeline.gain_state().gain,
                );
                write!(out, "\r{}", line).context("Failed to write meter")?;
                out.flush().context("Failed to flush stdout")?;
            }

            frame += 1;
            let next_frame_ms = frame * self.frame_ms;
            let elapsed = self.clock.now_ms();
            if next_frame_ms > elapsed {
                thread::sleep(Duration::from_millis(next_frame_ms - elapsed));
            }
        }

        if self.meter {
            writeln!(out).context("Failed to write meter")?;
        }
        info!(
            "Stopped after {} frames: {} cycles, {} beats, gain {:.2}, {}us in device delays",
            frame,
            self.pipeline.cycles(),
            beats,
            self.pipeline.gain_state().gain,
            self.pipeline.device().busy_us()
        );
        Ok(())
    }

    fn dump_cycle(&self, out: &mut impl Write) -> Result<()> {
        match self.dump {
            DumpFormat::Off => return Ok(()),
            DumpFormat::Tsv => {
                let view = self.pipeline.view();
                writeln!(out, "{}", ScaledDump(view.scaled()))
            }
            DumpFormat::Json => {
                let line = self.pipeline.snapshot().to_json_line()?;
                writeln!(out, "{}", line)
            }
        }
        .context("Failed to write dump")
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    config.validate()?;

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    // Keep the guard alive until the end of main
    let _log_guard = logging_setup::init(&config.logging)?;
    debug!("Effective config: {:?}", config);

    let mut app = App::new(config, &args)?;
    app.run()
}
