//! Rift Runner - Main Entry Point
//!
//! Runs the locomotion core headless over the cone field with a scripted
//! route, logging each frame the renderer would receive.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rift_game::{
    CameraRig, FrameClock, FrameOutput, FrameSink, GroundContact, InputCollector, RigMode,
    Simulation, SimulationConfig,
};

/// Walk an actor over a field of cones
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera rig: first-person, chase or orbit
    #[arg(long)]
    camera: Option<RigMode>,

    /// Seed for cone placement
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Simulated display rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Pace frames against the wall clock instead of a fixed dt
    #[arg(long)]
    realtime: bool,

    /// Log every Nth frame at info level
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// Logs frames in place of a renderer.
struct LogSink {
    report_every: u64,
    last_grounded: Option<bool>,
    frames: u64,
    airborne_frames: u64,
}

impl LogSink {
    fn new(report_every: u64) -> Self {
        Self {
            report_every: report_every.max(1),
            last_grounded: None,
            frames: 0,
            airborne_frames: 0,
        }
    }
}

impl FrameSink for LogSink {
    fn present(&mut self, output: &FrameOutput) {
        self.frames += 1;
        let grounded = output.contact.is_grounded();
        if !grounded {
            self.airborne_frames += 1;
        }

        if self.last_grounded != Some(grounded) {
            match output.contact {
                GroundContact::Surface { surface, height } => {
                    log::debug!("frame {}: landed on surface {surface} at {height:.3}", output.frame)
                }
                GroundContact::HardFloor { height } => {
                    log::debug!("frame {}: caught by floor at {height:.3}", output.frame)
                }
                GroundContact::Airborne { .. } => log::debug!("frame {}: airborne", output.frame),
            }
            self.last_grounded = Some(grounded);
        }

        if output.frame % self.report_every == 0 {
            let p = output.actor.position;
            let c = output.camera.position;
            log::info!(
                "frame {:>5} dt={:.4} x{} actor=({:.2}, {:.2}, {:.2}) yaw={:.2} camera=({:.2}, {:.2}, {:.2})",
                output.frame,
                output.dt,
                output.substeps,
                p.x,
                p.y,
                p.z,
                output.actor.yaw,
                c.x,
                c.y,
                c.z,
            );
        }
    }
}

/// Feed the collector a looping route: walk, strafe, turn and hop.
fn script_input(collector: &mut InputCollector, frame: u64) {
    let phase = frame % 240;

    if phase == 0 {
        collector.key_down("w");
    }
    if phase == 120 {
        collector.key_down("d");
    }
    if phase == 180 {
        collector.key_up("d");
    }

    if phase % 90 == 0 {
        collector.key_down("space");
    } else {
        collector.key_up("space");
    }

    if (60..120).contains(&phase) {
        collector.pointer_moved(6.0, if phase < 90 { 1.5 } else { -1.5 });
    }
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(mode) = args.camera {
        config.camera = CameraRig::from_mode(mode, config.locomotion.eye_height);
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    anyhow::ensure!(args.fps > 0.0 && args.fps.is_finite(), "--fps must be positive");
    let frame_dt = 1.0 / args.fps;

    let mut simulation = Simulation::from_config(config).context("building simulation")?;
    let mut collector = InputCollector::new(simulation.config.bindings.clone());
    collector.lock_pointer();

    let mut sink = LogSink::new(args.report_every);
    let mut clock = FrameClock::new();
    clock.tick();

    for frame in 0..args.frames {
        script_input(&mut collector, frame);
        let input = collector.take_frame();

        let dt = if args.realtime {
            std::thread::sleep(Duration::from_secs_f32(frame_dt));
            clock.tick()
        } else {
            frame_dt
        };

        simulation.step_into(&input, dt, &mut sink);
    }

    let actor = &simulation.actor;
    log::info!(
        "finished {} frames ({} airborne), actor at {:?}, wall time {:.2}s",
        sink.frames,
        sink.airborne_frames,
        actor.position,
        clock.total().as_secs_f32()
    );

    Ok(())
}
