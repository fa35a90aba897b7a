//! Syntax Saga entry point
//!
//! The browser build is driven from JS through `syntax_saga::web`. Natively
//! this binary runs a program against a level headlessly and logs every tick.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use syntax_saga::levels::{BUILTIN_LEVELS, next_level};
    use syntax_saga::sim::{Command, ExecutionResult, RunEvent, RunHandle};
    use syntax_saga::{LevelConfig, PacingPreset, Settings};

    #[derive(Debug, Parser)]
    #[command(name = "syntax-saga", about = "Run a Syntax Saga program headlessly")]
    pub struct Args {
        /// Built-in level id
        #[arg(long, default_value = "level1")]
        level: String,
        /// Level definition file (JSON); overrides --level
        #[arg(long)]
        config: Option<PathBuf>,
        /// Commands, comma or space separated (e.g. "forward,forward,turnRight")
        #[arg(long, default_value = "")]
        program: String,
        /// Playback speed: slow, normal, fast
        #[arg(long, default_value = "normal")]
        pacing: String,
        /// Skip the delay between commands
        #[arg(long)]
        instant: bool,
        /// List built-in levels and exit
        #[arg(long)]
        list: bool,
    }

    fn load_level(args: &Args) -> Result<LevelConfig> {
        match &args.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading level file {}", path.display()))?;
                LevelConfig::from_json(&json)
                    .with_context(|| format!("loading level file {}", path.display()))
            }
            None => LevelConfig::builtin(&args.level)
                .with_context(|| format!("loading built-in level {}", args.level)),
        }
    }

    pub fn run(args: Args) -> Result<()> {
        if args.list {
            for id in BUILTIN_LEVELS {
                let level = LevelConfig::builtin(id)?;
                println!("{:<8} {}", level.id, level.title);
            }
            return Ok(());
        }

        let Some(preset) = PacingPreset::parse(&args.pacing) else {
            bail!("unknown pacing '{}'", args.pacing);
        };
        let settings = Settings::from_preset(preset);
        let program = Command::parse_program(&args.program).context("parsing program")?;
        let mut handle = RunHandle::new(load_level(&args)?)?;

        if program.is_empty() {
            log::warn!("Empty program, nothing to run");
            return Ok(());
        }
        handle.start(&program)?;

        let pause = Duration::from_secs_f32(settings.tick_interval());
        let mut outcome = None;
        while let Some(result) = handle.tick() {
            for event in handle.drain_events() {
                match event {
                    RunEvent::Moved { command, pose } => log::info!(
                        "{:<10} -> x={:.2} z={:.2} heading={:.2}",
                        command.as_str(),
                        pose.x,
                        pose.z,
                        pose.heading
                    ),
                    RunEvent::TargetCaptured { name } => log::info!("picked up {}", name),
                    RunEvent::Aborted { message, .. } => log::warn!("{}", message),
                    _ => {}
                }
            }
            if !result.is_continue() {
                outcome = Some(result);
                break;
            }
            if !args.instant {
                std::thread::sleep(pause);
            }
        }

        let (done, total) = handle.objective_progress();
        match outcome {
            Some(ExecutionResult::Completed { collected, .. }) => {
                println!("Level complete! collected: {:?}", collected);
                if let Some(next) = next_level(&handle.config().id) {
                    println!("Next up: {}", next);
                }
            }
            Some(ExecutionResult::Aborted { reason, pose }) => {
                println!("{} (stopped at x={:.2} z={:.2})", reason.message(), pose.x, pose.z);
            }
            Some(result) => {
                let pose = result.pose();
                println!(
                    "Program finished at x={:.2} z={:.2}; objective {}/{}",
                    pose.x, pose.z, done, total
                );
            }
            None => println!("Program finished; objective {}/{}", done, total),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Syntax Saga (native) starting...");
    cli::run(cli::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
