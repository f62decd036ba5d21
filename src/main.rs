//! Ring Runner entry point
//!
//! Runs a headless session with the autopilot until the player is defeated
//! or the time limit runs out.
//!
//! Usage: `ring-runner [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser)]
#[command(name = "ring-runner")]
#[command(about = "Run a headless Ring Runner session on autopilot")]
struct Args {
    /// JSON tuning file (stock tuning when omitted)
    tuning: Option<std::path::PathBuf>,
    /// RNG seed (random when omitted)
    seed: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use ring_runner::Tuning;
    use ring_runner::platform::HeadlessHost;
    use ring_runner::sim::{FrameDriver, GameSession};

    /// Host frame time (60 Hz display)
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this many simulated seconds
    const TIME_LIMIT_SECS: u32 = 600;

    env_logger::init();
    log::info!("Ring Runner (headless) starting...");

    let args = Args::parse();
    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut host = HeadlessHost::new();
    host.autopilot = true;
    let mut session = GameSession::launch(&mut host, tuning, seed);
    let mut driver = FrameDriver::new();

    let frames = TIME_LIMIT_SECS * 60;
    let mut elapsed = 0.0f32;
    for _ in 0..frames {
        // Host physics runs at display rate, the core at its fixed step
        host.step_physics(FRAME_DT);
        driver.update(&mut session, &mut host, FRAME_DT);
        elapsed += FRAME_DT;
        if !session.is_live() {
            break;
        }
    }

    println!(
        "seed {}: score {} after {:.1}s (speed {}, {} enemies / {} rings built)",
        seed,
        session.score().score(),
        elapsed,
        session.speed().current(),
        session.spawner(ring_runner::sim::ActorKind::Enemy).pool().constructed(),
        session
            .spawner(ring_runner::sim::ActorKind::Collectible)
            .pool()
            .constructed(),
    );
    match host.transitions.first() {
        Some(t) => println!("-> {} (bus: {:?})", t.scene, host.bus),
        None => println!("time limit reached"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host yet; the library is driven by an embedding engine
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn test_args_optional() {
        let args = Args::try_parse_from(["ring-runner"]).expect("no args is fine");
        assert!(args.tuning.is_none());
        assert!(args.seed.is_none());

        let args = Args::try_parse_from(["ring-runner", "tuning.json", "42"]).expect("valid args");
        assert_eq!(args.tuning.as_deref(), Some(std::path::Path::new("tuning.json")));
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn test_malformed_seed_is_rejected() {
        assert!(Args::try_parse_from(["ring-runner", "tuning.json", "abc"]).is_err());
    }
}
