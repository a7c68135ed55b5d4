//! Siege Arena entry point
//!
//! Runs a headless autopilot session and logs how it went.
//!
//! Usage: `siege-arena [config.json] [--seed N] [--seconds S] [--kind Ranged|Melee|Trapper]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use siege_arena::GameConfig;
    use siege_arena::sim::{
        CharacterKind, Clock, LogEffects, ProgressionEvent, TickInput, World, frame,
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Siege Arena (headless) starting...");

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            log::error!("{msg}");
            std::process::exit(2);
        }
    };

    let mut config = match &args.config_path {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    if let Some(kind) = args.kind {
        config.player.kind = kind;
    }
    let kind: CharacterKind = config.player.kind;

    let mut world = World::new(config, args.seed).with_effects(LogEffects);

    let kills = Rc::new(RefCell::new(0u32));
    let levels = Rc::new(RefCell::new(1u32));
    {
        let kills = kills.clone();
        let levels = levels.clone();
        world.progression.subscribe(move |event| match event {
            ProgressionEvent::ScoreChanged(_) => *kills.borrow_mut() += 1,
            ProgressionEvent::LevelChanged(level) => *levels.borrow_mut() = *level,
            ProgressionEvent::GameOver => log::info!("Game over signalled"),
            _ => {}
        });
    }

    // 60 Hz frames driven by the fixed-step accumulator
    let frame_dt = 1.0 / 60.0;
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut clock = Clock::new();
    let frames = (args.seconds / frame_dt).ceil() as u64;
    for _ in 0..frames {
        frame(&mut world, &mut clock, &input, frame_dt);
        if world.progression.is_game_over() {
            break;
        }
    }

    log::info!(
        "{} session over after {:.1}s: score {}, level {}, lives {}, kills {}, enemies alive {}",
        kind.name(),
        world.time,
        world.progression.score(),
        *levels.borrow(),
        world.progression.lives(),
        *kills.borrow(),
        world.enemies.len(),
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the product on wasm; the host drives `sim::frame`
}

#[cfg(not(target_arch = "wasm32"))]
struct Args {
    config_path: Option<String>,
    seed: u64,
    seconds: f32,
    kind: Option<siege_arena::sim::CharacterKind>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        use siege_arena::sim::CharacterKind;

        let mut parsed = Args {
            config_path: None,
            seed: 0x5EED,
            seconds: 120.0,
            kind: None,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    parsed.seed = value.parse().map_err(|_| format!("bad seed '{value}'"))?;
                }
                "--seconds" => {
                    let value = args.next().ok_or("--seconds needs a value")?;
                    parsed.seconds = value
                        .parse()
                        .map_err(|_| format!("bad duration '{value}'"))?;
                }
                "--kind" => {
                    let value = args.next().ok_or("--kind needs a value")?;
                    parsed.kind = Some(match value.to_ascii_lowercase().as_str() {
                        "ranged" => CharacterKind::Ranged,
                        "melee" => CharacterKind::Melee,
                        "trapper" => CharacterKind::Trapper,
                        _ => return Err(format!("unknown character kind '{value}'")),
                    });
                }
                path if !path.starts_with("--") && parsed.config_path.is_none() => {
                    parsed.config_path = Some(path.to_string());
                }
                other => return Err(format!("unexpected argument '{other}'")),
            }
        }
        Ok(parsed)
    }
}
