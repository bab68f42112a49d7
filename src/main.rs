//! Brachisto entry point
//!
//! On the web everything runs through `platform::web`. Natively this prints a
//! race table and plays one run with synthetic frame deltas.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brachisto (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match load_settings(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Could not load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => brachisto::Settings::default(),
    };

    if let Err(e) = run(settings) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> Result<brachisto::Settings, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(brachisto::Settings::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn run(settings: brachisto::Settings) -> brachisto::SimResult<()> {
    use brachisto::sim::{SessionPhase, SimulationSession};

    const FRAME_DT: f64 = 1.0 / 60.0;

    let points = settings.default_points;
    let board = brachisto::race(&points, &settings)?;

    println!(
        "A = ({:.3}, {:.3})  B = ({:.3}, {:.3})  g = {}  N = {}",
        points.a.x, points.a.y, points.b.x, points.b.y, settings.gravity, settings.samples
    );
    println!("{:<4} {:<14} {:>12} {:>10}  note", "rank", "curve", "time (s)", "length");
    for (i, entry) in board.entries.iter().enumerate() {
        let time = entry
            .time
            .map_or_else(|| "infeasible".to_string(), |t| format!("{:.6}", t));
        let note = if entry.used_fallback {
            format!("drawn as {}", entry.drawn_kind.as_str())
        } else {
            String::new()
        };
        println!(
            "{:<4} {:<14} {:>12} {:>10.4}  {}",
            i + 1,
            entry.kind.as_str(),
            time,
            entry.length,
            note
        );
    }

    let mut session = SimulationSession::new(settings)?;
    session.start()?;
    let mut frames = 0u32;
    while session.advance(FRAME_DT) == SessionPhase::Running {
        frames += 1;
        if frames % 10 == 0 {
            if let Some(ball) = session.ball() {
                log::debug!(
                    "t={:.3}s ball=({:.4}, {:.4})",
                    session.current_time(),
                    ball.x,
                    ball.y
                );
            }
        }
    }
    println!(
        "Animated {} in {} frames ({:.4}s)",
        session.settings().kind.as_str(),
        frames + 1,
        session.current_time()
    );

    Ok(())
}
