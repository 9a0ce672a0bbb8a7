//! Quantum Sandbox native entry point
//!
//! Runs a headless single-player session and prints a JSON summary. The
//! browser build is driven from `web.rs` instead.
//!
//! Usage: `quantum-sandbox [ticks] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use quantum_sandbox::Settings;
    use quantum_sandbox::sim::{GameMode, SimulationContext};

    env_logger::init();
    log::info!("Quantum Sandbox (native) starting...");

    let mut args = std::env::args().skip(1);
    let ticks: u64 = match args.next() {
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("usage: quantum-sandbox [ticks] [settings.json]");
                std::process::exit(2);
            }
        },
        None => 600,
    };
    let settings = match args.next() {
        Some(path) => Settings::load_from(std::path::Path::new(&path)),
        None => Settings::default(),
    };
    match settings.to_json() {
        Ok(json) => log::debug!("Effective settings:\n{}", json),
        Err(e) => log::warn!("Failed to serialize settings: {}", e),
    }

    let seed = match settings.seed {
        0 => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(1),
        seed => seed,
    };

    let mut ctx = SimulationContext::new(settings, seed);
    ctx.start_game(GameMode::Single);

    for _ in 0..ticks {
        ctx.update_game();
        for event in ctx.drain_events() {
            println!("[tick {}] {}", ctx.time_ticks, event);
        }
    }

    match serde_json::to_string_pretty(&ctx.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
