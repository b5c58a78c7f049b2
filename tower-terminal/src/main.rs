/// Tower Terminal - Live parametric tower in the terminal
///
/// Usage: tower-terminal [params.json]
///
/// Controls:
///   - +/-: Floor count
///   - [/]: Top twist
///   - ,/.: Polygon sides
///   - e/s: Cycle twist / scale easing
///   - g: Toggle the Bezier scale graph
///   - x: Export tower.obj
///   - Arrow Keys: Tilt the view
///   - Space: Pause spin
///   - Q/ESC: Quit

use std::env;
use std::io;
use std::path::Path;
use tower_core::TowerParameters;
use tower_terminal::TerminalApp;

fn main() -> io::Result<()> {
    env_logger::init();

    let params = match env::args().nth(1) {
        Some(path) => TowerParameters::load(Path::new(&path))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
        None => TowerParameters::default(),
    };
    log::info!(
        "starting with {} floors, {} sides",
        params.floor_count,
        params.effective_segment_count()
    );

    println!("Tower Terminal Renderer - Loading...");
    std::thread::sleep(std::time::Duration::from_millis(500));

    // Run the terminal app
    let mut app = TerminalApp::new(params)?;
    app.run()?;

    println!("Thank you for using Tower Terminal Renderer!");
    Ok(())
}
