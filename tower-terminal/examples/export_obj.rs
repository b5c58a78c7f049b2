/// Example: Build a tower and export it as OBJ, or view an existing OBJ
///
/// Usage:
///   cargo run --example export_obj -- [params.json] [out.obj]
///   cargo run --example export_obj -- --view tower.obj

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tower_core::{obj, MeshView, TowerBuilder, TowerParameters};
use tower_terminal::TerminalApp;

fn invalid(e: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();

    if let [flag, path] = args.as_slice() {
        if flag == "--view" {
            println!("Loading OBJ file: {}", path);
            let mesh = obj::load_obj(Path::new(path)).map_err(invalid)?;
            println!(
                "Loaded {} vertices, {} triangles",
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            std::thread::sleep(std::time::Duration::from_secs(1));
            let mut app = TerminalApp::with_mesh(mesh)?;
            return app.run();
        }
    }

    let params = match args.first() {
        Some(path) => TowerParameters::load(Path::new(path)).map_err(invalid)?,
        None => {
            eprintln!("No parameter file provided, using defaults...");
            TowerParameters::default()
        }
    };
    let out = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tower.obj"));

    let mut builder = TowerBuilder::new();
    let Some(mesh) = builder.rebuild(&params) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "parameters produced no geometry",
        ));
    };

    obj::save_obj(&out, MeshView::from(mesh.as_ref())).map_err(invalid)?;
    println!(
        "Wrote {} ({} vertices, {} triangles)",
        out.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(())
}
