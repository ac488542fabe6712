/// Example: Load and view an STL file, such as an exported FD3 model
///
/// Usage: cargo run --example view_stl -- path/to/file.stl

use anyhow::Context;
use fd3_core::{stl, Config, ModelConfig, Poset, StartView};
use fd3_terminal::{Scene, TerminalApp};
use std::env;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();
    config.viewer.start_view = StartView::Model;

    let scene = match args.get(1) {
        Some(stl_path) => {
            println!("Loading STL file: {}", stl_path);
            let mesh = stl::load_stl(stl_path)
                .with_context(|| format!("Failed to load STL file {}", stl_path))?;
            println!("Loaded {} triangles", mesh.len());
            Scene::from_mesh(mesh)
        }
        None => {
            eprintln!("Usage: {} <stl-file>", args[0]);
            eprintln!("\nNo STL file provided, using the FD3 model...");
            let poset = Poset::fd3()?;
            Scene::fd3(&poset, &ModelConfig::default())
        }
    };

    let mut app = TerminalApp::new(scene, config)?;
    app.run()?;
    Ok(())
}
