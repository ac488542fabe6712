/// FD3 Terminal - the free distributive lattice on three generators
///
/// Shows the Hasse diagram, then the 3D wire-frame model, in the terminal.
/// Controls:
///   - Tab: Switch between diagram and model
///   - M: Solid or wire model, P: Perspective or orthographic
///   - WASD / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - X: Export STL
///   - Q/ESC: Quit

use anyhow::{bail, Context};
use fd3_core::{stl, Config, HasseLayout, Poset, StlFormat, WireframeModel};
use fd3_terminal::{cli, Options, Scene, TerminalApp};
use log::{info, warn};

fn main() -> anyhow::Result<()> {
    // The viewer owns the screen, so only warnings reach stderr by default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => bail!("{message}\n\n{}", cli::USAGE),
    };
    if options.help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let mut config = match &options.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(path) = &options.export {
        config.export.path = path.clone();
    }
    if options.ascii {
        config.export.format = StlFormat::Ascii;
    }

    // Poset diagram stage
    let poset = Poset::fd3().context("Failed to build the FD3 order")?;
    if !poset.is_distributive() {
        warn!("covering table does not generate a distributive lattice");
    }
    info!(
        "FD3: {} elements, {} covers, bottom {:?}, top {:?}",
        poset.len(),
        poset.covers().len(),
        poset.minimum(),
        poset.maximum()
    );

    if let Some(path) = &options.svg {
        let svg = HasseLayout::layered(&poset).to_svg(480.0, 720.0);
        std::fs::write(path, svg)
            .with_context(|| format!("Failed to write SVG {}", path.display()))?;
        println!("Wrote Hasse diagram to {}", path.display());
    }
    if options.dot {
        println!("{}", poset.to_dot());
    }

    // Wire-frame model stage
    if let Err(e) = WireframeModel::fd3().check_embedding(&poset) {
        warn!("3D model does not match the order: {e}");
    }
    let scene = Scene::fd3(&poset, &config.model);

    if options.export.is_some() {
        stl::save_stl(&scene.mesh, &config.export.path, config.export.format)
            .with_context(|| format!("Failed to export {}", config.export.path.display()))?;
        println!(
            "Wrote {} triangles to {}",
            scene.mesh.len(),
            config.export.path.display()
        );
    }

    if options.no_view {
        return Ok(());
    }

    let mut app = TerminalApp::new(scene, config).context("Failed to open the terminal")?;
    app.run().context("Viewer failed")?;

    Ok(())
}
