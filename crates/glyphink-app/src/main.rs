//! Main application entry point.

use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting GlyphInk");

    let cli = glyphink_app::Cli::parse();
    glyphink_app::run(cli, &mut std::io::stdout().lock())
}
