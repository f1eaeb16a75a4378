use std::path::PathBuf;

use clap::Parser;
use repograph::app::GraphViewerApp;
use repograph::config::LayoutConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON payload with `nodes` and `links` arrays.
    #[arg(long)]
    graph: PathBuf,

    /// Optional TOML file overriding layout defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long)]
    verbose: bool,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "repograph=debug"
    } else {
        "repograph=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = LayoutConfig::load_or_default(args.config.as_deref());
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "repograph",
        options,
        Box::new(move |cc| Ok(Box::new(GraphViewerApp::new(cc, args.graph, config)))),
    )
}
