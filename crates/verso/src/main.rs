use clap::Parser;
use relm4::prelude::*;
use verso::config;
use verso::gui::app::AppModel;
use verso::gui::assets::AssetCache;
use verso::sys::runtime;
use verso_core::Variant;

#[derive(Parser, Debug)]
#[command(version, about = "Two layers of panels you can flip through in 3D")]
struct Args {
    /// Preset to use instead of the configured one (gallery, orbit, drift).
    #[arg(long)]
    variant: Option<Variant>,

    /// Write the default config file and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.write_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut scene = config::load_scene(args.variant)?;
    let assets = AssetCache::load(&mut scene);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    // gtk must not see our flags
    let app = RelmApp::new("org.verso.viewer").with_args(Vec::new());

    app.run::<AppModel>((scene, assets, args.variant, rx));
    Ok(())
}
