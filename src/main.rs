use works_dashboard::config::Config;
use works_dashboard::detail::{DetailPanel, DetailSurface, MiniMap};
use works_dashboard::pipeline::Dashboard;
use works_dashboard::render::GeoJsonSurface;
use works_dashboard::selection::{FilterForm, SelectionState};
use works_dashboard::store::FeatureStore;
use works_dashboard::MyResult;

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "works-dashboard")]
struct Opt {
    /// JSON config file; defaults are used for everything it leaves out
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// GeoJSON file with the point features
    #[structopt(long, parse(from_os_str))]
    points: Option<PathBuf>,
    /// GeoJSON file with the line features
    #[structopt(long, parse(from_os_str))]
    lines: Option<PathBuf>,
    /// GeoJSON file with the municipal boundaries
    #[structopt(long, parse(from_os_str))]
    boundaries: Option<PathBuf>,
    /// Width of the target viewport in css pixels
    #[structopt(long)]
    viewport_width: Option<u32>,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Prints the options of every enabled facet as JSON
    Facets,
    /// Filters the features and writes the rendered layers as GeoJSON
    Filter {
        /// Selected value as facet=value, may be repeated
        #[structopt(short, long = "select")]
        select: Vec<String>,
        /// Directory the layers are written into
        #[structopt(long, default_value = "rendered", parse(from_os_str))]
        out_dir: PathBuf,
    },
    /// Prints the detail panel of one record
    Detail {
        /// Feature id
        id: String,
    },
}

/// Detail surface printing to stdout.
struct Terminal;

impl DetailSurface for Terminal {
    fn is_mounted(&self) -> bool {
        true
    }

    fn show(&mut self, panel: &DetailPanel, mini_map: &MiniMap) {
        print!("{}", panel);
        if let Some(bounds) = mini_map.bounds {
            println!(
                "  Mapa: [{:.5}, {:.5}] - [{:.5}, {:.5}]",
                bounds.south_west[1], bounds.south_west[0], bounds.north_east[1], bounds.north_east[0]
            );
        }
    }
}

fn load_config(opt: &Opt) -> MyResult<Config> {
    let mut config = match opt.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(ref p) = opt.points {
        config.points_path = p.clone();
    }
    if let Some(ref p) = opt.lines {
        config.lines_path = p.clone();
    }
    if let Some(ref p) = opt.boundaries {
        config.boundaries_path = p.clone();
    }
    if let Some(w) = opt.viewport_width {
        config.viewport_width = w;
    }
    Ok(config)
}

fn load_store(config: &Config) -> MyResult<FeatureStore> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]"));
    spinner.set_message("loading GeoJSON");
    spinner.enable_steady_tick(100);

    let store = FeatureStore::load(
        config.points_path.as_path(),
        config.lines_path.as_path(),
        config.boundaries_path.as_path(),
    );
    spinner.finish_and_clear();
    Ok(store?)
}

fn main() -> MyResult<()> {
    env_logger::init();

    let opt = Opt::from_args();
    let config = load_config(&opt)?;

    // parse the selection before spending time on loading
    let selection = match opt.command {
        Command::Filter { ref select, .. } => SelectionState::from_pairs(select)?,
        _ => SelectionState::new(),
    };

    let store = load_store(&config)?;

    let mut dashboard = Dashboard::new(config, FilterForm::new(), GeoJsonSurface::new());
    dashboard.initialize(store);

    match opt.command {
        Command::Facets => {
            let options = dashboard.facet_options();
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
        Command::Filter { out_dir, .. } => {
            for (facet, values) in selection.active() {
                dashboard.selection.select(facet, values.iter().cloned());
            }
            if let Some(summary) = dashboard.apply_filters() {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            info!("writing rendered layers to \"{}\"", out_dir.display());
            dashboard.surface.write_to(&out_dir)?;
        }
        Command::Detail { id } => {
            dashboard.open_detail(&id, &mut Terminal)?;
        }
    }

    Ok(())
}
