use crate::prelude::*;
use clap::Parser;

mod engine;
mod error;
mod fill;
mod input;
mod prelude;
mod regions;
mod resolve;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Fill .docx forms by locating their labels, no template required"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "FORMFILL_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Fill a form from a JSON field list and save the result
    Fill(crate::fill::App),

    /// List the paragraphs and table cells a form offers for matching
    Regions(crate::regions::App),

    /// Show where each field would land, without writing anything
    Resolve(crate::resolve::App),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Fill(sub_app) => crate::fill::run(sub_app, app.global),
        SubCommands::Regions(sub_app) => crate::regions::run(sub_app, app.global),
        SubCommands::Resolve(sub_app) => crate::resolve::run(sub_app, app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
