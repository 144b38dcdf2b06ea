//! The CLI interface for screenprofile
//!
//! Use the `--help` flag to see the available options.
use std::io;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use screenprofile::{DisplayTool, Profile, STDIO_PROFILE, plan, resolve_path};
use structopt::StructOpt;

/// CLI arguments
#[derive(StructOpt, Debug)]
#[structopt(
    name = "screenprofile",
    about = "Saves and restores multi-monitor layouts using kscreen-doctor."
)]
struct Opts {
    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: SubCommands,
    /// Output debug info
    #[structopt(short, long, global = true)]
    verbose: bool,
    /// The display tool to invoke
    #[structopt(
        long,
        global = true,
        env = "SCREENPROFILE_TOOL",
        default_value = "kscreen-doctor",
        parse(from_os_str)
    )]
    tool: PathBuf,
}

/// Subcommands to select the mode of operation
#[derive(StructOpt, Debug)]
enum SubCommands {
    /// Saves the current layout as a profile
    #[structopt(alias = "snapshot")]
    Save {
        /// Profile name or path, `-` for stdout
        profile: String,
    },
    /// Restores the layout stored in a profile
    Load {
        /// Profile name or path, `-` for stdin
        profile: String,
        /// Print the directives instead of applying them
        #[structopt(short = "n", long)]
        dry_run: bool,
    },
}

/// Entry point for `screenprofile`.
fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    let log_level = if opts.verbose {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level.as_str()))
        .init();

    log::debug!("Parsed Opts:\n{:#?}", opts);

    let tool = DisplayTool::new(opts.tool);

    match opts.cmd {
        SubCommands::Save { profile } => save(&tool, &profile)?,
        SubCommands::Load { profile, dry_run } => load(&tool, &profile, dry_run)?,
    }

    Ok(())
}

fn save(tool: &DisplayTool, name: &str) -> Result<()> {
    let inventory = tool.query_inventory()?;
    let profile = Profile::extract(&inventory)
        .wrap_err_with(|| format!("Failed to build profile {name}"))?;

    if name == STDIO_PROFILE {
        profile.to_writer(io::stdout().lock(), Path::new("<stdout>"))?;
        return Ok(());
    }

    let path = resolve_path(name);
    profile.save(&path)?;
    log::info!(
        "Saved {} screen(s) to profile {}",
        profile.screens.len(),
        path.display()
    );
    Ok(())
}

fn load(tool: &DisplayTool, name: &str, dry_run: bool) -> Result<()> {
    let profile = if name == STDIO_PROFILE {
        Profile::from_reader(io::stdin().lock(), Path::new("<stdin>"))?
    } else {
        Profile::load(&resolve_path(name))?
    };

    let inventory = tool.query_inventory()?;
    let directives =
        plan(&profile, &inventory).wrap_err_with(|| format!("Failed to restore profile {name}"))?;

    if dry_run {
        for directive in &directives {
            println!("{directive}");
        }
        return Ok(());
    }

    tool.apply(&directives)?;
    log::info!("Profile {name} applied");
    Ok(())
}
