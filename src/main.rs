use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use docvers::application::{RefreshOptions, list_versions, refresh};
use docvers::docs::AliasPreference;
use docvers::runtime::RealRuntime;

/// docvers - documentation version manager
///
/// Maintains the stable/dev aliases, the per-minor-version symlinks and the
/// browser version manifest for a directory of versioned documentation
/// builds.
///
/// Examples:
///   docvers refresh --root docs --package-version 1.2.3
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Documentation root directory (also via DOCVERS_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "DOCVERS_ROOT",
        value_name = "PATH",
        default_value = "docs",
        global = true
    )]
    root: PathBuf,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Reconcile metadata and refresh the symlinks after a documentation build
    Refresh(RefreshArgs),

    /// List the known documentation versions
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct RefreshArgs {
    /// Version of the package whose documentation was just built
    #[arg(long = "package-version", value_name = "VERSION")]
    pub package_version: String,

    /// Version to pin the "stable" alias to, or "auto"
    #[arg(long, value_name = "VERSION|auto", default_value = "auto")]
    pub stable: AliasPreference,

    /// Version to pin the "dev" alias to, or "auto"
    #[arg(long, value_name = "VERSION|auto", default_value = "auto")]
    pub dev: AliasPreference,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    match cli.command {
        Commands::Refresh(args) => {
            let metadata = refresh(
                &runtime,
                &cli.root,
                &RefreshOptions {
                    package_version: args.package_version,
                    stable: args.stable,
                    dev: args.dev,
                },
            )?;
            let pointer = |v: Option<&docvers::docs::Version>| {
                v.map(ToString::to_string).unwrap_or_else(|| "-".into())
            };
            println!(
                "{} versions, stable: {}, dev: {}",
                metadata.versions.len(),
                pointer(metadata.stable.as_ref()),
                pointer(metadata.dev.as_ref()),
            );
        }
        Commands::List(_args) => {
            for info in list_versions(&runtime, &cli.root)? {
                if info.aliases.is_empty() {
                    println!("{}  ({})", info.version, info.channel);
                } else {
                    println!(
                        "{}  ({}) <- {}",
                        info.version,
                        info.channel,
                        info.aliases.join(", ")
                    );
                }
            }
        }
    }
    Ok(())
}
