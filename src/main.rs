use anyhow::Result;
use clap::Parser;
use pandocpm::application::{InstallOptions, Installer};
use pandocpm::config::Config;
use pandocpm::package::Category;
use std::path::PathBuf;

/// pandocpm - package manager for pandoc filters, templates, etc.
///
/// Packages are looked up in a remote catalog per category and installed
/// into the pandoc data directory (or the directory given with --target).
///
/// Examples:
///   pandocpm install filter debug              # Install the default branch
///   pandocpm install filter debug --replace    # Reinstall over an existing copy
///   pandocpm uninstall filter debug
#[derive(Parser, Debug)]
#[command(author, version = env!("PANDOCPM_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Install on <TARGET> instead of pandoc's data directory
    #[arg(
        long = "target",
        short = 'T',
        env = "PANDOCPM_TARGET",
        value_name = "PATH",
        global = true
    )]
    target: Option<PathBuf>,

    /// Install from an alternative index ('{}' is replaced by e.g. "filters")
    #[arg(
        long = "index_url",
        visible_alias = "index-url",
        short = 'I',
        env = "PANDOCPM_INDEX_URL",
        value_name = "URL",
        global = true
    )]
    index_url: Option<String>,

    /// Installer used for packageManager entries (defaults to pip)
    #[arg(long, env = "PANDOCPM_INSTALLER", value_name = "PROGRAM", global = true)]
    installer: Option<String>,

    /// Show debugging info
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install a package from the index
    Install(InstallArgs),

    /// Remove an installed package
    Uninstall(PackageArgs),

    /// List installed packages of a category
    List(CategoryArgs),

    /// List the packages an index offers for a category
    Search(CategoryArgs),

    /// Show the index entry and remote version of a package
    Info(InfoArgs),
}

#[derive(clap::Args, Debug)]
struct CategoryArgs {
    /// filter, template, etc.
    category: Category,
}

#[derive(clap::Args, Debug)]
struct PackageArgs {
    /// filter, template, etc.
    category: Category,

    /// Name of the package
    name: String,
}

#[derive(clap::Args, Debug)]
struct InstallArgs {
    #[command(flatten)]
    package: PackageArgs,

    /// Install a specific variant of the package
    #[arg(long, short = 'B')]
    branch: Option<String>,

    /// Overwrite existing packages
    #[arg(long, short = 'R')]
    replace: bool,
}

#[derive(clap::Args, Debug)]
struct InfoArgs {
    #[command(flatten)]
    package: PackageArgs,

    /// Variant of the package to show
    #[arg(long, short = 'B')]
    branch: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "warn,pandocpm=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = Config::new(cli.index_url.clone(), cli.installer.clone())?;
    let installer = Installer::new(config);

    match cli.command {
        Commands::Install(args) => {
            let options = InstallOptions {
                branch: args.branch,
                replace: args.replace,
                target: cli.target,
                verbose: cli.verbose,
            };
            installer
                .install(&args.package.name, &args.package.category, &options, None)
                .await?
        }
        Commands::Uninstall(args) => {
            installer
                .uninstall(&args.name, &args.category, cli.target, cli.verbose)
                .await?
        }
        Commands::List(args) => {
            let packages = installer.installed(&args.category, cli.target).await?;
            if packages.is_empty() {
                println!("No {} installed.", args.category.plural());
            }
            for package in packages {
                println!("{} {}", package.name, package.version);
            }
        }
        Commands::Search(args) => {
            let index = installer.available(&args.category).await?;
            for ((name, branch), descriptor) in index.iter() {
                println!(
                    "{} ({}) {} {}",
                    name,
                    branch,
                    descriptor.url_type(),
                    descriptor.url()
                );
            }
        }
        Commands::Info(args) => {
            let info = installer
                .info(&args.package.name, &args.package.category, args.branch.as_deref())
                .await?;
            println!("{} ({})", info.name, info.branch);
            println!("  url-type: {}", info.descriptor.url_type());
            if !info.descriptor.url().is_empty() {
                println!("  url: {}", info.descriptor.url());
            }
            println!("  version: {}", info.remote.version);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_install_parsing() {
        let cli = Cli::try_parse_from([
            "pandocpm", "install", "filter", "debug", "--branch", "dev", "--replace",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.package.category.as_str(), "filter");
                assert_eq!(args.package.name, "debug");
                assert_eq!(args.branch.as_deref(), Some("dev"));
                assert!(args.replace);
            }
            _ => panic!("Expected Install command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pandocpm",
            "uninstall",
            "template",
            "letter",
            "--target",
            "/tmp/data",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.target, Some(PathBuf::from("/tmp/data")));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Uninstall(_)));
    }

    #[test]
    fn test_cli_index_url_spellings() {
        for flag in ["--index_url", "--index-url", "-I"] {
            let cli = Cli::try_parse_from(["pandocpm", "search", "filter", flag, "http://m/{}.yaml"])
                .unwrap();
            assert_eq!(cli.index_url.as_deref(), Some("http://m/{}.yaml"));
        }
    }

    #[test]
    fn test_cli_unsupported_subcommand_fails() {
        let err = Cli::try_parse_from(["pandocpm", "upgrade", "filter", "debug"]).unwrap_err();
        assert!(err.to_string().contains("upgrade"));
    }

    #[test]
    fn test_cli_rejects_invalid_category() {
        assert!(Cli::try_parse_from(["pandocpm", "list", "../etc"]).is_err());
    }
}
