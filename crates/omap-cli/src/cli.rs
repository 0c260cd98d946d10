use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "omap",
    about = "Object map inspector: identity, paths and references of a tree fixture",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON tree fixture to load
    #[arg(long, global = true, default_value = "tree.json")]
    pub fixture: PathBuf,

    /// TOML object map configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the navigation tree below a path
    Tree(TreeArgs),
    /// List the objects below a path
    Lookup(LookupArgs),
    /// Count the objects below a path
    Count(LookupArgs),
    /// Show the references of an object
    Refs(PathArgs),
    /// List the objects of an extent
    Extent(ExtentArgs),
    /// Check what removing a subtree would do, without removing it
    Remove(PathArgs),
    /// Write a binary snapshot of the object map
    Snapshot(SnapshotArgs),
}

#[derive(Args)]
pub struct TreeArgs {
    #[arg(default_value = "/")]
    pub path: String,
    #[arg(short, long, default_value_t = omap_core::DEFAULT_NAV_DEPTH)]
    pub depth: usize,
}

#[derive(Args)]
pub struct LookupArgs {
    #[arg(default_value = "/")]
    pub path: String,
    /// Levels below the path to include (all when omitted)
    #[arg(short, long)]
    pub depth: Option<usize>,
    /// Leave out the object at the path itself
    #[arg(long)]
    pub exclude_origin: bool,
}

#[derive(Args)]
pub struct PathArgs {
    pub path: String,
}

#[derive(Args)]
pub struct ExtentArgs {
    /// Type name
    pub name: String,
}

#[derive(Args)]
pub struct SnapshotArgs {
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tree_depth() {
        let cli = Cli::try_parse_from(["omap", "tree", "/docs", "--depth", "3"]).unwrap();
        if let Command::Tree(args) = cli.command {
            assert_eq!(args.path, "/docs");
            assert_eq!(args.depth, 3);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_tree_defaults() {
        let cli = Cli::try_parse_from(["omap", "tree"]).unwrap();
        if let Command::Tree(args) = cli.command {
            assert_eq!(args.path, "/");
            assert_eq!(args.depth, 1);
        } else { panic!("wrong command"); }
        assert_eq!(cli.fixture, PathBuf::from("tree.json"));
        assert!(matches!(cli.format, OutputFormat::Text));
    }

    #[test]
    fn parse_lookup_exclude_origin() {
        let cli = Cli::try_parse_from(["omap", "lookup", "/docs", "--exclude-origin", "-d", "2"]).unwrap();
        if let Command::Lookup(args) = cli.command {
            assert_eq!(args.path, "/docs");
            assert_eq!(args.depth, Some(2));
            assert!(args.exclude_origin);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_count_unbounded() {
        let cli = Cli::try_parse_from(["omap", "count", "/docs"]).unwrap();
        if let Command::Count(args) = cli.command {
            assert_eq!(args.depth, None);
            assert!(!args.exclude_origin);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["omap", "refs", "/docs/a", "--format", "json", "--fixture", "t.json"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.fixture, PathBuf::from("t.json"));
        assert!(matches!(cli.command, Command::Refs(_)));
    }

    #[test]
    fn parse_remove() {
        let cli = Cli::try_parse_from(["omap", "-v", "remove", "/docs/b"]).unwrap();
        assert!(cli.verbose);
        if let Command::Remove(args) = cli.command {
            assert_eq!(args.path, "/docs/b");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn remove_requires_path() {
        assert!(Cli::try_parse_from(["omap", "remove"]).is_err());
    }

    #[test]
    fn parse_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["omap", "--format", "yaml", "tree"]).is_err());
    }
}
