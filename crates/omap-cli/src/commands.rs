use std::collections::BTreeSet;
use std::fs;

use anyhow::Context;
use colored::Colorize;
use omap_core::{IntegrityError, NavNode, ObjectId, ObjectMap, ObjectPath, OmapError};
use serde_json::json;

use crate::cli::*;
use crate::fixture::{parse_path, read_config, Fixture};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = read_config(cli.config.as_deref())?;
    let map = Fixture::read(&cli.fixture)?.build(config)?;
    let json = matches!(cli.format, OutputFormat::Json);

    match cli.command {
        Command::Tree(args) => cmd_tree(&map, args, json),
        Command::Lookup(args) => cmd_lookup(&map, args, json),
        Command::Count(args) => cmd_count(&map, args, json),
        Command::Refs(args) => cmd_refs(&map, args, json),
        Command::Extent(args) => cmd_extent(&map, args, json),
        Command::Remove(args) => cmd_remove(&map, args, json),
        Command::Snapshot(args) => cmd_snapshot(&map, args),
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Live `(oid, path)` pairs for `oids`, sorted by path.
fn located(map: &ObjectMap, oids: &BTreeSet<ObjectId>) -> Vec<(ObjectId, ObjectPath)> {
    let mut rows: Vec<(ObjectId, ObjectPath)> = oids
        .iter()
        .filter_map(|oid| map.path_for(*oid).map(|path| (*oid, path.clone())))
        .collect();
    rows.sort_by(|a, b| a.1.cmp(&b.1));
    rows
}

fn rows_json(rows: &[(ObjectId, ObjectPath)]) -> serde_json::Value {
    rows.iter()
        .map(|(oid, path)| json!({ "oid": oid.get(), "path": path.to_string() }))
        .collect()
}

fn print_rows(rows: &[(ObjectId, ObjectPath)]) {
    for (oid, path) in rows {
        println!("  {:>20}  {}", oid.to_string().dimmed(), path);
    }
}

fn nav_json(nodes: &[NavNode]) -> serde_json::Value {
    nodes
        .iter()
        .map(|node| {
            json!({
                "path": node.path.to_string(),
                "name": node.name,
                "children": nav_json(&node.children),
            })
        })
        .collect()
}

fn print_nav(nodes: &[NavNode], indent: usize) {
    for node in nodes {
        println!("{}{}", "  ".repeat(indent), node.name.bold());
        print_nav(&node.children, indent + 1);
    }
}

fn cmd_tree(map: &ObjectMap, args: TreeArgs, json: bool) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    let nodes = map.navtree(&path, args.depth)?;
    if json {
        return print_json(&json!({ "path": path.to_string(), "children": nav_json(&nodes) }));
    }
    println!("{}", path.to_string().cyan().bold());
    print_nav(&nodes, 1);
    Ok(())
}

fn cmd_lookup(map: &ObjectMap, args: LookupArgs, json: bool) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    let oids = map.pathlookup(&path, args.depth, !args.exclude_origin)?;
    let rows = located(map, &oids);
    if json {
        return print_json(&rows_json(&rows));
    }
    if rows.is_empty() {
        println!("No objects under {}.", path.to_string().cyan());
    } else {
        println!("{} object(s) under {}:", rows.len().to_string().bold(), path.to_string().cyan());
        print_rows(&rows);
    }
    Ok(())
}

fn cmd_count(map: &ObjectMap, args: LookupArgs, json: bool) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    let count = map.pathcount(&path, args.depth, !args.exclude_origin)?;
    if json {
        return print_json(&json!({ "path": path.to_string(), "count": count }));
    }
    println!("{}", count);
    Ok(())
}

fn cmd_refs(map: &ObjectMap, args: PathArgs, json: bool) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    let summary = map.references(&path)?;
    if json {
        let rows: serde_json::Value = summary
            .iter()
            .map(|row| {
                json!({
                    "reftype": row.reftype.name(),
                    "source_integrity": row.reftype.source_integrity(),
                    "target_integrity": row.reftype.target_integrity(),
                    "targets": row.targets.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "sources": row.sources.iter().map(ToString::to_string).collect::<Vec<_>>(),
                })
            })
            .collect();
        return print_json(&rows);
    }
    if summary.is_empty() {
        println!("{} has no references.", path.to_string().cyan());
        return Ok(());
    }
    for row in &summary {
        println!("{}", row.reftype.name().yellow().bold());
        for target in &row.targets {
            println!("  {} {}", "->".green(), target);
        }
        for source in &row.sources {
            println!("  {} {}", "<-".blue(), source);
        }
    }
    Ok(())
}

fn cmd_extent(map: &ObjectMap, args: ExtentArgs, json: bool) -> anyhow::Result<()> {
    let oids = map.get_extent_or(&args.name, BTreeSet::new());
    let rows = located(map, &oids);
    if json {
        return print_json(&rows_json(&rows));
    }
    println!("{} {} object(s)", args.name.yellow().bold(), rows.len());
    print_rows(&rows);
    Ok(())
}

/// Outcome of a dry-run removal.
#[derive(Debug)]
enum RemovalCheck {
    /// The objects the removal would take out, sorted by path.
    Allowed(Vec<(ObjectId, ObjectPath)>),
    Blocked {
        error: IntegrityError,
        blocking: Vec<ObjectPath>,
    },
}

/// Run `remove_checked` for `path` against a copy of `map`.
fn check_removal(map: &ObjectMap, path: &ObjectPath) -> anyhow::Result<RemovalCheck> {
    let mut scratch = map.clone();
    match scratch.remove_checked(path) {
        Ok(removed) => Ok(RemovalCheck::Allowed(located(map, &removed))),
        Err(OmapError::Integrity(error)) => {
            let blocking = error.blocking_paths(map);
            Ok(RemovalCheck::Blocked { error, blocking })
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_remove(map: &ObjectMap, args: PathArgs, json: bool) -> anyhow::Result<()> {
    let path = parse_path(&args.path)?;
    match check_removal(map, &path)? {
        RemovalCheck::Allowed(rows) => {
            if json {
                return print_json(&json!({ "allowed": true, "removed": rows_json(&rows) }));
            }
            println!(
                "{} Removing {} would remove {} object(s)",
                "✓".green().bold(),
                path.to_string().cyan(),
                rows.len()
            );
            print_rows(&rows);
        }
        RemovalCheck::Blocked { error, blocking } => {
            if json {
                return print_json(&json!({
                    "allowed": false,
                    "error": error.to_string(),
                    "blocked_by": blocking.iter().map(ToString::to_string).collect::<Vec<_>>(),
                }));
            }
            println!("{} Removing {} is blocked: {}", "✗".red().bold(), path.to_string().cyan(), error);
            for path in &blocking {
                println!("  {} {}", "blocking".dimmed(), path);
            }
        }
    }
    Ok(())
}

fn cmd_snapshot(map: &ObjectMap, args: SnapshotArgs) -> anyhow::Result<()> {
    let bytes = map.to_snapshot()?;
    fs::write(&args.out, &bytes)
        .with_context(|| format!("writing snapshot {}", args.out.display()))?;
    println!(
        "{} Wrote {} bytes ({} objects) to {}",
        "✓".green().bold(),
        bytes.len(),
        map.len(),
        args.out.display()
    );
    Ok(())
}
