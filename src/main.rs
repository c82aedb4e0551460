use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use avl_steps::{parse_script, AvlTree, Layout, LayoutConfig, Op, Step};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "avl-steps",
    about = "Replay AVL tree inserts and deletes step by step",
    after_help = "Operations: insert:KEY, i:KEY, delete:KEY, d:KEY, or a bare KEY (insert)."
)]
struct Cli {
    /// Operations to apply, in order, after any script file.
    #[arg(value_name = "OP")]
    ops: Vec<Op<i64>>,

    /// Read operations from a file (whitespace or comma separated, `#` comments).
    #[arg(long, short = 's')]
    script: Option<PathBuf>,

    /// Print only the final shape after each operation.
    #[arg(long)]
    final_only: bool,

    /// Print node coordinates for the final tree.
    #[arg(long)]
    layout: bool,

    /// More logging (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Script file ops first, then the command-line ones.
fn load_ops(script: Option<&Path>, trailing: &[Op<i64>]) -> Result<Vec<Op<i64>>> {
    let mut ops = Vec::new();
    if let Some(path) = script {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        ops = parse_script(&text)
            .with_context(|| format!("failed to parse script {}", path.display()))?;
    }
    ops.extend(trailing.iter().cloned());
    Ok(ops)
}

/// The steps to print and the index of the first one within `steps`.
fn visible_steps<K>(steps: &[Step<K>], final_only: bool) -> (usize, &[Step<K>]) {
    let start = if final_only {
        steps.len().saturating_sub(1)
    } else {
        0
    };
    (start, &steps[start..])
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ops = load_ops(cli.script.as_deref(), &cli.ops)?;
    info!(count = ops.len(), "replaying operations");

    let mut tree = AvlTree::new();
    for op in ops {
        let label = op.to_string();
        let changed = tree.apply(op);
        println!("== {label}{}", if changed { "" } else { " (no change)" });

        let steps = tree.steps();
        let (offset, shown) = visible_steps(steps, cli.final_only);
        for (i, step) in shown.iter().enumerate() {
            println!("[{}/{}] {}", offset + i + 1, steps.len(), step);
        }
    }

    if cli.layout {
        let snapshot = tree.snapshot();
        let layout = Layout::compute(&snapshot, &LayoutConfig::default());
        println!("== layout");
        for node in layout.nodes() {
            println!("{:>6} at ({:.1}, {:.1})", node.key, node.x, node.y);
        }
    }

    Ok(())
}
