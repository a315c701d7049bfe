//! Level authoring tasks for Skratch
//!
//! Usage:
//!   cargo xtask new-level level02 --width 40 --height 15   # Blank level with a floor
//!   cargo xtask check-level level02                        # Verify the three maps agree

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Smallest world that fills a 640x480 window of 32px blocks
const MIN_WIDTH: u8 = 20;
const MIN_HEIGHT: u8 = 15;

const MAPS: [&str; 3] = ["collision.map", "texture.map", "entity.map"];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Level authoring for Skratch")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write blank collision, texture and entity maps
    NewLevel {
        name: String,
        /// Width in blocks
        #[arg(long, default_value_t = MIN_WIDTH)]
        width: u8,
        /// Height in blocks
        #[arg(long, default_value_t = MIN_HEIGHT)]
        height: u8,
        /// Leave out the solid bottom row
        #[arg(long)]
        no_floor: bool,
        /// Overwrite an existing level
        #[arg(long)]
        force: bool,
    },
    /// Check that a level's maps have matching, newline-terminated rows
    CheckLevel { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::NewLevel { name, width, height, no_floor, force } => {
            new_level(&name, width, height, !no_floor, force)
        }
        Commands::CheckLevel { name } => check_level(&level_dir(&name)?),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

fn level_dir(name: &str) -> Result<PathBuf> {
    Ok(project_root()?.join("data").join("levels").join(name))
}

/// Map contents for a blank level, in `MAPS` order.
fn blank_maps(width: u8, height: u8, floor: bool) -> [Vec<u8>; 3] {
    let (w, h) = (width as usize, height as usize);
    let mut collision = vec![width, height, b'\n'];
    let mut texture = Vec::with_capacity((w + 1) * h);
    let mut entity = Vec::with_capacity((w + 1) * h);

    for row in 0..h {
        let solid = floor && row == h - 1;
        let (c, t) = if solid { (b'1', b'1') } else { (b'0', b'0') };
        collision.extend(std::iter::repeat(c).take(w));
        collision.push(b'\n');
        texture.extend(std::iter::repeat(t).take(w));
        texture.push(b'\n');
        entity.extend(std::iter::repeat(b'0').take(w));
        entity.push(b'\n');
    }
    [collision, texture, entity]
}

fn new_level(name: &str, width: u8, height: u8, floor: bool, force: bool) -> Result<()> {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        bail!(
            "{}x{} is smaller than the {}x{} window",
            width, height, MIN_WIDTH, MIN_HEIGHT
        );
    }

    let dir = level_dir(name)?;
    if dir.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", dir.display());
    }
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    for (file, contents) in MAPS.iter().zip(blank_maps(width, height, floor)) {
        let path = dir.join(file);
        std::fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    }

    check_level(&dir)?;
    println!("Created {} ({}x{} blocks) in {}", name, width, height, dir.display());
    Ok(())
}

/// Validate every row of every map against the collision header.
fn check_level(dir: &Path) -> Result<()> {
    let read = |file: &str| -> Result<Vec<u8>> {
        let path = dir.join(file);
        std::fs::read(&path).with_context(|| format!("reading {}", path.display()))
    };

    let collision = read(MAPS[0])?;
    if collision.len() < 3 || collision[2] != b'\n' {
        bail!("{}: bad header", MAPS[0]);
    }
    let (width, height) = (collision[0] as usize, collision[1] as usize);
    check_rows(MAPS[0], &collision[3..], width, height)?;
    for file in &MAPS[1..] {
        check_rows(file, &read(file)?, width, height)?;
    }

    println!("{}: {}x{} ok", dir.display(), width, height);
    Ok(())
}

fn check_rows(file: &str, bytes: &[u8], width: usize, height: usize) -> Result<()> {
    let mut rows = bytes.split_inclusive(|&b| b == b'\n');
    for row in 0..height {
        let Some(line) = rows.next() else {
            bail!("{}: only {} of {} rows", file, row, height);
        };
        if line.last() != Some(&b'\n') {
            bail!("{}: row {} has no newline", file, row);
        }
        if line.len() - 1 != width {
            bail!("{}: row {} is {} wide, expected {}", file, row, line.len() - 1, width);
        }
    }
    Ok(())
}
