//! Prints what a legacy collision container turns into once imported.
//!
//! ```text
//! vcollide_inspect props/barrel.phy.bin 1
//! vcollide_inspect --swap --config collision.toml ragdoll.phy.bin 14
//! ```

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use collide_engine::foundation::logging;
use collide_engine::prelude::*;

#[derive(Debug)]
struct InspectOptions {
    file: PathBuf,
    solid_count: usize,
    swap: bool,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<InspectOptions> {
    let matches = Command::new("vcollide_inspect")
        .about("Imports a legacy collision container and prints per-solid mass properties")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Container file to load")
                .required(true),
        )
        .arg(
            Arg::new("solid-count")
                .value_name("SOLID_COUNT")
                .help("Number of solids stored in the container")
                .required(true),
        )
        .arg(
            Arg::new("swap")
                .long("swap")
                .help("Container was written on a machine of the other byte order")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Collision configuration (.toml or .ron)"),
        )
        .get_matches();

    let solid_count = matches
        .get_one::<String>("solid-count")
        .context("missing solid count")?
        .parse()
        .context("solid count must be a non-negative integer")?;

    Ok(InspectOptions {
        file: PathBuf::from(matches.get_one::<String>("file").context("missing file")?),
        solid_count,
        swap: matches.get_flag("swap"),
        config: matches.get_one::<String>("config").map(PathBuf::from),
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<CollisionConfig> {
    match path {
        Some(path) => CollisionConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(CollisionConfig::default()),
    }
}

fn main() -> Result<()> {
    logging::init();
    let options = parse_args()?;
    log::debug!("{:?}", options);

    let config = load_config(options.config.as_ref())?;
    let mut collision = CollisionFacade::new(config).context("invalid collision config")?;

    let data = std::fs::read(&options.file)
        .with_context(|| format!("failed to read {}", options.file.display()))?;
    let vcollide = collision
        .vcollide_load(&data, options.solid_count, options.swap)
        .with_context(|| format!("failed to import {}", options.file.display()))?;

    println!("{}: {} solids", options.file.display(), vcollide.solids.len());
    for (index, &solid) in vcollide.solids.iter().enumerate() {
        let convexes = collision.convexes_in_collide(solid)?;
        println!("solid {index}");
        println!("  convexes:     {}", convexes.len());
        println!("  volume:       {:.3}", collision.collide_volume(solid)?);
        println!("  surface area: {:.3}", collision.collide_surface_area(solid)?);
        let center = collision.collide_mass_center(solid)?;
        println!("  mass center:  ({:.3}, {:.3}, {:.3})", center.x, center.y, center.z);
        let inertia = collision.collide_inertia(solid)?;
        println!("  inertia:      ({:.3}, {:.3}, {:.3})", inertia.x, inertia.y, inertia.z);
        let areas = collision.collide_orthographic_areas(solid)?;
        println!("  drag areas:   ({:.3}, {:.3}, {:.3})", areas.x, areas.y, areas.z);
    }

    if !vcollide.key_values.is_empty() {
        println!("key values:");
        println!("{}", vcollide.key_values);
    }

    collision.vcollide_unload(vcollide)?;
    log::debug!("Released {} convexes", collision.cleanup_released_convexes());
    Ok(())
}
