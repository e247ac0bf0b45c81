// use log crate
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use error::CliError;
use hopper_config::{LoadConfiguration, LootConfig};
use hopper_util::{
    math::vector3::Vector3,
    random::{RandomGenerator, get_seed},
};
use hopper_world::{
    LootError,
    inventory::{Container, SimpleContainer},
    item::{ItemRegistry, ItemStack},
    loot::{LootContext, LootTable, LootTableRegistry},
};
use world::LoggingWorld;

mod error;
mod logging;
mod world;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Item and enchantment definitions
    #[arg(short, long)]
    items: PathBuf,
    /// Loot table definition, registered under its file name without extension
    #[arg(short, long = "table", required = true)]
    tables: Vec<PathBuf>,
    /// Seed for reproducible rolls
    #[arg(short, long)]
    seed: Option<u64>,
    /// Directory holding `config/loot.toml`
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Roll a table and list what came out
    Roll {
        table: String,
        #[arg(short = 'n', long, default_value_t = 1)]
        times: u32,
    },
    /// Fill a simulated container with one roll
    Fill {
        table: String,
        #[arg(long, default_value_t = 27)]
        size: usize,
    },
    /// Drop one roll into a simulated world
    Spawn {
        table: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = LootConfig::load(&cli.config_dir);
    logging::init_log(
        &config
            .as_ref()
            .map(|config| config.logging.clone())
            .unwrap_or_default(),
    );

    match config.map_err(CliError::from).and_then(|config| run(cli, &config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn table_name(path: &Path) -> Result<String, CliError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CliError::TableName(path.to_path_buf()))
}

pub(crate) fn describe_stack(stack: &ItemStack) -> String {
    let mut description = format!("{} x {}", stack.item_count, stack.item.id);
    if let Some(name) = &stack.custom_name {
        description.push_str(&format!(" \"{name}\""));
    }
    if stack.has_durability() && stack.damage > 0 {
        description.push_str(&format!(" damage {}", stack.damage));
    }
    if !stack.enchantments.is_empty() {
        let enchantments: Vec<String> = stack
            .enchantments
            .iter()
            .map(|enchantment| format!("{} {}", enchantment.id, enchantment.level))
            .collect();
        description.push_str(&format!(" [{}]", enchantments.join(", ")));
    }
    description
}

fn load_tables(
    paths: &[PathBuf],
    rules: &ItemRegistry,
) -> Result<LootTableRegistry, CliError> {
    let registry = LootTableRegistry::new();
    for path in paths {
        registry.create(&table_name(path)?, &read(path)?, rules)?;
    }
    Ok(registry)
}

fn run(cli: Cli, config: &LootConfig) -> Result<(), CliError> {
    let rules = ItemRegistry::from_json(&read(&cli.items)?)?;
    let registry = load_tables(&cli.tables, &rules)?;
    log::info!("Loaded loot tables {}", registry.ids().join(", "));

    let seed = cli.seed.unwrap_or_else(get_seed);
    log::info!("Rolling with seed {seed}");
    let mut random = RandomGenerator::seeded(seed);
    let mut context = LootContext::new(&registry, &rules, config, &mut random);

    let lookup = |id: &str| -> Result<std::sync::Arc<LootTable>, CliError> {
        registry
            .get(id)
            .ok_or_else(|| LootError::UnknownTable(id.to_string()).into())
    };

    match cli.command {
        Command::Roll { table, times } => {
            let table = lookup(&table)?;
            for roll in 1..=times {
                let items = table.roll(&mut context)?;
                log::info!("Roll {roll} of {:?}: {} stacks", table.id(), items.len());
                for stack in &items {
                    log::info!("  {}", describe_stack(stack));
                }
            }
        }
        Command::Fill { table, size } => {
            let mut container = SimpleContainer::new(size);
            lookup(&table)?.fill(&mut container, &mut context)?;
            for (slot, stack) in container.slots().iter().enumerate() {
                if let Some(stack) = stack {
                    log::info!("Slot {slot:>3}: {}", describe_stack(stack));
                }
            }
            log::info!(
                "{} of {size} slots used",
                size - container.empty_slots()
            );
        }
        Command::Spawn { table, x, y, z } => {
            let mut world = LoggingWorld::default();
            let entities =
                lookup(&table)?.spawn(&mut world, Vector3::new(x, y, z), &mut context)?;
            log::info!("Spawned {} item entities", entities.len());
        }
    }
    Ok(())
}
