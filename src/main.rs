//! Block Content Label CLI
//!
//! Generates a unique label for a block from its type name and title,
//! checking it against a store of existing labels.

use anyhow::{bail, Result};
use block_label::settings::{find_settings, validate_settings, Settings};
use block_label::{Config, LabelGenerator, LabelStore};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "block-label")]
#[command(author = "Fellow <engineering@fellow.app>")]
#[command(version)]
#[command(about = "Generate unique labels for block content", long_about = None)]
struct Args {
	/// Block type name the prefix is built from (e.g. "Staff Directory")
	#[arg(value_name = "CATEGORY")]
	category: String,

	/// Block title appended after the prefix
	#[arg(value_name = "TITLE")]
	title: String,

	/// Label store: a JSON file or a directory of JSON files (optional if settings have labelStore)
	#[arg(short, long, value_name = "PATH")]
	store: Option<PathBuf>,

	/// Label the block already has; nothing is generated when it is not blank
	#[arg(long, default_value = "")]
	current: String,

	/// Maximum number of existence checks before giving up
	#[arg(long)]
	max_attempts: Option<usize>,

	/// Text placed between prefix and title
	#[arg(long, default_value = ": ")]
	separator: String,

	/// Add the generated label to the store file
	#[arg(short, long)]
	record: bool,

	/// Show what would be recorded without writing the store
	#[arg(short = 'n', long)]
	dry_run: bool,

	/// Print detailed progress
	#[arg(short, long)]
	verbose: bool,

	/// Generate even if the settings disable generation
	#[arg(long)]
	force: bool,

	/// Skip settings validation (use with caution)
	#[arg(long)]
	skip_settings_check: bool,
}

fn main() -> Result<()> {
	let args = Args::parse();

	let default_filter = if args.verbose { "debug" } else { "warn" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
		.init();

	// Find settings
	let cwd = env::current_dir()?;
	let settings = find_settings(&cwd);

	// Validate settings (unless skipped)
	if !args.skip_settings_check {
		if let Some(ref settings) = settings {
			validate_settings(&settings.config_path)?;
		} else {
			eprintln!(
				"Warning: No settings found (block-label.json, or composer.json/package.json with a 'blockLabel' key).\n\
				 Label generation is enabled by default.\n"
			);
		}
	}

	let enabled = args.force
		|| settings
			.as_ref()
			.and_then(|s| s.generate_custom_block_title)
			.unwrap_or(true);

	let config = Config {
		enabled,
		max_attempts: args
			.max_attempts
			.or_else(|| settings.as_ref().and_then(|s| s.max_attempts))
			.unwrap_or(Config::default().max_attempts),
		separator: args.separator.clone(),
	};

	let store = load_store(&args, settings.as_ref())?;

	// Verbose output goes to stderr so stdout carries only the label
	if args.verbose {
		eprintln!("Block Label Generation");
		eprintln!("======================");
		if let Some(ref settings) = settings {
			eprintln!("Settings:     {}", settings.config_path.display());
		}
		match store.source() {
			Some(path) => eprintln!("Label store:  {} ({} labels)", path.display(), store.len()),
			None => eprintln!("Label store:  (none)"),
		}
		eprintln!("Max attempts: {}", config.max_attempts);
	}

	let start_time = Instant::now();
	let generator = LabelGenerator::new(config);
	let generated = generator.fill(&args.current, &args.category, &args.title, |label| {
		store.exists(label)
	})?;
	let total_time = start_time.elapsed();

	let label = match generated {
		Some(label) => label,
		None => {
			if !generator.config().enabled {
				eprintln!("Label generation is disabled by settings; use --force to override.");
			}
			if args.record {
				eprintln!("Warning: No label was generated; nothing recorded.");
			}
			println!("{}", args.current);
			return Ok(());
		}
	};

	if args.record {
		record_label(&store, &label, args.dry_run)?;
	}

	println!("{}", label);

	if args.verbose {
		eprintln!("\nTotal time: {:.2}ms", total_time.as_secs_f64() * 1000.0);
	}

	Ok(())
}

/// Load the store named on the command line, else the one from settings.
fn load_store(args: &Args, settings: Option<&Settings>) -> Result<LabelStore> {
	let path = args
		.store
		.clone()
		.or_else(|| settings.and_then(|s| s.label_store.clone()));

	match path {
		Some(path) => LabelStore::load(&path),
		None => {
			if args.record {
				bail!(
					"--record needs a label store.\n\
					 Either pass one: block-label --store ./labels.json ...\n\
					 Or add labelStore to your settings."
				);
			}
			eprintln!("Warning: No label store given; every label is treated as unused.\n");
			Ok(LabelStore::new())
		}
	}
}

fn record_label(store: &LabelStore, label: &str, dry_run: bool) -> Result<()> {
	let Some(path) = store.source() else {
		bail!("No label store to record into");
	};

	// Checked again against the file as it is now, not the copy loaded above
	LabelStore::record(path, label, dry_run)?;

	if dry_run {
		eprintln!("Would record {:?} in {}", label, path.display());
	}
	Ok(())
}
