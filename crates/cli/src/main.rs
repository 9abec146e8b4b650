//! `cfgtree` command-line inspector.
//!
//! Parses configuration files with the same loader applications use, so
//! syntax errors and section layout can be checked before deployment.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "cfgtree")]
#[command(about = "Inspect and validate indentation-based configuration files")]
struct Args {
	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Parse a file and report whether it is valid
	Check {
		/// Configuration file
		file: PathBuf,
	},
	/// Print the normalized tree
	Dump {
		/// Configuration file
		file: PathBuf,
		/// Only print this top-level section
		#[arg(short, long)]
		key: Option<String>,
	},
	/// Print the value at a dotted path such as `servers.0.host`
	Get {
		/// Configuration file
		file: PathBuf,
		/// Dotted path into the tree
		path: String,
	},
	/// List top-level sections with their kinds
	Keys {
		/// Configuration file
		file: PathBuf,
	},
}

fn main() -> ExitCode {
	let args = Args::parse();
	setup_tracing(args.verbose);
	debug!(command = ?args.command, "running");

	let result = match &args.command {
		Command::Check { file } => commands::check(file),
		Command::Dump { file, key } => commands::dump(file, key.as_deref()),
		Command::Get { file, path } => commands::get(file, path),
		Command::Keys { file } => commands::keys(file),
	};

	match result {
		Ok(output) => {
			print!("{output}");
			ExitCode::SUCCESS
		}
		Err(error) => {
			eprintln!("error: {error:#}");
			ExitCode::FAILURE
		}
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("cfgtree=trace,debug")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
