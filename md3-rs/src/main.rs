//! Main entry point for the md3-rs CLI

mod cli;
mod commands;
mod utils;

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    match cli.command {
        Commands::Info { file, detailed } => commands::model::handle_info(file, detailed),
        Commands::Tree {
            file,
            depth,
            no_color,
        } => commands::model::handle_tree(file, depth, no_color),
        Commands::Anim { file, lower, upper } => commands::anim::handle_anim(file, lower, upper),
        Commands::Skin { model, skin } => commands::skin::handle_skin(model, skin),
        Commands::Play {
            manifest,
            clip,
            ticks,
            dt,
        } => commands::play::handle_play(manifest, clip, ticks, dt),
        Commands::Rewrite {
            input,
            output,
            lenient,
        } => commands::model::handle_rewrite(input, output, lenient),
        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
