//! Root CLI structure for md3-rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "md3-rs")]
#[command(about = "Command-line tools for Quake III Arena MD3 models", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display information about an MD3 model file
    Info {
        /// Path to the MD3 file
        file: PathBuf,

        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Display MD3 file structure as a tree
    Tree {
        /// Path to the MD3 file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(short, long, default_value = "5")]
        depth: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List the clips of an animation.cfg file
    Anim {
        /// Path to the animation.cfg file
        file: PathBuf,

        /// Lower body model to check the leg and death clips against
        #[arg(long, requires = "upper")]
        lower: Option<PathBuf>,

        /// Upper body model to check the torso and death clips against
        #[arg(long, requires = "lower")]
        upper: Option<PathBuf>,
    },

    /// Bind a skin file to a model and report the result
    Skin {
        /// Path to the MD3 file
        model: PathBuf,

        /// Path to the .skin file
        skin: PathBuf,
    },

    /// Load a character manifest and step its animation
    Play {
        /// Path to the nine-line character manifest
        manifest: PathBuf,

        /// Clip to play, by name (e.g. TORSO_ATTACK) or index
        #[arg(short, long)]
        clip: Option<String>,

        /// Number of update ticks to run
        #[arg(short, long, default_value = "10")]
        ticks: u32,

        /// Seconds per tick
        #[arg(long, default_value = "0.05")]
        dt: f32,
    },

    /// Decode an MD3 file and write it back out
    Rewrite {
        /// Input MD3 file
        input: PathBuf,

        /// Output MD3 file
        output: PathBuf,

        /// Accept files with an unknown version number
        #[arg(long)]
        lenient: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
