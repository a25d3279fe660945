use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "asub", version)]
#[command(about = "Monitors an ALSA mixer and prints its volume to stdout whenever it changes")]
#[command(after_help = "Each report is one line: <prefix><volume>, with volume scaled to 0-100.")]
pub struct Cli {
    /// Mixer control name [default: Master]
    #[arg(short = 'm', long = "mixer", value_name = "MIX")]
    pub mixer: Option<String>,

    /// Card to attach to [default: default]
    #[arg(short = 'c', long = "card", value_name = "CARD")]
    pub card: Option<String>,

    /// Microseconds between checks for a volume change [default: 100000]
    #[arg(
        short = 'p',
        long = "precision",
        visible_alias = "poll-interval",
        value_name = "MICROSECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub precision: Option<u64>,

    /// Text printed before each volume
    #[arg(short = 'f', long = "prefix", value_name = "PREFIX", allow_hyphen_values = true)]
    pub prefix: Option<String>,

    /// Print the volume on every check, changed or not
    #[arg(short = 'n', long = "continuous")]
    pub continuous: bool,

    /// Also print the volume read on the very first check
    #[arg(short = 'i', long = "print-initial")]
    pub print_initial: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file [default: $XDG_CONFIG_HOME/asub/config.toml]
    #[arg(long, value_name = "PATH", env = "ASUB_CONFIG")]
    pub config: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Command-line flags take precedence over the file and environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref mixer) = self.mixer {
            config.mixer.name = mixer.clone();
        }
        if let Some(ref card) = self.card {
            config.mixer.card = card.clone();
        }
        if let Some(precision) = self.precision {
            config.monitor.poll_interval_us = precision;
        }
        if let Some(ref prefix) = self.prefix {
            config.monitor.prefix = prefix.clone();
        }
        if self.continuous {
            config.monitor.continuous = true;
        }
        if self.print_initial {
            config.monitor.print_initial = true;
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
