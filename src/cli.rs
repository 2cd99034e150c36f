// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::core::DEFAULT_TICK_MS;

#[derive(Parser, Debug, Clone)]
#[command(name = "maze-viewer")]
#[command(about = "First-person maze viewer", long_about = None)]
pub struct Cli {
    /// World geometry file: one `x y z n m` vertex per line
    #[arg(long, default_value = "assets/world.txt")]
    pub world: PathBuf,

    /// Update/render tick period in milliseconds
    #[arg(long = "tick-ms", default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Initial window width
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Disable the status overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["maze-viewer"]);
        assert_eq!(cli.world, PathBuf::from("assets/world.txt"));
        assert_eq!(cli.tick_ms, 15);
        assert_eq!((cli.width, cli.height), (800, 600));
        assert!(!cli.no_ui);
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from([
            "maze-viewer",
            "--world",
            "levels/big.txt",
            "--tick-ms",
            "30",
            "--no-ui",
        ]);
        assert_eq!(cli.world, PathBuf::from("levels/big.txt"));
        assert_eq!(cli.tick_ms, 30);
        assert!(cli.no_ui);
    }

    #[test]
    fn zero_tick_rejected() {
        assert!(Cli::try_parse_from(["maze-viewer", "--tick-ms", "0"]).is_err());
    }
}
