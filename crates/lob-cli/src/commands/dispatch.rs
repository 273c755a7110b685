use lob_config::ProbeConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, config: ProbeConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Reset => commands::reset::handle(&config, flags),
        Commands::Generate(args) => commands::generate::handle(&args, &config, flags).await,
        Commands::Seed => commands::seed::handle(&config, flags).await,
        Commands::Reopen(args) => commands::reopen::handle(&args, config, flags).await,
        Commands::Growth(args) => commands::growth::handle(&args, config, flags).await,
    }
}
