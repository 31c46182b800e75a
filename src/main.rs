use clap::Parser;
use oracle::cli::{ask, health, handle_completions, handle_config_init, Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ask(args) => match ask::run_ask(args).await {
            Ok(result) if result.success => Ok(()),
            // The answer (or failure message) has already been printed
            Ok(_) => std::process::exit(1),
            Err(e) => Err(e),
        },
        Commands::Serve(args) => oracle::cli::serve::run_serve(args).await,
        Commands::Health(args) => match health::handle_health(&args).await {
            Ok((output, healthy)) => {
                println!("{}", output);
                if !healthy {
                    std::process::exit(1);
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
