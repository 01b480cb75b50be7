use clap::Parser;
use llm_console::cli::setup::{build_client, build_controller, load_config_with_overrides};
use llm_console::cli::{
    handle_completions, handle_config_init, health, history, infer, watch, Cli, Commands,
    ConfigCommands, ConnectionArgs,
};
use llm_console::config::ConsoleConfig;
use llm_console::logging::init_tracing;

/// Load config for a proxy-facing command and install the subscriber.
fn prepare(connection: &ConnectionArgs) -> Result<ConsoleConfig, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(connection)?;
    init_tracing(&config.logging)?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Infer(args) => {
            let config = prepare(&args.connection)?;
            let controller = build_controller(&config)?;
            let result = infer::handle_infer(&args, &controller).await;
            controller.shutdown();
            println!("{}", result?);
        }
        Commands::Logs(args) => {
            let config = prepare(&args.connection)?;
            let controller = build_controller(&config)?;
            let result = history::handle_logs(&args, &controller).await;
            controller.shutdown();
            println!("{}", result?);
        }
        Commands::Metrics(args) => {
            let config = prepare(&args.connection)?;
            let controller = build_controller(&config)?;
            let result = history::handle_metrics(&args, &controller).await;
            controller.shutdown();
            println!("{}", result?);
        }
        Commands::Health(args) => {
            let config = prepare(&args.connection)?;
            let api = build_client(&config)?;
            let output = health::handle_health(&args, api.as_ref(), &config.api.base_url).await?;
            println!("{}", output);
        }
        Commands::Watch(args) => {
            let config = prepare(&args.connection)?;
            let controller = build_controller(&config)?;
            watch::run_watch(&args, &config, controller).await?;
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => println!("{}", handle_config_init(&args)?),
        },
        Commands::Completions(args) => handle_completions(&args),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
