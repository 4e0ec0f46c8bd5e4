use clap::Parser;
use js_mailer_client::cli::commands::{GlobalOptions, cmd_ping, cmd_send, cmd_token};
use js_mailer_client::cli::config::{Cli, Commands, load_config};
use js_mailer_client::logging::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    let global = GlobalOptions {
        base_url: cli.base_url.as_deref(),
        origin: cli.origin.as_deref(),
        trace: cli.trace.as_deref(),
    };

    match &cli.command {
        Commands::Ping => cmd_ping(&config, &global)?,
        Commands::Token { form_id } => cmd_token(&config, &global, form_id.as_deref())?,
        Commands::Send {
            page,
            form_id,
            selector,
            fields,
            output,
        } => {
            let sent = cmd_send(
                &config,
                &global,
                page,
                form_id.as_deref(),
                selector.as_deref(),
                fields,
                output.as_deref(),
            )?;
            if !sent {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
