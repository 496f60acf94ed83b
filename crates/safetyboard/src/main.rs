//! `safetyboard` - terminal front end for the incident dashboard.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use safetyboard::cli::{Cli, Command, ConfigCommand, ListCommand};
use safetyboard::render::{self, RenderStyle};
use safetyboard::shell::Shell;
use safetyboard::{init_logging, Config, Dashboard, IncidentId, SeverityFilter, SortOrder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    // Execute the command
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => handle_run(&config).await,
        Command::List(list_cmd) => handle_list(&config, &list_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_run(config: &Config) -> anyhow::Result<()> {
    let mut shell = Shell::from_config(config, std::io::stdout())?;
    println!("Type 'help' for commands.");
    shell.run(BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::from_config(config)?;
    if let Some(severity) = cmd.severity {
        dashboard.set_filter(SeverityFilter::from(severity));
    }
    if let Some(sort) = cmd.sort {
        dashboard.set_sort(SortOrder::from(sort));
    }
    if cmd.expand_all {
        let ids: Vec<IncidentId> = dashboard.store().incidents().iter().map(|i| i.id).collect();
        for id in ids {
            dashboard.toggle_expanded(id);
        }
    }

    if cmd.json {
        println!("{}", render::render_json(&dashboard.visible())?);
        return Ok(());
    }

    let style = RenderStyle::from(&config.display);
    println!("{}", dashboard.filter_controls().render(style.color));
    println!("{}", dashboard.sort_controls().render(style.color));
    println!();
    print!(
        "{}",
        render::render_incident_list(&dashboard.visible(), dashboard.store().expanded(), &style)
    );
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", config.to_json()?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Dashboard]");
                println!("  Default filter:     {}", config.dashboard.default_filter);
                println!("  Default sort:       {}", config.dashboard.default_sort);
                println!("  Default tab:        {}", config.dashboard.default_tab.as_str());
                println!();
                println!("[Form]");
                println!("  Success notice ms:  {}", config.form.success_notice_ms);
                println!();
                println!("[Seed]");
                match &config.seed.path {
                    Some(path) => println!("  Seed file:          {}", path.display()),
                    None => println!("  Built-in seed:      {}", config.seed.builtin),
                }
                println!();
                println!("[Display]");
                println!("  Color:              {}", config.display.color);
                println!("  Timestamp format:   {}", config.display.timestamp_format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
