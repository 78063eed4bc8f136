//! `resumeforge` - CLI and HTTP server entry point.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use resumeforge::cli::{Cli, Command, ConfigCommand, ListCommand, ShowCommand};
use resumeforge::{init_logging, server, AppState, Config, Error, ResumeStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(cmd) => {
            let mut config = config;
            if let Some(bind) = cmd.bind {
                config.server.bind = bind;
            }
            let addr = config.bind_addr()?;
            let state = AppState::from_config(&config)?;
            server::listen(state, addr).await?;
        }
        Command::Show(cmd) => handle_show(&config, &cmd)?,
        Command::List(cmd) => handle_list(&config, &cmd)?,
        Command::Export(cmd) => {
            let state = AppState::from_config(&config)?;
            let resume = state
                .store
                .get(cmd.id)?
                .ok_or(Error::NotFound { id: cmd.id })?;
            let path = state.generate_document(&resume).await?;
            println!("{}", path.display());
        }
        Command::Config(cmd) => handle_config(&config, cmd)?,
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let store = ResumeStore::open(config.database_path())?;
    let resume = store
        .get(cmd.id)?
        .ok_or(Error::NotFound { id: cmd.id })?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&resume)?);
        return Ok(());
    }

    let r = &resume.fields;
    println!("Resume #{}", resume.id);
    println!("==========");
    println!("Name:         {}", r.name);
    println!("Email:        {}", r.email);
    println!("Phone:        {}", r.phone);
    println!("Date of birth: {}", r.dob);
    println!("Address:      {}", r.address);
    println!("Nationality:  {}", r.nationality);
    println!("LinkedIn:     {}", r.linkedin);
    println!("Skills:       {}", r.skills.join(", "));
    println!("Languages:    {}", r.languages.join(", "));
    println!("Hobbies:      {}", r.hobbies.join(", "));
    println!("Submitted:    {}", r.date);
    println!("Photo:        {}", if r.photo.is_empty() { "-" } else { r.photo.as_str() });
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = ResumeStore::open(config.database_path())?;
    let resumes = store.list_recent(cmd.limit)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&resumes)?);
        return Ok(());
    }

    if resumes.is_empty() {
        println!("No resumes stored.");
        return Ok(());
    }
    println!("{:>6}  {:<10}  {:<28}  EMAIL", "ID", "DATE", "NAME");
    for r in resumes {
        println!("{:>6}  {:<10}  {:<28}  {}", r.id, r.date, r.name, r.email);
    }
    println!();
    println!("{} total", store.count()?);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind:               {}", config.server.bind);
                println!("  Max body bytes:     {}", config.server.max_body_bytes);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Uploads dir:        {}", config.uploads_dir().display());
                println!("  Generated dir:      {}", config.generated_dir().display());
                println!();
                println!("[Export]");
                println!("  Program:            {}", config.export.program);
                println!("  Args:               {}", config.export.args.join(" "));
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
