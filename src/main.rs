//! slckn
//!
//! Command-line notifier: resolves a named environment from the YAML
//! config and posts a formatted message to it.

use anyhow::{Context, Result};
use clap::Parser;
use slckn::cli::Cli;
use slckn::config::{ConfigLoader, env_override};
use slckn::logging::{LogTarget, init_logging};
use slckn::notify::{NotifyOutcome, run};
use slckn::sender::sender_for_adapter;
use std::io::Read;
use std::process::ExitCode;

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("read: can not read message from stdin")?;
    Ok(buf.trim_end().to_string())
}

fn try_main(cli: Cli) -> Result<()> {
    let message = match cli.message.clone() {
        Some(message) => message,
        None => read_stdin()?,
    };
    let request = cli.into_request(message);

    let loader = ConfigLoader::default();
    let override_path = env_override();
    match run(&request, &loader, override_path.as_deref(), sender_for_adapter)? {
        NotifyOutcome::Sent(receipt) => {
            println!(
                "Message successfully sent to channel {} at {}",
                receipt.channel, receipt.timestamp
            );
        }
        NotifyOutcome::DryRun(payload) => {
            println!("{}", payload);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&LogTarget::parse(&cli.log), cli.verbose) {
        eprintln!("error: can not initialize logging: {:#}", err);
        return ExitCode::FAILURE;
    }

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
