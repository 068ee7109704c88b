pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "budget-userservice")]
#[command(about = "Budget user service - accounts, tokens and per-user budgets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP service (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Generate an Ed25519 signing key pair")]
    Keygen(commands::keygen::KeygenArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve(Default::default())) {
        Commands::Serve(args) => commands::serve::handle(args).await,
        Commands::Keygen(args) => commands::keygen::handle(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["budget-userservice"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["budget-userservice", "serve", "--host", "0.0.0.0", "--port", "8080"]).unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(8080));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_keygen() {
        let cli = Cli::try_parse_from(["budget-userservice", "keygen", "--out-dir", "keys", "--force"]).unwrap();
        match cli.command {
            Some(Commands::Keygen(args)) => {
                assert_eq!(args.out_dir, std::path::PathBuf::from("keys"));
                assert!(args.force);
            }
            _ => panic!("expected keygen"),
        }
    }
}
