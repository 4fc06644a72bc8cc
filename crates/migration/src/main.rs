//! Schema maintenance for the expense store, outside the server process.
use clap::{Parser, Subcommand};
use migration::{DEFAULT_DATABASE_URL, Migrator, MigratorTrait};
use sea_orm::{Database, DbErr};

#[derive(Debug, Parser)]
#[command(name = "migration", about = "Apply or inspect expense schema migrations")]
struct Cli {
    /// Store to migrate; the server reads the same variable.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Apply pending migrations (the default).
    Up {
        /// Apply at most this many.
        #[arg(short, long)]
        num: Option<u32>,
    },
    /// Roll back applied migrations.
    Down {
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },
    /// Drop every table and apply all migrations again.
    Fresh,
    /// List applied and pending migrations.
    Status,
}

impl Cli {
    fn command(&self) -> Command {
        self.command.unwrap_or(Command::Up { num: None })
    }
}

#[tokio::main]
async fn main() -> Result<(), DbErr> {
    let cli = Cli::parse();
    // Migration progress and `status` output are reported through tracing.
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    let db = Database::connect(&cli.database_url).await?;

    match cli.command() {
        Command::Up { num } => Migrator::up(&db, num).await,
        Command::Down { num } => Migrator::down(&db, Some(num)).await,
        Command::Fresh => Migrator::fresh(&db).await,
        Command::Status => Migrator::status(&db).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_applies_everything() {
        let cli = Cli::try_parse_from(["migration", "--database-url", "sqlite::memory:"]).unwrap();
        assert_eq!(cli.command(), Command::Up { num: None });
        assert_eq!(cli.database_url, "sqlite::memory:");
    }

    #[test]
    fn down_rolls_back_one_by_default() {
        let cli = Cli::try_parse_from(["migration", "down"]).unwrap();
        assert_eq!(cli.command(), Command::Down { num: 1 });

        let cli = Cli::try_parse_from(["migration", "up", "--num", "2"]).unwrap();
        assert_eq!(cli.command(), Command::Up { num: Some(2) });
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["migration", "sideways"]).is_err());
    }
}
