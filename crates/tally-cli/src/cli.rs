use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally: attendance tracking and need-based item distribution",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON document to operate on (overrides the configured storage)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Report missing members, categories, and items as errors
    #[arg(long, global = true)]
    pub strict: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Tracing filter, e.g. `info` or `tally_engine=debug`
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show members, categories, and event dates
    Show,
    /// Add, remove, or rename members
    Member(MemberArgs),
    /// Add or remove item categories
    Category(CategoryArgs),
    /// Add or remove items of a category
    Item(ItemArgs),
    /// Assign an item to a member
    Assign(AssignmentArgs),
    /// Revoke an item from a member
    Revoke(AssignmentArgs),
    /// Set which events a member attended (other members are left as they are)
    Attendance(AttendanceArgs),
    /// Set the event dates
    Dates(DatesArgs),
    /// List members eligible for an item
    Eligible(EligibleArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct MemberArgs {
    #[command(subcommand)]
    pub action: MemberAction,
}

#[derive(Subcommand)]
pub enum MemberAction {
    Add { name: String },
    Remove { name: String },
    Rename { name: String, new_name: String },
}

#[derive(Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub action: CategoryAction,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    Add { category: String },
    Remove { category: String },
}

#[derive(Args)]
pub struct ItemArgs {
    #[command(subcommand)]
    pub action: ItemAction,
}

#[derive(Subcommand)]
pub enum ItemAction {
    Add { category: String, item: String },
    Remove { category: String, item: String },
}

#[derive(Args)]
pub struct AssignmentArgs {
    pub member: String,
    pub category: String,
    pub item: String,
}

#[derive(Args)]
pub struct AttendanceArgs {
    pub member: String,
    /// Attended event numbers, 1 through 8; omit to clear
    #[arg(value_parser = clap::value_parser!(u8).range(1..=8))]
    pub events: Vec<u8>,
}

#[derive(Args)]
pub struct DatesArgs {
    /// Up to 8 dates (YYYY-MM-DD); `-` leaves a slot unscheduled
    pub dates: Vec<String>,
}

#[derive(Args)]
pub struct EligibleArgs {
    pub category: String,
    pub item: String,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address (default: configuration, or 127.0.0.1 with $PORT)
    #[arg(long)]
    pub bind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_show() {
        let cli = Cli::try_parse_from(["tally", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show));
        assert!(cli.data.is_none());
        assert!(!cli.strict);
    }

    #[test]
    fn parse_member_add() {
        let cli = Cli::try_parse_from(["tally", "member", "add", "Alice"]).unwrap();
        if let Command::Member(MemberArgs { action: MemberAction::Add { name } }) = cli.command {
            assert_eq!(name, "Alice");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_member_rename() {
        let cli = Cli::try_parse_from(["tally", "member", "rename", "Bob", "Robert"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Member(MemberArgs { action: MemberAction::Rename { .. } })
        ));
    }

    #[test]
    fn parse_item_remove() {
        let cli = Cli::try_parse_from(["tally", "item", "remove", "Clothing", "Coat"]).unwrap();
        if let Command::Item(ItemArgs { action: ItemAction::Remove { category, item } }) = cli.command {
            assert_eq!(category, "Clothing");
            assert_eq!(item, "Coat");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_assign() {
        let cli = Cli::try_parse_from(["tally", "assign", "Alice", "Clothing", "Coat"]).unwrap();
        if let Command::Assign(args) = cli.command {
            assert_eq!(args.member, "Alice");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_attendance() {
        let cli = Cli::try_parse_from(["tally", "attendance", "Alice", "1", "3", "8"]).unwrap();
        if let Command::Attendance(args) = cli.command {
            assert_eq!(args.events, vec![1, 3, 8]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn attendance_rejects_out_of_range() {
        assert!(Cli::try_parse_from(["tally", "attendance", "Alice", "9"]).is_err());
        assert!(Cli::try_parse_from(["tally", "attendance", "Alice", "0"]).is_err());
    }

    #[test]
    fn parse_dates() {
        let cli = Cli::try_parse_from(["tally", "dates", "2024-01-01", "-", "2024-01-15"]).unwrap();
        if let Command::Dates(args) = cli.command {
            assert_eq!(args.dates.len(), 3);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "tally", "eligible", "Clothing", "Coat", "--data", "db.json", "--strict", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("db.json")));
        assert!(cli.strict);
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["tally", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
        } else { panic!("wrong command"); }
    }
}
