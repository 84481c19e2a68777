use std::net::SocketAddr;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use tally_engine::{AbsentAttendance, AttendanceUpdate, Change, Roster};
use tally_server::{HomeView, TallyConfig, TallyServer};
use tally_store::{open_store, DocumentStore, StorageConfig};
use tally_types::{Document, EVENT_SLOTS};

use crate::cli::*;

type CliRoster = Roster<Box<dyn DocumentStore>>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(&cli)?;
    tracing::debug!(storage = ?config.storage, policy = ?config.policy, "configuration loaded");
    let out = Output { format: cli.format };

    match cli.command {
        Command::Serve(args) => cmd_serve(config, args),
        Command::Show => cmd_show(&open_roster(&config)?, &out),
        Command::Member(args) => {
            let roster = open_roster(&config)?;
            match args.action {
                MemberAction::Add { name } => {
                    out.change("add member", &name, roster.add_member(&name)?)
                }
                MemberAction::Remove { name } => {
                    out.change("remove member", &name, roster.remove_member(&name)?)
                }
                MemberAction::Rename { name, new_name } => out.change(
                    "rename member",
                    &format!("{name} → {new_name}"),
                    roster.rename_member(&name, &new_name)?,
                ),
            }
        }
        Command::Category(args) => {
            let roster = open_roster(&config)?;
            match args.action {
                CategoryAction::Add { category } => {
                    out.change("add category", &category, roster.add_category(&category)?)
                }
                CategoryAction::Remove { category } => {
                    out.change("remove category", &category, roster.remove_category(&category)?)
                }
            }
        }
        Command::Item(args) => {
            let roster = open_roster(&config)?;
            match args.action {
                ItemAction::Add { category, item } => out.change(
                    "add item",
                    &format!("{category}/{item}"),
                    roster.add_item(&category, &item)?,
                ),
                ItemAction::Remove { category, item } => out.change(
                    "remove item",
                    &format!("{category}/{item}"),
                    roster.remove_item(&category, &item)?,
                ),
            }
        }
        Command::Assign(a) => out.change(
            "assign",
            &format!("{}/{} → {}", a.category, a.item, a.member),
            open_roster(&config)?.assign_item(&a.member, &a.category, &a.item)?,
        ),
        Command::Revoke(a) => out.change(
            "revoke",
            &format!("{}/{} from {}", a.category, a.item, a.member),
            open_roster(&config)?.revoke_item(&a.member, &a.category, &a.item)?,
        ),
        Command::Attendance(args) => {
            // A single-member update must not reset everyone else.
            config.policy.absent_attendance = AbsentAttendance::Keep;
            cmd_attendance(&open_roster(&config)?, &out, args)
        }
        Command::Dates(args) => cmd_dates(&open_roster(&config)?, &out, args),
        Command::Eligible(args) => cmd_eligible(&open_roster(&config)?, &out, args),
    }
}

fn open_roster(config: &TallyConfig) -> anyhow::Result<CliRoster> {
    let store = open_store(&config.storage)
        .with_context(|| format!("opening {:?}", config.storage))?;
    Ok(Roster::new(store, config.policy.clone()))
}

fn load_config(cli: &Cli) -> anyhow::Result<TallyConfig> {
    let mut config = match &cli.config {
        Some(path) => TallyConfig::from_file(path)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => TallyConfig::default(),
    };
    if let Some(path) = &cli.data {
        config.storage = StorageConfig::File { path: path.clone() };
    }
    if cli.strict {
        config.policy.strict_references = true;
    }
    Ok(config)
}

struct Output {
    format: OutputFormat,
}

impl Output {
    fn change(&self, op: &str, subject: &str, change: Change) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!(
                "{}",
                json!({ "op": op, "subject": subject, "changed": change.is_applied() })
            ),
            OutputFormat::Text => match change {
                Change::Applied => println!("{} {} {}", "✓".green().bold(), op, subject.bold()),
                Change::Unchanged => {
                    println!("{} {} {} (no change)", "·".dimmed(), op, subject.bold())
                }
            },
        }
        Ok(())
    }
}

fn home_view(doc: Document) -> HomeView {
    HomeView {
        members: tally_engine::sorted_members(&doc),
        categories: doc.categories,
        event_dates: doc.event_dates,
        selected_category: String::new(),
        selected_item: String::new(),
        eligible_members: Vec::new(),
    }
}

fn cmd_show(roster: &CliRoster, out: &Output) -> anyhow::Result<()> {
    let doc = roster.document()?;
    if let OutputFormat::Json = out.format {
        println!("{}", serde_json::to_string_pretty(&home_view(doc))?);
        return Ok(());
    }

    println!("{}", "Events".bold().underline());
    for (slot, date) in doc.event_dates.slots().iter().enumerate() {
        let shown = date.map_or_else(|| "unscheduled".dimmed().to_string(), |d| d.to_string());
        println!("  #{} {}", slot + 1, shown);
    }

    println!("\n{}", "Categories".bold().underline());
    if doc.categories.is_empty() {
        println!("  (none)");
    }
    for (category, items) in doc.categories.iter() {
        println!("  {}: {}", category.cyan(), items.join(", "));
    }

    println!("\n{}", "Members".bold().underline());
    if doc.members.is_empty() {
        println!("  (none)");
    }
    let min = roster.engine().policy().min_attendance;
    for m in tally_engine::sorted_members(&doc) {
        let marks: String = m
            .attendance
            .slots()
            .iter()
            .map(|a| if *a { '●' } else { '○' })
            .collect();
        let count = format!("{}/{}", m.attended(), EVENT_SLOTS);
        let count = if m.attended() >= min { count.green() } else { count.yellow() };
        println!("  {} {} {}", m.name.bold(), marks, count);
        for (category, items) in &m.items {
            let items: Vec<&str> = items.iter().map(String::as_str).collect();
            println!("      {}: {}", category.cyan(), items.join(", "));
        }
    }
    Ok(())
}

fn cmd_attendance(roster: &CliRoster, out: &Output, args: AttendanceArgs) -> anyhow::Result<()> {
    let mut slots = vec![false; EVENT_SLOTS];
    for event in &args.events {
        slots[usize::from(*event) - 1] = true;
    }
    let mut updates = AttendanceUpdate::new();
    updates.insert(args.member.clone(), slots.into());
    let change = roster.update_attendance(&updates)?;
    out.change("attendance", &args.member, change)
}

fn cmd_dates(roster: &CliRoster, out: &Output, args: DatesArgs) -> anyhow::Result<()> {
    if args.dates.len() > EVENT_SLOTS {
        anyhow::bail!("at most {EVENT_SLOTS} dates, got {}", args.dates.len());
    }
    let raw: Vec<Option<&str>> = args
        .dates
        .iter()
        .map(|d| if d == "-" { None } else { Some(d.as_str()) })
        .collect();
    let change = roster.update_event_dates(&raw)?;
    out.change("event dates", &format!("{} given", raw.len()), change)
}

fn cmd_eligible(roster: &CliRoster, out: &Output, args: EligibleArgs) -> anyhow::Result<()> {
    let eligible = roster.eligible(&args.category, &args.item)?;
    match out.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "eligible": eligible }))?),
        OutputFormat::Text => {
            println!(
                "Eligible for {}/{}: {}",
                args.category.cyan(),
                args.item.cyan(),
                eligible.len().to_string().bold()
            );
            for m in &eligible {
                println!("  {} ({} attended)", m.name.bold(), m.attended());
            }
        }
    }
    Ok(())
}

/// `--bind` wins; otherwise the configured address, with its port replaced by
/// `$PORT` when that is set.
fn resolve_bind(config: &TallyConfig, bind: Option<&str>, port_env: Option<&str>) -> anyhow::Result<SocketAddr> {
    if let Some(bind) = bind {
        return bind.parse().with_context(|| format!("invalid --bind address {bind:?}"));
    }
    let mut addr = config.server.bind_addr;
    if let Some(port) = port_env {
        let port: u16 = port.parse().with_context(|| format!("invalid PORT {port:?}"))?;
        addr.set_port(port);
    }
    Ok(addr)
}

fn cmd_serve(mut config: TallyConfig, args: ServeArgs) -> anyhow::Result<()> {
    let port_env = std::env::var("PORT").ok();
    config.server.bind_addr = resolve_bind(&config, args.bind.as_deref(), port_env.as_deref())?;
    tracing::debug!(addr = %config.server.bind_addr, "resolved bind address");
    let server = TallyServer::new(config).context("starting server")?;
    let runtime = tokio::runtime::Runtime::new().context("building tokio runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}
