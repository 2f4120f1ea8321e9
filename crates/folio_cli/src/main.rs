//! Terminal entry point for the Folio core.
//!
//! # Responsibility
//! - Wire environment config, logging and the hosted store together.
//! - Drive the same view models the site renders, for smoke checks and ops.

use clap::{Parser, Subcommand, ValueEnum};
use folio_core::db::open_db;
use folio_core::{
    init_logging, DetailOverlay, Experience, FolioConfig, InquiryType, ListViewModel,
    OverlayContent, Project, RecordStore, RestRecordStore, Skill, SqlitePreferenceRepository,
    SubmissionModel, Tab, TabState,
};
use log::info;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "folio", version, about = "Portfolio content store client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Store(StoreCommand),
    /// Print the last active tab, or store a new one.
    Tab { name: Option<String> },
}

/// Commands served by the hosted store.
#[derive(Subcommand)]
enum StoreCommand {
    /// Fetch every record of one section.
    List { section: Section },
    /// Fetch one section and show the detail overlay for one record.
    Show { section: Section, id: String },
    /// Send a contact message.
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        number: String,
        #[arg(long)]
        email: String,
        #[arg(long = "type", value_parser = parse_inquiry)]
        kind: InquiryType,
        #[arg(long)]
        message: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Section {
    Projects,
    Experience,
    Skills,
}

fn parse_inquiry(value: &str) -> Result<InquiryType, String> {
    value.parse().map_err(|err| format!("{err}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("folio: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = FolioConfig::from_env().map_err(|err| err.to_string())?;
    config.logging.duplicate_to_stderr = true;
    init_logging(&config.logging)?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        folio_core::core_version()
    );

    match cli.command {
        Command::Tab { name } => run_tab(&config, name.as_deref()),
        Command::Store(command) => {
            let store = RestRecordStore::from_config(&config.store).map_err(|err| err.to_string())?;
            run_store_command(&config, store, command).await
        }
    }
}

async fn run_store_command<S: RecordStore>(
    config: &FolioConfig,
    store: S,
    command: StoreCommand,
) -> Result<(), String> {
    match command {
        StoreCommand::List { section } => {
            let mut model = ListViewModel::new(store, section_collection(config, section));
            model.load().await;
            for line in card_lines(&model, section) {
                println!("{line}");
            }
            if model.is_empty() {
                println!("(no records)");
            }
            Ok(())
        }
        StoreCommand::Show { section, id } => {
            let mut model = ListViewModel::new(store, section_collection(config, section));
            model.load().await;
            model.select(id.as_str());
            let content = match section {
                Section::Projects => DetailOverlay::render_as::<Project>(model.selected()),
                Section::Experience => DetailOverlay::render_as::<Experience>(model.selected()),
                Section::Skills => DetailOverlay::render_as::<Skill>(model.selected()),
            };
            let content = content.ok_or_else(|| format!("no record with id `{id}`"))?;
            print_overlay(&content);
            Ok(())
        }
        StoreCommand::Contact {
            name,
            number,
            email,
            kind,
            message,
        } => {
            let mut form = SubmissionModel::contact_form(store, config.collections.contact.clone());
            form.update_field("name", name);
            form.update_field("number", number);
            form.update_field("email", email);
            form.update_field("type", kind.as_str());
            form.update_field("message", message);

            let result = form.submit().await.map_err(|err| err.to_string())?;
            println!("{}", result.message);
            if result.success {
                Ok(())
            } else {
                Err("contact submission failed; see logs".to_string())
            }
        }
    }
}

fn run_tab(config: &FolioConfig, name: Option<&str>) -> Result<(), String> {
    let path = config
        .state_db
        .as_ref()
        .ok_or_else(|| "FOLIO_STATE_DB must be set to persist tabs".to_string())?;
    let conn = open_db(path).map_err(|err| err.to_string())?;
    let prefs = SqlitePreferenceRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let mut tabs = TabState::load(&prefs);

    if let Some(name) = name {
        let tab = Tab::parse(name).ok_or_else(|| {
            let known: Vec<&str> = Tab::ALL.iter().map(|tab| tab.as_str()).collect();
            format!("unknown tab `{name}`; expected one of {}", known.join("|"))
        })?;
        tabs.activate(tab, &prefs).map_err(|err| err.to_string())?;
    }
    println!("{}", tabs.active());
    Ok(())
}

fn section_collection(config: &FolioConfig, section: Section) -> folio_core::Collection {
    match section {
        Section::Projects => config.collections.projects.clone(),
        Section::Experience => config.collections.experience.clone(),
        Section::Skills => config.collections.skills.clone(),
    }
}

fn card_lines<S: RecordStore>(model: &ListViewModel<S>, section: Section) -> Vec<String> {
    match section {
        Section::Projects => model
            .records_as::<Project>()
            .into_iter()
            .map(|project| format!("{} [{}]", project.title, project.tech_items().join(", ")))
            .collect(),
        Section::Experience => model
            .records_as::<Experience>()
            .into_iter()
            .map(|exp| match exp.duration {
                Some(duration) => format!("{}\t{} ({duration})", exp.id, exp.name),
                None => format!("{}\t{}", exp.id, exp.name),
            })
            .collect(),
        Section::Skills => model
            .records_as::<Skill>()
            .into_iter()
            .map(|skill| format!("{}\t{}", skill.id, skill.techs))
            .collect(),
    }
}

fn print_overlay(content: &OverlayContent) {
    println!("{}", content.title);
    if let Some(subtitle) = &content.subtitle {
        println!("{subtitle}");
    }
    if let Some(body) = &content.body {
        println!();
        println!("{body}");
    }
    if !content.tags.is_empty() {
        println!();
        println!("tech: {}", content.tags.join(", "));
    }
    for (label, value) in [("image", &content.image), ("link", &content.link)] {
        if let Some(value) = value {
            println!("{label}: {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{card_lines, Cli, Command, Section, StoreCommand};
    use clap::Parser;
    use folio_core::{ListViewModel, MemoryRecordStore, Record};
    use serde_json::json;

    #[tokio::test]
    async fn experience_cards_include_duration_when_present() {
        let store = MemoryRecordStore::new();
        store.seed(
            "Companies",
            vec![
                Record::from_row(json!({"id": 1, "name": "Acme", "Duration": "1y"})).unwrap(),
                Record::from_row(json!({"id": 2, "name": "Globex"})).unwrap(),
            ],
        );
        let mut model = ListViewModel::new(store, "Companies");
        model.load().await;

        assert_eq!(
            card_lines(&model, Section::Experience),
            vec!["1\tAcme (1y)".to_string(), "2\tGlobex".to_string()]
        );
    }

    #[test]
    fn tab_and_store_commands_parse_to_separate_variants() {
        let cli = Cli::try_parse_from(["folio", "tab", "Contact"]).unwrap();
        assert!(matches!(cli.command, Command::Tab { name: Some(ref name) } if name == "Contact"));

        let cli = Cli::try_parse_from(["folio", "list", "skills"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Store(StoreCommand::List {
                section: Section::Skills
            })
        ));
    }

    #[test]
    fn contact_rejects_unknown_inquiry_type() {
        let result = Cli::try_parse_from([
            "folio", "contact", "--name", "Jane", "--number", "1", "--email", "j@x.com",
            "--type", "spam", "--message", "hi",
        ]);
        assert!(result.is_err());
    }
}
