use anyhow::{bail, Context, Result};
use log::info;
use sindplast_registry::{
    cli::{Cli, Commands, RecordAction},
    config::Config,
    migrate::{run_company_migration, run_member_migration},
    schema::ALL_TABLES,
    ui::{ConsoleUi, Ui, UiApp},
    writer::RegistryStore,
};
use std::time::Instant;

/// Which exports a migration command covers
#[derive(Clone, Copy)]
enum Plan {
    Companies,
    Members,
    Both,
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(&cli);

    let config = Config::load(cli.config.as_deref())?
        .with_overrides(cli.database.clone(), cli.schema.clone());
    config.validate()?;

    match cli.command {
        Commands::MigrateCompanies { input } => {
            let mut config = config;
            if let Some(input) = input {
                config.companies_file = input;
            }
            migrate(&config, Plan::Companies, cli.tui)?;
        }

        Commands::MigrateMembers { input, companies } => {
            let mut config = config;
            if let Some(input) = input {
                config.members_file = input;
            }
            if let Some(companies) = companies {
                config.companies_file = companies;
            }
            migrate(&config, Plan::Members, cli.tui)?;
        }

        Commands::Migrate { companies, members } => {
            let mut config = config;
            if let Some(companies) = companies {
                config.companies_file = companies;
            }
            if let Some(members) = members {
                config.members_file = members;
            }
            migrate(&config, Plan::Both, cli.tui)?;
        }

        Commands::InitDb => {
            let store = open_store(&config)?;
            println!(
                "Tables ready in {:?} (schema {})",
                config.database,
                store.schema()
            );
        }

        Commands::ListTables => {
            println!("Registry tables:\n");
            for table in ALL_TABLES {
                println!(
                    "  {}.{} ({} columns)",
                    config.schema,
                    table.name,
                    table.columns.len() + 1
                );
            }
        }

        Commands::Companies { action } => {
            let store = open_store(&config)?;
            let tables = store.tables();
            match action {
                RecordAction::List => print_json(&tables.list_companies()?)?,
                RecordAction::Show { id } => match tables.get_company(id)? {
                    Some(company) => print_json(&company)?,
                    None => bail!("Company {} not found", id),
                },
                RecordAction::Delete { id } => {
                    if !tables.delete_company(id)? {
                        bail!("Company {} not found", id);
                    }
                    println!("Deleted company {}", id);
                }
            }
        }

        Commands::Members { action } => {
            let store = open_store(&config)?;
            let tables = store.tables();
            match action {
                RecordAction::List => print_json(&tables.list_members()?)?,
                RecordAction::Show { id } => match tables.get_member(id)? {
                    Some(member) => print_json(&member)?,
                    None => bail!("Member {} not found", id),
                },
                RecordAction::Delete { id } => {
                    if !tables.delete_member(id)? {
                        bail!("Member {} not found", id);
                    }
                    println!("Deleted member {}", id);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    // Log lines would tear the full-screen view
    let default_filter = if cli.quiet || cli.tui {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn open_store(config: &Config) -> Result<RegistryStore> {
    let store = RegistryStore::open(&config.database, &config.schema)?;
    store
        .create_tables()
        .context("Failed to prepare registry tables")?;
    Ok(store)
}

fn migrate(config: &Config, plan: Plan, tui: bool) -> Result<()> {
    let start = Instant::now();
    let mut store = open_store(config)?;

    if tui {
        let mut app = UiApp::new()?;
        match run_plan(config, &mut store, plan, &mut app) {
            Ok(summary) => app.finish(&summary)?,
            Err(err) => {
                app.restore()?;
                return Err(err);
            }
        }
    } else {
        let mut ui = ConsoleUi::new();
        let summary = run_plan(config, &mut store, plan, &mut ui)?;
        println!("\n{}", summary);
    }

    info!("Finished in {:.1}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Run the requested migrations and return the printable summary
fn run_plan(
    config: &Config,
    store: &mut RegistryStore,
    plan: Plan,
    ui: &mut impl Ui,
) -> Result<String> {
    let mut lines = Vec::new();

    if matches!(plan, Plan::Companies | Plan::Both) {
        let summary = run_company_migration(config, store, ui)?;
        lines.push(format!("Companies: {}", summary));
    }

    if matches!(plan, Plan::Members | Plan::Both) {
        let summary = run_member_migration(config, store, ui)?;
        lines.push(format!("Members: {}", summary));
    }

    Ok(lines.join("\n"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
