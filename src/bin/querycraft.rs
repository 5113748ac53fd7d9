//! querycraft: build SQL from schema files
//!
//! # Usage
//!
//! ```bash
//! # CREATE TABLE statements for every table in a schema file
//! querycraft ddl schema.toml --dialect sqlserver
//!
//! # A SELECT with a text predicate
//! querycraft select schema.toml Users --where "Users.Age >= 18" --order-by Name --top 10
//!
//! # Logical type keywords per dialect
//! querycraft types
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use querycraft::prelude::*;

#[derive(Parser)]
#[command(name = "querycraft")]
#[command(version = "0.1.0")]
#[command(about = "Typed SQL statement construction for MySQL, SQL Server and a default dialect", long_about = None)]
#[command(after_help = "EXAMPLES:
    querycraft ddl schema.toml --dialect mysql
    querycraft select schema.toml Users --where 'Users.Active && Users.Age > 20' --top 5
    querycraft types --dialect sqlserver")]
struct Cli {
    /// Target dialect (default, mysql, sqlserver); overrides the config file
    #[arg(short, long, global = true, env = "QUERYCRAFT_DIALECT")]
    dialect: Option<Dialect>,

    /// Configuration file (defaults to <config dir>/querycraft/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Bind literals as parameters instead of inlining them
    #[arg(short, long, global = true)]
    parameterized: bool,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the existence check and guarded CREATE TABLE for each table in a schema file
    Ddl {
        /// TOML schema file
        schema: PathBuf,
    },
    /// Build a SELECT statement against one table of a schema file
    Select {
        /// TOML schema file
        schema: PathBuf,

        /// Table to select from
        table: String,

        /// Columns to project (`Field` or `Table.Field`)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Predicate, e.g. "Users.Age >= 18 && Users.Active"
        #[arg(short, long = "where")]
        filter: Option<String>,

        /// ORDER BY column, repeatable
        #[arg(short, long)]
        order_by: Vec<String>,

        /// ORDER BY ... DESC column, repeatable
        #[arg(long)]
        order_by_desc: Vec<String>,

        /// Keep the first N rows
        #[arg(short, long)]
        top: Option<u64>,

        /// Page size; use with --page
        #[arg(long, requires = "page")]
        page_size: Option<u64>,

        /// 1-based page number
        #[arg(long, requires = "page_size")]
        page: Option<u64>,

        /// Project COUNT(*) instead of columns
        #[arg(long)]
        count: bool,
    },
    /// Show the keyword each logical type maps to
    Types,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("QUERYCRAFT_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    tracing::debug!("Using dialect {}", config.dialect);

    match &cli.command {
        Commands::Ddl { schema } => print_ddl(cli, &config, schema),
        Commands::Select {
            schema,
            table,
            columns,
            filter,
            order_by,
            order_by_desc,
            top,
            page_size,
            page,
            count,
        } => {
            let catalog = Catalog::load(schema)
                .with_context(|| format!("reading schema file {}", schema.display()))?;
            let target = catalog.reflect(table)?;

            let mut query = Query::with_config(target.clone(), &config);
            if *count {
                query = query.count();
            }
            for column in columns {
                query = query.select(column_ref(&target, column));
            }
            if let Some(text) = filter {
                query = query.where_clause(parse(text)?);
            }
            for column in order_by {
                query = query.order_by(column_ref(&target, column));
            }
            for column in order_by_desc {
                query = query.order_by_descending(column_ref(&target, column));
            }
            if let Some(n) = top {
                query = query.top(*n);
            }
            if let (Some(size), Some(number)) = (page_size, page) {
                query = query.paginate(*size, *number);
            }

            print_statement(cli, &query.build()?)
        }
        Commands::Types => {
            print_types(cli, &config);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<QueryConfig> {
    let mut config = match &cli.config {
        Some(path) => QueryConfig::load(path)
            .with_context(|| format!("reading config file {}", path.display()))?,
        None => QueryConfig::discover()?,
    };
    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }
    if cli.parameterized {
        config.literals = LiteralPolicy::Parameterized;
    }
    Ok(config)
}

/// `Field` on the target table, or an explicit `Table.Field`.
fn column_ref(target: &Schema, column: &str) -> Expr {
    match column.split_once('.') {
        Some((table, field)) => Expr::member(table, field),
        None => target.col(column),
    }
}

fn print_ddl(cli: &Cli, config: &QueryConfig, path: &Path) -> Result<()> {
    let catalog = Catalog::load(path).with_context(|| format!("reading schema file {}", path.display()))?;
    let translator = config.translator();

    let mut statements = Vec::new();
    for schema in catalog.tables() {
        if schema.fields().is_empty() {
            bail!("table '{}' declares no fields", schema.name());
        }
        statements.push(translator.table_exists_query(schema.name()));
        statements.extend(translator.create_table_if_not_exists_query(schema.name(), schema.fields()));
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&statements)?);
        return Ok(());
    }

    println!("{} {}", "Dialect:".dimmed(), config.dialect.to_string().cyan());
    for statement in &statements {
        println!("{};", statement.white());
    }
    Ok(())
}

fn print_statement(cli: &Cli, statement: &Statement) -> Result<()> {
    if cli.json {
        let out = serde_json::json!({
            "sql": statement.sql(),
            "parameters": statement.parameters(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", "Generated SQL:".green().bold());
    println!("{}", statement.sql().white());

    if !statement.parameters().is_empty() {
        println!();
        println!("{}", "Bindings:".cyan());
        for (name, value) in statement.parameters().iter() {
            println!("  {} = {}", name, value.to_string().yellow());
        }
    }
    Ok(())
}

fn print_types(cli: &Cli, config: &QueryConfig) {
    let translator = config.translator();

    if cli.json {
        let rows: Vec<_> = LogicalType::ALL
            .iter()
            .map(|ty| {
                serde_json::json!({
                    "type": ty,
                    "column": translator.type_name_for(*ty, false),
                    "cast": translator.type_name_for(*ty, true),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
        return;
    }

    println!(
        "{:24} {:12} {}",
        "Logical type".white().bold(),
        "Column".white().bold(),
        "Cast".white().bold()
    );
    println!("{}", "─".repeat(48).dimmed());
    for ty in LogicalType::ALL {
        println!(
            "{:24} {:12} {}",
            ty.to_string().cyan(),
            translator.type_name_for(ty, false).yellow(),
            translator.type_name_for(ty, true).dimmed()
        );
    }
}
