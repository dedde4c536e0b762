// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation and Infrastructure Orchestration
//!
//! This xtask provides explicit, opt-in backend validation for
//! MySQL/MariaDB in addition to the default `SQLite` backend, plus the
//! usual lint/build/test conveniences.
//!
//! ## Backend Testing Commands
//!
//! - `cargo test` — Runs all standard tests against `SQLite` (fast, no infrastructure)
//! - `cargo xtask test-mariadb` — Runs backend validation tests against `MariaDB`
//! - `cargo xtask verify-migrations` — Verifies `SQLite`/`MySQL` schema parity
//!
//! ## Design Principles
//!
//! - No test infrastructure is embedded in test code
//! - No tests silently skip due to missing services
//! - External databases are opt-in only, never automatic
//! - Standard `cargo test` remains fast and infrastructure-free
//! - All backend-specific orchestration lives in xtask

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use diesel::sql_types::{Integer, Text};
use diesel::{MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask")]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Run lib tests for the workspace's default packages
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Shared container configuration for MariaDB orchestration.
struct MariadbContainer {
    name: &'static str,
    db_name: &'static str,
    db_user: &'static str,
    db_password: &'static str,
    port: &'static str,
}

impl MariadbContainer {
    /// Stops and removes the container, ignoring failures.
    fn cleanup(&self) {
        let _ = cmd!("docker", "stop", self.name).run();
        let _ = cmd!("docker", "rm", self.name).run();
    }

    /// Starts the container and waits until the database accepts queries.
    fn start(&self) -> Result<()> {
        use std::thread::sleep;
        use std::time::Duration;

        tracing::info!("Checking Docker availability");
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        tracing::info!("Cleaning up any existing container: {}", self.name);
        self.cleanup();

        tracing::info!("Starting MariaDB container: {}", self.name);
        cmd!(
            "docker",
            "run",
            "--name",
            self.name,
            "-e",
            format!("MARIADB_DATABASE={}", self.db_name),
            "-e",
            format!("MARIADB_USER={}", self.db_user),
            "-e",
            format!("MARIADB_PASSWORD={}", self.db_password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", self.port),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        tracing::info!("Waiting for MariaDB to be ready...");
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {}/{}", attempt, max_attempts);

            let result = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                self.db_user,
                format!("-p{}", self.db_password),
                "-e",
                "SELECT 1"
            )
            .run();

            if result.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }

        self.cleanup();
        Err(color_eyre::eyre::eyre!(
            "MariaDB did not become ready within timeout"
        ))
    }

    /// Returns the connection URL for the containerized database.
    fn database_url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.db_user, self.db_password, self.port, self.db_name
        )
    }
}

/// Run `MariaDB` backend validation tests
///
/// This command provides explicit, opt-in backend validation for MySQL/MariaDB.
/// It orchestrates all required infrastructure and runs ignored tests that
/// validate schema compatibility and constraint enforcement.
///
/// ## What This Command Does
///
/// 1. Validates Docker is available
/// 2. Starts a `MariaDB` 11 container with test database
/// 3. Waits for `MariaDB` to be ready (up to 30 seconds)
/// 4. Sets required environment variables:
///    - `DATABASE_URL`: `MySQL` connection string
///    - `TRADEPOST_TEST_BACKEND`: Set to "mariadb"
/// 5. Runs ignored backend validation tests from `tradepost-persistence`
/// 6. Stops and removes the container (always, even on failure)
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");

    let container = MariadbContainer {
        name: "tradepost-test-mariadb",
        db_name: "tradepost_test",
        db_user: "tradepost",
        db_password: "test_password",
        // Use non-standard port to avoid conflicts
        port: "3307",
    };

    container.start()?;

    // Run ignored tests with explicit opt-in.
    // Filter to the backend_validation_tests module to avoid running
    // non-ignored tests.
    tracing::info!("Running MariaDB backend validation tests");
    let test_result = cmd!(
        "cargo",
        "test",
        "--package",
        "tradepost-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.database_url())
    .env("TRADEPOST_TEST_BACKEND", "mariadb")
    .run_with_trace();

    // Always cleanup container
    tracing::info!("Stopping MariaDB container");
    container.cleanup();

    test_result.wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// This command enforces that backend-specific migrations in `migrations/`
/// (`SQLite`) and `migrations_mysql/` (`MySQL`) produce semantically
/// identical schemas: same tables, columns, normalized types, nullability,
/// primary keys, foreign keys, unique constraints, and indexes.
#[allow(clippy::too_many_lines)]
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{MigrationHarness, embed_migrations};

    tracing::info!("Starting schema parity verification");

    let container = MariadbContainer {
        name: "tradepost-verify-migrations",
        db_name: "tradepost_verify",
        db_user: "tradepost",
        db_password: "verify_password",
        // Different port from test-mariadb to avoid conflicts
        port: "3308",
    };

    container.start()?;

    let verification_result = (|| -> Result<()> {
        tracing::info!("Applying SQLite migrations");
        #[allow(clippy::items_after_statements)]
        const SQLITE_MIGRATIONS: diesel_migrations::EmbeddedMigrations =
            embed_migrations!("../crates/persistence/migrations");

        let mut sqlite_conn = SqliteConnection::establish(":memory:")
            .wrap_err("Failed to create SQLite in-memory database")?;

        diesel::sql_query("PRAGMA foreign_keys = ON")
            .execute(&mut sqlite_conn)
            .wrap_err("Failed to enable foreign keys on SQLite")?;

        sqlite_conn
            .run_pending_migrations(SQLITE_MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {}", e))?;

        tracing::info!("Applying MySQL migrations");
        #[allow(clippy::items_after_statements)]
        const MYSQL_MIGRATIONS: diesel_migrations::EmbeddedMigrations =
            embed_migrations!("../crates/persistence/migrations_mysql");

        let mut mysql_conn = MysqlConnection::establish(&container.database_url())
            .wrap_err("Failed to connect to MariaDB")?;

        mysql_conn
            .run_pending_migrations(MYSQL_MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to apply MySQL migrations: {}", e))?;

        tracing::info!("Introspecting SQLite schema");
        let sqlite_schema = introspect_sqlite_schema(&mut sqlite_conn)?;

        tracing::info!("Introspecting MySQL schema");
        let mysql_schema = introspect_mysql_schema(&mut mysql_conn, container.db_name)?;

        tracing::info!("Comparing schemas");
        compare_schemas(&sqlite_schema, &mysql_schema)?;

        tracing::info!("Schema parity verification passed");
        Ok(())
    })();

    container.cleanup();

    verification_result
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<Vec<String>>,
    index_columns: BTreeSet<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    name: String,
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

/// Introspect `SQLite` schema
#[allow(clippy::too_many_lines)]
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table::default();

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    name: col.name.clone(),
                    normalized_type: normalize_sqlite_type(&col.r#type),
                    nullable: col.notnull == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // origin 'u' marks unique constraints (sqlite_autoindex_* included)
            if idx.origin == "u" {
                table_info.unique_constraints.insert(column_names);
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                table_info.index_columns.insert(column_names);
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Introspect `MySQL` schema
#[allow(clippy::too_many_lines)]
fn introspect_mysql_schema(conn: &mut MysqlConnection, db_name: &str) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        table_name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    #[allow(clippy::struct_field_names)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        referenced_table_name: String,
        #[diesel(sql_type = Text)]
        referenced_column_name: String,
    }

    #[derive(QueryableByName)]
    struct UniqueConstraintInfo {
        #[diesel(sql_type = Text)]
        constraint_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        index_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Integer)]
        non_unique: i32,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT table_name FROM information_schema.tables WHERE table_schema = ? \
         AND table_name != '__diesel_schema_migrations' ORDER BY table_name",
    )
    .bind::<Text, _>(db_name)
    .load(conn)
    .wrap_err("Failed to query MySQL tables")?;

    for table in tables {
        let mut table_info = Table::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(
            "SELECT column_name, data_type, is_nullable, column_key \
             FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err(format!(
            "Failed to get columns for table {}",
            table.table_name
        ))?;

        for col in columns {
            table_info.columns.insert(
                col.column_name.clone(),
                Column {
                    name: col.column_name.clone(),
                    normalized_type: normalize_mysql_type(&col.data_type),
                    nullable: col.is_nullable == "YES",
                },
            );

            if col.column_key == "PRI" {
                table_info.primary_keys.insert(col.column_name);
            }
        }

        let fks: Vec<ForeignKeyInfo> = diesel::sql_query(
            "SELECT column_name, referenced_table_name, referenced_column_name \
             FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL \
             ORDER BY column_name",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err(format!(
            "Failed to get foreign keys for table {}",
            table.table_name
        ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.column_name,
                to_table: fk.referenced_table_name,
                to_column: fk.referenced_column_name,
            });
        }

        let unique_constraints: Vec<UniqueConstraintInfo> = diesel::sql_query(
            "SELECT tc.constraint_name, kcu.column_name \
             FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage kcu \
               ON tc.constraint_name = kcu.constraint_name \
               AND tc.table_schema = kcu.table_schema \
               AND tc.table_name = kcu.table_name \
             WHERE tc.constraint_type = 'UNIQUE' \
               AND tc.table_schema = ? \
               AND tc.table_name = ? \
             ORDER BY tc.constraint_name, kcu.ordinal_position",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err(format!(
            "Failed to get unique constraints for table {}",
            table.table_name
        ))?;

        let mut constraint_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for uc in unique_constraints {
            constraint_map
                .entry(uc.constraint_name)
                .or_default()
                .push(uc.column_name);
        }
        for (_name, columns) in constraint_map {
            table_info.unique_constraints.insert(columns);
        }

        let indexes: Vec<IndexInfo> = diesel::sql_query(
            "SELECT index_name, column_name, non_unique FROM information_schema.statistics \
             WHERE table_schema = ? AND table_name = ? AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(db_name)
        .bind::<Text, _>(&table.table_name)
        .load(conn)
        .wrap_err(format!(
            "Failed to get indexes for table {}",
            table.table_name
        ))?;

        let mut index_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for idx in indexes {
            // Unique indexes are tracked as constraints
            if idx.non_unique == 0 {
                continue;
            }
            index_map
                .entry(idx.index_name)
                .or_default()
                .push(idx.column_name);
        }
        for (_name, columns) in index_map {
            table_info.index_columns.insert(columns);
        }

        schema.tables.insert(table.table_name, table_info);
    }

    Ok(schema)
}

/// Normalize `SQLite` type to common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

/// Normalize `MySQL` type to common representation
fn normalize_mysql_type(mysql_type: &str) -> String {
    let normalized = mysql_type.to_uppercase();
    match normalized.as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => "integer".to_string(),
        "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" => "real".to_string(),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            "blob".to_string()
        }
        _ => "text".to_string(),
    }
}

/// Compare schemas and fail on mismatch
fn compare_schemas(sqlite_schema: &Schema, mysql_schema: &Schema) -> Result<()> {
    let sqlite_tables: BTreeSet<_> = sqlite_schema.tables.keys().collect();
    let mysql_tables: BTreeSet<_> = mysql_schema.tables.keys().collect();

    if sqlite_tables != mysql_tables {
        return Err(color_eyre::eyre::eyre!(
            "Schema parity check FAILED: table sets differ\n  SQLite: {:?}\n  MySQL: {:?}",
            sqlite_tables,
            mysql_tables
        ));
    }

    for table_name in sqlite_tables {
        let sqlite_table = &sqlite_schema.tables[table_name.as_str()];
        let mysql_table = &mysql_schema.tables[table_name.as_str()];

        if sqlite_table.columns != mysql_table.columns {
            return Err(color_eyre::eyre::eyre!(
                "Schema parity check FAILED: column mismatch in table '{}'\n  SQLite: {:?}\n  MySQL: {:?}",
                table_name,
                sqlite_table.columns,
                mysql_table.columns
            ));
        }

        if sqlite_table.primary_keys != mysql_table.primary_keys {
            return Err(color_eyre::eyre::eyre!(
                "Schema parity check FAILED: primary key mismatch in table '{}'\n  SQLite: {:?}\n  MySQL: {:?}",
                table_name,
                sqlite_table.primary_keys,
                mysql_table.primary_keys
            ));
        }

        if sqlite_table.foreign_keys != mysql_table.foreign_keys {
            return Err(color_eyre::eyre::eyre!(
                "Schema parity check FAILED: foreign key mismatch in table '{}'\n  SQLite: {:?}\n  MySQL: {:?}",
                table_name,
                sqlite_table.foreign_keys,
                mysql_table.foreign_keys
            ));
        }

        if sqlite_table.unique_constraints != mysql_table.unique_constraints {
            return Err(color_eyre::eyre::eyre!(
                "Schema parity check FAILED: unique constraint mismatch in table '{}'\n  SQLite: {:?}\n  MySQL: {:?}",
                table_name,
                sqlite_table.unique_constraints,
                mysql_table.unique_constraints
            ));
        }

        // MySQL/InnoDB auto-creates indexes for FK columns, so MySQL may
        // carry additional single-column indexes on FK columns.
        let fk_columns: BTreeSet<&String> = mysql_table
            .foreign_keys
            .iter()
            .map(|fk| &fk.from_column)
            .collect();

        for sqlite_idx in &sqlite_table.index_columns {
            if !mysql_table.index_columns.contains(sqlite_idx) {
                return Err(color_eyre::eyre::eyre!(
                    "Schema parity check FAILED: index missing in MySQL for table '{}': {:?}",
                    table_name,
                    sqlite_idx
                ));
            }
        }

        for mysql_idx in &mysql_table.index_columns {
            if !sqlite_table.index_columns.contains(mysql_idx) {
                let is_single_fk_index =
                    mysql_idx.len() == 1 && fk_columns.contains(&mysql_idx[0]);
                if !is_single_fk_index {
                    return Err(color_eyre::eyre::eyre!(
                        "Schema parity check FAILED: unexpected index in MySQL for table '{}': {:?}",
                        table_name,
                        mysql_idx
                    ));
                }
            }
        }
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
