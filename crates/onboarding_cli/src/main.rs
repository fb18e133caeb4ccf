//! Command-line front end for the onboarding tracker.
//!
//! # Responsibility
//! - Wire config, logging and the chosen store into core services.
//! - Render service results as plain text for terminal use.
//!
//! # Invariants
//! - Every mutation goes through a core service; the CLI never writes keys.
//! - The demo roster is seeded on every start; seeding is a no-op once
//!   employees exist.
//! - Without a configured database the store is in-memory.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use onboarding_core::report::board::BoardFilter;
use onboarding_core::report::notifications::Notification;
use onboarding_core::report::roster::{RosterQuery, RosterSort};
use onboarding_core::{
    open_db, ActivityKind, CoreConfig, Department, DemoSeeder, EmployeeService, KeyValueStore,
    MemoryStore, NewEmployee, OnboardingRepository, OrgDepartment, ReportService, Role,
    SeedOutcome, SessionService, SqliteStore, SystemClock, TaskService, TaskStatus,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "onboarding")]
#[command(author, version, about = "Employee onboarding tracker", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "onboarding.toml")]
    config: PathBuf,

    /// SQLite database file (overrides `store.db_path`)
    #[arg(long, env = "ONBOARDING_DB")]
    db: Option<PathBuf>,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report whether the demo roster was seeded on this start
    Seed,

    /// Dashboard numbers, bucket completion and notifications
    Summary,

    /// List employees with their onboarding progress
    Employees {
        /// Match on name, email, id or department
        #[arg(short, long, default_value = "")]
        search: String,
        /// Organisation department filter (e.g. Engineering, HR)
        #[arg(short, long)]
        department: Option<String>,
        /// name | department | joining | progress
        #[arg(long, default_value = "name")]
        sort: String,
    },

    /// Add an employee and generate the standard task set
    AddEmployee {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        role: String,
        /// Joining date as YYYY-MM-DD
        #[arg(long)]
        joining_date: String,
    },

    /// Show one employee's task checklist
    Show {
        /// Employee id (e.g. EMP001)
        id: String,
    },

    /// Task board across all employees
    Board {
        /// hr | it | admin
        #[arg(short, long)]
        department: Option<String>,
        /// not_started | in_progress | completed
        #[arg(long)]
        status: Option<String>,
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Start a session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ONBOARDING_PASSWORD")]
        password: String,
        /// hr | it | admin
        #[arg(long, default_value = "hr")]
        role: String,
    },

    /// End the current session
    Logout,

    /// Change the status of one task (requires a session)
    SetStatus {
        employee_id: String,
        /// hr | it | admin
        department: String,
        task_id: String,
        /// not_started | in_progress | completed
        status: String,
    },

    /// Comment on one task (requires a session)
    Comment {
        employee_id: String,
        department: String,
        task_id: String,
        text: String,
    },

    /// Recent activity, newest first
    Activity {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        /// login | logout | employee_created | task_updated | comment_added
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Flip the stored light/dark preference
    ToggleTheme,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CoreConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    if let Some(db) = cli.db.clone() {
        config.store.db_path = Some(db);
    }
    if let Some(level) = cli.log_level.clone() {
        config.logging.level = level;
    }
    start_logging(&config)?;

    match config.store.db_path.clone() {
        Some(path) => {
            let conn = open_db(&path)
                .with_context(|| format!("failed to open database {}", path.display()))?;
            let store = SqliteStore::try_new(&conn).context("database is not ready")?;
            run(&store, &config, cli.command)
        }
        None => {
            let store = MemoryStore::new();
            run(&store, &config, cli.command)
        }
    }
}

fn start_logging(config: &CoreConfig) -> Result<()> {
    let Some(dir) = config.logging.dir.as_deref() else {
        return Ok(());
    };
    let dir = absolute(dir)?;
    onboarding_core::init_logging(&config.logging.level, &dir).map_err(|err| anyhow!(err))?;
    log::info!(
        "event=cli_start module=cli status=ok version={}",
        onboarding_core::core_version()
    );
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

fn run<S: KeyValueStore + Copy>(store: S, config: &CoreConfig, command: Commands) -> Result<()> {
    let repo = || OnboardingRepository::from_config(store, config);
    let seeded = DemoSeeder::new(repo(), SystemClock).seed()?;

    match command {
        Commands::Seed => match seeded {
            SeedOutcome::Seeded { employees } => println!("seeded {employees} employees"),
            SeedOutcome::AlreadyPopulated { employees } => {
                println!("store already holds {employees} employees; nothing seeded")
            }
        },
        Commands::Summary => {
            let reports = ReportService::new(repo(), SystemClock).with_config(config);
            let snapshot = reports.snapshot()?;
            let stats = snapshot.dashboard();
            println!("employees:        {}", stats.total_employees);
            println!("onboarding:       {}", stats.total_onboarding);
            println!("completed:        {}", stats.completed);
            println!("in progress:      {}", stats.in_progress);
            println!("delayed tasks:    {}", stats.delayed);
            println!("completion rate:  {}%", stats.completion_rate);
            println!("avg completion:   {}%", snapshot.average_completion());
            println!();
            for bucket in snapshot.bucket_completion() {
                println!(
                    "{:<6} {:>3}/{:<3} done  {:>3} pending  {:>3}%",
                    bucket.department.label(),
                    bucket.completed,
                    bucket.total,
                    bucket.pending,
                    bucket.rate
                );
            }
            let notices = reports.notifications()?;
            if !notices.is_empty() {
                println!();
                for notice in &notices {
                    println!("{}", render_notification(notice));
                }
            }
        }
        Commands::Employees {
            search,
            department,
            sort,
        } => {
            let query = RosterQuery {
                search,
                department: department.as_deref().map(parse_org_department).transpose()?,
                sort: RosterSort::parse(&sort).ok_or_else(|| anyhow!("unknown sort `{sort}`"))?,
            };
            let snapshot = ReportService::new(repo(), SystemClock).snapshot()?;
            for entry in snapshot.roster(&query) {
                let employee = entry.employee;
                println!(
                    "{}  {:<20} {:<12} {}  hr {:>3}%  it {:>3}%  admin {:>3}%  overall {:>3}%",
                    employee.id,
                    employee.name,
                    employee.department.as_str(),
                    employee.joining_date,
                    entry.progress.hr,
                    entry.progress.it,
                    entry.progress.admin,
                    entry.progress.overall
                );
            }
        }
        Commands::AddEmployee {
            name,
            email,
            department,
            role,
            joining_date,
        } => {
            let input = NewEmployee {
                name,
                email,
                department,
                job_role: role,
                joining_date,
            };
            let employee = EmployeeService::new(repo(), SystemClock).create_employee(&input)?;
            println!("created {} ({})", employee.id, employee.name);
        }
        Commands::Show { id } => {
            let overview = EmployeeService::new(repo(), SystemClock)
                .get_overview(&id)?
                .ok_or_else(|| anyhow!("no employee `{id}`"))?;
            let employee = &overview.employee;
            println!(
                "{} {} <{}> {} / {} joining {}",
                employee.id,
                employee.name,
                employee.email,
                employee.department,
                employee.job_role,
                employee.joining_date
            );
            println!(
                "progress: hr {}%  it {}%  admin {}%  overall {}%",
                overview.progress.hr,
                overview.progress.it,
                overview.progress.admin,
                overview.progress.overall
            );
            if let Some(tasks) = overview.tasks {
                for (department, task) in tasks.iter() {
                    println!(
                        "  [{:<11}] {:<5} {:<8} {} (due {})",
                        task.status.as_str(),
                        department.label(),
                        task.id,
                        task.title,
                        task.due_date.format("%Y-%m-%d")
                    );
                    for comment in &task.comments {
                        println!("      {} ({}): {}", comment.user, comment.role, comment.text);
                    }
                }
            }
        }
        Commands::Board {
            department,
            status,
            query,
        } => {
            let department = match department.as_deref() {
                Some(value) => Some(parse_department(value)?),
                None => SessionService::new(repo(), SystemClock)
                    .current_session()?
                    .and_then(|session| session.role.default_board_scope()),
            };
            let filter = BoardFilter {
                department,
                status: status.as_deref().map(parse_status).transpose()?,
                query,
            };
            let snapshot = ReportService::new(repo(), SystemClock).snapshot()?;
            for (status, entries) in snapshot.board_by_status(&filter) {
                println!("{status} ({})", entries.len());
                for entry in entries {
                    println!(
                        "  {} {:<20} {:<5} {}",
                        entry.employee.id,
                        entry.employee.name,
                        entry.department.label(),
                        entry.task.title
                    );
                }
            }
        }
        Commands::Login {
            email,
            password,
            role,
        } => {
            let role = Role::parse(&role).ok_or_else(|| anyhow!("unknown role `{role}`"))?;
            let session = SessionService::new(repo(), SystemClock).login(&email, &password, role)?;
            println!("logged in as {} ({})", session.name, session.role);
        }
        Commands::Logout => match SessionService::new(repo(), SystemClock).logout()? {
            Some(session) => println!("{} logged out", session.name),
            None => println!("no active session"),
        },
        Commands::SetStatus {
            employee_id,
            department,
            task_id,
            status,
        } => {
            let department = parse_department(&department)?;
            let status = parse_status(&status)?;
            ensure_can_edit(repo(), department)?;
            match TaskService::new(repo(), SystemClock).set_task_status(
                &employee_id,
                department,
                &task_id,
                status,
            )? {
                Some(task) => println!("{} is now {}", task.title, task.status),
                None => println!("no task {task_id} in {department} for {employee_id}"),
            }
        }
        Commands::Comment {
            employee_id,
            department,
            task_id,
            text,
        } => {
            let department = parse_department(&department)?;
            ensure_can_edit(repo(), department)?;
            match TaskService::new(repo(), SystemClock).add_comment(
                &employee_id,
                department,
                &task_id,
                &text,
            )? {
                Some(comment) => println!("comment {} added", comment.id),
                None => println!("nothing added"),
            }
        }
        Commands::Activity { limit, kind, query } => {
            let kind = kind
                .as_deref()
                .map(|value| {
                    ActivityKind::parse(value).ok_or_else(|| anyhow!("unknown activity `{value}`"))
                })
                .transpose()?;
            let entries = ReportService::new(repo(), SystemClock).activity(kind, &query)?;
            for entry in entries.iter().take(limit) {
                println!(
                    "{}  {:<16} {:<20} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.kind.as_str(),
                    entry.user,
                    entry.description
                );
            }
        }
        Commands::ToggleTheme => {
            let theme = SessionService::new(repo(), SystemClock).toggle_theme()?;
            println!("theme: {}", theme.as_str());
        }
    }

    Ok(())
}

/// Refuses edits outside the session role's buckets; the service itself
/// does not re-check the role.
fn ensure_can_edit<S: KeyValueStore>(
    repo: OnboardingRepository<S>,
    department: Department,
) -> Result<()> {
    if let Some(session) = SessionService::new(repo, SystemClock).current_session()? {
        if !session.can_edit(department) {
            bail!(
                "role {} cannot edit {} tasks",
                session.role,
                department.label()
            );
        }
    }
    Ok(())
}

fn render_notification(notice: &Notification) -> String {
    match notice {
        Notification::Pending {
            employee_name,
            department,
            count,
            ..
        } => format!("{employee_name}: {count} {} task(s) pending", department.label()),
        Notification::Upcoming {
            employee_name,
            days,
            joining_date,
            ..
        } => format!("{employee_name} joins in {days} day(s) on {joining_date}"),
    }
}

fn parse_department(value: &str) -> Result<Department> {
    Department::parse(value).ok_or_else(|| anyhow!("unknown task department `{value}`"))
}

fn parse_org_department(value: &str) -> Result<OrgDepartment> {
    OrgDepartment::parse(value).ok_or_else(|| anyhow!("unknown department `{value}`"))
}

fn parse_status(value: &str) -> Result<TaskStatus> {
    TaskStatus::parse(value).ok_or_else(|| anyhow!("unknown status `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboarding_core::open_db_in_memory;

    #[test]
    fn fresh_database_is_seeded_on_start() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        let config = CoreConfig::default();

        run(&store, &config, Commands::ToggleTheme).unwrap();

        let repo = OnboardingRepository::from_config(&store, &config);
        assert_eq!(repo.load_employees().unwrap().len(), 5);
        assert_eq!(repo.load_task_sets().unwrap().len(), 5);
    }

    #[test]
    fn start_seeding_keeps_existing_roster() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        let config = CoreConfig::default();
        let repo = OnboardingRepository::from_config(&store, &config);

        run(&store, &config, Commands::Seed).unwrap();
        let before = repo.load_task_sets().unwrap();
        run(&store, &config, Commands::Seed).unwrap();

        assert_eq!(repo.load_employees().unwrap().len(), 5);
        assert_eq!(repo.load_task_sets().unwrap(), before);
    }
}
