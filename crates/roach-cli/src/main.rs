use facet::Facet;
use figue as args;
use owo_colors::OwoColorize;
use roach::{
    CockroachProvider, Database, DatabaseResource, Grant, GrantResource, Membership,
    MembershipResource, Resource, Role, RoleResource,
};
use std::io::Read;
use std::str::FromStr;

mod config;

/// Reconcile CockroachDB databases, roles, memberships and grants.
#[derive(Facet, Debug)]
struct Cli {
    /// Show version information
    #[facet(args::named, args::short = 'V')]
    version: bool,

    /// Command to run
    #[facet(default, args::subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Facet, Debug)]
#[repr(u8)]
enum Commands {
    /// Create an object from a desired record and print the synced record
    Create {
        /// grant, role, database or grant-role
        #[facet(args::positional)]
        kind: String,

        /// JSON file with the desired record, `-` for stdin
        #[facet(args::named)]
        desired: String,
    },
    /// Read an object back by id
    Read {
        /// grant, role, database or grant-role
        #[facet(args::positional)]
        kind: String,

        /// Identity printed by `create`
        #[facet(args::named)]
        id: String,
    },
    /// Move an object from its recorded state to a desired record
    Update {
        /// grant, role, database or grant-role
        #[facet(args::positional)]
        kind: String,

        /// JSON file with the current record, `-` for stdin
        #[facet(args::named)]
        state: String,

        /// JSON file with the desired record, `-` for stdin
        #[facet(args::named)]
        desired: String,
    },
    /// Delete the object a record describes
    Delete {
        /// grant, role, database or grant-role
        #[facet(args::positional)]
        kind: String,

        /// JSON file with the current record, `-` for stdin
        #[facet(args::named)]
        state: String,
    },
}

/// Kind of object a command acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Grant,
    Role,
    Database,
    GrantRole,
}

impl FromStr for Kind {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grant" => Ok(Kind::Grant),
            "role" => Ok(Kind::Role),
            "database" => Ok(Kind::Database),
            "grant-role" => Ok(Kind::GrantRole),
            other => Err(CliError::UnknownKind(other.to_string())),
        }
    }
}

/// What to do, with its inputs already read.
enum Op {
    Create { desired: String },
    Read { id: String },
    Update { state: String, desired: String },
    Delete { state: String },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Roach(#[from] roach::Error),

    #[error("unknown kind `{0}`, expected one of grant, role, database, grant-role")]
    UnknownKind(String),

    #[error("failed to read {path}: {message}")]
    Input { path: String, message: String },

    #[error("invalid {path}: {message}")]
    Record { path: String, message: String },

    #[error("failed to serialize result: {0}")]
    Output(String),

    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("only one of --state and --desired may read stdin")]
    StdinTwice,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args_ref: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    let result: Result<Cli, _> = args::from_slice(&args_ref);

    match result {
        Ok(cli) => {
            if let Err(e) = run(cli) {
                eprintln!("{} {e}", "error:".red().bold());
                std::process::exit(1);
            }
        }
        Err(err) if err.is_help_request() => {
            print!("{}", err.help_text().unwrap_or(""));
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if cli.version {
        println!("roach {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some(command) = cli.command else {
        let config = args::HelpConfig {
            program_name: Some("roach".to_string()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            ..Default::default()
        };
        print!("{}", args::generate_help::<Cli>(&config));
        return Ok(());
    };

    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("roach=info")),
        )
        .init();

    let (kind, op) = prepare(command)?;
    let (config, path) = config::load()?;
    if let Some(path) = &path {
        tracing::debug!(path = %path.display(), "loaded configuration");
    }
    let provider = CockroachProvider::new(config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(execute(&provider, Kind::Grant, op))?;
    if let Some(json) = output {
        println!("{json}");
    }
    Ok(())
}

/// Parse the kind and read every input file before anything touches the
/// database.
fn prepare(command: Commands) -> Result<(Kind, Op), CliError> {
    let (kind, op) = match command {
        Commands::Create { kind, desired } => (
            kind,
            Op::Create {
                desired: read_input(&desired)?,
            },
        ),
        Commands::Read { kind, id } => (kind, Op::Read { id }),
        Commands::Update {
            kind,
            state,
            desired,
        } => {
            if state == "-" && desired == "-" {
                return Err(CliError::StdinTwice);
            }
            (
                kind,
                Op::Update {
                    state: read_input(&state)?,
                    desired: read_input(&desired)?,
                },
            )
        }
        Commands::Delete { kind, state } => (
            kind,
            Op::Delete {
                state: read_input(&state)?,
            },
        ),
    };
    Ok((kind.parse()?, op))
}

fn read_input(path: &str) -> Result<String, CliError> {
    let input_error = |e: std::io::Error| CliError::Input {
        path: path.to_string(),
        message: e.to_string(),
    };
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(input_error)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(input_error)
    }
}

/// Run one operation for a resource whose record is `$record`.
macro_rules! reconcile {
    ($resource:expr, $record:ty, $op:expr) => {{
        let resource = $resource;
        tracing::info!(kind = kind_of(&resource), "reconciling");
        let parse = |field: &str, json: &str| -> Result<$record, CliError> {
            facet_json::from_str::<$record>(json).map_err(|e| CliError::Record {
                path: field.to_string(),
                message: e.to_string(),
            })
        };
        let synced: Option<$record> = match $op {
            Op::Create { desired } => Some(Resource::create(&resource, &parse("--desired", &desired)?).await?),
            Op::Read { id } => Some(Resource::read(&resource, &id).await?),
            Op::Update { state, desired } => {
                let state = parse("--state", &state)?;
                let desired = parse("--desired", &desired)?;
                Some(Resource::update(&resource, &state, &desired).await?)
            }
            Op::Delete { state } => {
                Resource::delete(&resource, &parse("--state", &state)?).await?;
                None
            }
        };
        synced
            .map(|record| {
                facet_json::to_string(&record).map_err(|e| CliError::Output(e.to_string()))
            })
            .transpose()
    }};
}

fn kind_of<R: Resource>(_: &R) -> &'static str {
    R::KIND
}

async fn execute(
    provider: &CockroachProvider,
    kind: Kind,
    op: Op,
) -> Result<Option<String>, CliError> {
    match kind {
        Kind::Grant => reconcile!(GrantResource::new(provider), Grant, op),
        Kind::Role => reconcile!(RoleResource::new(provider), Role, op),
        Kind::Database => reconcile!(DatabaseResource::new(provider), Database, op),
        Kind::GrantRole => reconcile!(MembershipResource::new(provider), Membership, op),
    }
}
