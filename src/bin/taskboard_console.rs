//! Console stand-in for the chat gateway.
//!
//! Usage:
//!
//! ```text
//! taskboard_console < commands.txt
//! ```
//!
//! Reads one command per line from standard input and writes every rendered
//! notification to standard output, prefixed with its destination. Logs go
//! to standard error.
//!
//! ```text
//! create <member> <roles> <description> [| <price>]
//! claim <task> <member> <roles>
//! resolve <task> <member> [<display name>]
//! block <member>
//! ```
//!
//! `<roles>` is a comma-separated role list, or `-` for none. `<task>` is a
//! full task id or `#n` for the n-th task created in this session. `block`
//! makes direct messages to a member fail, as when they have disabled them.
//! Blank lines and lines starting with `#` are ignored.

use mockable::DefaultClock;
use std::io::{self, Stdout};
use std::sync::Arc;
use taskboard::{
    board::{
        adapters::{
            console::ConsoleNotificationSink, memory::InMemoryTaskRepository,
            render::NotificationRenderer,
        },
        domain::{MemberId, RolePolicy, TaskId},
        services::{
            BoardAction, ClaimTaskRequest, CreateTaskRequest, NotificationDelivery,
            ResolveTaskRequest, TaskBoard, TaskLifecycleService,
        },
    },
    config::BoardConfig,
    telemetry,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

type ConsoleSink = ConsoleNotificationSink<Stdout>;
type ConsoleBoard = TaskBoard<InMemoryTaskRepository, DefaultClock, ConsoleSink>;

/// Errors raised while parsing a console command.
#[derive(Debug, Error, PartialEq, Eq)]
enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("invalid member id '{0}'")]
    InvalidMember(String),
    #[error("invalid task reference '{0}'")]
    InvalidTaskRef(String),
}

/// Reference to a task as typed on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskRef {
    Id(TaskId),
    Ordinal(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Create {
        creator: MemberId,
        roles: Vec<String>,
        description: String,
        price: Option<String>,
    },
    Claim {
        task: TaskRef,
        actor: MemberId,
        roles: Vec<String>,
    },
    Resolve {
        task: TaskRef,
        actor: MemberId,
        name: Option<String>,
    },
    Block {
        member: MemberId,
    },
}

impl Command {
    /// Parses a line, returning `Ok(None)` for blank lines and comments.
    fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = split_word(trimmed);
        let command = match verb {
            "create" => {
                let (creator, after_creator) = split_word(rest);
                let (roles, text) = split_word(after_creator);
                let (description, price) = match text.split_once('|') {
                    Some((description, price)) => (description, Some(price.trim().to_owned())),
                    None => (text, None),
                };
                Self::Create {
                    creator: parse_member(creator)?,
                    roles: parse_roles(roles)?,
                    description: description.trim().to_owned(),
                    price,
                }
            }
            "claim" => {
                let (task, after_task) = split_word(rest);
                let (actor, roles) = split_word(after_task);
                Self::Claim {
                    task: parse_task_ref(task)?,
                    actor: parse_member(actor)?,
                    roles: parse_roles(roles.trim())?,
                }
            }
            "resolve" => {
                let (task, after_task) = split_word(rest);
                let (actor, name) = split_word(after_task);
                let display_name = name.trim();
                Self::Resolve {
                    task: parse_task_ref(task)?,
                    actor: parse_member(actor)?,
                    name: (!display_name.is_empty()).then(|| display_name.to_owned()),
                }
            }
            "block" => Self::Block {
                member: parse_member(rest.trim())?,
            },
            other => return Err(CommandError::UnknownCommand(other.to_owned())),
        };
        Ok(Some(command))
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let trimmed = input.trim_start();
    trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""))
}

fn parse_member(raw: &str) -> Result<MemberId, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument("member id"));
    }
    raw.parse::<u64>()
        .map(MemberId::new)
        .map_err(|_| CommandError::InvalidMember(raw.to_owned()))
}

fn parse_roles(raw: &str) -> Result<Vec<String>, CommandError> {
    match raw {
        "" => Err(CommandError::MissingArgument("roles")),
        "-" => Ok(Vec::new()),
        list => Ok(list
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(ToOwned::to_owned)
            .collect()),
    }
}

fn parse_task_ref(raw: &str) -> Result<TaskRef, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument("task reference"));
    }
    if let Some(ordinal) = raw.strip_prefix('#') {
        return ordinal
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(TaskRef::Ordinal)
            .ok_or_else(|| CommandError::InvalidTaskRef(raw.to_owned()));
    }
    Uuid::parse_str(raw)
        .map(|uuid| TaskRef::Id(TaskId::from_uuid(uuid)))
        .map_err(|_| CommandError::InvalidTaskRef(raw.to_owned()))
}

/// Tasks created during this console session, in creation order.
#[derive(Debug, Default)]
struct Session {
    created: Vec<TaskId>,
}

impl Session {
    fn resolve(&self, task: TaskRef) -> Option<TaskId> {
        match task {
            TaskRef::Id(id) => Some(id),
            TaskRef::Ordinal(n) => self.created.get(n.checked_sub(1)?).copied(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = BoardConfig::load()?;
    telemetry::init_tracing(&config.observability)?;

    let policy = config.roles.policy();
    let sink = Arc::new(ConsoleNotificationSink::new(
        NotificationRenderer::new()?,
        config.channels.clone(),
        io::stdout(),
    ));
    let board = TaskBoard::new(
        TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(DefaultClock),
        ),
        NotificationDelivery::new(Arc::clone(&sink), config.delivery.policy()),
    );

    let mut session = Session::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Ok(Some(command)) => run(&board, &policy, &sink, &mut session, command).await,
            Ok(None) => {}
            Err(err) => tracing::warn!(%err, line = %line, "ignoring malformed command"),
        }
    }
    Ok(())
}

async fn run(
    board: &ConsoleBoard,
    policy: &RolePolicy,
    sink: &ConsoleSink,
    session: &mut Session,
    command: Command,
) {
    let action = match command {
        Command::Create {
            creator,
            roles,
            description,
            price,
        } => {
            let request =
                CreateTaskRequest::new(description, creator, policy.capabilities_for(&roles));
            BoardAction::Create(match price {
                Some(text) => request.with_price(text),
                None => request,
            })
        }
        Command::Claim { task, actor, roles } => {
            let Some(task_id) = session.resolve(task) else {
                tracing::warn!(?task, "no such task in this session");
                return;
            };
            BoardAction::Claim(ClaimTaskRequest::new(
                task_id,
                actor,
                policy.capabilities_for(&roles),
            ))
        }
        Command::Resolve { task, actor, name } => {
            let Some(task_id) = session.resolve(task) else {
                tracing::warn!(?task, "no such task in this session");
                return;
            };
            let request = ResolveTaskRequest::new(task_id, actor);
            BoardAction::Resolve(match name {
                Some(display_name) => request.with_actor_name(display_name),
                None => request,
            })
        }
        Command::Block { member } => {
            sink.block_direct_messages(member);
            tracing::info!(%member, "direct messages blocked");
            return;
        }
    };

    let is_create = matches!(action, BoardAction::Create(_));
    let report = board.handle(action).await;
    if let (true, Ok(task)) = (is_create, report.outcome()) {
        session.created.push(task.id());
        tracing::info!(ordinal = session.created.len(), task_id = %task.id(), "task registered");
    }
}
