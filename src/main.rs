// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Robust command line front end.
//!
//! Each subcommand plays the part of one screen: it builds the matching state
//! holder, runs the operation and prints the published state. Notices go to
//! stderr, logs go to stderr as JSON.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use robust_client::{
    config::Config,
    models::{ActivityProposal, ActivityStatus, ActivityUpdate, GroupForm, GroupUpdate},
    services::{ApiClient, IdTokenVerifier},
    state::{
        ActivityEditorState, AdminUsersState, BoardState, DashboardState, EditUserState,
        EventReceiver, GroupEditorState, GroupState, LoginState, SwipeDirection, UiEvent,
        ViewScope,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "robust", version)]
#[command(about = "Shared chores: groups, activity board, votes and scores")]
struct Cli {
    /// Acting user id (identity provider subject)
    #[arg(long, global = true, env = "ROBUST_USER_ID")]
    user: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify an ID token and make sure the user exists in the backend
    Login {
        #[arg(long, env = "ROBUST_ID_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Show the acting user and their group
    Me,
    /// Join a group with an invitation code
    Join { code: String },
    /// Create, edit or delete groups
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },
    /// Show the group's activity board
    Board,
    /// Propose, edit or delete activities
    Activity {
        #[command(subcommand)]
        command: ActivityCommand,
    },
    /// Move an activity to another status
    Move { activity_id: i64, status: String },
    /// Move an activity one step along the workflow
    Swipe {
        activity_id: i64,
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Vote on a pending activity
    Vote {
        activity_id: i64,
        #[arg(value_enum)]
        ballot: Ballot,
    },
    /// Record that you completed an activity
    Complete {
        activity_id: i64,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Points per day for the acting user
    Chart,
    /// List users (admin)
    Users {
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Grant or revoke admin rights (admin)
    Admin {
        user_id: String,
        #[arg(long, conflicts_with = "revoke")]
        grant: bool,
        #[arg(long)]
        revoke: bool,
    },
}

#[derive(Subcommand)]
enum GroupCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Edit {
        group_id: i64,
        #[command(flatten)]
        fields: GroupFields,
    },
    Delete { group_id: i64 },
}

#[derive(Args)]
struct GroupFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    image: Option<String>,
}

#[derive(Subcommand)]
enum ActivityCommand {
    Show {
        activity_id: i64,
    },
    Propose {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "semanal")]
        frequency: String,
        #[arg(long, default_value_t = 3)]
        difficulty: i32,
        #[arg(long, default_value_t = 3)]
        unpleasantness: i32,
    },
    Edit {
        activity_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long)]
        difficulty: Option<i32>,
        #[arg(long)]
        unpleasantness: Option<i32>,
        #[arg(long)]
        points: Option<i32>,
    },
    Delete {
        activity_id: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Forward,
    Back,
}

#[derive(Clone, Copy, ValueEnum)]
enum Ballot {
    Yes,
    No,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let api = ApiClient::from_config(&config)?;
    tracing::debug!(base_url = api.base_url(), "API client ready");

    match cli.command {
        Command::Login { token } => {
            let project_id = config.require_project_id()?;
            let verifier = IdTokenVerifier::new(project_id)?;
            let (state, mut events) = LoginState::new(api);
            let user = state.login_with_token(&verifier, &token).await;
            report(&mut events);
            let user = user.context("Login failed")?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::Me => {
            let user_id = require_user(&cli.user)?;
            let (state, mut events) = GroupState::new(api);
            let ok = state.load(user_id).await;
            report(&mut events);
            ensure(ok)?;
            print_membership(&state);
        }
        Command::Join { code } => {
            let user_id = require_user(&cli.user)?;
            let (state, mut events) = GroupState::new(api);
            let ok = state.join(user_id, &code).await;
            report(&mut events);
            ensure(ok)?;
            print_membership(&state);
        }
        Command::Group { command } => {
            run_group_command(api, &cli.user, command).await?;
        }
        Command::Board => {
            let (state, mut events) = open_board(&api, &cli.user).await?;
            let ok = state.refresh().await;
            report(&mut events);
            ensure(ok)?;
            print_board(&state);
        }
        Command::Activity { command } => {
            run_activity_command(api, &cli.user, command).await?;
        }
        Command::Move {
            activity_id,
            status,
        } => {
            let target = ActivityStatus::from(status.as_str());
            if !target.is_known() {
                bail!("Unknown status '{status}'");
            }
            let (state, mut events) = open_board(&api, &cli.user).await?;
            let loaded = state.refresh().await;
            report(&mut events);
            ensure(loaded)?;
            let offered = state.offered_moves(activity_id);
            if !offered.contains(&target) {
                let offered: Vec<&str> = offered.iter().map(ActivityStatus::as_str).collect();
                bail!(
                    "Activity #{activity_id} cannot move to '{target}' (offered: {})",
                    offered.join(", ")
                );
            }
            let ok = state.move_activity(activity_id, target).await;
            report(&mut events);
            ensure(ok)?;
            print_board(&state);
        }
        Command::Swipe {
            activity_id,
            direction,
        } => {
            let direction = match direction {
                Direction::Forward => SwipeDirection::Forward,
                Direction::Back => SwipeDirection::Back,
            };
            let (state, mut events) = open_board(&api, &cli.user).await?;
            state.refresh().await;
            let moved = state.swipe(activity_id, direction).await;
            report(&mut events);
            if !moved {
                eprintln!("Nothing to move");
            }
            print_board(&state);
        }
        Command::Vote {
            activity_id,
            ballot,
        } => {
            let (state, mut events) = open_board(&api, &cli.user).await?;
            state.refresh().await;
            let ok = state
                .vote(activity_id, matches!(ballot, Ballot::Yes))
                .await;
            report(&mut events);
            ensure(ok)?;
            print_board(&state);
        }
        Command::Complete {
            activity_id,
            comment,
        } => {
            let (state, mut events) = open_board(&api, &cli.user).await?;
            state.refresh().await;
            let ok = state
                .record_completion(activity_id, comment.as_deref())
                .await;
            report(&mut events);
            ensure(ok)?;
        }
        Command::Chart => {
            let user_id = require_user(&cli.user)?.to_string();
            let (state, mut events) = DashboardState::new(api);

            let mut scope = ViewScope::new("dashboard");
            let scores = state.clone();
            let uid = user_id.clone();
            scope.spawn(async move {
                scores.load_scores(&uid).await;
            });
            let admin = state.clone();
            scope.spawn(async move {
                admin.check_admin(&user_id).await;
            });
            scope.join_all().await;
            report(&mut events);

            let view = state.snapshot();
            for (label, value) in view.chart.entries() {
                println!("{label}\t{value}");
            }
            println!("Total\t{}", view.chart.total());
            if view.is_admin {
                println!("(admin)");
            }
        }
        Command::Users { query } => {
            let (state, mut events) = AdminUsersState::new(api);
            let ok = state.fetch().await;
            state.search(&query);
            report(&mut events);
            ensure(ok)?;
            for user in state.snapshot().users {
                let marker = if user.is_admin { " [admin]" } else { "" };
                println!("{}\t{}{}", user.id, user.name, marker);
            }
        }
        Command::Admin {
            user_id,
            grant,
            revoke,
        } => {
            if grant == revoke {
                bail!("Pass exactly one of --grant or --revoke");
            }
            let (state, mut events) = EditUserState::new(api);
            let ok = state.set_admin(&user_id, grant).await;
            report(&mut events);
            ensure(ok)?;
        }
    }

    Ok(())
}

async fn run_group_command(
    api: ApiClient,
    user: &Option<String>,
    command: GroupCommand,
) -> anyhow::Result<()> {
    let (state, mut events) = GroupEditorState::new(api);
    let ok = match command {
        GroupCommand::Create { name, description } => {
            let creator = require_user(user)?;
            state
                .create(GroupForm { name, description }, creator)
                .await
        }
        GroupCommand::Edit { group_id, fields } => {
            let update = GroupUpdate {
                name: fields.name,
                description: fields.description,
                image: fields.image,
            };
            state.update(group_id, &update).await
        }
        GroupCommand::Delete { group_id } => state.delete(group_id).await,
    };
    report(&mut events);
    ensure(ok)
}

async fn run_activity_command(
    api: ApiClient,
    user: &Option<String>,
    command: ActivityCommand,
) -> anyhow::Result<()> {
    let (state, mut events) = ActivityEditorState::new(api.clone());
    let ok = match command {
        ActivityCommand::Show { activity_id } => {
            let ok = state.load(activity_id).await;
            if let Some(activity) = state.snapshot().activity {
                println!("{}", serde_json::to_string_pretty(&activity)?);
            }
            ok
        }
        ActivityCommand::Propose {
            name,
            description,
            frequency,
            difficulty,
            unpleasantness,
        } => {
            let user_id = require_user(user)?;
            let me = api
                .get_user(user_id)
                .await
                .context("Failed to load user")?;
            let Some(group_id) = me.group_id else {
                bail!("Join a group first");
            };
            let proposal = ActivityProposal {
                name,
                description,
                frequency,
                difficulty,
                unpleasantness,
                group_id,
                creator_id: me.id,
                creator_is_admin: me.is_admin,
            };
            state.propose(proposal).await
        }
        ActivityCommand::Edit {
            activity_id,
            name,
            description,
            frequency,
            difficulty,
            unpleasantness,
            points,
        } => {
            let update = ActivityUpdate {
                name,
                description,
                frequency,
                difficulty,
                unpleasantness,
                points,
                status: None,
            };
            state.update(activity_id, &update).await
        }
        ActivityCommand::Delete { activity_id } => state.delete(activity_id).await,
    };
    report(&mut events);
    ensure(ok)
}

/// Board holder for the acting user's group.
async fn open_board(
    api: &ApiClient,
    user: &Option<String>,
) -> anyhow::Result<(BoardState, EventReceiver)> {
    let user_id = require_user(user)?;
    let me = api
        .get_user(user_id)
        .await
        .context("Failed to load user")?;
    let Some(group_id) = me.group_id else {
        bail!("Join a group first");
    };
    Ok(BoardState::new(api.clone(), group_id, user_id))
}

fn require_user(user: &Option<String>) -> anyhow::Result<&str> {
    user.as_deref()
        .context("No user given; pass --user or set ROBUST_USER_ID")
}

fn ensure(ok: bool) -> anyhow::Result<()> {
    if !ok {
        bail!("Operation failed");
    }
    Ok(())
}

/// Print queued notices; other events only matter to interactive views.
fn report(events: &mut EventReceiver) {
    for event in events.drain() {
        match event {
            UiEvent::Toast(notice) => eprintln!("{notice}"),
            other => tracing::debug!(event = ?other, "Event"),
        }
    }
}

fn print_membership(state: &GroupState) {
    let view = state.snapshot();
    if let Some(user) = &view.user {
        println!("Hola, {} ({} pts)", user.first_name(), user.total_score);
    }
    match &view.group {
        Some(group) => {
            println!("Grupo: {} [{}]", group.name, group.invitation_code);
            if view.is_creator {
                println!("Eres el creador del grupo");
            }
        }
        None => println!("Sin grupo"),
    }
}

fn print_board(state: &BoardState) {
    let board = state.snapshot().board;
    let columns = [
        ("Pendientes", &board.pending),
        ("Por hacer", &board.todo),
        ("En progreso", &board.in_progress),
        ("Hechas", &board.done),
    ];
    for (title, activities) in columns {
        println!("== {title} ({})", activities.len());
        for activity in activities {
            if activity.status == ActivityStatus::Pending {
                let (yes, total) = activity.vote_tally();
                let voted = if activity.has_voted() { " (votado)" } else { "" };
                println!(
                    "  #{} {} - Votos: {yes}/{total}{voted}",
                    activity.id, activity.name
                );
            } else {
                println!("  #{} {} - {} pts", activity.id, activity.name, activity.points);
            }
        }
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("robust_client=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
