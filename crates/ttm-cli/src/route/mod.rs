//! Route command handlers: stops, ordering mode, origin and map links.

use anyhow::{bail, Context};
use clap::{Subcommand, ValueEnum};
use serde_json::json;
use ttm_core::{OrderMode, StopPatch};
use ttm_resolve::{build_app_url, build_maps_url, extract_time, StopDraft};
use ttm_store::Route;
use uuid::Uuid;

use crate::{print_json, App};

/// Sub-commands available under `stops`.
#[derive(Debug, Subcommand)]
pub enum StopsCommands {
    /// List stops in presentation order
    List,
    /// Add a stop typed by hand; a missing city is completed from the street
    Add {
        address: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Delivery time, e.g. 19:30 or 19h30
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit fields of a stop; pass an empty value to clear an optional field
    Edit {
        /// 1-based position or stop id
        target: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a stop
    Remove {
        /// 1-based position or stop id
        target: String,
    },
    /// Move a stop to a new 1-based position (manual mode only)
    Move {
        /// 1-based position or stop id
        target: String,
        position: usize,
    },
    /// Remove every stop
    Clear,
    /// Show or set the ordering mode
    Mode { mode: Option<ModeArg> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Manual,
    Time,
}

impl From<ModeArg> for OrderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Manual => OrderMode::Manual,
            ModeArg::Time => OrderMode::Time,
        }
    }
}

pub(crate) fn run_stops(app: &mut App, command: StopsCommands) -> anyhow::Result<()> {
    match command {
        StopsCommands::List => print_stops(app),
        StopsCommands::Add {
            address,
            city,
            phone,
            time,
            notes,
        } => {
            let draft = StopDraft {
                address,
                city,
                phone,
                time: time.as_deref().map(normalize_time).transpose()?,
                notes,
            };
            let stop = app.resolver.submit_stop(draft)?;
            let mut route = app.routes.load_route()?;
            route.add(stop.clone());
            app.routes.save_route(&route)?;
            print_json(&stop)
        }
        StopsCommands::Edit {
            target,
            address,
            city,
            phone,
            time,
            notes,
        } => {
            let mode = app.routes.load_mode()?;
            let mut route = app.routes.load_route()?;
            let id = resolve_target(&route, mode, &target)?;
            let time = match time.as_deref() {
                Some(t) if !t.trim().is_empty() => Some(normalize_time(t)?),
                other => other.map(str::to_string),
            };
            let patch = StopPatch {
                address,
                city,
                phone,
                time,
                notes,
            };
            if !route.update(id, patch) {
                bail!("no stop with id {id}");
            }
            app.routes.save_route(&route)?;
            print_stops(app)
        }
        StopsCommands::Remove { target } => {
            let mode = app.routes.load_mode()?;
            let mut route = app.routes.load_route()?;
            let id = resolve_target(&route, mode, &target)?;
            let removed = route
                .remove(id)
                .with_context(|| format!("no stop with id {id}"))?;
            app.routes.save_route(&route)?;
            print_json(&removed)
        }
        StopsCommands::Move { target, position } => {
            let mode = app.routes.load_mode()?;
            ensure_manual(mode)?;
            let mut route = app.routes.load_route()?;
            let id = resolve_target(&route, mode, &target)?;
            if position == 0 {
                bail!("positions start at 1");
            }
            route.reorder(id, position - 1);
            app.routes.save_route(&route)?;
            print_stops(app)
        }
        StopsCommands::Clear => {
            app.routes.clear_stops()?;
            print_json(&json!({ "cleared": true }))
        }
        StopsCommands::Mode { mode } => {
            if let Some(mode) = mode {
                app.routes.save_mode(mode.into())?;
            }
            print_json(&json!({ "mode": app.routes.load_mode()? }))
        }
    }
}

fn print_stops(app: &App) -> anyhow::Result<()> {
    let mode = app.routes.load_mode()?;
    let route = app.routes.load_route()?;
    print_json(&json!({
        "mode": mode,
        "stops": route.ordered(mode),
    }))
}

/// Time mode sorts on every read, so a manual position would not stick.
fn ensure_manual(mode: OrderMode) -> anyhow::Result<()> {
    if mode == OrderMode::Time {
        bail!("stops cannot be moved in time mode; switch with `stops mode manual`");
    }
    Ok(())
}

/// A 1-based position as listed under `mode`, or a stop id.
fn resolve_target(route: &Route, mode: OrderMode, target: &str) -> anyhow::Result<Uuid> {
    let target = target.trim();
    if let Ok(position) = target.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|i| route.ordered(mode).get(i).map(|stop| stop.id))
            .with_context(|| format!("no stop at position {position}"));
    }
    let id = Uuid::parse_str(target).with_context(|| format!("invalid stop reference {target}"))?;
    if route.stops().iter().any(|stop| stop.id == id) {
        Ok(id)
    } else {
        bail!("no stop with id {id}")
    }
}

/// Accept the layouts a ticket would use (`19h30`, `19:30`, `1930`).
fn normalize_time(input: &str) -> anyhow::Result<String> {
    extract_time(input).with_context(|| format!("invalid time {input:?}, expected HH:MM"))
}

pub(crate) fn run_route_url(app: &App, native: bool) -> anyhow::Result<()> {
    let mode = app.routes.load_mode()?;
    let stops = app.routes.load_route()?.ordered(mode);
    let origin = app.routes.load_origin()?;
    let default_city = &app.config.default_city;

    if native {
        match build_app_url(&stops, Some(&origin), default_city) {
            Some(url) => println!("{url}"),
            None => bail!("route is empty"),
        }
    } else {
        println!("{}", build_maps_url(&stops, Some(&origin), default_city));
    }
    Ok(())
}

pub(crate) fn run_origin(app: &mut App, value: Option<&str>) -> anyhow::Result<()> {
    if let Some(origin) = value {
        app.routes.save_origin(origin)?;
    }
    print_json(&json!({ "origin": app.routes.load_origin()? }))
}
