use clap::{Parser, Subcommand};
use serde_json::json;
use trackmap::api::{ApiError, HttpTrackApi, TrackApi};
use trackmap::config::{Config, ConfigError, parse_lat_lng};
use trackmap::model::{Point, UserId};
use trackmap::scene::Scene;
use trackmap::sync::{SyncController, SyncError, TrackChange};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Sync(#[from] SyncError),
    #[error("user {0} has no recorded points")]
    EmptyTrack(UserId),
    #[error("could not write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "trackmap", about = "Browse and author GPS tracks in a position-log service")]
struct Cli {
    /// Position-log service root; overrides TRACKMAP_BASE_URL from the environment.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List users with their colors and the suggested next id.
    Users,
    /// Render users' tracks and print them as GeoJSON.
    Show {
        #[arg(required = true)]
        user_ids: Vec<UserId>,
    },
    /// Print point count and length of a user's track.
    Summary { user_id: UserId },
    /// Delete a user and their track.
    Delete { user_id: UserId },
    /// Create a track from points; defaults to the suggested next id.
    Create {
        user_id: Option<UserId>,
        #[arg(long = "point", value_name = "LAT,LNG", required = true, value_parser = parse_point)]
        points: Vec<Point>,
    },
    /// Print the base map view and the tile under its center.
    View,
}

fn parse_point(raw: &str) -> Result<Point, String> {
    parse_lat_lng(raw).ok_or_else(|| format!("expected LAT,LNG in degrees, got {raw:?}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

    let api = HttpTrackApi::new(&config.api)?;
    let sync = SyncController::new(api, Scene::new(config.map.clone()));

    match cli.command {
        Command::Users => run_users(&sync).await,
        Command::Show { user_ids } => run_show(&sync, &user_ids).await,
        Command::Summary { user_id } => run_summary(&sync, user_id).await,
        Command::Delete { user_id } => run_delete(&sync, user_id).await,
        Command::Create { user_id, points } => run_create(&sync, user_id, &points).await,
        Command::View => run_view(&config),
    }
}

type Controller = SyncController<HttpTrackApi, Scene>;

async fn run_users(sync: &Controller) -> Result<(), CliError> {
    let users = sync.list_users().await?;
    let view = sync.view();
    let entries: Vec<_> = users
        .iter()
        .map(|id| json!({ "id": id, "color": view.color_of(*id).css() }))
        .collect();
    print_json(&json!({ "users": entries, "next_user_id": view.next_user_id() }))
}

async fn run_show(sync: &Controller, user_ids: &[UserId]) -> Result<(), CliError> {
    sync.list_users().await?;
    for user_id in user_ids {
        if sync.show_track(*user_id).await? == TrackChange::Empty {
            tracing::warn!(user_id, "skipping user without points");
        }
    }
    print_json(&sync.view().surface().to_geojson())
}

async fn run_summary(sync: &Controller, user_id: UserId) -> Result<(), CliError> {
    let summary = sync.api().fetch_summary(user_id).await?;
    print_json(&json!({
        "user_id": user_id,
        "num_points": summary.num_points,
        "length_km": summary.length_km(),
    }))
}

async fn run_delete(sync: &Controller, user_id: UserId) -> Result<(), CliError> {
    sync.delete_user(user_id).await?;
    let view = sync.view();
    print_json(&json!({ "deleted": user_id, "users": view.users() }))
}

async fn run_create(sync: &Controller, user_id: Option<UserId>, points: &[Point]) -> Result<(), CliError> {
    let user_id = match user_id {
        Some(id) => id,
        None => {
            sync.list_users().await?;
            sync.view().next_user_id()
        }
    };
    for point in points {
        sync.record_point(*point);
    }
    let draft_length_m = sync.view().draft().length_m();
    tracing::info!(user_id, points = points.len(), draft_length_m, "submitting draft");

    let submitted = sync.submit_draft(user_id).await?;
    match submitted.shown {
        Some(TrackChange::Shown(_)) => print_json(&sync.view().surface().to_geojson()),
        Some(_) => Err(CliError::EmptyTrack(user_id)),
        None => {
            tracing::warn!(user_id, "track saved but could not be fetched back");
            print_json(&json!({ "created": user_id, "points": submitted.points, "shown": false }))
        }
    }
}

fn run_view(config: &Config) -> Result<(), CliError> {
    let map = &config.map;
    let (zoom, x, y) = map.tiles.tile_for(map.center, map.zoom);
    print_json(&json!({
        "base_map": map,
        "center_tile": { "zoom": zoom, "x": x, "y": y, "url": map.tiles.tile_url(zoom, x, y) },
    }))
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
