use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use maze_core::{GameMode, MazeConfig, Position, SearchOrder, SolverConfig};
use maze_host::{solve_maze, verify_moves_file, HostError, MazeFile, SolveReport, WalkReport};
use serde::{Deserialize, Serialize};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Expansion budget applied when a solve request does not set one.
const DEFAULT_MAX_EXPANSIONS: usize = 1_000_000;

// Request/Response types

#[derive(Debug, Deserialize)]
struct GenerateMazeRequest {
    size: usize,
    seed: Option<u32>,
    game_mode: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateMazeResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maze: Option<MazeFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SolveMazeRequest {
    maze: MazeFile,
    start: Option<[usize; 2]>,
    goal: Option<[usize; 2]>,
    max_paths: Option<usize>,
    max_depth: Option<usize>,
    max_expansions: Option<usize>,
    #[serde(default)]
    goal_directed: bool,
}

#[derive(Debug, Serialize)]
struct SolveMazeResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<SolveReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyMovesRequest {
    maze: MazeFile,
    moves: Vec<u8>,
}

#[derive(Debug, Serialize)]
struct VerifyMovesResponse {
    success: bool,
    reached_goal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<WalkReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Bad input maps to 400, anything else to 500.
fn error_status(e: &HostError) -> actix_web::HttpResponseBuilder {
    if e.is_invalid_input() {
        HttpResponse::BadRequest()
    } else {
        HttpResponse::InternalServerError()
    }
}

// API Handlers

/// POST /api/generate-maze
/// Generate a maze, optionally from a seed
async fn generate_maze(req: web::Json<GenerateMazeRequest>) -> impl Responder {
    tracing::info!(
        "Received generate-maze request: size={}, seed={:?}, mode={:?}",
        req.size,
        req.seed,
        req.game_mode
    );

    let result = build_config(&req).and_then(|config| maze_host::generate_maze(&config));

    match result {
        Ok(generated) => {
            tracing::info!("Successfully generated maze for seed: {}", generated.seed);
            HttpResponse::Ok().json(GenerateMazeResponse {
                success: true,
                seed: Some(generated.seed),
                maze: Some(generated.maze_file),
                error: None,
            })
        }
        Err(e) => {
            tracing::error!("Failed to generate maze: {}", e);
            error_status(&e).json(GenerateMazeResponse {
                success: false,
                seed: None,
                maze: None,
                error: Some(e.to_string()),
            })
        }
    }
}

fn build_config(req: &GenerateMazeRequest) -> Result<MazeConfig, HostError> {
    let mut config = MazeConfig::square(req.size);
    if let Some(seed) = req.seed {
        config = config.with_seed(seed);
    }
    if let Some(mode) = &req.game_mode {
        config = config.with_game_mode(mode.parse::<GameMode>()?);
    }
    Ok(config)
}

/// POST /api/solve-maze
/// Enumerate every path through a maze
async fn solve(req: web::Json<SolveMazeRequest>) -> impl Responder {
    let req = req.into_inner();
    tracing::info!(
        "Received solve-maze request: {}x{} maze, start={:?}, goal={:?}",
        req.maze.rows,
        req.maze.cols,
        req.start,
        req.goal
    );

    let config = solver_config(&req);
    let start = req.start.map(Position::from);
    let goal = req.goal.map(Position::from);
    let maze = req.maze;

    // Enumeration is CPU bound, keep it off the worker threads
    let result = match web::block(move || solve_maze(&maze, start, goal, &config)).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Solve task failed: {}", e);
            return HttpResponse::InternalServerError().json(SolveMazeResponse {
                success: false,
                report: None,
                error: Some(e.to_string()),
            });
        }
    };

    match result {
        Ok(report) => {
            tracing::info!(
                "Solved maze: outcome={}, paths={}",
                report.outcome,
                report.paths.len()
            );
            HttpResponse::Ok().json(SolveMazeResponse {
                success: true,
                report: Some(report),
                error: None,
            })
        }
        Err(e) => {
            tracing::error!("Failed to solve maze: {}", e);
            error_status(&e).json(SolveMazeResponse {
                success: false,
                report: None,
                error: Some(e.to_string()),
            })
        }
    }
}

/// Search limits for a request; the expansion budget is never left unbounded.
fn solver_config(req: &SolveMazeRequest) -> SolverConfig {
    let mut config = SolverConfig::default()
        .with_max_expansions(req.max_expansions.unwrap_or(DEFAULT_MAX_EXPANSIONS));
    if let Some(max_paths) = req.max_paths {
        config = config.with_max_paths(max_paths);
    }
    if let Some(max_depth) = req.max_depth {
        config = config.with_max_depth(max_depth);
    }
    if req.goal_directed {
        config = config.with_order(SearchOrder::GoalDirected);
    }
    config
}

/// POST /api/verify-moves
/// Replay a moves array against a maze
async fn verify_moves(req: web::Json<VerifyMovesRequest>) -> impl Responder {
    tracing::info!(
        "Received verify-moves request: {}x{} maze, moves: {}",
        req.maze.rows,
        req.maze.cols,
        req.moves.len()
    );

    match verify_moves_file(&req.maze, &req.moves) {
        Ok(outcome) => {
            let report = WalkReport::from(outcome);
            tracing::info!("Replay finished: reached_goal={}", report.reached_goal);
            HttpResponse::Ok().json(VerifyMovesResponse {
                success: true,
                reached_goal: report.reached_goal,
                outcome: Some(report),
                error: None,
            })
        }
        Err(e) => {
            tracing::error!("Failed to verify moves: {}", e);
            error_status(&e).json(VerifyMovesResponse {
                success: false,
                reached_goal: false,
                outcome: None,
                error: Some(e.to_string()),
            })
        }
    }
}

/// GET /health
/// Health check endpoint
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "maze-api"
    }))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(10_485_760)) // 10MB limit
        .route("/health", web::get().to(health))
        .route("/api/generate-maze", web::post().to(generate_maze))
        .route("/api/solve-maze", web::post().to(solve))
        .route("/api/verify-moves", web::post().to(verify_moves));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Maze API Server");

    let bind_address =
        std::env::var("MAZE_API_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    tracing::info!("Binding to {}", bind_address);

    HttpServer::new(|| App::new().wrap(Cors::permissive()).configure(routes))
        .bind(bind_address)?
        .run()
        .await
}
