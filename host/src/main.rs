use maze_core::{GameMode, Grid, MazeConfig, Position, SearchOrder, SolverConfig};
use maze_host::{
    generate_maze, load_maze_file, load_moves, save_maze_file, solve_maze, verify_moves_file,
    OutcomeKind, SolveReport, WalkReport,
};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Instant;

fn main() {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("🧭 Maze Generator & Solver");
    println!("{}", "=".repeat(70));
    println!();

    // Parse CLI arguments
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "generate" => {
            if args.len() < 3 {
                eprintln!("Usage: {} generate <size> [--seed <n>] [--mode <Classic|Solver>] [output_file]", args[0]);
                std::process::exit(1);
            }

            let size: usize = args[2].parse().unwrap_or_else(|_| {
                eprintln!("❌ Error: Invalid size '{}'. Must be a positive integer.", args[2]);
                std::process::exit(1);
            });

            let mut config = MazeConfig::square(size);
            let mut output_file = None;
            let mut rest = args[3..].iter();

            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--seed" => {
                        let seed = flag_value(&mut rest, "--seed", "<n>");
                        config = config.with_seed(seed.parse().unwrap_or_else(|_| {
                            eprintln!("❌ Error: Invalid seed '{}'. Must be a 32-bit unsigned integer.", seed);
                            std::process::exit(1);
                        }));
                    }
                    "--mode" => {
                        let mode = flag_value(&mut rest, "--mode", "Classic|Solver");
                        config = config.with_game_mode(mode.parse::<GameMode>().unwrap_or_else(|e| {
                            eprintln!("❌ Error: {}", e);
                            std::process::exit(1);
                        }));
                    }
                    other => output_file = Some(other.to_string()),
                }
            }

            generate_command(config, output_file.as_deref());
        }

        "solve" => {
            if args.len() < 3 {
                eprintln!("Usage: {} solve <maze_file> [--start r,c] [--goal r,c] [--max-paths n] [--max-depth n] [--max-expansions n] [--goal-directed] [output_file]", args[0]);
                eprintln!("Error: Missing required arguments");
                std::process::exit(1);
            }

            let maze_file = &args[2];
            let mut start = None;
            let mut goal = None;
            let mut config = SolverConfig::default();
            let mut output_file = None;
            let mut rest = args[3..].iter();

            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--start" => start = Some(parse_point(flag_value(&mut rest, "--start", "r,c"))),
                    "--goal" => goal = Some(parse_point(flag_value(&mut rest, "--goal", "r,c"))),
                    "--max-paths" => config = config.with_max_paths(count_value(&mut rest, arg)),
                    "--max-depth" => config = config.with_max_depth(count_value(&mut rest, arg)),
                    "--max-expansions" => {
                        config = config.with_max_expansions(count_value(&mut rest, arg))
                    }
                    "--goal-directed" => config = config.with_order(SearchOrder::GoalDirected),
                    other => output_file = Some(other.to_string()),
                }
            }

            solve_command(maze_file, start, goal, config, output_file.as_deref());
        }

        "show" => {
            if args.len() < 3 {
                eprintln!("Usage: {} show <maze_file>", args[0]);
                eprintln!("Error: Missing required argument");
                std::process::exit(1);
            }

            show_command(&args[2]);
        }

        "verify-moves" => {
            if args.len() < 4 {
                eprintln!("Usage: {} verify-moves <maze_file> <moves_file>", args[0]);
                eprintln!("Error: Missing required arguments");
                std::process::exit(1);
            }

            verify_moves_command(&args[2], &args[3]);
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  generate <size> [--seed <n>] [--mode <Classic|Solver>] [output_file]");
    eprintln!("      Generate a maze");
    eprintln!("      - size: Edge length, 3..=50 (even sizes are rounded up)");
    eprintln!("      - --seed: Optional seed; a clock-derived seed is used otherwise");
    eprintln!("      - --mode: Classic places a random start, Solver leaves it unset");
    eprintln!("                Default: Classic");
    eprintln!("      - output_file: Optional file to save the maze (JSON)");
    eprintln!("                     Defaults to: <seed>_maze.json");
    eprintln!();
    eprintln!("  solve <maze_file> [--start r,c] [--goal r,c] [--max-paths n] [--max-depth n] [--max-expansions n] [--goal-directed] [output_file]");
    eprintln!("      Enumerate every path from start to goal");
    eprintln!("      - --start/--goal: Override the maze's start/goal points");
    eprintln!("      - --max-paths: Stop after recording n paths");
    eprintln!("      - --max-depth: Never extend a path beyond n cells");
    eprintln!("      - --max-expansions: Stop after n cell expansions");
    eprintln!("      - --goal-directed: Expand cells closer to the goal first");
    eprintln!("      - output_file: Optional file to save the solution (JSON)");
    eprintln!("                     Defaults to: <maze_stem>_solution.json");
    eprintln!();
    eprintln!("  show <maze_file>");
    eprintln!("      Print a maze file as text");
    eprintln!();
    eprintln!("  verify-moves <maze_file> <moves_file>");
    eprintln!("      Check that a moves array walks from start to goal");
    eprintln!("      - moves_file: JSON array of moves (0=North, 1=East, 2=South, 3=West)");
    eprintln!();
    eprintln!("Example workflow:");
    eprintln!("  1. Generate maze: {} generate 21 --seed 2918957128", program);
    eprintln!("     (saves to 2918957128_maze.json)");
    eprintln!("  2. Solve it:      {} solve 2918957128_maze.json", program);
    eprintln!("     (saves to 2918957128_maze_solution.json)");
    eprintln!("  3. Check a run:   {} verify-moves 2918957128_maze.json moves.json", program);
}

fn count_value(rest: &mut std::slice::Iter<'_, String>, flag: &str) -> usize {
    let n = flag_value(rest, flag, "<n>");
    n.parse().unwrap_or_else(|_| {
        eprintln!("❌ Error: Invalid {} value '{}'", flag, n);
        std::process::exit(1);
    })
}

fn flag_value<'a>(rest: &mut std::slice::Iter<'a, String>, flag: &str, expected: &str) -> &'a str {
    rest.next().map(String::as_str).unwrap_or_else(|| {
        eprintln!("❌ Error: {} requires a value ({})", flag, expected);
        std::process::exit(1);
    })
}

fn parse_point(value: &str) -> Position {
    let parsed = value
        .split_once(',')
        .and_then(|(r, c)| Some(Position::new(r.trim().parse().ok()?, c.trim().parse().ok()?)));

    parsed.unwrap_or_else(|| {
        eprintln!("❌ Error: Invalid point '{}'. Expected <row>,<col>.", value);
        std::process::exit(1);
    })
}

fn generate_command(config: MazeConfig, output_file: Option<&str>) {
    println!("📋 Generating maze");
    println!("  Size: {}x{}", config.rows, config.cols);
    match config.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: (from clock)"),
    }
    println!("  Mode: {}", config.game_mode);
    println!();

    let start = Instant::now();

    match generate_maze(&config) {
        Ok(generated) => {
            let duration = start.elapsed();
            let maze_file = &generated.maze_file;
            println!("  Generation time: {:.3}s", duration.as_secs_f64());
            println!();
            println!("✅ Maze generated successfully!");
            println!("  Seed: {}", generated.seed);
            println!("  Grid size: {}x{} cells", maze_file.rows, maze_file.cols);
            println!("  Shortcuts: {}", maze_file.shortcut_count());
            println!("  Start: {}", format_point(maze_file.start_point));
            println!("  Goal: {}", format_point(maze_file.goal_point));
            println!();

            // Use default filename pattern if no output file specified
            let default_filename = format!("{}_maze.json", generated.seed);
            let file_to_save = output_file.unwrap_or(&default_filename);

            match save_maze_file(maze_file, file_to_save) {
                Ok(()) => {
                    println!("💾 Maze saved to: {}", file_to_save);
                    println!("   Use 'solve {}' to enumerate its paths", file_to_save);
                }
                Err(e) => {
                    eprintln!("❌ Error saving maze: {}", e);
                    std::process::exit(1);
                }
            }

            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!();
            eprintln!("❌ Error generating maze: {}", e);
            eprintln!("{}", "=".repeat(70));
            std::process::exit(1);
        }
    }
}

fn solve_command(
    maze_path: &str,
    start_override: Option<Position>,
    goal_override: Option<Position>,
    config: SolverConfig,
    output_file: Option<&str>,
) {
    println!("📋 Solving maze");
    println!("  Maze file: {}", maze_path);
    if let Some(pos) = start_override {
        println!("  Start override: {}", pos);
    }
    if let Some(pos) = goal_override {
        println!("  Goal override: {}", pos);
    }
    println!();

    let maze_file = match load_maze_file(maze_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("❌ Error loading maze: {}", e);
            std::process::exit(1);
        }
    };

    println!("📦 Loaded {}x{} maze ({})", maze_file.rows, maze_file.cols, maze_file.game_mode);
    println!();

    let start = Instant::now();

    match solve_maze(&maze_file, start_override, goal_override, &config) {
        Ok(report) => {
            let duration = start.elapsed();
            println!("  Search time: {:.3}s", duration.as_secs_f64());
            println!();
            print_solve_report(&report);

            // Use default filename pattern if no output file specified
            let stem = Path::new(maze_path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("maze");
            let default_filename = format!("{}_solution.json", stem);
            let file_to_save = output_file.unwrap_or(&default_filename);

            match save_solve_report(&report, file_to_save) {
                Ok(()) => println!("💾 Solution saved to: {}", file_to_save),
                Err(e) => {
                    eprintln!("❌ Error saving solution: {}", e);
                    std::process::exit(1);
                }
            }

            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!();
            eprintln!("❌ Error solving maze: {}", e);
            eprintln!("{}", "=".repeat(70));
            std::process::exit(1);
        }
    }
}

fn print_solve_report(report: &SolveReport) {
    match report.outcome {
        OutcomeKind::Solved => println!("✅ Maze solved!"),
        OutcomeKind::Truncated => println!("⚠️  Search stopped early by a limit; paths may be incomplete"),
        OutcomeKind::Unsolvable => println!("❌ No path connects start and goal"),
        OutcomeKind::Missing => println!("❌ Maze has no start or no goal"),
    }
    println!("  Start: {}", format_point(report.start_point));
    println!("  Goal: {}", format_point(report.goal_point));
    println!("  Paths found: {}", report.paths.len());
    println!("  Cells expanded: {}", report.expansions);

    for (i, path) in report.paths.iter().enumerate().take(10) {
        let marker = if Some(i) == report.shortest { " (shortest)" } else { "" };
        println!("    #{:<3} {} cells, {} moves{}", i + 1, path.length, path.moves.len(), marker);
    }
    if report.paths.len() > 10 {
        println!("    ... {} more", report.paths.len() - 10);
    }
    println!();

    if let Ok(grid) = Grid::from_rows(&report.annotated_map) {
        print!("{}", grid);
        println!();
    }
}

fn show_command(maze_path: &str) {
    let maze_file = match load_maze_file(maze_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("❌ Error loading maze: {}", e);
            std::process::exit(1);
        }
    };

    let grid = match maze_file.to_grid() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("❌ Error decoding maze: {}", e);
            std::process::exit(1);
        }
    };

    println!("📦 {} ({}x{}, {})", maze_path, maze_file.rows, maze_file.cols, maze_file.game_mode);
    println!("  Start: {}", format_point(maze_file.start_point));
    println!("  Goal: {}", format_point(maze_file.goal_point));
    println!("  Shortcuts: {}", maze_file.shortcut_count());
    println!();
    print!("{}", grid);
    println!("{}", "=".repeat(70));
}

fn verify_moves_command(maze_path: &str, moves_path: &str) {
    println!("📋 Verifying moves");
    println!("  Maze file: {}", maze_path);
    println!("  Moves file: {}", moves_path);
    println!();

    let maze_file = match load_maze_file(maze_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("❌ Error loading maze: {}", e);
            std::process::exit(1);
        }
    };

    let moves = match load_moves(moves_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("❌ Error loading moves: {}", e);
            std::process::exit(1);
        }
    };

    println!("📦 Loaded {} moves", moves.len());
    println!("  First 20 moves: {:?}", &moves[..20.min(moves.len())]);
    println!();

    match verify_moves_file(&maze_file, &moves) {
        Ok(outcome) => {
            let report = WalkReport::from(outcome);
            if report.reached_goal {
                println!("✅ {}", report.message);
            } else {
                println!("❌ {}", report.message);
            }
            println!("{}", "=".repeat(70));
            if !report.reached_goal {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!();
            eprintln!("❌ Error verifying moves: {}", e);
            eprintln!("{}", "=".repeat(70));
            std::process::exit(1);
        }
    }
}

fn format_point(point: Option<[usize; 2]>) -> String {
    match point {
        Some([row, col]) => format!("({}, {})", row, col),
        None => "none".to_string(),
    }
}

fn save_solve_report(report: &SolveReport, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
