use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the fare verification workspace",
    long_about = "A unified CLI for replaying trips, benchmarks,\n\
                  and CI checks in the fare verification workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the synthetic trip example
    Run,
    /// Replay a recorded trip (arguments are passed to fare_replay)
    Replay {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run Criterion benchmarks, optionally saving or comparing a named baseline
    Bench {
        #[arg(long, conflicts_with = "baseline")]
        save_baseline: Option<String>,
        #[arg(long)]
        baseline: Option<String>,
    },
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the example
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn spawn(program: &str, args: &[&str]) -> ExitStatus {
    eprintln!("+ {program} {}", args.join(" "));
    match Command::new(program).args(args).status() {
        Ok(status) => status,
        Err(err) => {
            eprintln!("failed to execute {program}: {err}");
            exit(1);
        }
    }
}

fn run(program: &str, args: &[&str]) {
    let status = spawn(program, args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_cargo(args: &[&str]) {
    run("cargo", args);
}

fn bench(extra: &[&str]) {
    let mut args = vec!["bench", "--package", "fare_core", "--bench", "performance"];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test fare_core");
    run_cargo(&["test", "-p", "fare_core"]);

    step("Test fare_replay");
    run_cargo(&["test", "-p", "fare_replay"]);
}

fn ci_examples() {
    step("Run trip_replay");
    run_cargo(&["run", "-p", "fare_core", "--example", "trip_replay", "--release"]);
}

fn ci_bench() {
    step("Run benchmarks");
    bench(&[]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_cargo(&["run", "-p", "fare_core", "--example", "trip_replay"]);
        }
        Commands::Replay { args } => {
            let mut cargo_args = vec!["run", "-p", "fare_replay", "--release", "--"];
            cargo_args.extend(args.iter().map(String::as_str));
            // Exit code 2 (tampering detected) is passed through
            run_cargo(&cargo_args);
        }
        Commands::Bench {
            save_baseline,
            baseline,
        } => match (save_baseline.as_deref(), baseline.as_deref()) {
            (Some(name), _) => bench(&["--save-baseline", name]),
            (None, Some(name)) => bench(&["--baseline", name]),
            (None, None) => bench(&[]),
        },
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
