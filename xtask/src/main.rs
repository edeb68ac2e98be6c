use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "ec2_alert_lambda";
const RUNTIME_BINARY: &str = "alert_runtime";
const DIST_DIR: &str = "infra/aws_ec2_alerts/dist";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the EC2 lifecycle alert workspace",
    long_about = "A unified CLI for CI checks, Lambda packaging, and offline\n\
                  replay of recorded EC2 lifecycle events."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build and package the Rust Lambda artifact for Terraform inputs
    ServerlessPackage {
        /// Compilation target triple for the Lambda binary
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for the binary
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
    },
    /// Replay a recorded event through the dispatcher without AWS
    Replay {
        /// Recorded event payload
        #[arg(
            long,
            default_value = "crates/ec2_alert_lambda/fixtures/run_instances_event.json"
        )]
        event: String,
        /// Instance records keyed by instance id
        #[arg(
            long,
            default_value = "crates/ec2_alert_lambda/fixtures/inventory.json"
        )]
        inventory: String,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Formatting, clippy, and tests
    Check,
    /// Check plus a fixture replay
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn package_alert_lambda(target: &str, profile: BuildProfile) {
    ensure_rust_target_installed(target);

    step("Build alert lambda binary");
    let mut cargo_args = vec![
        "build",
        "-p",
        LAMBDA_PACKAGE,
        "--target",
        target,
        "--bin",
        RUNTIME_BINARY,
    ];
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package Terraform lambda zip artifact");
    let binary_path = runtime_binary_path(target, profile);
    let binary = fs::read(&binary_path).unwrap_or_else(|error| {
        panic!(
            "expected lambda binary at '{}': {error}",
            binary_path.display()
        )
    });

    let zip_path = Path::new(DIST_DIR).join("runtime.zip");
    fs::create_dir_all(DIST_DIR).expect("failed to create lambda dist directory");
    let file = fs::File::create(&zip_path).expect("failed to create lambda zip");
    write_bootstrap_zip(&binary, file).expect("failed to write lambda zip");

    eprintln!("\nPackaged artifact:\n- {}", zip_path.display());
}

/// Lambda custom runtimes always run on Linux, so no `.exe` suffix applies.
fn runtime_binary_path(target: &str, profile: BuildProfile) -> PathBuf {
    Path::new("target")
        .join(target)
        .join(profile.dir_name())
        .join(RUNTIME_BINARY)
}

fn ensure_rust_target_installed(target: &str) {
    let installed = match Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    {
        Ok(output) if output.status.success() => output.stdout,
        Ok(_) | Err(_) => {
            eprintln!("warning: could not list installed rust targets; skipping preflight");
            return;
        }
    };

    if !String::from_utf8_lossy(&installed)
        .lines()
        .any(|line| line.trim() == target)
    {
        panic!("rust target `{target}` is not installed; run `rustup target add {target}`");
    }
}

/// Writes `binary` as the executable `bootstrap` entry the Lambda runtime expects.
fn write_bootstrap_zip<W: Write + Seek>(binary: &[u8], writer: W) -> zip::result::ZipResult<W> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)?;
    zip.write_all(binary)?;
    zip.finish()
}

fn replay(event: &str, inventory: &str) {
    run_cargo(&[
        "run",
        "-p",
        LAMBDA_PACKAGE,
        "--bin",
        "replay",
        "--",
        "--event",
        event,
        "--inventory",
        inventory,
    ]);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() {
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
}

fn ci_check() {
    ci_lint();

    step("Test ec2_alert_core");
    run_cargo(&["test", "-p", "ec2_alert_core"]);

    step("Test ec2_alert_lambda");
    run_cargo(&["test", "-p", LAMBDA_PACKAGE]);
}

fn ci_replay() {
    for event in [
        "crates/ec2_alert_lambda/fixtures/run_instances_event.json",
        "crates/ec2_alert_lambda/fixtures/stop_instances_event.json",
    ] {
        step(&format!("Replay {event}"));
        replay(event, "crates/ec2_alert_lambda/fixtures/inventory.json");
    }
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => {
            match job {
                CiJob::Lint => ci_lint(),
                CiJob::Check => ci_check(),
                CiJob::All => {
                    ci_check();
                    ci_replay();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::ServerlessPackage { target, profile } => {
            package_alert_lambda(&target, profile);
        }
        Commands::Replay { event, inventory } => {
            replay(&event, &inventory);
        }
    }
}
