use std::{path::PathBuf, process::ExitCode};

use colored::Colorize;
use sigil_key::{
    create_key_store, AlgorithmProfile, KeyPairGenerator, PipelineReport, PipelineStatus,
    RunReport, Runner, RunnerConfig, SignatureService, VerificationOutcome,
};

use crate::{error::CliResult, settings::Settings};

const RULE_WIDTH: usize = 60;

/// Command line overrides for the demo settings
#[derive(Debug, Default)]
pub struct DemoArgs {
    pub algorithms: Vec<String>,
    pub output: Option<PathBuf>,
    pub keep: bool,
    pub message: Option<String>,
}

fn print_section(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!();
    println!("{rule}");
    println!("{}", title.bold());
    println!("{rule}");
}

/// Merge flags over settings; flags win
fn runner_inputs(
    settings: Settings,
    args: DemoArgs,
) -> CliResult<(RunnerConfig, Vec<AlgorithmProfile>)> {
    let profiles = if args.algorithms.is_empty() {
        settings.profiles
    } else {
        args.algorithms
            .iter()
            .map(|a| a.parse::<AlgorithmProfile>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let config = RunnerConfig {
        payload: args.message.unwrap_or(settings.message).into_bytes(),
        base_dir: args.output.unwrap_or(settings.output_dir),
        keep_artifacts: args.keep || settings.keep_artifacts,
    };
    Ok((config, profiles))
}

pub fn handle(settings: Settings, args: DemoArgs) -> CliResult<ExitCode> {
    let storage = settings.storage;
    let (config, profiles) = runner_inputs(settings, args)?;

    print_section("sigil key lifecycle demonstration");
    println!("Message: {:?}", String::from_utf8_lossy(&config.payload));
    println!("Profiles: {}", profiles.len());

    let runner = Runner::new(
        KeyPairGenerator::new(),
        create_key_store(storage),
        SignatureService::new(),
        config,
    );
    let report = runner.run(&profiles)?;
    println!("Run: {}", report.run_id);
    println!("Artifacts: {}", report.artifact_dir.display());

    for (index, pipeline) in report.pipelines.iter().enumerate() {
        print_section(&format!("{}. {}", index + 1, pipeline.profile));
        print_pipeline(pipeline);
    }

    print_section(&format!("{}. Cleanup", report.pipelines.len() + 1));
    print_cleanup(&report);

    print_section("Summary");
    print_summary(&report);

    let rule = "=".repeat(RULE_WIDTH);
    println!("{rule}");
    if report.all_valid() {
        println!("{}", "Demonstration completed: every signature is valid.".green().bold());
        println!("{rule}");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", "Demonstration completed with failures.".red().bold());
        println!("{rule}");
        Ok(ExitCode::FAILURE)
    }
}

fn print_pipeline(pipeline: &PipelineReport) {
    if let Some(key_id) = &pipeline.key_id {
        println!("{} Key pair generated (key id {key_id})", "✓".green());
    }
    for artifact in &pipeline.artifacts {
        let kind = if artifact.to_string_lossy().ends_with("_private.pem") {
            "Private"
        } else {
            "Public"
        };
        println!("{} {kind} key saved to: {}", "✓".green(), artifact.display());
    }
    if let Some(signature) = &pipeline.signature {
        println!(
            "{} Message signed with {} ({} bytes)",
            "✓".green(),
            signature.payload_digest_alg,
            signature.signature_bytes.len()
        );
        println!("  Signature (base64): {}", signature.signature_base64());
    }

    println!();
    match &pipeline.status {
        PipelineStatus::Verified(VerificationOutcome::Valid) => {
            println!("{} {}", "✓".green(), "Verification: signature VALID".green().bold());
        }
        PipelineStatus::Verified(VerificationOutcome::Invalid) => {
            println!("{} {}", "✗".red(), "Verification: signature INVALID".red().bold());
        }
        PipelineStatus::Verified(VerificationOutcome::Error(reason)) => {
            println!("{} {}", "⚠".yellow(), "Verification error".yellow().bold());
            println!("  {reason}");
        }
        PipelineStatus::Failed { stage, reason } => {
            println!("{} {}", "✗".red(), format!("Failed at {stage}").red().bold());
            println!("  {reason}");
        }
    }
}

fn print_cleanup(report: &RunReport) {
    if report.artifacts_kept {
        println!(
            "{} Artifacts kept in: {}",
            "⚠".yellow(),
            report.artifact_dir.display()
        );
        return;
    }
    let cleanup = &report.cleanup;
    println!(
        "{} Temporary key files removed ({} removed, {} never written)",
        "✓".green(),
        cleanup.removed,
        cleanup.missing
    );
    if cleanup.failed > 0 {
        println!(
            "{} {} file(s) could not be removed, see log output",
            "⚠".yellow(),
            cleanup.failed
        );
    }
}

fn print_summary(report: &RunReport) {
    let width = report
        .pipelines
        .iter()
        .map(|p| p.label.len())
        .max()
        .unwrap_or(0);
    for pipeline in &report.pipelines {
        let status = pipeline.status.to_string();
        let status = if pipeline.status.is_valid() {
            status.green()
        } else {
            status.red()
        };
        println!("  {:<width$}  {status}", pipeline.label);
    }
    println!();
    println!(
        "{}/{} pipelines valid",
        report.valid_count(),
        report.pipelines.len()
    );
}
