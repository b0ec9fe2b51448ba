//! Storage console CLI
//!
//! Runs an upload through the console with the dry-run uploader and prints
//! what the user would see at every step.

use bytesize::ByteSize;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::path::PathBuf;
use storage_console::{
    render, ConsoleConfig, ConsoleError, DryRunUploader, SelectedFile, UploadEvent, UploadOptions,
    UploadStatus, UploadStatusController, UploadType,
};

#[derive(Parser, Debug)]
#[command(name = "storage-console", version, about = "Decentralized storage upload console")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Gateway host used for links to uploaded content
    #[arg(long, global = true)]
    gateway: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a file, directory or CAR
    Upload {
        path: PathBuf,

        /// Upload type: file, directory or car
        #[arg(short = 't', long = "type", default_value = "file")]
        upload_type: UploadType,

        /// Do not wrap a single file in a directory
        #[arg(long)]
        no_wrap: bool,

        /// Shard size, e.g. 1MiB or 512KiB
        #[arg(long)]
        shard_size: Option<ByteSize>,

        /// Simulate a failure after this many shards
        #[arg(long)]
        fail_after: Option<usize>,

        /// Error message reported by a simulated failure
        #[arg(long, default_value = "network timeout")]
        fail_message: String,
    },
    /// Print the effective configuration as JSON
    Config,
}

fn shard_size_to_usize(shard_size: u64) -> storage_console::Result<usize> {
    usize::try_from(shard_size).map_err(|_| {
        ConsoleError::validation(
            "shard_size",
            format!("Shard size {} does not fit in memory on this target", shard_size),
        )
    })
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("  {}", line);
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::from_file(path)?,
        None => ConsoleConfig::default(),
    };
    if let Some(gateway) = &cli.gateway {
        config = config.gateway_host(gateway.clone());
    }
    config.validate()?;

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        config.log_level.into()
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Command::Config => {
            println!("{}", config.to_json()?);
        }
        Command::Upload {
            path,
            upload_type,
            no_wrap,
            shard_size,
            fail_after,
            fail_message,
        } => {
            let options = UploadOptions::for_type(upload_type)
                .wrap_in_directory(config.wrap_in_directory && !no_wrap);
            let file = SelectedFile::from_path(&path, options.allow_directory)?;

            let shard_size = shard_size.map(|s| s.as_u64()).unwrap_or(config.shard_size);
            let mut uploader = DryRunUploader::new(shard_size_to_usize(shard_size)?)?;
            if let Some(shards) = fail_after {
                uploader = uploader.fail_after(shards, fail_message);
            }

            let mut controller =
                UploadStatusController::new(uploader).on_upload_complete(|result| {
                    log::info!(
                        "{} uploaded as {} ({} shards)",
                        result.file_name,
                        result.root_cid,
                        result.shards.len()
                    );
                });
            controller.select_file(Some(file), options)?;
            print_lines(&render(&controller.view(), upload_type, &config));

            let mut events = controller.start()?;
            while let Some(event) = events.next().await {
                let redraw = matches!(event, UploadEvent::ShardStored(_)) || event.is_terminal();
                controller.apply_event(event);
                if redraw {
                    print_lines(&render(&controller.view(), upload_type, &config));
                }
                if controller.status().is_terminal() {
                    break;
                }
            }
            if controller.status() == UploadStatus::Uploading {
                controller.end_of_stream();
                print_lines(&render(&controller.view(), upload_type, &config));
            }

            if controller.status() == UploadStatus::Failed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
