mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "s3-deploy")]
#[command(version, about = "Deploy a static site to an S3 bucket website endpoint", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Configure the bucket for website hosting and mirror a dist folder into it
    ///
    /// Each flag falls back to the matching GitHub Actions input
    /// variable (INPUT_BUCKET, INPUT_BUCKET-REGION, INPUT_DIST-FOLDER)
    /// when omitted, so this runs unchanged as an action step.
    Deploy {
        /// Target bucket name
        #[arg(long)]
        bucket: Option<String>,

        /// Bucket region, used for every command and the website URL
        #[arg(long)]
        bucket_region: Option<String>,

        /// Local folder whose contents are mirrored to the bucket root
        #[arg(long)]
        dist_folder: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Deploy {
            bucket,
            bucket_region,
            dist_folder,
        } => commands::deploy::run(bucket, bucket_region, dist_folder).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "s3-deploy", &mut io::stdout());
            Ok(())
        }
    }
}
