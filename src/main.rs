use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::commands::{inspect_command, match_command, merge_command, MatchArgs};
use cli::{Cli, Commands, ConfigOverrides};

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Match {
            relation_info,
            facts_dir,
            corpus,
            output,
            config,
            text_key,
            save_sentences,
            shards,
            strategy,
            segmentation,
            prefix,
            merge,
            merge_flags,
        } => match_command(MatchArgs {
            relation_info,
            facts_dir,
            corpus,
            output,
            config,
            overrides: ConfigOverrides {
                text_key,
                save_sentences,
                shards,
                strategy,
                segmentation,
                prefix,
            },
            merge: merge.then(|| merge_flags.into()),
        }),
        Commands::Merge { dir, merge_flags } => merge_command(&dir, merge_flags.into()),
        Commands::Inspect { file, top } => inspect_command(&file, top),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
