use clap::{Parser, Subcommand};
use corpus_migrate::migrate::{MigrateEvent, Migrator, PassKind, PassReport};
use corpus_migrate::{config, output};
use std::path::PathBuf;
use std::sync::mpsc;

/// Shared flags for commands that touch the target corpus.
#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Report what would change without writing any file
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser)]
#[command(name = "corpus-migrate")]
#[command(about = "Carry blog metadata from a legacy corpus into a new one")]
#[command(long_about = "\
Carry blog metadata from a legacy corpus into a new one

Both corpora are directories of Markdown files with a frontmatter block,
one directory per locale. Documents are matched by filename.

Project layout (defaults, see 'corpus-migrate gen-config'):

  ../blog/src/posts/           # legacy, read only
  ../blog/src/posts-zh_cn/
  src/content/blog/en/         # target, rewritten in place
  src/content/blog/zh/
  migrate.toml                 # optional

Passes:
  frontmatter  Rebuild every block to title/description/pubDate/heroImage/tags
  dates        Copy legacy 'date' into target 'pubDate'
  tags         Copy legacy 'tags' into target documents
  images       Re-root image references in document bodies

Files are rewritten in place with no backup. Commit or copy the target
corpus first.")]
#[command(version)]
struct Cli {
    /// Project root containing migrate.toml; corpus paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild frontmatter of every target document to the site schema
    Frontmatter(RunArgs),
    /// Carry legacy dates into target pubDate fields
    Dates(RunArgs),
    /// Carry legacy tags into target documents
    Tags(RunArgs),
    /// Rewrite image references in target document bodies
    Images(RunArgs),
    /// Run every pass: frontmatter → dates → tags → images
    All(RunArgs),
    /// Print a stock migrate.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (passes, args) = match cli.command {
        Command::Frontmatter(args) => (vec![PassKind::Frontmatter], args),
        Command::Dates(args) => (vec![PassKind::Dates], args),
        Command::Tags(args) => (vec![PassKind::Tags], args),
        Command::Images(args) => (vec![PassKind::Images], args),
        Command::All(args) => (PassKind::ALL.to_vec(), args),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
    };

    let migrate_config = config::load_config(&cli.root)?;
    if args.dry_run {
        println!("==> Dry run: no files will be written");
    }

    let (tx, rx) = mpsc::channel::<MigrateEvent>();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_event(&event) {
                println!("{}", line);
            }
        }
    });

    let migrator = Migrator::new(migrate_config, &cli.root)
        .dry_run(args.dry_run)
        .events(tx);
    let result: Result<Vec<PassReport>, _> =
        passes.into_iter().map(|pass| migrator.run(pass)).collect();

    // Close the channel so the printer drains and exits.
    drop(migrator);
    printer.join().ok();

    for report in &result? {
        output::print_report(report);
    }

    Ok(())
}
