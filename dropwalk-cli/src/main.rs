use clap::Parser;
use dropwalk::{fs::PathItem, DropState, DropZone};

mod cli;
mod error;
mod target;

use crate::{cli::Cli, error::AppError, target::ConsoleTarget};

async fn run(args: Cli) -> Result<bool, AppError> {
    if args.paths.is_empty() {
        return Err(AppError::NothingDropped);
    }
    let config = args.drop_config()?;
    log::debug!("Dropping {} paths with {:?}", args.paths.len(), config);

    let items: Vec<PathItem> = args
        .paths
        .iter()
        .map(|path| PathItem::with_page_size(path, config.page_size))
        .collect();

    let mut zone = DropZone::with_config(ConsoleTarget::new(args.json), config);
    let state = zone.handle_drop(&items).await;

    let mut target = zone.into_target();
    if let Some(e) = target.take_output_error() {
        return Err(AppError::OutputError(e.to_string()));
    }
    Ok(state == DropState::Delivered && target.notifications() == 0)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let args = Cli::parse();

    match run(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
