// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    missing_doc_code_examples,
    private_doc_tests,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod app;
mod catalog;
mod command;
mod config;
mod error;
mod http;
mod metadata;
mod notify;
mod password;
mod resolver;
mod router;
mod routes;
mod session;
mod storage;

use std::process;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use error::Result;
use log::{error, warn};

use crate::{app::App, config::Config, session::Session, storage::Storage};

#[derive(Debug, Subcommand)]
enum Command {
    List(command::list::Command),
    Get(command::get::Command),
    Create(command::create::Command),
    Update(command::update::Command),
    Delete(command::delete::Command),
    Categories(command::categories::Command),
    Search(command::search::Command),
    Open(command::open::Command),
    Login(command::login::Command),
    Logout(command::logout::Command),
    Whoami(command::whoami::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        match self {
            Self::List(cmd) => cmd.execute(app).await,
            Self::Get(cmd) => cmd.execute(app).await,
            Self::Create(cmd) => cmd.execute(app).await,
            Self::Update(cmd) => cmd.execute(app).await,
            Self::Delete(cmd) => cmd.execute(app).await,
            Self::Categories(cmd) => cmd.execute(app).await,
            Self::Search(cmd) => cmd.execute(app).await,
            Self::Open(cmd) => cmd.execute(app).await,
            Self::Login(cmd) => cmd.execute(app).await,
            Self::Logout(cmd) => cmd.execute(app).await,
            Self::Whoami(cmd) => cmd.execute(app).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    config: Config,

    #[clap(subcommand)]
    command: Command,
}

fn get_session_storage(config: &Config) -> Box<dyn Storage<Session>> {
    if !config.no_persist_session {
        match storage::File::new("session.json") {
            Ok(file_storage) => return Box::new(file_storage),
            Err(e) => {
                warn!("We need to fall back to keeping the session in memory because we can't store it on disk: {}", e);
            }
        }
    }

    Box::new(storage::Memory::<Session>::new())
}

async fn run(args: Args) -> Result<()> {
    let mut session_storage = get_session_storage(&args.config);
    let restored = session_storage.get().await.unwrap_or_else(|e| {
        warn!("We could not restore the previous session, so we are starting without one: {}", e);
        None
    });

    let app = App::new(&args.config, session::SessionStore::restore(restored))?;
    let printer = tokio::spawn(notify::print(app.notifier.subscribe(), args.config.notices));

    let session_changes = app.session.subscribe();
    let result = command::Command::execute(args.command, &app).await;
    if session_changes.has_changed().unwrap_or(false) {
        storage::persist(&mut session_storage, app.session.current().as_ref()).await?;
    }

    drop(app);
    printer.await?;

    result
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("VITRINE_LOG", "warn")
        .write_style("VITRINE_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
