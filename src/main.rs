use std::io::Write;

use anyhow::Context;
use jinwoo::kernel::speech::catalog::PERSONA_NAME;
use jinwoo::{BackendConfig, ChatCompletionsBackend, EngineConfig, Reactor};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const QUIT_COMMAND: &str = "/quit";

fn print_bubble(text: &str) {
    println!("{}: {}", PERSONA_NAME, text);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let engine = EngineConfig::from_env().context("loading engine config")?;
    let backend_config = BackendConfig::from_env().context("loading backend config")?;
    tracing::info!(model = %backend_config.model, "persona engine booting");

    let backend = ChatCompletionsBackend::new(backend_config).context("building backend client")?;
    let mut reactor = Reactor::new(&engine, Box::new(backend)).context("building reactor")?;

    let greeting = reactor.open_session();
    print_bubble(&greeting.content);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == QUIT_COMMAND {
            break;
        }

        print!("…");
        std::io::stdout().flush()?;

        let outcome = reactor.handle_turn(line).await;
        tokio::time::sleep(outcome.delay).await;

        print!("\r");
        print_bubble(&outcome.reply.content);
    }

    let snapshot = reactor.telemetry();
    tracing::info!(
        session = %reactor.session_id(),
        turns = snapshot.turns,
        questions = snapshot.question_stats.questions_asked,
        max_question_gap = snapshot.question_stats.max_gap,
        backend_failures = snapshot.route_stats.backend_failures,
        fallbacks = snapshot.route_stats.backend_fallbacks + snapshot.route_stats.sanitizer_fallbacks,
        avg_delay_ms = snapshot.pacing_stats.avg_delay_ms,
        modes = ?snapshot.mode_counts,
        "session closed"
    );
    Ok(())
}
