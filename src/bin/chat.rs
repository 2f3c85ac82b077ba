use anyhow::Result;
use dotenvy::dotenv;
use log::{info, warn};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use persona_chat::core::{Config, LlmProvider};
use persona_chat::features::chatbot::CharacterChatbot;
use persona_chat::features::session::{ChatSession, SessionCommand, HELP_TEXT};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    // The openai crate reads its key from the environment, not from our config
    if config.provider == LlmProvider::OpenAi {
        if let Some(key) = &config.openai_api_key {
            std::env::set_var("OPENAI_API_KEY", key);
            std::env::set_var("OPENAI_KEY", key);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting persona chat ({} provider)...", config.provider);

    let chatbot = CharacterChatbot::from_config(&config).await;
    if let Some(reason) = chatbot.backend().unavailable_reason() {
        warn!("Chatbot unavailable: {reason}");
    }

    let mut session = ChatSession::new(config.default_persona);
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    let greeting = format!(
        "Chatting with {}. Type /help for commands.\n",
        display_name(&chatbot, &session)
    );
    stdout.write_all(greeting.as_bytes()).await?;

    loop {
        stdout.write_all(b"You: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        let output = match SessionCommand::parse(message) {
            Some(Ok(SessionCommand::Quit)) => break,
            Some(Ok(command)) => run_command(&chatbot, &mut session, command),
            Some(Err(usage)) => usage,
            None => {
                let reply = chatbot
                    .respond(message, session.history(), session.persona())
                    .await;
                session.record(message, &reply);
                format!("{}: {reply}", display_name(&chatbot, &session))
            }
        };

        stdout.write_all(format!("{output}\n").as_bytes()).await?;
    }

    info!("Persona chat closed");
    Ok(())
}

fn display_name(chatbot: &CharacterChatbot, session: &ChatSession) -> String {
    chatbot
        .personas()
        .get_persona(session.persona())
        .map(|p| p.name.clone())
        .unwrap_or_else(|| session.persona().to_string())
}

fn run_command(
    chatbot: &CharacterChatbot,
    session: &mut ChatSession,
    command: SessionCommand,
) -> String {
    match command {
        SessionCommand::Persona(id) => {
            session.switch_persona(id);
            format!("Now chatting with {}.", display_name(chatbot, session))
        }
        SessionCommand::ListPersonas => chatbot
            .personas()
            .list_personas()
            .iter()
            .map(|p| {
                let marker = if p.id == session.persona() { "*" } else { " " };
                format!("{marker} {:<7} {}", p.id.as_str(), p.description)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        SessionCommand::Reset => {
            session.reset();
            "History cleared.".to_string()
        }
        SessionCommand::Status => match chatbot.backend().model_name() {
            Some(model) => format!(
                "✅ Model: {model} | persona: {} | exchanges: {}",
                session.persona(),
                session.history().len()
            ),
            None => match chatbot.backend().unavailable_reason() {
                Some(reason) => format!("❌ Unavailable: {reason}"),
                None => "❌ Unavailable".to_string(),
            },
        },
        SessionCommand::Help => HELP_TEXT.to_string(),
        SessionCommand::Quit => String::new(),
    }
}
