use crate::ai_response::TurnResponse;
use crate::assistant::{self, OPENING_MESSAGE};
use crate::error::{ReplyError, SessionError};
use crate::settings::Settings;
use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Player,
    GameMaster,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub speaker: Speaker,
    pub content: String,
}

/// The stateful conversation context: the system prompt plus every exchange
/// the Game Master has accepted so far.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub system: String,
    pub history: Vec<Exchange>,
}

impl Conversation {
    pub fn new(system: String) -> Self {
        Self {
            system,
            history: Vec::new(),
        }
    }
}

/// One request/reply round trip against the hosted model. `history` already
/// ends with the player message being sent.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        history: &[Exchange],
    ) -> Result<Option<String>, OpenAIError>;
}

pub struct OpenAiTransport {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTransport {
    pub fn new(settings: &Settings) -> Self {
        // Always set the key so OPENAI_API_KEY never leaks to another provider.
        let config = OpenAIConfig::new()
            .with_api_base(&settings.api_base)
            .with_api_key(settings.api_key.clone().unwrap_or_default());
        // The client retries rate limits on its own unless told otherwise.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        Self {
            client: Client::with_config(config).with_backoff(no_retry),
            model: settings.model.clone(),
        }
    }

    fn build_messages(
        system: &str,
        history: &[Exchange],
    ) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()?
                .into(),
        );
        for exchange in history {
            let message = match exchange.speaker {
                Speaker::Player => ChatCompletionRequestUserMessageArgs::default()
                    .content(exchange.content.as_str())
                    .build()?
                    .into(),
                Speaker::GameMaster => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(exchange.content.as_str())
                    .build()?
                    .into(),
            };
            messages.push(message);
        }
        Ok(messages)
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    async fn complete(
        &self,
        system: &str,
        history: &[Exchange],
    ) -> Result<Option<String>, OpenAIError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::build_messages(system, history)?)
            .response_format(assistant::response_format())
            .build()?;

        let response = self.client.chat().create(request).await?;
        log::debug!("Chat completion usage: {:?}", response.usage);

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

/// The two operations the game controller needs from whoever runs the story.
#[async_trait]
pub trait GameMaster: Send {
    /// Opens a fresh conversation and returns the opening scene.
    async fn start(&mut self) -> Result<TurnResponse, SessionError>;

    /// Sends one player action on the live conversation.
    async fn advance(&mut self, action: &str) -> Result<TurnResponse, SessionError>;
}

/// Owns the single live conversation. Opening a new one silently drops the
/// previous one; there is never more than one.
pub struct GameSession<T> {
    transport: T,
    instructions: String,
    conversation: Option<Conversation>,
}

impl<T: ChatTransport> GameSession<T> {
    pub fn new(transport: T, instructions: String) -> Self {
        Self {
            transport,
            instructions,
            conversation: None,
        }
    }

    pub fn open(&mut self) -> &mut Conversation {
        self.conversation
            .insert(Conversation::new(self.instructions.clone()))
    }

    /// Swaps the live conversation for a fresh one, returning the old one.
    pub fn replace(&mut self) -> Option<Conversation> {
        let previous = self.conversation.take();
        self.open();
        previous
    }

    pub fn close(&mut self) -> Option<Conversation> {
        self.conversation.take()
    }

    pub fn is_open(&self) -> bool {
        self.conversation.is_some()
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }
}

// History only keeps exchanges that produced a valid turn, so a failed
// action can be sent again as is.
async fn exchange<T: ChatTransport>(
    transport: &T,
    conversation: &mut Conversation,
    message: &str,
) -> Result<TurnResponse, ReplyError> {
    conversation.history.push(Exchange {
        speaker: Speaker::Player,
        content: message.to_string(),
    });

    let result = transport
        .complete(&conversation.system, &conversation.history)
        .await
        .map_err(ReplyError::from)
        .and_then(|reply| {
            let response = TurnResponse::from_reply(reply.as_deref())?;
            Ok((response, reply.unwrap_or_default()))
        });

    match result {
        Ok((response, reply)) => {
            conversation.history.push(Exchange {
                speaker: Speaker::GameMaster,
                content: reply,
            });
            Ok(response)
        }
        Err(e) => {
            conversation.history.pop();
            Err(e)
        }
    }
}

#[async_trait]
impl<T: ChatTransport> GameMaster for GameSession<T> {
    async fn start(&mut self) -> Result<TurnResponse, SessionError> {
        if let Some(previous) = self.replace() {
            log::info!(
                "Dropping previous conversation after {} exchanges",
                previous.history.len() / 2
            );
        }
        log::info!("Starting a new case");
        let Some(conversation) = self.conversation.as_mut() else {
            return Err(SessionError::NotInitialized);
        };
        exchange(&self.transport, conversation, OPENING_MESSAGE)
            .await
            .map_err(|e| {
                log::error!("Failed to initialize game: {e}");
                SessionError::Initialization(e)
            })
    }

    async fn advance(&mut self, action: &str) -> Result<TurnResponse, SessionError> {
        let Some(conversation) = self.conversation.as_mut() else {
            log::error!("Action submitted without a live session: {action}");
            return Err(SessionError::NotInitialized);
        };
        log::debug!("Player action: {action}");
        exchange(&self.transport, conversation, action)
            .await
            .map_err(|e| {
                log::error!("Failed to process action: {e}");
                SessionError::Turn(e)
            })
    }
}

/// Builds the production session from the user settings.
pub fn new_session(settings: &Settings) -> GameSession<OpenAiTransport> {
    GameSession::new(
        OpenAiTransport::new(settings),
        assistant::instructions(&settings.language),
    )
}
