//! Scripted model provider shared by the node and executor tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nodes::LlmGateway;
use pipeline::{
    ChatRole, Completion, CompletionRequest, LlmError, LlmProvider, ModelId, ModelSettings,
    NodeId, TokenUsage,
};

pub const VALID_HTML: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <script src=\"https://cdn.tailwindcss.com\"></script>\n</head>\n<body class=\"bg-[#0F172A]\">\n  <div class=\"mx-auto max-w-sm px-4\"><h1 class=\"text-[#F8FAFC]\">Pro plan</h1></div>\n</body>\n</html>";

/// Replies with a fixed script, one entry per call, and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<Completion, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: impl IntoIterator<Item = Result<Completion, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Each text becomes one successful completion reporting 10 + 5 tokens.
    pub fn replies<'a>(texts: impl IntoIterator<Item = &'a str>) -> Arc<Self> {
        Self::new(texts.into_iter().map(|text| {
            Ok(Completion {
                text: Some(text.to_owned()),
                usage: Some(TokenUsage::new(10, 5)),
            })
        }))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Text of every message of the given role in call `index`.
    pub fn message_text(&self, index: usize, role: ChatRole) -> String {
        self.requests()[index]
            .messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.content.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("script exhausted".into())))
    }
}

/// A gateway for `node` with default-ish settings.
pub fn gateway(provider: &Arc<ScriptedProvider>, node: &'static str) -> LlmGateway {
    let provider: Arc<dyn LlmProvider> = provider.clone();
    LlmGateway::new(
        provider,
        NodeId::from_static(node),
        &ModelId::from_static("test/model"),
        &ModelSettings::new(512, 0.2),
    )
}
