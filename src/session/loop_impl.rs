//! Session loop - request/response/tool-dispatch orchestration

use tracing::{debug, info, warn};

use crate::error::Error;
use crate::source::Source;
use crate::tools::{Tool, ToolRunner};
use crate::translator::{OpenAiTranslator, Translator, TranslatorRegistry};
use crate::transport::{Headers, Transport};
use crate::ui;
use crate::Result;

use super::defaults::Defaults;
use super::directive::Directive;
use super::message::{Message, MessageType};
use super::queue::PendingQueue;

/// Drives one conversation with a remote model.
///
/// The session owns the conversation history and the queue of tool results
/// waiting to be sent. Each loop iteration sends at most one request and
/// waits for it before doing anything else.
pub struct Session {
    conversation: Vec<Message>,
    pending: PendingQueue,
    defaults: Defaults,
    tools: ToolRunner,
    translator: Box<dyn Translator>,
    transport: Box<dyn Transport>,
    echo: bool,
}

impl Session {
    /// Create a session using the built-in translator and empty defaults
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            conversation: Vec::new(),
            pending: PendingQueue::new(),
            defaults: Defaults::default(),
            tools: ToolRunner::new(),
            translator: Box::new(OpenAiTranslator::new()),
            transport,
            echo: false,
        }
    }

    /// Replace the template; its translator name is resolved immediately.
    pub fn with_defaults(mut self, defaults: Defaults) -> Result<Self> {
        self.translator = TranslatorRegistry::create(&defaults.translator)?;
        self.defaults = defaults;
        Ok(self)
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.defaults = self.defaults.with_translator(translator.name());
        self.translator = translator;
        self
    }

    pub fn with_tools(mut self, tools: ToolRunner) -> Self {
        self.tools = tools;
        self
    }

    /// Print requests, tool calls and responses to the terminal
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.register(tool);
    }

    /// Queue a message to be sent before the source is read again
    pub fn enqueue(&mut self, message: Message) {
        self.pending.push_back(message);
    }

    /// Build a user message from the current template
    pub fn user_message(&self, content: impl Into<String>) -> Message {
        let mut message = Message::from_defaults(MessageType::User, &self.defaults);
        message.content = content.into();
        message
    }

    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn tools(&self) -> &ToolRunner {
        &self.tools
    }

    pub fn translator_name(&self) -> &str {
        self.translator.name()
    }

    /// Run until the source is exhausted and no results are pending.
    ///
    /// Any error ends the loop. Messages appended before the failure stay
    /// in the conversation.
    pub async fn process_messages(&mut self, source: &mut dyn Source) -> Result<()> {
        debug!("Starting session loop");

        loop {
            // Queued messages go out first, in insertion order.
            if let Some(message) = self.pending.pop_front() {
                debug!(
                    "Draining queued {} message ({} left)",
                    message.message_type(),
                    self.pending.len()
                );
                self.conversation.push(message);
            } else {
                let Some(line) = source.get() else {
                    debug!("No more prompts to process");
                    return Ok(());
                };

                match Directive::parse(&line) {
                    Some(directive) => {
                        self.apply_directive(directive)?;
                        continue;
                    }
                    None => self.handle_user_message(line),
                }
            }

            let response = self.send_request().await?;
            self.apply_response(response)?;
        }
    }

    fn apply_directive(&mut self, directive: Directive) -> Result<()> {
        match directive {
            Directive::System(text) => {
                debug!("Adding system message");
                self.conversation.push(Message::system(text));
            }
            Directive::Uri(uri) => {
                debug!("URI set to {}", uri);
                self.defaults = self.defaults.clone().with_uri(uri);
            }
            Directive::ApiKeyName(name) => {
                debug!("API_KEY_NAME set to {}", name);
                self.defaults = self.defaults.clone().with_api_key_name(name);
            }
            Directive::Model(model) => {
                debug!("MODEL set to {}", model);
                self.defaults = self.defaults.clone().with_model(model);
            }
            Directive::Translator(name) => {
                self.translator = TranslatorRegistry::create(&name)?;
                debug!("Translator set to {}", name);
                self.defaults = self.defaults.clone().with_translator(name);
            }
            Directive::Unknown(line) => {
                warn!("Ignoring unknown directive: {}", line);
            }
        }
        Ok(())
    }

    fn handle_user_message(&mut self, content: String) {
        debug!("Adding user message");
        let message = self.user_message(content);
        self.conversation.push(message);
    }

    fn api_key(&self, message: &Message) -> Result<String> {
        let name = message
            .api_key_name
            .as_deref()
            .or(self.defaults.api_key_name.as_deref())
            .ok_or_else(|| Error::Config("No API_KEY_NAME specified".to_string()))?;

        std::env::var(name)
            .map_err(|_| Error::Config(format!("{} environment variable not set", name)))
    }

    fn request_headers(&self, message: &Message) -> Result<Headers> {
        let api_key = self.api_key(message)?;
        Ok(vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", api_key)),
        ])
    }

    /// Send the whole conversation, routed by the newest message.
    async fn send_request(&self) -> Result<Message> {
        let last = self
            .conversation
            .last()
            .ok_or_else(|| Error::Config("Nothing to send".to_string()))?;

        let uri = last
            .uri
            .as_deref()
            .ok_or_else(|| Error::Config("No URI specified for API request".to_string()))?;

        let headers = self.request_headers(last)?;
        let body = self
            .translator
            .create_request(&self.conversation, self.tools.definitions())?;

        if self.echo {
            ui::print_request(last);
        }
        info!(
            "Sending request to {} ({} messages)",
            uri,
            self.conversation.len()
        );

        let response = self.transport.post(uri, &body, &headers).await?;

        if !response.is_success() {
            return Err(Error::Http {
                status: response.status,
                body: response.body,
            });
        }

        let message = self.translator.response_to_message(&response.body)?;
        info!(
            "Received {} message with {} tool calls",
            message.message_type(),
            message.tool_calls.len()
        );
        if self.echo {
            ui::print_response(&message);
        }
        Ok(message)
    }

    fn apply_response(&mut self, response: Message) -> Result<()> {
        if !response.has_tool_calls() {
            self.conversation.push(response);
            return Ok(());
        }

        // History keeps its own copy of the assistant turn.
        let history = response.clone();
        self.conversation.push(history);
        self.dispatch_tool_calls(&response)
    }

    /// Run every requested tool in order and queue the results.
    fn dispatch_tool_calls(&mut self, response: &Message) -> Result<()> {
        debug!("Dispatching {} tool calls", response.tool_calls.len());

        for record in &response.tool_calls {
            let arguments = match record.arguments.as_deref() {
                Some(arguments) if !record.id.is_empty() && !record.name.is_empty() => arguments,
                _ => {
                    return Err(Error::Tool(format!(
                        "Invalid tool call format: id={:?} name={:?} arguments={:?}",
                        record.id, record.name, record.arguments
                    )));
                }
            };

            if self.echo {
                ui::print_tool_call(&record.name, arguments);
            }

            let result = self.tools.execute(&record.name, arguments)?;

            let mut message = Message::from_defaults(MessageType::ToolResult, &self.defaults);
            message.content = result;
            message.name = Some(record.name.clone());
            message.tool_call_id = Some(record.id.clone());
            self.pending.push_back(message);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ToolCallRecord;
    use crate::source::VecSource;
    use crate::transport::{HttpResponse, StubTransport};
    use serde_json::{json, Value};

    fn text_response(content: &str) -> String {
        json!({
            "created": 1729376080,
            "model": "test-model",
            "choices": [{
                "message": {"role": "assistant", "content": content, "tool_calls": []},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
        })
        .to_string()
    }

    fn tool_call_response(calls: &[(&str, &str, &str)]) -> String {
        let tool_calls: Vec<Value> = calls
            .iter()
            .map(|(id, name, args)| {
                json!({"id": id, "type": "function", "function": {"name": name, "arguments": args}})
            })
            .collect();
        json!({
            "created": 1729376081,
            "model": "test-model",
            "choices": [{
                "message": {"role": "assistant", "content": "", "tool_calls": tool_calls},
                "finish_reason": "tool_calls"
            }]
        })
        .to_string()
    }

    fn preamble(key_name: &str) -> Vec<String> {
        vec![
            "#system You are helpful.".to_string(),
            "#MODEL test-model".to_string(),
            "#URI http://x/v1/chat".to_string(),
            format!("#API_KEY_NAME {key_name}"),
        ]
    }

    fn configured_defaults(key_name: &str) -> Defaults {
        Defaults::default()
            .with_uri("http://x/v1/chat")
            .with_api_key_name(key_name)
            .with_model("test-model")
    }

    #[tokio::test]
    async fn test_scenario_no_tools() {
        std::env::set_var("COLLOQUY_TEST_KEY_A", "secret-a");
        let stub = StubTransport::with_bodies(vec![text_response("Hi! How can I help?")]);
        let requests = stub.requests();
        let mut session = Session::new(Box::new(stub));

        let mut lines = preamble("COLLOQUY_TEST_KEY_A");
        lines.push("Hello".to_string());
        let mut source = VecSource::new(lines);

        session.process_messages(&mut source).await.unwrap();

        let conversation = session.conversation();
        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation[0].message_type(), MessageType::System);
        assert_eq!(conversation[0].content, "You are helpful.");
        assert_eq!(conversation[1].message_type(), MessageType::User);
        assert_eq!(conversation[1].content, "Hello");
        assert_eq!(conversation[1].model.as_deref(), Some("test-model"));
        assert_eq!(conversation[2].message_type(), MessageType::Assistant);
        assert_eq!(conversation[2].content, "Hi! How can I help?");
        assert!(session.pending().is_empty());

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].uri, "http://x/v1/chat");
        assert!(requests[0]
            .headers
            .contains(&("Authorization".to_string(), "Bearer secret-a".to_string())));
        assert!(requests[0]
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string())));

        let body: Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert!(body.get("tools").is_none());
    }

    #[tokio::test]
    async fn test_scenario_one_tool_call() {
        std::env::set_var("COLLOQUY_TEST_KEY_B", "secret-b");
        let stub = StubTransport::with_bodies(vec![
            tool_call_response(&[("c1", "get_weather", r#"{"location":"X"}"#)]),
            text_response("It is sunny in X."),
        ]);
        let requests = stub.requests();
        let mut session = Session::new(Box::new(stub));
        session.add_tool(Tool::new("get_weather", "Weather lookup", |_| "Sunny".to_string()));

        let mut lines = preamble("COLLOQUY_TEST_KEY_B");
        lines.push("What's the weather in X?".to_string());
        session
            .process_messages(&mut VecSource::new(lines))
            .await
            .unwrap();

        let conversation = session.conversation();
        assert_eq!(conversation.len(), 5);

        let call = &conversation[2];
        assert_eq!(call.message_type(), MessageType::Assistant);
        assert_eq!(
            call.tool_calls,
            vec![ToolCallRecord::new("c1", "get_weather", r#"{"location":"X"}"#)]
        );

        let result = &conversation[3];
        assert_eq!(result.message_type(), MessageType::ToolResult);
        assert_eq!(result.content, "Sunny");
        assert_eq!(result.tool_call_id.as_deref(), Some("c1"));
        assert_eq!(result.name.as_deref(), Some("get_weather"));

        let last = &conversation[4];
        assert_eq!(last.message_type(), MessageType::Assistant);
        assert_eq!(last.content, "It is sunny in X.");
        assert!(session.pending().is_empty());

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let second: Value = serde_json::from_str(&requests[1].body).unwrap();
        let messages = second["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2]["tool_calls"][0]["id"], "c1");
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "c1");
        assert_eq!(second["model"], "test-model");
        assert_eq!(second["tools"][0]["function"]["name"], "get_weather");
    }

    #[tokio::test]
    async fn test_missing_api_key_sends_nothing() {
        std::env::remove_var("COLLOQUY_TEST_KEY_UNSET");
        let stub = StubTransport::with_bodies(vec![text_response("unused")]);
        let requests = stub.requests();
        let mut session = Session::new(Box::new(stub));

        let mut lines = preamble("COLLOQUY_TEST_KEY_UNSET");
        lines.push("Hello".to_string());
        let result = session.process_messages(&mut VecSource::new(lines)).await;

        assert!(matches!(result, Err(Error::Config(_))));
        assert!(requests.lock().unwrap().is_empty());
        // the user turn was already appended
        assert_eq!(session.conversation().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_api_key_name() {
        let stub = StubTransport::with_bodies(vec![]);
        let requests = stub.requests();
        let mut session = Session::new(Box::new(stub));

        let mut source = VecSource::new(["#URI http://x/v1/chat", "Hello"]);
        let result = session.process_messages(&mut source).await;

        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("API_KEY_NAME")));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_uri() {
        std::env::set_var("COLLOQUY_TEST_KEY_C", "secret-c");
        let stub = StubTransport::with_bodies(vec![]);
        let requests = stub.requests();
        let mut session = Session::new(Box::new(stub));

        let mut source = VecSource::new(["#API_KEY_NAME COLLOQUY_TEST_KEY_C", "Hello"]);
        let result = session.process_messages(&mut source).await;

        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("URI")));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        std::env::set_var("COLLOQUY_TEST_KEY_D", "secret-d");
        let stub = StubTransport::new(vec![HttpResponse::new(401, "bad key")]);
        let mut session = Session::new(Box::new(stub))
            .with_defaults(configured_defaults("COLLOQUY_TEST_KEY_D"))
            .unwrap();

        let result = session
            .process_messages(&mut VecSource::new(["Hello"]))
            .await;

        match result {
            Err(Error::Http { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
        assert_eq!(session.conversation().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_response_is_translation_error() {
        std::env::set_var("COLLOQUY_TEST_KEY_E", "secret-e");
        let stub = StubTransport::with_bodies(vec!["<html>oops</html>".to_string()]);
        let mut session = Session::new(Box::new(stub))
            .with_defaults(configured_defaults("COLLOQUY_TEST_KEY_E"))
            .unwrap();

        let result = session
            .process_messages(&mut VecSource::new(["Hello"]))
            .await;
        assert!(matches!(result, Err(Error::Translation { .. })));
    }

    #[tokio::test]
    async fn test_directives_never_send() {
        let stub = StubTransport::with_bodies(vec![]);
        let requests = stub.requests();
        let mut session = Session::new(Box::new(stub));

        let mut source = VecSource::new([
            "#system Be brief.",
            "#URI http://x/v1/chat",
            "#API_KEY_NAME SOME_KEY",
            "#MODEL m1",
            "#TRANSLATOR openai",
            "# just a note",
        ]);
        session.process_messages(&mut source).await.unwrap();

        assert!(requests.lock().unwrap().is_empty());
        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation()[0].content, "Be brief.");

        let defaults = session.defaults();
        assert_eq!(defaults.uri.as_deref(), Some("http://x/v1/chat"));
        assert_eq!(defaults.api_key_name.as_deref(), Some("SOME_KEY"));
        assert_eq!(defaults.model.as_deref(), Some("m1"));
        assert_eq!(defaults.translator, "openai");
        assert_eq!(session.translator_name(), "openai");
    }

    #[tokio::test]
    async fn test_unknown_translator_fails() {
        let stub = StubTransport::with_bodies(vec![]);
        let mut session = Session::new(Box::new(stub));

        let mut source = VecSource::new(["#TRANSLATOR bogus", "never read"]);
        let result = session.process_messages(&mut source).await;

        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("bogus")));
        assert_eq!(source.remaining(), 1);
    }

    #[tokio::test]
    async fn test_template_changes_apply_to_later_messages() {
        std::env::set_var("COLLOQUY_TEST_KEY_F", "secret-f");
        let stub = StubTransport::with_bodies(vec![text_response("one"), text_response("two")]);
        let requests = stub.requests();
        let mut session = Session::new(Box::new(stub))
            .with_defaults(configured_defaults("COLLOQUY_TEST_KEY_F"))
            .unwrap();

        let mut source = VecSource::new(["first", "#MODEL other-model", "second"]);
        session.process_messages(&mut source).await.unwrap();

        let conversation = session.conversation();
        assert_eq!(conversation[0].model.as_deref(), Some("test-model"));
        assert_eq!(conversation[2].model.as_deref(), Some("other-model"));

        let requests = requests.lock().unwrap();
        let second: Value = serde_json::from_str(&requests[1].body).unwrap();
        assert_eq!(second["model"], "other-model");
    }

    #[tokio::test]
    async fn test_queue_drains_in_insertion_order() {
        std::env::set_var("COLLOQUY_TEST_KEY_G", "secret-g");
        let stub = StubTransport::with_bodies(vec![
            text_response("a1"),
            text_response("a2"),
            text_response("a3"),
        ]);
        let mut session = Session::new(Box::new(stub))
            .with_defaults(configured_defaults("COLLOQUY_TEST_KEY_G"))
            .unwrap();

        let first = session.user_message("u1");
        let second = session.user_message("u2");
        session.enqueue(first);
        session.enqueue(second);
        assert!(session.pending().is_mixed());

        let mut source = VecSource::new(["u3"]);
        session.process_messages(&mut source).await.unwrap();

        let contents: Vec<&str> = session
            .conversation()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["u1", "a1", "u2", "a2", "u3", "a3"]);
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_dispatch_preserves_record_order() {
        let mut session = Session::new(Box::new(StubTransport::with_bodies(vec![])))
            .with_defaults(configured_defaults("UNUSED"))
            .unwrap();
        session.add_tool(Tool::new("alpha", "a", |_| "A".to_string()));
        session.add_tool(Tool::new("beta", "b", |args| format!("B{args}")));
        session.add_tool(Tool::new("gamma", "c", |_| "C".to_string()));

        let mut response = Message::assistant("");
        response.tool_calls = vec![
            ToolCallRecord::new("id-3", "gamma", "{}"),
            ToolCallRecord::new("id-1", "alpha", "{}"),
            ToolCallRecord::new("id-2", "beta", "!"),
        ];

        session.dispatch_tool_calls(&response).unwrap();

        let queued: Vec<(&str, &str, &str)> = session
            .pending()
            .iter()
            .map(|m| {
                (
                    m.tool_call_id.as_deref().unwrap(),
                    m.name.as_deref().unwrap(),
                    m.content.as_str(),
                )
            })
            .collect();
        assert_eq!(
            queued,
            vec![("id-3", "gamma", "C"), ("id-1", "alpha", "A"), ("id-2", "beta", "B!")]
        );
        for message in session.pending().iter() {
            assert_eq!(message.message_type(), MessageType::ToolResult);
            assert_eq!(message.uri.as_deref(), Some("http://x/v1/chat"));
            assert_eq!(message.model.as_deref(), Some("test-model"));
        }
    }

    #[test]
    fn test_unknown_tool_aborts_dispatch() {
        let mut session = Session::new(Box::new(StubTransport::with_bodies(vec![])));
        session.add_tool(Tool::new("known", "k", |_| "ok".to_string()));

        let mut response = Message::assistant("");
        response.tool_calls = vec![
            ToolCallRecord::new("c1", "known", "{}"),
            ToolCallRecord::new("c2", "missing", "{}"),
            ToolCallRecord::new("c3", "known", "{}"),
        ];

        let result = session.dispatch_tool_calls(&response);
        assert!(matches!(result, Err(Error::Tool(msg)) if msg.contains("missing")));
        assert_eq!(session.pending().len(), 1);
        assert_eq!(
            session.pending().front().and_then(|m| m.tool_call_id.as_deref()),
            Some("c1")
        );
    }

    #[test]
    fn test_malformed_tool_record() {
        let mut session = Session::new(Box::new(StubTransport::with_bodies(vec![])));
        session.add_tool(Tool::new("known", "k", |_| "ok".to_string()));

        let mut response = Message::assistant("");
        response.tool_calls = vec![ToolCallRecord::new("", "known", "{}")];

        let result = session.dispatch_tool_calls(&response);
        assert!(matches!(result, Err(Error::Tool(_))));
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_tool_record_missing_arguments() {
        let mut session = Session::new(Box::new(StubTransport::with_bodies(vec![])));
        session.add_tool(Tool::new("known", "k", |_| "ok".to_string()));

        let mut missing = ToolCallRecord::new("c1", "known", "");
        missing.arguments = None;
        let mut response = Message::assistant("");
        response.tool_calls = vec![missing];

        let result = session.dispatch_tool_calls(&response);
        assert!(matches!(result, Err(Error::Tool(msg)) if msg.contains("arguments=None")));
        assert!(session.pending().is_empty());

        // an empty argument string is still a valid record
        response.tool_calls = vec![ToolCallRecord::new("c2", "known", "")];
        session.dispatch_tool_calls(&response).unwrap();
        assert_eq!(session.pending().len(), 1);
    }

    #[tokio::test]
    async fn test_tool_call_without_arguments_ends_session() {
        std::env::set_var("COLLOQUY_TEST_KEY_I", "secret-i");
        let incomplete = [
            json!({"id": "c1", "type": "function", "function": {"name": "t"}}),
            json!({"id": "c1", "type": "function"}),
        ];

        for call in incomplete {
            let body = json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "", "tool_calls": [call]},
                    "finish_reason": "tool_calls"
                }]
            })
            .to_string();
            let stub = StubTransport::with_bodies(vec![body]);
            let requests = stub.requests();
            let mut session = Session::new(Box::new(stub))
                .with_defaults(configured_defaults("COLLOQUY_TEST_KEY_I"))
                .unwrap();

            let calls = std::sync::Arc::new(std::sync::Mutex::new(Vec::<String>::new()));
            let seen = calls.clone();
            session.add_tool(Tool::new("t", "records its input", move |args| {
                seen.lock().unwrap().push(args.to_string());
                "done".to_string()
            }));
            assert!(session.tools().has("t"));

            let result = session
                .process_messages(&mut VecSource::new(["Hello"]))
                .await;

            assert!(
                matches!(result, Err(Error::Tool(ref msg)) if msg.contains("Invalid tool call format")),
                "got {result:?}"
            );
            assert!(calls.lock().unwrap().is_empty());
            assert!(session.pending().is_empty());
            assert_eq!(requests.lock().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_ends_session() {
        std::env::set_var("COLLOQUY_TEST_KEY_H", "secret-h");
        let stub = StubTransport::with_bodies(vec![tool_call_response(&[(
            "c1",
            "not_registered",
            "{}",
        )])]);
        let requests = stub.requests();
        let mut session = Session::new(Box::new(stub))
            .with_defaults(configured_defaults("COLLOQUY_TEST_KEY_H"))
            .unwrap();

        let result = session
            .process_messages(&mut VecSource::new(["Hello", "never sent"]))
            .await;

        assert!(matches!(result, Err(Error::Tool(_))));
        assert_eq!(requests.lock().unwrap().len(), 1);
        // user turn plus the assistant copy
        assert_eq!(session.conversation().len(), 2);
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_with_defaults_rejects_unknown_translator() {
        let defaults = Defaults::default().with_translator("nope");
        let result = Session::new(Box::new(StubTransport::with_bodies(vec![]))).with_defaults(defaults);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
